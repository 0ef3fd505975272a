use log::info;
use serde::Serialize;
use serde_json::Value;

use super::{ApiClientImpl, COMMENTS_HOTFLOW_PATH, Envelope};
use crate::client::{HttpClient, HttpResponse};
use crate::error::Result;
use crate::models::CommentThread;

#[derive(Serialize)]
struct CommentsQuery<'a> {
    id: &'a str,
    mid: &'a str,
}

pub(crate) trait CommentsApi {
    /// The comment thread of one post, addressed by its `(id, mid)` pair.
    async fn comments(&self, id: &str, mid: &str) -> Result<CommentThread>;
}

impl<C: HttpClient> CommentsApi for ApiClientImpl<C> {
    async fn comments(&self, id: &str, mid: &str) -> Result<CommentThread> {
        info!("getting comments, id: {id}, mid: {mid}");
        let query = CommentsQuery { id, mid };
        let response = self
            .client
            .get(&self.endpoint(COMMENTS_HOTFLOW_PATH), &query)
            .await?;
        let data = response.json::<Envelope<Value>>().await?.into_data()?;
        Ok(CommentThread::new(data))
    }
}
