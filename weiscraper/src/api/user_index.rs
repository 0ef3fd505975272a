use log::info;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ApiClientImpl, Envelope, GET_INDEX_PATH};
use crate::client::{HttpClient, HttpResponse};
use crate::error::Result;
use crate::models::TabsInfo;

/// Account index payload. Besides the profile node it carries the `tabs`
/// container directory and up to three scheme URLs the follow-graph tokens
/// hide in, depending on the account's API generation.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct IndexData {
    #[serde(default, rename = "userInfo")]
    pub user_info: Option<Value>,
    #[serde(default, rename = "tabsInfo")]
    pub tabs_info: Option<TabsInfo>,
    #[serde(default)]
    pub scheme: Option<String>,
    #[serde(default)]
    pub fans_scheme: Option<String>,
    #[serde(default)]
    pub follow_scheme: Option<String>,
}

#[derive(Serialize)]
struct IndexQuery {
    r#type: &'static str,
    value: i64,
}

pub(crate) trait UserIndexApi {
    async fn user_index(&self, uid: i64) -> Result<IndexData>;
}

impl<C: HttpClient> UserIndexApi for ApiClientImpl<C> {
    async fn user_index(&self, uid: i64) -> Result<IndexData> {
        info!("getting account index, uid: {uid}");
        let query = IndexQuery {
            r#type: "uid",
            value: uid,
        };
        let response = self.client.get(&self.endpoint(GET_INDEX_PATH), &query).await?;
        response.json::<Envelope<IndexData>>().await?.into_data()
    }
}
