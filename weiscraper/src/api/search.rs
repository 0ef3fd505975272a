use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ApiClientImpl, Envelope, GET_INDEX_PATH};
use crate::client::{HttpClient, HttpResponse};
use crate::error::Result;

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SearchData {
    #[serde(default)]
    pub cards: Vec<Value>,
}

#[derive(Serialize)]
struct SearchQuery<'a> {
    #[serde(rename = "queryVal")]
    query_val: &'a str,
    containerid: String,
}

pub(crate) trait SearchApi {
    async fn search(&self, name: &str) -> Result<SearchData>;
}

impl<C: HttpClient> SearchApi for ApiClientImpl<C> {
    async fn search(&self, name: &str) -> Result<SearchData> {
        info!("searching account by name: {name}");
        let query = SearchQuery {
            query_val: name,
            containerid: format!("100103type%3D3%26q%3D{name}"),
        };
        let response = self.client.get(&self.endpoint(GET_INDEX_PATH), &query).await?;
        let data = response.json::<Envelope<SearchData>>().await?.into_data()?;
        debug!("search for {name} returned {} cards", data.cards.len());
        Ok(data)
    }
}
