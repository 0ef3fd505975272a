use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ApiClientImpl, Envelope, GET_INDEX_PATH};
use crate::client::{HttpClient, HttpResponse};
use crate::error::Result;

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct StatusesData {
    #[serde(default, rename = "cardlistInfo")]
    #[allow(unused)]
    pub cardlist_info: Option<CardlistInfo>,
    #[serde(default)]
    pub cards: Vec<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CardlistInfo {
    #[serde(default)]
    #[allow(unused)]
    pub containerid: Option<String>,
    #[serde(default)]
    #[allow(unused)]
    pub total: Option<i64>,
}

#[derive(Serialize)]
struct StatusesQuery<'a> {
    containerid: &'a str,
    page: u32,
}

#[derive(Serialize)]
struct CardListQuery<'a> {
    containerid: &'a str,
}

pub(crate) trait StatusesApi {
    /// One page of the feed addressed by `containerid`.
    async fn statuses(&self, containerid: &str, page: u32) -> Result<StatusesData>;
    /// Page-less fetch of a fixed container (hot-search board and the like).
    async fn card_list(&self, containerid: &str) -> Result<StatusesData>;
}

impl<C: HttpClient> StatusesApi for ApiClientImpl<C> {
    async fn statuses(&self, containerid: &str, page: u32) -> Result<StatusesData> {
        info!("getting statuses, containerid: {containerid}, page: {page}");
        let query = StatusesQuery { containerid, page };
        let response = self.client.get(&self.endpoint(GET_INDEX_PATH), &query).await?;
        let data = response
            .json::<Envelope<StatusesData>>()
            .await?
            .into_data()?;
        debug!("page {page} of {containerid}: {} cards", data.cards.len());
        Ok(data)
    }

    async fn card_list(&self, containerid: &str) -> Result<StatusesData> {
        info!("getting card list, containerid: {containerid}");
        let query = CardListQuery { containerid };
        let response = self.client.get(&self.endpoint(GET_INDEX_PATH), &query).await?;
        response.json::<Envelope<StatusesData>>().await?.into_data()
    }
}

#[cfg(test)]
mod local_tests {
    use std::path::Path;

    use super::*;
    use crate::error::Error;
    use crate::mock::MockClient;

    #[tokio::test]
    async fn test_statuses_page() {
        let mock_client = MockClient::new();
        let api = ApiClientImpl::new(mock_client.clone());

        let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
        mock_client
            .set_statuses_response_from_file(&manifest_dir.join("tests/data/statuses_page1.json"))
            .unwrap();

        let data = api.statuses("1076031111681197", 1).await.unwrap();
        assert_eq!(data.cards.len(), 3);
        assert_eq!(
            data.cardlist_info.unwrap().containerid.as_deref(),
            Some("1076031111681197")
        );
    }

    #[tokio::test]
    async fn test_statuses_failure_is_an_api_error() {
        let mock_client = MockClient::new();
        let api = ApiClientImpl::new(mock_client.clone());
        mock_client.set_statuses_response_from_str(r#"{"ok":0,"msg":"这里还没有内容"}"#);

        assert!(matches!(
            api.statuses("1076033637346297", 99).await,
            Err(Error::Api(_))
        ));
    }
}
