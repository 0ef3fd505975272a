use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::statuses::CardlistInfo;
use super::{ApiClientImpl, Envelope, GET_SECOND_PATH};
use crate::client::{HttpClient, HttpResponse};
use crate::error::Result;

/// One page of the secondary card list (follow/follower rosters live
/// here, not on the primary index endpoint).
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SecondData {
    #[serde(default)]
    #[allow(unused)]
    pub count: Option<i64>,
    #[serde(default, rename = "cardlistInfo")]
    #[allow(unused)]
    pub cardlist_info: Option<CardlistInfo>,
    #[serde(default)]
    pub cards: Vec<Value>,
}

#[derive(Serialize)]
struct SecondQuery<'a> {
    containerid: &'a str,
    page: u32,
}

pub(crate) trait SecondApi {
    async fn second(&self, containerid: &str, page: u32) -> Result<SecondData>;
}

impl<C: HttpClient> SecondApi for ApiClientImpl<C> {
    async fn second(&self, containerid: &str, page: u32) -> Result<SecondData> {
        info!("getting second list, containerid: {containerid}, page: {page}");
        let query = SecondQuery { containerid, page };
        let response = self
            .client
            .get(&self.endpoint(GET_SECOND_PATH), &query)
            .await?;
        let data = response.json::<Envelope<SecondData>>().await?.into_data()?;
        debug!("page {page} of {containerid}: {} cards", data.cards.len());
        Ok(data)
    }
}

#[cfg(test)]
mod local_tests {
    use std::path::Path;

    use super::*;
    use crate::error::Error;
    use crate::mock::MockClient;

    #[tokio::test]
    async fn test_second_page() {
        let mock_client = MockClient::new();
        let api = ApiClientImpl::new(mock_client.clone());

        let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
        mock_client
            .set_second_response_from_file(&manifest_dir.join("tests/data/second_page1.json"))
            .unwrap();

        let data = api.second("1005053637346297_-_FANS", 1).await.unwrap();
        assert_eq!(data.count, Some(200));
        assert_eq!(data.cards.len(), 2);
    }

    #[tokio::test]
    async fn test_exhausted_roster_is_an_api_error() {
        let mock_client = MockClient::new();
        let api = ApiClientImpl::new(mock_client.clone());
        mock_client.set_second_response_from_str(r#"{"ok":0}"#);

        assert!(matches!(
            api.second("1005053637346297_-_FANS", 10).await,
            Err(Error::Api(_))
        ));
    }
}
