#![allow(async_fn_in_trait)]
pub(crate) mod comments;
pub(crate) mod search;
pub(crate) mod second;
pub(crate) mod statuses;
pub(crate) mod user_index;

use serde::Deserialize;
use url::Url;

use crate::client::HttpClient;
use crate::config::DEFAULT_API_HOST;
use crate::error::{Error, Result};
use crate::models::ErrResponse;

pub(crate) use comments::CommentsApi;
pub(crate) use search::SearchApi;
pub(crate) use second::SecondApi;
pub(crate) use statuses::StatusesApi;
pub(crate) use user_index::UserIndexApi;

pub(crate) const GET_INDEX_PATH: &str = "/api/container/getIndex";
pub(crate) const GET_SECOND_PATH: &str = "/api/container/getSecond";
pub(crate) const COMMENTS_HOTFLOW_PATH: &str = "/comments/hotflow";

pub(crate) trait ApiClient:
    SearchApi + UserIndexApi + StatusesApi + SecondApi + CommentsApi + Send + Sync + Clone
{
}

#[derive(Debug, Clone)]
pub(crate) struct ApiClientImpl<C: HttpClient> {
    pub(crate) client: C,
    host: String,
}

impl<C: HttpClient> ApiClientImpl<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            host: DEFAULT_API_HOST.to_string(),
        }
    }

    pub fn with_host(client: C, host: &str) -> Result<Self> {
        Url::parse(host)?;
        Ok(Self {
            client,
            host: host.trim_end_matches('/').to_string(),
        })
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.host, path)
    }
}

impl<C: HttpClient> ApiClient for ApiClientImpl<C> {}

/// The `{ok, msg?, data?}` envelope shared by the whole endpoint family.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Envelope<T> {
    #[serde(default)]
    pub ok: i64,
    #[serde(default)]
    pub msg: Option<String>,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn into_data(self) -> Result<T> {
        match self {
            Envelope {
                ok: 1,
                data: Some(data),
                ..
            } => Ok(data),
            Envelope { ok: 1, data: None, .. } => Err(Error::FormatError(
                "response reported ok but carried no data".to_string(),
            )),
            Envelope { ok, msg, .. } => Err(Error::Api(ErrResponse {
                ok,
                msg: msg.unwrap_or_default(),
            })),
        }
    }
}
