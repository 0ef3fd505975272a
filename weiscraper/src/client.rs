#![allow(async_fn_in_trait)]
use std::sync::Arc;
use std::time::Duration;

use log::warn;
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::error::{Error, Result};

/// Transport seam. The page loop and the resolver only ever talk to this
/// trait, so tests substitute a canned client and callers can bring their
/// own proxied/instrumented transport.
pub trait HttpClient: Send + Sync + Clone {
    type Response: HttpResponse;

    async fn get(
        &self,
        url: &str,
        query: &(impl serde::Serialize + Send + Sync),
    ) -> Result<Self::Response>;
}

pub trait HttpResponse: Send {
    async fn json<T: DeserializeOwned>(self) -> Result<T>;
    async fn text(self) -> Result<String>;
}

#[derive(Debug, Clone)]
pub struct Client {
    inner: Arc<reqwest::Client>,
}

impl Client {
    pub fn new() -> Result<Self> {
        Self::with_config(&Config::default())
    }

    pub fn with_config(config: &Config) -> Result<Self> {
        let mut headers = HeaderMap::from_iter([
            (
                header::ACCEPT,
                HeaderValue::from_static("application/json, text/plain, */*"),
            ),
            (
                header::REFERER,
                HeaderValue::from_static("https://m.weibo.cn/"),
            ),
            (
                header::ACCEPT_LANGUAGE,
                HeaderValue::from_static("en-US,en;q=0.5"),
            ),
            (
                HeaderName::from_static("x-requested-with"),
                HeaderValue::from_static("XMLHttpRequest"),
            ),
            (header::CONNECTION, HeaderValue::from_static("keep-alive")),
        ]);
        headers.insert(
            header::USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| Error::FormatError(format!("bad user agent: {e}")))?,
        );

        let inner = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            inner: Arc::new(inner),
        })
    }
}

impl HttpClient for Client {
    type Response = Response;

    async fn get(
        &self,
        url: &str,
        query: &(impl serde::Serialize + Send + Sync),
    ) -> Result<Self::Response> {
        let res = self.inner.get(url).query(query).send().await?;
        if !res.status().is_success() {
            warn!("http request {url} failed with status code {}", res.status());
            return Err(Error::Transport(format!(
                "{url} returned status {}",
                res.status()
            )));
        }
        Ok(Response(res))
    }
}

#[derive(Debug)]
pub struct Response(reqwest::Response);

impl HttpResponse for Response {
    async fn json<T: DeserializeOwned>(self) -> Result<T> {
        Ok(self.0.json::<T>().await?)
    }

    async fn text(self) -> Result<String> {
        Ok(self.0.text().await?)
    }
}
