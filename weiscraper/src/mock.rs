use std::collections::{HashMap, VecDeque};
use std::fs::read_to_string;
use std::path::Path;
use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::client::{HttpClient, HttpResponse};
use crate::error::{Error, Result};

/// Canned-response transport for tests. Requests are routed to a logical
/// endpoint (several of them share the same URL path and differ only in
/// query parameters), each endpoint pops replies from its own queue, and
/// every request is recorded for assertions.
#[derive(Clone, Default)]
pub struct MockClient {
    inner: Arc<Mutex<MockInner>>,
}

#[derive(Default)]
struct MockInner {
    replies: HashMap<&'static str, VecDeque<MockReply>>,
    calls: Vec<MockCall>,
}

#[derive(Debug, Clone)]
pub struct MockCall {
    pub endpoint: &'static str,
    pub url: String,
    pub query: Value,
}

enum MockReply {
    Body(String),
    /// Simulates a transport that produced no usable response.
    Gap,
}

fn route(url: &str, query: &Value) -> &'static str {
    if url.ends_with("/getSecond") {
        "second"
    } else if url.ends_with("/hotflow") {
        "comments"
    } else if query.get("queryVal").is_some() {
        "search"
    } else if query.get("type").and_then(Value::as_str) == Some("uid") {
        "user_index"
    } else if query.get("page").is_some() {
        "statuses"
    } else {
        "hot_list"
    }
}

impl MockClient {
    pub fn new() -> Self {
        Default::default()
    }

    fn push(&self, endpoint: &'static str, reply: MockReply) {
        self.inner
            .lock()
            .unwrap()
            .replies
            .entry(endpoint)
            .or_default()
            .push_back(reply);
    }

    fn push_file(&self, endpoint: &'static str, path: &Path) -> Result<()> {
        self.push(endpoint, MockReply::Body(read_to_string(path)?));
        Ok(())
    }

    pub fn set_search_response_from_file(&self, path: &Path) -> Result<()> {
        self.push_file("search", path)
    }

    pub fn set_search_response_from_str(&self, body: &str) {
        self.push("search", MockReply::Body(body.to_string()));
    }

    pub fn set_user_index_response_from_file(&self, path: &Path) -> Result<()> {
        self.push_file("user_index", path)
    }

    pub fn set_user_index_response_from_str(&self, body: &str) {
        self.push("user_index", MockReply::Body(body.to_string()));
    }

    pub fn set_statuses_response_from_file(&self, path: &Path) -> Result<()> {
        self.push_file("statuses", path)
    }

    pub fn set_statuses_response_from_str(&self, body: &str) {
        self.push("statuses", MockReply::Body(body.to_string()));
    }

    pub fn set_statuses_gap(&self) {
        self.push("statuses", MockReply::Gap);
    }

    pub fn set_second_response_from_file(&self, path: &Path) -> Result<()> {
        self.push_file("second", path)
    }

    pub fn set_second_response_from_str(&self, body: &str) {
        self.push("second", MockReply::Body(body.to_string()));
    }

    pub fn set_comments_response_from_file(&self, path: &Path) -> Result<()> {
        self.push_file("comments", path)
    }

    pub fn set_comments_response_from_str(&self, body: &str) {
        self.push("comments", MockReply::Body(body.to_string()));
    }

    pub fn set_comments_gap(&self) {
        self.push("comments", MockReply::Gap);
    }

    pub fn set_hot_list_response_from_file(&self, path: &Path) -> Result<()> {
        self.push_file("hot_list", path)
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn calls_to(&self, endpoint: &str) -> Vec<MockCall> {
        self.calls()
            .into_iter()
            .filter(|call| call.endpoint == endpoint)
            .collect()
    }
}

impl HttpClient for MockClient {
    type Response = MockResponse;

    async fn get(
        &self,
        url: &str,
        query: &(impl serde::Serialize + Send + Sync),
    ) -> Result<Self::Response> {
        let query = serde_json::to_value(query)?;
        let mut inner = self.inner.lock().unwrap();
        let endpoint = route(url, &query);
        inner.calls.push(MockCall {
            endpoint,
            url: url.to_string(),
            query,
        });
        match inner.replies.get_mut(endpoint).and_then(VecDeque::pop_front) {
            Some(MockReply::Body(body)) => Ok(MockResponse { body }),
            Some(MockReply::Gap) => Err(Error::Transport(format!("mock gap for {endpoint}"))),
            None => Err(Error::Transport(format!(
                "no canned response left for {endpoint}"
            ))),
        }
    }
}

pub struct MockResponse {
    body: String,
}

impl HttpResponse for MockResponse {
    async fn json<T: DeserializeOwned>(self) -> Result<T> {
        Ok(serde_json::from_str(&self.body)?)
    }

    async fn text(self) -> Result<String> {
        Ok(self.body)
    }
}
