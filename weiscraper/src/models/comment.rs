use serde_json::Value;

use super::user::UserRef;

/// Owned view over the `data` node of a comment-list response.
#[derive(Debug, Clone)]
pub struct CommentThread {
    node: Value,
}

impl CommentThread {
    pub(crate) fn new(node: Value) -> Self {
        Self { node }
    }

    pub fn total_number(&self) -> Option<i64> {
        self.node.get("total_number").and_then(Value::as_i64)
    }

    pub fn max_id(&self) -> Option<i64> {
        self.node.get("max_id").and_then(Value::as_i64)
    }

    /// Comments in thread order. The inner `data` array may be absent on
    /// posts whose comment section is closed.
    pub fn comments(&self) -> impl Iterator<Item = Comment<'_>> {
        self.node
            .get("data")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .map(|node| Comment { node })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Comment<'a> {
    pub(crate) node: &'a Value,
}

impl<'a> Comment<'a> {
    fn str_field(&self, key: &str) -> Option<&'a str> {
        self.node.get(key).and_then(Value::as_str)
    }

    pub fn id(&self) -> Option<&'a str> {
        self.str_field("id")
    }

    pub fn mid(&self) -> Option<&'a str> {
        self.str_field("mid")
    }

    pub fn rootid(&self) -> Option<&'a str> {
        self.str_field("rootid")
    }

    pub fn bid(&self) -> Option<&'a str> {
        self.str_field("bid")
    }

    pub fn floor_number(&self) -> Option<i64> {
        self.node.get("floor_number").and_then(Value::as_i64)
    }

    pub fn text(&self) -> Option<&'a str> {
        self.str_field("text")
    }

    pub fn source(&self) -> Option<&'a str> {
        self.str_field("source")
    }

    pub fn created_at(&self) -> Option<&'a str> {
        self.str_field("created_at")
    }

    pub fn like_count(&self) -> Option<i64> {
        self.node.get("like_count").and_then(Value::as_i64)
    }

    pub fn total_number(&self) -> Option<i64> {
        self.node.get("total_number").and_then(Value::as_i64)
    }

    pub fn author(&self) -> Option<UserRef<'a>> {
        self.node
            .get("user")
            .filter(|node| !node.is_null())
            .map(|node| UserRef { node })
    }
}
