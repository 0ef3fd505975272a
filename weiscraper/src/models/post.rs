use chrono::{Local, NaiveDate};
use serde_json::Value;

use super::comment::CommentThread;
use super::picture::Picture;
use super::user::UserRef;

/// Owned view over one feed card. The card node is moved out of the page
/// payload; accessors re-read it on demand and never copy the subtree.
///
/// A comment thread is only ever present when the stream was asked to
/// enrich posts; the plain stream leaves it `None`.
#[derive(Debug, Clone)]
pub struct Post {
    card: Value,
    comment_thread: Option<CommentThread>,
}

impl Post {
    pub(crate) fn new(card: Value) -> Self {
        Self {
            card,
            comment_thread: None,
        }
    }

    pub fn item_id(&self) -> Option<&str> {
        self.card.get("itemid").and_then(Value::as_str)
    }

    pub fn scheme(&self) -> Option<&str> {
        self.card.get("scheme").and_then(Value::as_str)
    }

    /// The embedded `mblog` node carrying the actual post content.
    pub fn body(&self) -> Option<PostBody<'_>> {
        self.card
            .get("mblog")
            .filter(|node| !node.is_null())
            .map(|node| PostBody { node })
    }

    pub fn comment_thread(&self) -> Option<&CommentThread> {
        self.comment_thread.as_ref()
    }

    pub(crate) fn set_comment_thread(&mut self, thread: Option<CommentThread>) {
        self.comment_thread = thread;
    }
}

/// Borrowed view over an `mblog` node, including the nested repost.
#[derive(Debug, Clone, Copy)]
pub struct PostBody<'a> {
    pub(crate) node: &'a Value,
}

impl<'a> PostBody<'a> {
    fn str_field(&self, key: &str) -> Option<&'a str> {
        self.node.get(key).and_then(Value::as_str)
    }

    fn int_field(&self, key: &str) -> Option<i64> {
        self.node.get(key).and_then(Value::as_i64)
    }

    pub fn id(&self) -> Option<&'a str> {
        self.str_field("id")
    }

    pub fn mid(&self) -> Option<&'a str> {
        self.str_field("mid")
    }

    pub fn bid(&self) -> Option<&'a str> {
        self.str_field("bid")
    }

    pub fn text(&self) -> Option<&'a str> {
        self.str_field("text")
    }

    pub fn raw_text(&self) -> Option<&'a str> {
        self.str_field("raw_text")
    }

    pub fn source(&self) -> Option<&'a str> {
        self.str_field("source")
    }

    pub fn reposts_count(&self) -> Option<i64> {
        self.int_field("reposts_count")
    }

    pub fn comments_count(&self) -> Option<i64> {
        self.int_field("comments_count")
    }

    /// Publication date normalized to an absolute `YYYY-MM-DD...` form,
    /// evaluated against the local wall clock. Use [`Self::created_at_on`]
    /// when reproducibility matters.
    pub fn created_at(&self) -> Option<String> {
        self.created_at_on(Local::now().date_naive())
    }

    pub fn created_at_on(&self, today: NaiveDate) -> Option<String> {
        self.str_field("created_at")
            .map(|raw| normalize_created_at(raw, today))
    }

    pub fn author(&self) -> Option<UserRef<'a>> {
        self.node
            .get("user")
            .filter(|node| !node.is_null())
            .map(|node| UserRef { node })
    }

    /// The reposted original, when this post is a repost. The API bounds
    /// the nesting itself, one level in practice.
    pub fn reshared(&self) -> Option<PostBody<'a>> {
        self.node
            .get("retweeted_status")
            .filter(|node| !node.is_null())
            .map(|node| PostBody { node })
    }

    pub fn pictures(&self) -> impl Iterator<Item = Picture<'a>> {
        self.node
            .get("pics")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .map(|node| Picture { node })
    }
}

/// The API hands back three date shapes: absolute (`2018-11-25`), month-day
/// (`08-01`) and fully relative (`几分钟前`). The latter two are anchored to
/// the reference date so every post carries an absolute date.
pub fn normalize_created_at(raw: &str, today: NaiveDate) -> String {
    let mut created_at = raw.to_string();
    if created_at.chars().count() < 9 && created_at.contains('-') {
        created_at = format!("{}-{}", today.format("%Y"), created_at);
    }
    if !created_at.contains('-') {
        created_at = today.format("%Y-%m-%d").to_string();
    }
    created_at
}
