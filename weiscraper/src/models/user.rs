use serde_json::Value;

/// Owned view over a `user`/`userInfo` node. The node is moved out of the
/// response payload as-is; every accessor reads it on demand, so fields the
/// API omits simply come back as `None`.
#[derive(Debug, Clone)]
pub struct User {
    node: Value,
}

impl User {
    pub(crate) fn new(node: Value) -> Self {
        Self { node }
    }

    pub fn view(&self) -> UserRef<'_> {
        UserRef { node: &self.node }
    }

    pub fn id(&self) -> Option<i64> {
        self.view().id()
    }

    pub fn screen_name(&self) -> Option<&str> {
        self.view().screen_name()
    }

    pub fn description(&self) -> Option<&str> {
        self.view().description()
    }

    pub fn gender(&self) -> Option<&str> {
        self.view().gender()
    }

    pub fn followers_count(&self) -> Option<i64> {
        self.view().followers_count()
    }

    pub fn follow_count(&self) -> Option<i64> {
        self.view().follow_count()
    }

    pub fn avatar_hd(&self) -> Option<&str> {
        self.view().avatar_hd()
    }

    pub fn profile_image_url(&self) -> Option<&str> {
        self.view().profile_image_url()
    }

    pub fn profile_url(&self) -> Option<&str> {
        self.view().profile_url()
    }
}

/// Two users are the same account iff their ids match; everything else on
/// the node is presentation data.
impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        match (self.id(), other.id()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

/// Borrowed counterpart of [`User`] for nodes nested inside another view.
#[derive(Debug, Clone, Copy)]
pub struct UserRef<'a> {
    pub(crate) node: &'a Value,
}

impl<'a> UserRef<'a> {
    fn str_field(&self, key: &str) -> Option<&'a str> {
        self.node.get(key).and_then(Value::as_str)
    }

    fn int_field(&self, key: &str) -> Option<i64> {
        let v = self.node.get(key)?;
        // 某些接口把数字字段给成字符串
        v.as_i64().or_else(|| v.as_str()?.parse().ok())
    }

    pub fn id(&self) -> Option<i64> {
        self.int_field("id")
    }

    pub fn screen_name(&self) -> Option<&'a str> {
        self.str_field("screen_name")
    }

    pub fn description(&self) -> Option<&'a str> {
        self.str_field("description")
    }

    pub fn gender(&self) -> Option<&'a str> {
        self.str_field("gender")
    }

    pub fn followers_count(&self) -> Option<i64> {
        self.int_field("followers_count")
    }

    pub fn follow_count(&self) -> Option<i64> {
        self.int_field("follow_count")
    }

    pub fn avatar_hd(&self) -> Option<&'a str> {
        self.str_field("avatar_hd")
    }

    pub fn profile_image_url(&self) -> Option<&'a str> {
        self.str_field("profile_image_url")
    }

    pub fn profile_url(&self) -> Option<&'a str> {
        self.str_field("profile_url")
    }

    pub fn cover_image_phone(&self) -> Option<&'a str> {
        self.str_field("cover_image_phone")
    }

    pub fn to_owned(&self) -> User {
        User {
            node: self.node.clone(),
        }
    }
}

#[cfg(test)]
mod local_tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_accessors_read_the_node_lazily() {
        let user = User::new(json!({
            "id": 3637346297i64,
            "screen_name": "嘻红豆",
            "gender": "f",
            "followers_count": 1024,
            "follow_count": "56",
        }));
        assert_eq!(user.id(), Some(3637346297));
        assert_eq!(user.screen_name(), Some("嘻红豆"));
        assert_eq!(user.followers_count(), Some(1024));
        // string-typed counters still parse
        assert_eq!(user.follow_count(), Some(56));
        assert_eq!(user.description(), None);
    }

    #[test]
    fn test_identity_is_the_id() {
        let a = User::new(json!({"id": 1, "screen_name": "a"}));
        let b = User::new(json!({"id": 1, "screen_name": "renamed"}));
        let c = User::new(json!({"id": 2, "screen_name": "a"}));
        let anon = User::new(json!({"screen_name": "a"}));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, anon);
        assert_ne!(anon.clone(), anon);
    }
}
