use serde_json::Value;

/// One entry of a post body's `pics` array.
#[derive(Debug, Clone, Copy)]
pub struct Picture<'a> {
    pub(crate) node: &'a Value,
}

impl<'a> Picture<'a> {
    pub fn pid(&self) -> Option<&'a str> {
        self.node.get("pid").and_then(Value::as_str)
    }

    pub fn url(&self) -> Option<&'a str> {
        self.node.get("url").and_then(Value::as_str)
    }

    pub fn large_url(&self) -> Option<&'a str> {
        self.node
            .get("large")
            .and_then(|large| large.get("url"))
            .and_then(Value::as_str)
    }
}

#[cfg(test)]
mod local_tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_picture_accessors() {
        let node = json!({
            "pid": "006x6V15ly1fq",
            "url": "https://wx1.sinaimg.cn/orj360/006x6V15ly1fq.jpg",
            "large": {"url": "https://wx1.sinaimg.cn/large/006x6V15ly1fq.jpg"},
        });
        let pic = Picture { node: &node };
        assert_eq!(pic.pid(), Some("006x6V15ly1fq"));
        assert!(pic.url().unwrap().contains("orj360"));
        assert!(pic.large_url().unwrap().contains("large"));
    }

    #[test]
    fn test_missing_large_block() {
        let node = json!({"pid": "x", "url": "u"});
        let pic = Picture { node: &node };
        assert_eq!(pic.large_url(), None);
    }
}
