use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Deserialize)]
pub struct TabsInfo {
    #[serde(default)]
    pub tabs: Tabs,
}

/// The account index exposes its container list in two incompatible shapes,
/// depending on the account's API generation. Resolved once at parse time;
/// anything else is `Unknown` and yields no containers.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Tabs {
    /// First generation: an ordered list addressed by `tab_type`.
    List(Vec<Tab>),
    /// Second generation: small integer keys with positional meaning
    /// (`"0"` profile, `"1"` posts, `"3"` album).
    Map(HashMap<String, Tab>),
    Unknown(Value),
}

impl Default for Tabs {
    fn default() -> Self {
        Tabs::Unknown(Value::Null)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Tab {
    #[serde(default)]
    pub tab_type: Option<String>,
    #[serde(default)]
    pub containerid: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

#[cfg(test)]
mod local_tests {
    use super::*;

    #[test]
    fn test_list_shape() {
        let tabs: Tabs = serde_json::from_str(
            r#"[
                {"tab_type": "profile", "containerid": "2302833637346297", "title": "主页"},
                {"tab_type": "weibo", "containerid": "1076033637346297", "title": "微博"}
            ]"#,
        )
        .unwrap();
        let Tabs::List(tabs) = tabs else {
            panic!("expected list shape");
        };
        assert_eq!(tabs.len(), 2);
        assert_eq!(tabs[1].tab_type.as_deref(), Some("weibo"));
    }

    #[test]
    fn test_map_shape() {
        let tabs: Tabs = serde_json::from_str(
            r#"{
                "0": {"containerid": "2302831111681197"},
                "1": {"containerid": "2304131111681197_-_"},
                "3": {"containerid": "1078031111681197_-_album"}
            }"#,
        )
        .unwrap();
        let Tabs::Map(map) = tabs else {
            panic!("expected map shape");
        };
        assert_eq!(
            map.get("0").and_then(|t| t.containerid.as_deref()),
            Some("2302831111681197")
        );
    }

    #[test]
    fn test_anything_else_is_unknown() {
        let tabs: Tabs = serde_json::from_str(r#""surprise""#).unwrap();
        assert!(matches!(tabs, Tabs::Unknown(_)));
        let tabs: Tabs = serde_json::from_str(r#"[1, 2, 3]"#).unwrap();
        assert!(matches!(tabs, Tabs::Unknown(_)));
    }
}
