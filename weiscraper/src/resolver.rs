use itertools::Itertools;
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::api::{ApiClientImpl, SearchApi, StatusesApi, UserIndexApi, user_index::IndexData};
use crate::client::HttpClient;
use crate::error::{Error, Result};
use crate::models::{ContainerSet, Tab, Tabs};

/// Card type marking the account-summary entry in a name-search response.
const ACCOUNT_SUMMARY_CARD: i64 = 11;

/// Synthetic entry on page 0 of a profile container that links to the real
/// posts feed of a second-generation account.
const MORE_POSTS_ITEMID: &str = "more_weibo";

static LFID_EXPR: Lazy<Regex> = Lazy::new(|| Regex::new(r"lfid=(.+?$)").unwrap());
static SCHEME_CONTAINERID_EXPR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"containerid=(.+?)&luicode").unwrap());
static MORE_POSTS_EXPR: Lazy<Regex> = Lazy::new(|| Regex::new(r"containerid=(.+?)WEIBO_SECOND").unwrap());
static PAY_FEED_EXPR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(.+?)WEIBO_SECOND_PROFILE_WEIBO_PAY_BILL").unwrap());

/// Name → account id. Exact, case-sensitive screen-name match only; a
/// missing or ambiguous summary card resolves to `None` rather than
/// guessing.
pub(crate) async fn resolve_uid<C: HttpClient>(
    api: &ApiClientImpl<C>,
    name: &str,
) -> Result<Option<i64>> {
    let data = match api.search(name).await {
        Ok(data) => data,
        Err(Error::Api(err)) => {
            debug!("search for {name} answered with failure: {err:?}");
            return Ok(None);
        }
        Err(e) => return Err(e),
    };

    let card = match data
        .cards
        .iter()
        .filter(|card| {
            card.get("card_type").and_then(Value::as_i64) == Some(ACCOUNT_SUMMARY_CARD)
        })
        .exactly_one()
    {
        Ok(card) => card,
        Err(_) => {
            debug!("no unambiguous account summary card for {name}");
            return Ok(None);
        }
    };

    let Some(user) = card
        .get("card_group")
        .and_then(|group| group.get(0))
        .and_then(|entry| entry.get("user"))
    else {
        return Ok(None);
    };

    if user.get("screen_name").and_then(Value::as_str) != Some(name) {
        return Ok(None);
    }
    Ok(user.get("id").and_then(int_or_str))
}

fn int_or_str(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| value.as_str()?.parse().ok())
}

/// Account id → the container tokens its feeds are addressed by. A failure
/// response or an unrecognized tabs shape degrades to an empty set; only
/// transport-level trouble is an error.
pub(crate) async fn resolve_containers<C: HttpClient>(
    api: &ApiClientImpl<C>,
    uid: i64,
) -> Result<ContainerSet> {
    let index = match api.user_index(uid).await {
        Ok(index) => index,
        Err(Error::Api(err)) => {
            warn!("account index for {uid} unavailable: {err:?}");
            return Ok(ContainerSet::default());
        }
        Err(e) => return Err(e),
    };

    let mut set = ContainerSet::default();
    match index.tabs_info.as_ref().map(|info| &info.tabs) {
        Some(Tabs::List(tabs)) => {
            set.profile = tab_containerid(tabs, "profile");
            set.posts = tab_containerid(tabs, "weibo").and_then(|id| posts_token_from_list(&id));
        }
        Some(Tabs::Map(map)) => {
            set.profile = map.get("0").and_then(|tab| tab.containerid.clone());
            set.album = map.get("3").and_then(|tab| tab.containerid.clone());
            if let Some(profile_id) = set.profile.as_deref() {
                set.posts = resolve_posts_via_profile(api, profile_id).await?;
            }
        }
        _ => warn!("unrecognized tabs shape for {uid}, no containers derived"),
    }

    (set.following, set.followers) = follow_tokens(&index);
    Ok(set)
}

fn tab_containerid(tabs: &[Tab], tab_type: &str) -> Option<String> {
    tabs.iter()
        .find(|tab| tab.tab_type.as_deref() == Some(tab_type))
        .and_then(|tab| tab.containerid.clone())
}

/// Second resolution hop for map-shape accounts: page 0 of the profile
/// container embeds the real posts token in a "more posts" link.
async fn resolve_posts_via_profile<C: HttpClient>(
    api: &ApiClientImpl<C>,
    profile_id: &str,
) -> Result<Option<String>> {
    let page = match api.statuses(profile_id, 0).await {
        Ok(page) => page,
        Err(Error::Api(err)) => {
            warn!("profile page 0 of {profile_id} unavailable: {err:?}");
            return Ok(None);
        }
        Err(e) => return Err(e),
    };

    Ok(page
        .cards
        .iter()
        .find(|card| card.get("itemid").and_then(Value::as_str) == Some(MORE_POSTS_ITEMID))
        .and_then(|card| card.get("scheme").and_then(Value::as_str))
        .and_then(more_posts_token)
        .map(str::to_owned))
}

/// Both historical follow-token derivations, primary `scheme` preferred.
fn follow_tokens(index: &IndexData) -> (Option<String>, Option<String>) {
    if let Some(scheme) = index.scheme.as_deref() {
        let lfid = lfid_token(scheme);
        return (
            lfid.map(|token| format!("{token}_-_FANS")),
            lfid.map(|token| format!("{token}_-_FOLLOWERS")),
        );
    }
    let following = index
        .follow_scheme
        .as_deref()
        .and_then(scheme_containerid_token)
        .map(|token| token.replace("recomm", ""));
    let followers = index
        .fans_scheme
        .as_deref()
        .and_then(scheme_containerid_token)
        .map(|token| token.replace("_intimacy", ""));
    (following, followers)
}

fn lfid_token(scheme: &str) -> Option<&str> {
    LFID_EXPR
        .captures(scheme)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn scheme_containerid_token(scheme: &str) -> Option<&str> {
    SCHEME_CONTAINERID_EXPR
        .captures(scheme)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn more_posts_token(scheme: &str) -> Option<&str> {
    MORE_POSTS_EXPR
        .captures(scheme)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// A list-shape posts token may address a paid sub-feed; it must be cut
/// back at the marker before it is usable. Marker present but unparsable
/// means the token stays unresolved.
fn posts_token_from_list(containerid: &str) -> Option<String> {
    if containerid.contains("WEIBO_SECOND_PROFILE_WEIBO") {
        PAY_FEED_EXPR
            .captures(containerid)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    } else {
        Some(containerid.to_string())
    }
}

#[cfg(test)]
mod local_tests {
    use std::path::{Path, PathBuf};

    use super::*;
    use crate::mock::MockClient;

    fn get_test_data_path(file_name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests/data/")
            .join(file_name)
    }

    #[test]
    fn test_lfid_token() {
        assert_eq!(
            lfid_token("sinaweibo://userinfo?from=feed&lfid=1005053637346297"),
            Some("1005053637346297")
        );
        assert_eq!(lfid_token("sinaweibo://userinfo?from=feed"), None);
    }

    #[test]
    fn test_scheme_containerid_token() {
        assert_eq!(
            scheme_containerid_token(
                "sinaweibo://cardlist?containerid=231051_-_fans_-_1111681197_intimacy&luicode=10000011"
            ),
            Some("231051_-_fans_-_1111681197_intimacy")
        );
        assert_eq!(scheme_containerid_token("sinaweibo://cardlist?containerid=xyz"), None);
    }

    #[test]
    fn test_more_posts_token() {
        assert_eq!(
            more_posts_token(
                "https://m.weibo.cn/p/index?containerid=1076031111681197WEIBO_SECOND_PROFILE_WEIBO&luicode=10000011"
            ),
            Some("1076031111681197")
        );
        assert_eq!(more_posts_token("https://m.weibo.cn/p/index?page=1"), None);
    }

    #[test]
    fn test_posts_token_from_list() {
        assert_eq!(
            posts_token_from_list("1076033637346297").as_deref(),
            Some("1076033637346297")
        );
        assert_eq!(
            posts_token_from_list(
                "1076031843242321WEIBO_SECOND_PROFILE_WEIBO_PAY_BILL_-_all"
            )
            .as_deref(),
            Some("1076031843242321")
        );
        // marker family present but no recognizable tail
        assert_eq!(
            posts_token_from_list("1076031843242321WEIBO_SECOND_PROFILE_WEIBO"),
            None
        );
    }

    #[tokio::test]
    async fn test_resolve_uid_exact_match() {
        let mock_client = MockClient::new();
        let api = ApiClientImpl::new(mock_client.clone());
        mock_client
            .set_search_response_from_file(&get_test_data_path("search_by_name.json"))
            .unwrap();

        let uid = resolve_uid(&api, "嘻红豆").await.unwrap();
        assert_eq!(uid, Some(3637346297));
    }

    #[tokio::test]
    async fn test_resolve_uid_rejects_near_miss() {
        let mock_client = MockClient::new();
        let api = ApiClientImpl::new(mock_client.clone());
        mock_client
            .set_search_response_from_file(&get_test_data_path("search_by_name.json"))
            .unwrap();

        // the fixture's summary card says 嘻红豆, so a different query
        // name must fail closed even though a card came back
        assert_eq!(resolve_uid(&api, "嘻红豆2号").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_resolve_uid_ambiguous_fails_closed() {
        let mock_client = MockClient::new();
        let api = ApiClientImpl::new(mock_client.clone());
        mock_client.set_search_response_from_str(
            r#"{"ok":1,"data":{"cards":[
                {"card_type":11,"card_group":[{"user":{"id":1,"screen_name":"dup"}}]},
                {"card_type":11,"card_group":[{"user":{"id":2,"screen_name":"dup"}}]}
            ]}}"#,
        );

        assert_eq!(resolve_uid(&api, "dup").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_resolve_uid_search_failure_means_not_found() {
        let mock_client = MockClient::new();
        let api = ApiClientImpl::new(mock_client.clone());
        mock_client.set_search_response_from_str(r#"{"ok":0,"msg":"busy"}"#);

        assert_eq!(resolve_uid(&api, "whoever").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_resolve_containers_list_generation() {
        let mock_client = MockClient::new();
        let api = ApiClientImpl::new(mock_client.clone());
        mock_client
            .set_user_index_response_from_file(&get_test_data_path("user_index_list.json"))
            .unwrap();

        let set = resolve_containers(&api, 1111681197).await.unwrap();
        assert_eq!(set.profile.as_deref(), Some("2302831111681197"));
        assert_eq!(set.posts.as_deref(), Some("1076031111681197"));
        assert_eq!(set.following.as_deref(), Some("1005051111681197_-_FANS"));
        assert_eq!(set.followers.as_deref(), Some("1005051111681197_-_FOLLOWERS"));
        assert_eq!(set.album, None);
        // no extra page fetch for the list generation
        assert!(mock_client.calls_to("statuses").is_empty());
    }

    #[tokio::test]
    async fn test_resolve_containers_map_generation_matches_list() {
        let mock_client = MockClient::new();
        let api = ApiClientImpl::new(mock_client.clone());
        mock_client
            .set_user_index_response_from_file(&get_test_data_path("user_index_map.json"))
            .unwrap();
        mock_client
            .set_statuses_response_from_file(&get_test_data_path("profile_page0.json"))
            .unwrap();

        let set = resolve_containers(&api, 1111681197).await.unwrap();
        // same posts token the list-shape fixture resolves to directly
        assert_eq!(set.posts.as_deref(), Some("1076031111681197"));
        assert_eq!(set.profile.as_deref(), Some("2302831111681197"));
        assert_eq!(set.album.as_deref(), Some("1078031111681197_-_album"));
        // derived from fans_scheme/follow_scheme, literals stripped
        assert_eq!(
            set.following.as_deref(),
            Some("231051_-_followers_-_1111681197")
        );
        assert_eq!(set.followers.as_deref(), Some("231051_-_fans_-_1111681197"));
        // the map generation needed the extra page-0 hop
        let statuses_calls = mock_client.calls_to("statuses");
        assert_eq!(statuses_calls.len(), 1);
        assert_eq!(statuses_calls[0].query["containerid"], "2302831111681197");
        assert_eq!(statuses_calls[0].query["page"], 0);
    }

    #[tokio::test]
    async fn test_resolve_containers_unknown_tabs_shape() {
        let mock_client = MockClient::new();
        let api = ApiClientImpl::new(mock_client.clone());
        mock_client.set_user_index_response_from_str(
            r#"{"ok":1,"data":{"userInfo":{"id":5},"tabsInfo":{"tabs":"surprise"}}}"#,
        );

        let set = resolve_containers(&api, 5).await.unwrap();
        assert!(set.is_empty());
    }

    #[tokio::test]
    async fn test_resolve_containers_index_failure_degrades_to_empty() {
        let mock_client = MockClient::new();
        let api = ApiClientImpl::new(mock_client.clone());
        mock_client.set_user_index_response_from_str(r#"{"ok":0,"msg":"user gone"}"#);

        let set = resolve_containers(&api, 404).await.unwrap();
        assert!(set.is_empty());
    }
}
