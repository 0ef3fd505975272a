use log::debug;
use serde_json::Value;

use crate::api::{ApiClientImpl, StatusesApi};
use crate::client::HttpClient;
use crate::error::Result;

/// Fixed container addressing the realtime hot-search board.
const REALTIME_HOT_CONTAINERID: &str =
    "106003type%3D25%26t%3D3%26disable_hot%3D1%26filter_type%3Drealtimehot";

/// One ranked entry of the hot-search board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotWord {
    pub sequence: usize,
    pub desc: String,
    pub hot: i64,
    pub url: String,
}

pub(crate) async fn hot_words<C: HttpClient>(api: &ApiClientImpl<C>) -> Result<Vec<HotWord>> {
    let data = api.card_list(REALTIME_HOT_CONTAINERID).await?;
    let entries = data
        .cards
        .first()
        .and_then(|card| card.get("card_group"))
        .and_then(Value::as_array);

    let mut words = Vec::new();
    let mut sequence = 1;
    for entry in entries.into_iter().flatten() {
        // paid placements are ranked nowhere
        if entry.get("promotion").is_some_and(|p| !p.is_null()) {
            continue;
        }
        words.push(HotWord {
            sequence,
            desc: entry
                .get("desc")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            hot: entry.get("desc_extr").and_then(hot_value).unwrap_or(0),
            url: entry
                .get("scheme")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        });
        sequence += 1;
    }
    debug!("hot board carries {} entries", words.len());
    Ok(words)
}

fn hot_value(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| value.as_str()?.parse().ok())
}
