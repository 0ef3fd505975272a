use serde::Deserialize;

/// Failure body of the mobile container API. The service reports failure
/// through the envelope's `ok` flag plus an optional human-readable `msg`.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct ErrResponse {
    #[serde(default)]
    pub ok: i64,
    #[serde(default)]
    pub msg: String,
}
