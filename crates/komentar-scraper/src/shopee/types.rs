use serde::Deserialize;

/// Envelope of `GET /api/v2/item/get_ratings`.
///
/// Only the path to the rating list is typed; each rating stays a loose
/// JSON value because the storefront omits fields freely.
#[derive(Debug, Default, Deserialize)]
pub struct RatingsResponse {
    #[serde(default)]
    pub data: Option<RatingsData>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RatingsData {
    #[serde(default)]
    pub ratings: Option<Vec<serde_json::Value>>,
}

impl RatingsResponse {
    /// The rating objects of this page; empty when `data` or `ratings` is
    /// missing or null.
    #[must_use]
    pub fn into_ratings(self) -> Vec<serde_json::Value> {
        self.data.and_then(|d| d.ratings).unwrap_or_default()
    }
}
