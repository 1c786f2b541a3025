use serde::Deserialize;

/// Envelope of every listing endpoint: `{ "kind": "Listing", "data": { "children": [...] } }`.
/// Only the fields the viewer shows are decoded, the rest are ignored.
#[derive(Deserialize, Debug, Clone)]
pub struct Listing {
    pub data: ListingData,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ListingData {
    pub children: Vec<Thing>,
}

/// A listing child. Links have kind `t3`.
#[derive(Deserialize, Debug, Clone)]
pub struct Thing {
    pub data: PostResult,
}

#[derive(Deserialize, Debug, Clone)]
pub struct PostResult {
    pub id: String,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
}
