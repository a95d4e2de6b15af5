use serde::{Deserialize, Serialize};

/// A performing artist from the festival lineup.
///
/// The `slug` is the stable natural key used for session joins and for the
/// liked-artists preference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    pub slug: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub genre: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub description: String,
    #[serde(rename = "imageUrl", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Artist {
    /// Portrait URL if one is set and non-empty.
    pub fn portrait_url(&self) -> Option<&str> {
        self.image_url.as_deref().filter(|u| !u.is_empty())
    }
}
