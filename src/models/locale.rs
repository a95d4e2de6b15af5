use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Content locale of the festival dataset.
///
/// The upstream CMS publishes exactly these translations; the lowercase
/// serialized form ("de", "en") doubles as the URL path segment of the API
/// endpoint and as the persisted `language` preference value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    De,
    En,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::De => "de",
            Locale::En => "en",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "de" => Ok(Locale::De),
            "en" => Ok(Locale::En),
            other => Err(anyhow::anyhow!("Unsupported locale: {}", other)),
        }
    }
}
