use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::{Artist, Location};

/// A scheduled performance, fully resolved for display.
///
/// `artist` and `location` are owned copies embedded at join time; both are
/// optional because the upstream schedule may reference slugs that are absent
/// from the roster. `date`, `time_start` and `time_end` are pre-derived,
/// locale-independent display fields; `date_start`/`date_end` keep the
/// absolute instants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub slug: String,
    pub name: String,

    /// Calendar day of the start instant, `YYYY-MM-DD`.
    pub date: String,
    /// Zero-padded `HH:MM` of the start instant.
    #[serde(rename = "timeStart")]
    pub time_start: String,
    /// Zero-padded `HH:MM` of the end instant.
    #[serde(rename = "timeEnd")]
    pub time_end: String,

    #[serde(rename = "dateStart")]
    pub date_start: DateTime<FixedOffset>,
    #[serde(rename = "dateEnd")]
    pub date_end: DateTime<FixedOffset>,
    /// Length of the session in fractional hours (2.5 = two and a half hours).
    pub duration: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<Artist>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl Session {
    /// Slug of the embedded artist, if the join resolved one.
    pub fn artist_slug(&self) -> Option<&str> {
        self.artist.as_ref().map(|a| a.slug.as_str())
    }

    /// Slug of the embedded location, if the join resolved one.
    pub fn location_slug(&self) -> Option<&str> {
        self.location.as_ref().map(|l| l.slug.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_roundtrip_keeps_wire_names() {
        let start: DateTime<FixedOffset> = "2024-07-19T22:00:00+00:00".parse().unwrap();
        let end: DateTime<FixedOffset> = "2024-07-20T00:30:00+00:00".parse().unwrap();
        let session = Session {
            slug: "the-woodpeckers@2024-07-19T22:00:00+00:00".to_string(),
            name: "The Woodpeckers".to_string(),
            date: "2024-07-19".to_string(),
            time_start: "22:00".to_string(),
            time_end: "00:30".to_string(),
            date_start: start,
            date_end: end,
            duration: 2.5,
            artist: None,
            location: None,
        };

        let json = serde_json::to_string(&session).expect("Failed to serialize session");
        assert!(json.contains("\"timeStart\":\"22:00\""));
        assert!(json.contains("\"dateEnd\""));
        assert!(!json.contains("\"artist\""));

        let back: Session = serde_json::from_str(&json).expect("Failed to parse session JSON");
        assert_eq!(back, session);
    }
}
