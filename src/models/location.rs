use serde::{Deserialize, Serialize};

/// A festival location: a stage, a bar, a service point.
///
/// `coordinates` is `[latitude, longitude]` when the location is mapped.
/// `location_type` is a free-form category string from the upstream CMS
/// ("stage", "bar", "food", ...), not an enum, so unknown categories pass
/// through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub slug: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<[f64; 2]>,
    #[serde(rename = "locationType", skip_serializing_if = "Option::is_none")]
    pub location_type: Option<String>,
}

impl Location {
    /// Whether this location is a performance stage.
    pub fn is_stage(&self) -> bool {
        self.location_type.as_deref() == Some("stage")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_location_with_coordinates() {
        let json = r#"{
            "slug": "main-stage",
            "name": "Main Stage",
            "coordinates": [51.123, 12.456],
            "locationType": "stage"
        }"#;

        let location: Location = serde_json::from_str(json).expect("Failed to parse location JSON");
        assert_eq!(location.slug, "main-stage");
        assert_eq!(location.coordinates, Some([51.123, 12.456]));
        assert!(location.is_stage());
    }

    #[test]
    fn test_parse_location_minimal() {
        let json = r#"{"slug": "infopoint", "name": "Infopoint"}"#;
        let location: Location = serde_json::from_str(json).expect("Failed to parse location JSON");
        assert_eq!(location.coordinates, None);
        assert_eq!(location.location_type, None);
        assert!(!location.is_stage());
    }
}
