/// Shared data structures for the application state
///
/// These structs represent the data model that flows between
/// the item store, the persisted slot and the UI layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category labels offered by the intake form.
/// The store accepts any label; this is a suggestion list, not a closed set.
pub const ITEM_TYPES: &[&str] = &[
    "Shirt",
    "Pant",
    "Shoes",
    "Sports Gear",
    "Accessories",
    "Electronics",
    "Other",
];

/// A single catalog item
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Unique, immutable identifier assigned by the store
    pub id: String,
    pub name: String,
    /// Category label (e.g., "Shirt")
    #[serde(rename = "type")]
    pub item_type: String,
    pub description: String,
    /// URL of the card image
    pub cover_image: String,
    /// Carousel images, possibly empty
    #[serde(default)]
    pub additional_images: Vec<String>,
    /// Creation time, assigned by the store
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Item {
    /// Images shown by the detail carousel.
    /// Falls back to the cover image when there are no additional images.
    pub fn images(&self) -> Vec<&str> {
        if self.additional_images.is_empty() {
            vec![self.cover_image.as_str()]
        } else {
            self.additional_images.iter().map(String::as_str).collect()
        }
    }
}

/// An item candidate that has not been assigned an id or timestamp yet
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewItem {
    pub name: String,
    pub item_type: String,
    pub description: String,
    pub cover_image: String,
    pub additional_images: Vec<String>,
}

impl NewItem {
    /// Stamp the candidate with its identity
    pub fn into_item(self, id: String, created_at: DateTime<Utc>) -> Item {
        Item {
            id,
            name: self.name,
            item_type: self.item_type,
            description: self.description,
            cover_image: self.cover_image,
            additional_images: self.additional_images,
            created_at,
        }
    }
}

/// `createdAt` is stored as RFC 3339 text with millisecond precision,
/// e.g. `2024-01-15T00:00:00.000Z`.
mod timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let text = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&text)
            .map(|parsed| parsed.with_timezone(&Utc))
            .map_err(|e| de::Error::custom(format!("invalid timestamp {:?}: {}", text, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Item {
        Item {
            id: "42".to_string(),
            name: "Hat".to_string(),
            item_type: "Accessories".to_string(),
            description: "A hat".to_string(),
            cover_image: "http://a/1.png".to_string(),
            additional_images: vec![],
            created_at: Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_serializes_camel_case_fields() {
        let json = serde_json::to_value(sample()).unwrap();

        assert_eq!(json["type"], "Accessories");
        assert_eq!(json["coverImage"], "http://a/1.png");
        assert_eq!(json["additionalImages"], serde_json::json!([]));
        assert_eq!(json["createdAt"], "2024-01-15T00:00:00.000Z");
    }

    #[test]
    fn test_parses_offset_timestamps() {
        let json = r#"{"id":"1","name":"n","type":"t","description":"d",
            "coverImage":"c","additionalImages":["a"],"createdAt":"2024-01-15T02:00:00+02:00"}"#;
        let item: Item = serde_json::from_str(json).unwrap();

        assert_eq!(item.created_at, Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_rejects_bad_timestamp() {
        let json = r#"{"id":"1","name":"n","type":"t","description":"d",
            "coverImage":"c","additionalImages":[],"createdAt":"Invalid Date"}"#;

        assert!(serde_json::from_str::<Item>(json).is_err());
    }

    #[test]
    fn test_images_fall_back_to_cover() {
        let mut item = sample();
        assert_eq!(item.images(), vec!["http://a/1.png"]);

        item.additional_images = vec!["http://a/2.png".to_string(), "http://a/3.png".to_string()];
        assert_eq!(item.images(), vec!["http://a/2.png", "http://a/3.png"]);
    }
}
