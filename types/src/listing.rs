use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/**
    An object returned by a bucket listing.

    Field names follow the object-storage listing response, so saved
    responses deserialize directly.
*/
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingEntry {
    #[serde(rename = "Key")]
    pub key: String,
    #[serde(rename = "LastModified", default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
    /// Object size in bytes.
    #[serde(rename = "Size", default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

impl ListingEntry {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            last_modified: None,
            size: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_listing_entry() {
        let json = r#"{"Key":"show/master.m3u8","LastModified":"2025-03-01T10:00:00.000Z","Size":512}"#;
        let entry: ListingEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.key, "show/master.m3u8");
        assert_eq!(entry.size, Some(512));
        assert!(entry.last_modified.is_some());
    }

    #[test]
    fn optional_fields_may_be_absent() {
        let entry: ListingEntry = serde_json::from_str(r#"{"Key":"a.mp4"}"#).unwrap();
        assert_eq!(entry, ListingEntry::new("a.mp4"));
    }
}
