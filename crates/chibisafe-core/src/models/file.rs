use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A creation/edit date as reported by the server.
///
/// Older releases send epoch seconds, newer ones an ISO-8601 string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Epoch(i64),
    Text(String),
}

impl Timestamp {
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Timestamp::Epoch(secs) => Utc.timestamp_opt(*secs, 0).single(),
            Timestamp::Text(text) => DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
        }
    }

    /// Format for display, falling back to the raw value
    pub fn display(&self) -> String {
        match self.to_datetime() {
            Some(dt) => dt.format("%b %d, %Y").to_string(),
            None => match self {
                Timestamp::Epoch(secs) => secs.to_string(),
                Timestamp::Text(text) => text.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub id: i64,
    #[serde(default)]
    pub user_id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub original: Option<String>,
    #[serde(rename = "type", default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub hash: Option<String>,
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub edited_at: Option<Timestamp>,
    pub url: String,
    #[serde(default)]
    pub thumb: Option<String>,
    #[serde(default)]
    pub thumb_square: Option<String>,
}

impl FileRecord {
    /// Name the file was uploaded with, or the stored name
    pub fn display_name(&self) -> &str {
        self.original.as_deref().unwrap_or(&self.name)
    }
}

/// The condensed file listing embedded in album responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MiniFile {
    pub id: i64,
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub thumb: Option<String>,
    #[serde(default)]
    pub thumb_square: Option<String>,
}

/// Outcome of asking the user to pick something to upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetSelection {
    Cancelled,
    Picked { uri: String },
}

impl AssetSelection {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, AssetSelection::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_file_record() {
        let json = r#"{
            "id": 12, "userId": 1, "name": "aBcD.png", "original": "cat.png",
            "type": "image/png", "size": 2048, "hash": "abc", "ip": "127.0.0.1",
            "createdAt": 1609459200, "editedAt": "2021-01-01T00:00:00.000Z",
            "url": "https://safe.example/aBcD.png",
            "thumb": "https://safe.example/thumbs/aBcD.webp",
            "thumbSquare": "https://safe.example/thumbs/square/aBcD.png"
        }"#;
        let file: FileRecord = serde_json::from_str(json).expect("valid file json");
        assert_eq!(file.mime_type.as_deref(), Some("image/png"));
        assert_eq!(file.display_name(), "cat.png");
        assert_eq!(file.created_at.as_ref().map(Timestamp::display).as_deref(), Some("Jan 01, 2021"));
        assert_eq!(file.edited_at.as_ref().map(Timestamp::display).as_deref(), Some("Jan 01, 2021"));
    }

    #[test]
    fn test_unparseable_timestamp_shows_raw() {
        assert_eq!(Timestamp::Text("yesterday".into()).display(), "yesterday");
    }

    #[test]
    fn test_selection() {
        assert!(AssetSelection::Cancelled.is_cancelled());
        assert!(!AssetSelection::Picked { uri: "file:///a.png".into() }.is_cancelled());
    }
}
