use serde::{Deserialize, Serialize};

use super::file::{MiniFile, Timestamp};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumRecord {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub nsfw: bool,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub edited_at: Option<Timestamp>,
    #[serde(default)]
    pub file_count: u64,
    #[serde(default)]
    pub files: Vec<MiniFile>,
}

impl AlbumRecord {
    pub fn display_file_count(&self) -> String {
        match self.file_count {
            1 => "1 file".to_string(),
            n => format!("{} files", n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_album() {
        let json = r#"{"id": 3, "name": "Cats", "nsfw": false, "createdAt": 1609459200,
            "editedAt": 1609459200, "fileCount": 1,
            "files": [{"id": 12, "name": "aBcD.png", "url": "https://safe.example/aBcD.png",
                       "thumb": "t", "thumbSquare": "ts"}]}"#;
        let album: AlbumRecord = serde_json::from_str(json).expect("valid album json");
        assert_eq!(album.files.len(), 1);
        assert_eq!(album.files[0].thumb_square.as_deref(), Some("ts"));
        assert_eq!(album.display_file_count(), "1 file");
    }
}
