// Payloads returned by `SessionClient` once the success message matched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{AlbumRecord, FileRecord, UserProfile};

#[derive(Debug, Clone, Deserialize)]
pub struct VersionResponse {
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub message: String,
    pub user: UserProfile,
    pub token: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub message: String,
    pub user: UserProfile,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilesResponse {
    pub message: String,
    pub files: Vec<FileRecord>,
    #[serde(default)]
    pub count: Option<u64>,
}

impl FilesResponse {
    /// Number of pages of `limit` files the server holds, at least one.
    pub fn total_pages(&self, limit: u32) -> u64 {
        let count = self.count.unwrap_or(self.files.len() as u64);
        let limit = u64::from(limit.max(1));
        count.div_ceil(limit).max(1)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumResponse {
    pub message: String,
    pub albums: Vec<AlbumRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePasswordResponse {
    pub message: String,
}

/// Upload answers vary between server releases, so everything besides the
/// message is kept as raw JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub message: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UploadResponse {
    /// Public URL of the uploaded file, when the server reports one
    pub fn url(&self) -> Option<&str> {
        self.extra.get("url").and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files_response(count: Option<u64>, files: usize) -> FilesResponse {
        let files = (0..files)
            .map(|i| FileRecord {
                id: i as i64,
                user_id: None,
                name: format!("{}.png", i),
                original: None,
                mime_type: None,
                size: 0,
                hash: None,
                ip: None,
                created_at: None,
                edited_at: None,
                url: String::new(),
                thumb: None,
                thumb_square: None,
            })
            .collect();
        FilesResponse {
            message: "Successfully retrieved files".into(),
            files,
            count,
        }
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(files_response(Some(120), 50).total_pages(50), 3);
        assert_eq!(files_response(Some(100), 50).total_pages(50), 2);
        assert_eq!(files_response(Some(0), 0).total_pages(50), 1);
        assert_eq!(files_response(None, 3).total_pages(50), 1);
    }

    #[test]
    fn test_upload_url() {
        let json = r#"{"message": "Successfully uploaded file", "name": "x.png", "url": "https://safe.example/x.png"}"#;
        let resp: UploadResponse = serde_json::from_str(json).expect("valid upload json");
        assert_eq!(resp.url(), Some("https://safe.example/x.png"));
    }
}
