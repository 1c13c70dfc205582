use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub api_key: Option<String>,
}

impl UserProfile {
    pub fn role_display(&self) -> &'static str {
        if self.is_admin {
            "admin"
        } else {
            "user"
        }
    }
}

impl fmt::Debug for UserProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserProfile")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("is_admin", &self.is_admin)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_user() {
        let json = r#"{"id": 1, "username": "admin", "isAdmin": true, "apiKey": "secret"}"#;
        let user: UserProfile = serde_json::from_str(json).expect("valid user json");
        assert_eq!(user.username, "admin");
        assert!(user.is_admin);
        assert_eq!(user.role_display(), "admin");
        assert!(!format!("{:?}", user).contains("secret"));
    }

    #[test]
    fn test_parse_user_without_optional_fields() {
        let user: UserProfile =
            serde_json::from_str(r#"{"id": 7, "username": "pablo"}"#).expect("valid user json");
        assert!(!user.is_admin);
        assert!(user.api_key.is_none());
    }
}
