//! Input checks run before anything is sent to the server.

use std::sync::LazyLock;

use regex::Regex;

/// Optional `http(s)://`, a dotted host, then at least one more URL-safe
/// character. Word characters are ASCII only.
static SERVER_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:https?://)?[A-Za-z0-9_.-]+(?:\.[A-Za-z0-9_.-]+)+[A-Za-z0-9_\-.~:/?#\[\]@!$&'()*+,;=]+$",
    )
    .expect("Invalid regex")
});

/// Loose shape check for a server address. `localhost` and bare hosts
/// without a dot are rejected.
pub fn is_valid_server_url(url: &str) -> bool {
    SERVER_URL.is_match(url.trim())
}

/// Trim the address and default to https when no scheme was given.
pub fn normalize_server(url: &str) -> String {
    let url = url.trim().trim_end_matches('/');
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{}", url)
    }
}

pub fn check_credentials(username: &str, password: &str) -> Result<(), &'static str> {
    if username.trim().is_empty() || password.is_empty() {
        return Err("Invalid username or password.");
    }
    Ok(())
}

pub fn check_password_change(old: &str, new: &str, confirm: &str) -> Result<(), &'static str> {
    if old.is_empty() || new.is_empty() || confirm.is_empty() {
        return Err("Please fill all fields");
    }
    if new != confirm {
        return Err("New password and confirm password do not match");
    }
    if new == old {
        return Err("New password cannot be the same as the old password");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_urls() {
        assert!(is_valid_server_url("https://chibisafe.moe"));
        assert!(is_valid_server_url("http://safe.example.com/"));
        assert!(is_valid_server_url("safe.example.com"));
        assert!(is_valid_server_url("192.168.1.5:8000"));

        assert!(!is_valid_server_url(""));
        assert!(!is_valid_server_url("https://"));
        assert!(!is_valid_server_url("localhost"));
        assert!(!is_valid_server_url(".example"));
        assert!(!is_valid_server_url("safe example.com"));
        assert!(!is_valid_server_url("https://safe.example.com/<script>"));
    }

    #[test]
    fn test_server_url_needs_host_character_after_dot() {
        assert!(!is_valid_server_url("a./x"));
        assert!(!is_valid_server_url("a.:x"));
        assert!(!is_valid_server_url("safe.:8000"));
        assert!(!is_valid_server_url("https://safe.?q"));

        assert!(is_valid_server_url("a.b/x"));
        assert!(is_valid_server_url("safe.example:8000"));
        assert!(is_valid_server_url("https://safe.example/?q=1#top"));
    }

    #[test]
    fn test_normalize_server() {
        assert_eq!(normalize_server(" safe.example.com/ "), "https://safe.example.com");
        assert_eq!(normalize_server("http://10.0.0.2:8000"), "http://10.0.0.2:8000");
    }

    #[test]
    fn test_check_credentials() {
        assert!(check_credentials("admin", "hunter2").is_ok());
        assert_eq!(check_credentials("", "x"), Err("Invalid username or password."));
        assert_eq!(check_credentials("admin", ""), Err("Invalid username or password."));
    }

    #[test]
    fn test_password_change_checks_in_order() {
        assert_eq!(check_password_change("", "a", "a"), Err("Please fill all fields"));
        assert_eq!(
            check_password_change("old", "new", "nwe"),
            Err("New password and confirm password do not match")
        );
        assert_eq!(
            check_password_change("same", "same", "same"),
            Err("New password cannot be the same as the old password")
        );
        assert!(check_password_change("old", "new", "new").is_ok());
    }
}
