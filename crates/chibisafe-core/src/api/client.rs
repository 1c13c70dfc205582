//! Session client for the chibisafe REST API.
//!
//! `SessionClient` owns the server address and bearer token. Every
//! high-level call issues one request and accepts the answer only when it
//! carries the exact success message plus the fields the call needs.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{header, Client, Method};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::models::{
    AlbumResponse, AssetSelection, ChangePasswordResponse, FilesResponse, LoginResponse,
    UploadResponse, UserResponse, VersionResponse,
};
use crate::utils::Blob;

use super::{version_compare, ApiError, MIN_SERVER_VERSION};

// ============================================================================
// Constants
// ============================================================================

/// Vendor media type the server expects in the accept header.
const API_ACCEPT: &str = "application/vnd.chibisafe.json, application/vnd.chibisafe.json";

/// HTTP request timeout in seconds when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Multipart field and file name used for uploads.
const UPLOAD_FIELD: &str = "files[]";
const UPLOAD_FILE_NAME: &str = "upload.png";

const MSG_VERIFIED: &str = "Successfully verified token";
const MSG_LOGGED_IN: &str = "Successfully logged in.";
const MSG_PASSWORD_CHANGED: &str = "The password was changed successfully";
const MSG_USER: &str = "Successfully retrieved user";
const MSG_UPLOADED: &str = "Successfully uploaded file";
const MSG_FILES: &str = "Successfully retrieved files";
const MSG_ALBUMS: &str = "Successfully retrieved albums";

/// API client bound to one chibisafe server.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct SessionClient {
    client: Client,
    token: Option<String>,
    base_url: String,
}

impl SessionClient {
    /// Create a client from a cached token and server address.
    /// Empty strings mean "not logged in".
    pub fn new(token: impl Into<String>, base_url: impl Into<String>) -> reqwest::Result<Self> {
        Self::with_timeout(token, base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(
        token: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> reqwest::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            token: non_empty(token.into()),
            base_url: base_url.into(),
        })
    }

    /// A client with no server and no credentials
    pub fn empty() -> reqwest::Result<Self> {
        Self::new("", "")
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn set_base_url(&mut self, base_url: &str) {
        self.base_url = base_url.trim_end_matches('/').to_string();
    }

    // ===== Session =====

    /// Point the client at `base_url` and check that it runs a compatible
    /// server release.
    pub async fn validate(&mut self, base_url: &str) -> bool {
        self.set_base_url(base_url);

        let result = self.request(Method::GET, "/api/version", None, None).await;
        match serde_json::from_value::<VersionResponse>(result) {
            Ok(v) if !v.version.is_empty() => {
                debug!(version = %v.version, "Server version");
                version_compare(&v.version, MIN_SERVER_VERSION)
            }
            _ => false,
        }
    }

    /// Verify the stored token. Without a token no request is made.
    pub async fn check_valid(&self) -> bool {
        if self.token.is_none() {
            return false;
        }

        let result = self.request(Method::GET, "/api/verify", None, None).await;
        message(&result) == Some(MSG_VERIFIED) && is_present(&result, "user")
    }

    /// Log in and keep the returned token for later requests.
    pub async fn login(
        &mut self,
        base_url: &str,
        username: &str,
        password: &str,
    ) -> Result<LoginResponse, ApiError> {
        self.set_base_url(base_url);

        let mut headers = header::HeaderMap::new();
        headers.insert(header::ACCEPT, header::HeaderValue::from_static(API_ACCEPT));
        let body = json!({ "username": username, "password": password });

        let result = self
            .request(Method::POST, "/api/auth/login", Some(&body), Some(headers))
            .await;

        let msg = match message(&result) {
            Some(m) if is_present(&result, "user") && is_present(&result, "token") => m,
            _ => return Err(ApiError::InvalidCredentials),
        };
        if msg != MSG_LOGGED_IN {
            return Err(ApiError::Rejected(msg.to_string()));
        }

        let response: LoginResponse = parse(result).ok_or(ApiError::InvalidCredentials)?;
        self.token = non_empty(response.token.clone());
        Ok(response)
    }

    pub async fn change_password(
        &self,
        old_password: &str,
        new_password: &str,
    ) -> Result<ChangePasswordResponse, ApiError> {
        let body = json!({ "password": old_password, "newPassword": new_password });
        let result = self
            .request(Method::POST, "/api/user/password/change", Some(&body), None)
            .await;

        match message(&result) {
            Some(MSG_PASSWORD_CHANGED) => Ok(ChangePasswordResponse {
                message: MSG_PASSWORD_CHANGED.to_string(),
            }),
            other => Err(ApiError::from_message(other)),
        }
    }

    // ===== Data Fetching Methods =====

    /// Fetch the account behind the current token
    pub async fn get_user_profile(&self) -> Result<UserResponse, ApiError> {
        let result = self.request(Method::GET, "/api/users/me", None, None).await;
        require_success(result, MSG_USER, "user")
    }

    /// Fetch every file, or one page of `limit` files when `all` is false.
    pub async fn list_files(
        &self,
        all: bool,
        limit: Option<u32>,
        page: Option<u32>,
    ) -> Result<FilesResponse, ApiError> {
        let path = if all {
            "/api/files".to_string()
        } else {
            files_page_path(limit, page)
        };

        let result = self.request(Method::GET, &path, None, None).await;
        require_success(result, MSG_FILES, "files")
    }

    /// Fetch all albums with condensed file metadata
    pub async fn list_albums(&self) -> Result<AlbumResponse, ApiError> {
        let result = self.request(Method::GET, "/api/albums/mini", None, None).await;
        require_success(result, MSG_ALBUMS, "albums")
    }

    /// Upload one picked asset as a multipart form.
    pub async fn upload_file(
        &self,
        selection: &AssetSelection,
        blob: Blob,
    ) -> Result<UploadResponse, ApiError> {
        if selection.is_cancelled() {
            return Err(ApiError::UploadCancelled);
        }

        let size = blob.len();
        let part = Part::bytes(blob.data)
            .file_name(UPLOAD_FILE_NAME)
            .mime_str(&blob.content_type)
            .map_err(|_| ApiError::UploadCancelled)?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        let url = format!("{}/api/upload", self.base_url);
        debug!(url = %url, size = size, "Uploading file");

        let mut request = self
            .client
            .post(&url)
            .header(header::ACCEPT, API_ACCEPT)
            .multipart(form);
        if let Some(ref token) = self.token {
            request = request.bearer_auth(token);
        }

        let result: Value = match request.send().await {
            Ok(response) => match response.json().await {
                Ok(value) => value,
                Err(e) => {
                    warn!(error = %e, "Failed to parse upload response");
                    return Err(ApiError::UploadCancelled);
                }
            },
            Err(e) => {
                warn!(error = %e, "Upload request failed");
                return Err(ApiError::UploadCancelled);
            }
        };

        match message(&result) {
            Some(MSG_UPLOADED) => parse(result).ok_or(ApiError::Unknown),
            other => Err(ApiError::from_message(other)),
        }
    }

    // ===== Transport =====

    fn default_headers(&self) -> header::HeaderMap {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(header::ACCEPT, header::HeaderValue::from_static(API_ACCEPT));
        if let Some(ref token) = self.token {
            match header::HeaderValue::from_str(&format!("Bearer {}", token)) {
                Ok(value) => {
                    headers.insert(header::AUTHORIZATION, value);
                }
                Err(_) => warn!("Token contains characters not allowed in a header"),
            }
        }
        headers
    }

    /// Send one request to `base_url + path`.
    ///
    /// Never fails: the answer is the response body as JSON whatever the
    /// status (a non-JSON body becomes a JSON string), and a transport
    /// failure becomes `{"message": "<error>"}`. `headers` replaces the
    /// default headers entirely.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        headers: Option<header::HeaderMap>,
    ) -> Value {
        let url = format!("{}{}", self.base_url, path);
        debug!(method = %method, url = %url, "Sending request");

        let mut request = self
            .client
            .request(method, &url)
            .headers(headers.unwrap_or_else(|| self.default_headers()));
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(url = %url, error = %e, "Request failed");
                return json!({ "message": e.to_string() });
            }
        };

        let status = response.status();
        match response.text().await {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|_| {
                if !status.is_success() {
                    warn!(url = %url, status = %status, "Non-JSON error response");
                }
                Value::String(text)
            }),
            Err(e) => {
                warn!(url = %url, error = %e, "Failed to read response body");
                json!({ "message": e.to_string() })
            }
        }
    }
}

impl std::fmt::Debug for SessionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionClient")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

// ============================================================================
// Response inspection
// ============================================================================

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// `/api/files` with whichever of `limit` and `page` were given.
fn files_page_path(limit: Option<u32>, page: Option<u32>) -> String {
    let params: Vec<String> = [("limit", limit), ("page", page)]
        .iter()
        .filter_map(|(key, value)| value.map(|v| format!("{}={}", key, v)))
        .collect();
    if params.is_empty() {
        "/api/files".to_string()
    } else {
        format!("/api/files?{}", params.join("&"))
    }
}

/// JavaScript-style truthiness, which is what the server's clients test.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn is_present(result: &Value, field: &str) -> bool {
    result.get(field).map(is_truthy).unwrap_or(false)
}

/// The response's non-empty `message`, if any
fn message(result: &Value) -> Option<&str> {
    result
        .get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
}

fn parse<T: DeserializeOwned>(result: Value) -> Option<T> {
    serde_json::from_value(result)
        .map_err(|e| warn!(error = %e, "Unexpected response shape"))
        .ok()
}

/// Accept `result` only with the exact success message and `field` present.
fn require_success<T: DeserializeOwned>(
    result: Value,
    success: &str,
    field: &str,
) -> Result<T, ApiError> {
    if message(&result) != Some(success) || !is_present(&result, field) {
        return Err(ApiError::InvalidCredentials);
    }
    parse(result).ok_or(ApiError::InvalidCredentials)
}
