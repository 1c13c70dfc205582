//! Data models for chibisafe entities.
//!
//! - `UserProfile`: the account behind the bearer token
//! - `FileRecord`, `MiniFile`: uploaded assets, full and condensed
//! - `AlbumRecord`: albums with their condensed files
//! - Response payloads returned by `SessionClient` on success

pub mod album;
pub mod file;
pub mod responses;
pub mod user;

pub use album::AlbumRecord;
pub use file::{AssetSelection, FileRecord, MiniFile, Timestamp};
pub use responses::{
    AlbumResponse, ChangePasswordResponse, FilesResponse, LoginResponse, UploadResponse,
    UserResponse, VersionResponse,
};
pub use user::UserProfile;
