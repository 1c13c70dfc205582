//! REST API client module for chibisafe servers.
//!
//! This module provides the `SessionClient` for communicating with a
//! chibisafe instance: version checks, login, token verification, file and
//! album listing, password changes and uploads.
//!
//! The API answers with an exact success message instead of structured
//! status codes, so every operation checks for that message and collapses
//! anything else into an `ApiError`.

pub mod client;
pub mod error;
pub mod version;

pub use client::SessionClient;
pub use error::ApiError;
pub use version::{version_compare, MIN_SERVER_VERSION};
