//! Core library for talking to a self-hosted chibisafe server.
//!
//! - `api`: the `SessionClient` that wraps every REST call the client makes
//! - `auth`: persisted login state and OS keychain credentials
//! - `config`: user configuration
//! - `models`: wire types returned by the server
//! - `utils`: base64 decoding and display formatting

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod utils;

pub use api::{version_compare, ApiError, SessionClient, MIN_SERVER_VERSION};
pub use auth::{CredentialStore, LoginState, LoginStore};
pub use config::Config;
pub use utils::{base64_to_blob, Blob};
