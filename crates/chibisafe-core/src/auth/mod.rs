//! Authentication module for persisting login state and credentials.
//!
//! This module provides:
//! - `LoginStore`: the saved `{server, token, username}` record a client is
//!   rebuilt from on the next start
//! - `CredentialStore`: Secure OS-level password storage via keyring
//!
//! The calling layer decides when state is saved or cleared; `SessionClient`
//! never touches either store.

pub mod credentials;
pub mod login_state;

pub use credentials::CredentialStore;
pub use login_state::{LoginState, LoginStore};
