//! Session-based authentication core.
//!
//! Salted credential storage, session-token derivation, and per-request
//! login checks over injected account and session stores. The crate owns
//! the authentication protocol only; routing, rendering, and database
//! drivers belong to the surrounding request-handling layer and reach
//! this core through the [`AccountStore`] and [`SessionStore`] seams.

mod account;
mod authenticator;
mod credentials;
mod error;
mod hash;
pub mod memory;
mod store;
mod validation;

pub use account::{Account, IdentifierField};
pub use authenticator::{SessionAuthenticator, SESSION_USER_ID, SESSION_USER_TOKEN};
pub use credentials::CredentialStore;
pub use error::{AuthError, FieldError, StoreError};
pub use hash::{derive_password_hash, derive_session_token, generate_salt, SALT_LENGTH};
pub use store::{AccountStore, SessionStore};
