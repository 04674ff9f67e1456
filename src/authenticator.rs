//! Login, account creation, and per-request authentication state.

use secrecy::SecretString;
use tracing::debug;
use uuid::Uuid;

use crate::account::{Account, IdentifierField};
use crate::credentials::CredentialStore;
use crate::error::{AuthError, FieldError};
use crate::hash::derive_session_token;
use crate::store::{AccountStore, SessionStore};
use crate::validation::{normalize_identifier, validate_signup};

/// Session-store key holding the authenticated account id.
pub const SESSION_USER_ID: &str = "user_id";
/// Session-store key holding the derived session token.
pub const SESSION_USER_TOKEN: &str = "user_token";

const DEFAULT_ENTRY_POINT: &str = "accounts";

/// Orchestrates login, account creation, and per-request authentication
/// checks over injected credential and session stores.
///
/// No login state lives in the process: every check recomputes the
/// expected token from the current account record, so checks hold across
/// server restarts and horizontally scaled instances.
pub struct SessionAuthenticator<A, S> {
    credentials: CredentialStore<A>,
    sessions: S,
    entry_point: String,
}

impl<A, S> SessionAuthenticator<A, S>
where
    A: AccountStore,
    S: SessionStore,
{
    #[must_use]
    pub fn new(credentials: CredentialStore<A>, sessions: S) -> Self {
        Self {
            credentials,
            sessions,
            entry_point: DEFAULT_ENTRY_POINT.to_string(),
        }
    }

    /// Set the entry point handed to `require_authentication` failure
    /// callbacks (typically the route serving the login form).
    #[must_use]
    pub fn with_entry_point(mut self, entry_point: impl Into<String>) -> Self {
        self.entry_point = entry_point.into();
        self
    }

    #[must_use]
    pub fn credentials(&self) -> &CredentialStore<A> {
        &self.credentials
    }

    /// Validate credentials and establish a session.
    ///
    /// Unknown identifier, identifier-field mismatch, and wrong password
    /// all collapse into [`AuthError::InvalidCredentials`]; responses
    /// never reveal which part failed.
    ///
    /// # Errors
    /// `InvalidCredentials` on any credential failure, `Store` when a
    /// backend cannot complete a call.
    pub async fn login(
        &self,
        field: IdentifierField,
        identifier: &str,
        password: &SecretString,
    ) -> Result<Account, AuthError> {
        let identifier = normalize_identifier(field, identifier);
        if identifier.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }

        let Some(account) = self
            .credentials
            .find_by_identifier(field, &identifier)
            .await?
        else {
            debug!(field = %field, "No account for submitted identifier");
            return Err(AuthError::InvalidCredentials);
        };

        // The record must match on the designated identifier field, not on
        // an incidentally equal value in another column.
        if account.identifier_field != field || account.identifier != identifier {
            debug!(field = %field, "Identifier field mismatch on lookup");
            return Err(AuthError::InvalidCredentials);
        }

        if !self.credentials.verify_password(&account, password) {
            debug!(field = %field, "Password verification failed");
            return Err(AuthError::InvalidCredentials);
        }

        self.establish_session(&account).await?;
        Ok(account)
    }

    /// Create an account if the form-level validation rules pass.
    ///
    /// Does not establish a session: a freshly registered user still logs
    /// in separately.
    ///
    /// # Errors
    /// [`AuthError::Validation`] carrying the ordered field errors (a
    /// taken identifier is reported the same way), `Store` on backend
    /// failure.
    pub async fn create_account(
        &self,
        field: IdentifierField,
        identifier: &str,
        password: &SecretString,
        password_confirmation: &SecretString,
    ) -> Result<Account, AuthError> {
        let identifier = normalize_identifier(field, identifier);
        let errors = validate_signup(field, &identifier, password, password_confirmation);
        if !errors.is_empty() {
            return Err(AuthError::Validation(errors));
        }

        match self
            .credentials
            .create_account(field, &identifier, password)
            .await
        {
            Ok(account) => Ok(account),
            Err(AuthError::AccountExists) => Err(AuthError::Validation(vec![FieldError {
                field: field.as_str(),
                message: "An account with that identifier already exists.".to_string(),
            }])),
            Err(err) => Err(err),
        }
    }

    /// Check whether the current caller holds a valid session.
    ///
    /// The stored token must equal the hash of the account id and the
    /// account's *current* password hash, so a credential change
    /// invalidates outstanding sessions without touching the session
    /// store.
    ///
    /// # Errors
    /// Only store connectivity failures; a missing or invalid session is
    /// `Ok(false)`.
    pub async fn is_authenticated(&self) -> Result<bool, AuthError> {
        let Some(user_id) = self.sessions.get(SESSION_USER_ID).await? else {
            return Ok(false);
        };
        let Some(user_token) = self.sessions.get(SESSION_USER_TOKEN).await? else {
            return Ok(false);
        };

        let Ok(id) = user_id.parse::<Uuid>() else {
            debug!("Session user_id is not a valid account id");
            return Ok(false);
        };

        let Some(account) = self.credentials.find_by_id(id).await? else {
            debug!("Session refers to an account that no longer exists");
            return Ok(false);
        };

        Ok(derive_session_token(account.id, &account.password_hash) == user_token)
    }

    /// Enforce authentication, invoking `on_failure` with the configured
    /// entry point when the caller is not logged in (the surrounding layer
    /// typically redirects there).
    ///
    /// # Errors
    /// Store connectivity failures from the underlying check.
    pub async fn require_authentication<F>(&self, on_failure: F) -> Result<(), AuthError>
    where
        F: FnOnce(&str),
    {
        if !self.is_authenticated().await? {
            on_failure(&self.entry_point);
        }
        Ok(())
    }

    async fn establish_session(&self, account: &Account) -> Result<(), AuthError> {
        self.sessions
            .set(SESSION_USER_ID, &account.id.to_string())
            .await?;
        let token = derive_session_token(account.id, &account.password_hash);
        self.sessions.set(SESSION_USER_TOKEN, &token).await?;
        Ok(())
    }
}
