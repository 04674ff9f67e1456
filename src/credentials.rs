//! Salted credential generation, verification, and persistence.

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;
use uuid::Uuid;

use crate::account::{Account, IdentifierField};
use crate::error::{AuthError, StoreError};
use crate::hash::{derive_password_hash, generate_salt, verify_password_hash};
use crate::store::AccountStore;

/// Generates, verifies, and persists salted password credentials over an
/// injected [`AccountStore`].
#[derive(Debug, Clone)]
pub struct CredentialStore<S> {
    accounts: S,
}

impl<S: AccountStore> CredentialStore<S> {
    #[must_use]
    pub fn new(accounts: S) -> Self {
        Self { accounts }
    }

    /// Create an account for an already-validated identifier.
    ///
    /// The upfront lookup races against concurrent inserts; the store's
    /// unique constraint is the arbiter, and a duplicate-key failure is
    /// reported exactly like the upfront check.
    ///
    /// # Errors
    /// [`AuthError::AccountExists`] when the identifier is taken,
    /// [`AuthError::Store`] when the backend cannot complete the call.
    pub async fn create_account(
        &self,
        field: IdentifierField,
        identifier: &str,
        password: &SecretString,
    ) -> Result<Account, AuthError> {
        if self
            .accounts
            .find_by_field(field, identifier)
            .await?
            .is_some()
        {
            debug!(field = %field, "Identifier already registered");
            return Err(AuthError::AccountExists);
        }

        let salt = generate_salt();
        let password_hash = derive_password_hash(&salt, password.expose_secret())?;
        let account = Account {
            id: Uuid::new_v4(),
            identifier_field: field,
            identifier: identifier.to_string(),
            salt,
            password_hash,
        };

        match self.accounts.insert(account.clone()).await {
            Ok(_) => Ok(account),
            Err(StoreError::DuplicateKey(_)) => {
                debug!(field = %field, "Lost account-creation race to a concurrent insert");
                Err(AuthError::AccountExists)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Look up an account by its designated identifier; absence is not an
    /// error.
    pub async fn find_by_identifier(
        &self,
        field: IdentifierField,
        value: &str,
    ) -> Result<Option<Account>, StoreError> {
        self.accounts.find_by_field(field, value).await
    }

    /// Look up an account by id; absence is not an error.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        self.accounts.find_by_id(id).await
    }

    /// Check a plaintext password against the account's stored credential.
    pub fn verify_password(&self, account: &Account, password: &SecretString) -> bool {
        verify_password_hash(&account.password_hash, password.expose_secret())
    }
}
