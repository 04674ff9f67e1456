//! Collaborator seams for account persistence and per-caller sessions.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::account::{Account, IdentifierField};
use crate::error::StoreError;

/// Relational account persistence.
///
/// The backing store owns the uniqueness guarantee for
/// `(identifier_field, identifier)`: under concurrent inserts of the same
/// identifier, exactly one call succeeds and the others fail with
/// [`StoreError::DuplicateKey`]. A unique constraint at the storage layer
/// is the expected implementation.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Fetch a single account by id; absence is not an error.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError>;

    /// Fetch a single account by its designated identifier.
    async fn find_by_field(
        &self,
        field: IdentifierField,
        value: &str,
    ) -> Result<Option<Account>, StoreError>;

    /// Persist a new account.
    ///
    /// # Errors
    /// [`StoreError::DuplicateKey`] when the identifier is already taken,
    /// [`StoreError::Unavailable`] when the call cannot complete.
    async fn insert(&self, account: Account) -> Result<Uuid, StoreError>;
}

/// Key-value session data scoped to one caller, persisted across that
/// caller's requests until externally cleared (logout lives outside this
/// crate and operates directly on the store).
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

#[async_trait]
impl<T: AccountStore + ?Sized> AccountStore for Arc<T> {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        (**self).find_by_id(id).await
    }

    async fn find_by_field(
        &self,
        field: IdentifierField,
        value: &str,
    ) -> Result<Option<Account>, StoreError> {
        (**self).find_by_field(field, value).await
    }

    async fn insert(&self, account: Account) -> Result<Uuid, StoreError> {
        (**self).insert(account).await
    }
}

#[async_trait]
impl<T: SessionStore + ?Sized> SessionStore for Arc<T> {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value).await
    }
}
