//! In-memory store backends for tests and database-free embedding.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::account::{Account, IdentifierField};
use crate::error::StoreError;
use crate::store::{AccountStore, SessionStore};

/// Account store backed by a mutex-guarded map.
///
/// Enforces the `(identifier_field, identifier)` unique constraint the
/// way a relational backend's unique index would, including under
/// concurrent inserts: the check and the insert happen under one lock.
#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    inner: Mutex<HashMap<Uuid, Account>>,
}

impl InMemoryAccountStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite an account's password hash, modelling an out-of-band
    /// credential change. Returns false when the account does not exist.
    pub async fn update_password_hash(&self, id: Uuid, password_hash: String) -> bool {
        let mut accounts = self.inner.lock().await;
        match accounts.get_mut(&id) {
            Some(account) => {
                account.password_hash = password_hash;
                true
            }
            None => false,
        }
    }

    /// Remove an account, modelling external deletion.
    pub async fn remove(&self, id: Uuid) -> bool {
        self.inner.lock().await.remove(&id).is_some()
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        Ok(self.inner.lock().await.get(&id).cloned())
    }

    async fn find_by_field(
        &self,
        field: IdentifierField,
        value: &str,
    ) -> Result<Option<Account>, StoreError> {
        Ok(self
            .inner
            .lock()
            .await
            .values()
            .find(|account| account.identifier_field == field && account.identifier == value)
            .cloned())
    }

    async fn insert(&self, account: Account) -> Result<Uuid, StoreError> {
        let mut accounts = self.inner.lock().await;
        let duplicate = accounts.values().any(|existing| {
            existing.identifier_field == account.identifier_field
                && existing.identifier == account.identifier
        });
        if duplicate {
            return Err(StoreError::DuplicateKey(format!(
                "{}: {}",
                account.identifier_field, account.identifier
            )));
        }
        let id = account.id;
        accounts.insert(id, account);
        Ok(id)
    }
}

/// Session store holding one caller's key-value session data.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    inner: Mutex<HashMap<String, String>>,
}

impl InMemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop a key, the way an external logout would.
    pub async fn clear(&self, key: &str) {
        self.inner.lock().await.remove(key);
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.inner.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.inner
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
