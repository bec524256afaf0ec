//! In-memory store for development and testing.
//!
//! Implements every store trait over a single mutex-guarded state, so the
//! conditional updates it performs are atomic in the same way the database
//! implementation's transactions are.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use uuid::Uuid;

use super::store::{AccountStore, InviteCodeStore, RegistrationStore, StoreError};
use crate::models::{Account, AccountRole, InviteCode, NewAccount, NewInviteCode};

#[derive(Debug, Default)]
struct State {
    invites: HashMap<u64, InviteCode>,
    accounts: HashMap<String, Account>,
}

/// Mock store that keeps everything in process memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
    /// Whether every call should fail as if the backing store were down.
    pub simulate_outage: bool,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store whose every operation fails with `Unavailable`.
    pub fn unavailable() -> Self {
        Self {
            state: Arc::default(),
            simulate_outage: true,
        }
    }

    /// Returns the stored invite code for `token`, if any.
    pub fn invite(&self, token: u64) -> Option<InviteCode> {
        self.lock().ok()?.invites.get(&token).cloned()
    }

    /// Returns every stored invite code.
    pub fn invites(&self) -> Vec<InviteCode> {
        self.lock()
            .map(|state| state.invites.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Returns the stored account for `username`, if any.
    pub fn account(&self, username: &str) -> Option<Account> {
        self.lock().ok()?.accounts.get(username).cloned()
    }

    /// Number of stored accounts.
    pub fn account_count(&self) -> usize {
        self.lock().map(|state| state.accounts.len()).unwrap_or(0)
    }

    /// Removes an account, freeing its username.
    pub fn remove_account(&self, username: &str) -> Option<Account> {
        self.lock().ok()?.accounts.remove(username)
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, StoreError> {
        if self.simulate_outage {
            return Err(StoreError::Unavailable("simulated outage".to_string()));
        }
        self.state
            .lock()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))
    }
}

fn build_account(account: NewAccount) -> Account {
    Account {
        id: Uuid::new_v4(),
        username: account.username,
        password_hash: account.password_hash,
        display_name: account.display_name,
        role: account.role,
        cohort: account.cohort,
        created_at: Utc::now(),
    }
}

#[async_trait::async_trait]
impl InviteCodeStore for InMemoryStore {
    async fn all_tokens(&self) -> Result<HashSet<u64>, StoreError> {
        Ok(self.lock()?.invites.keys().copied().collect())
    }

    async fn insert_many(&self, records: &[NewInviteCode]) -> Result<(), StoreError> {
        let mut state = self.lock()?;

        let mut batch = HashSet::new();
        let collides = records
            .iter()
            .any(|r| state.invites.contains_key(&r.token) || !batch.insert(r.token));
        if collides {
            return Err(StoreError::DuplicateToken);
        }

        let now = Utc::now();
        for record in records {
            state.invites.insert(
                record.token,
                InviteCode {
                    token: record.token,
                    recipient_name: record.recipient_name.clone(),
                    role: record.role,
                    cohort: record.cohort,
                    used: false,
                    created_at: now,
                },
            );
        }
        Ok(())
    }

    async fn find_by_token(&self, token: u64) -> Result<Option<InviteCode>, StoreError> {
        Ok(self.lock()?.invites.get(&token).cloned())
    }

    async fn mark_used_if_unused(&self, token: u64) -> Result<bool, StoreError> {
        let mut state = self.lock()?;
        match state.invites.get_mut(&token) {
            Some(invite) if !invite.used => {
                invite.used = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[async_trait::async_trait]
impl AccountStore for InMemoryStore {
    async fn username_exists(&self, username: &str) -> Result<bool, StoreError> {
        Ok(self.lock()?.accounts.contains_key(username))
    }

    async fn anonymous_usernames_in_use(&self) -> Result<HashSet<String>, StoreError> {
        Ok(self
            .lock()?
            .accounts
            .values()
            .filter(|a| a.role == AccountRole::Reader)
            .map(|a| a.username.clone())
            .collect())
    }

    async fn create_account(&self, account: NewAccount) -> Result<Account, StoreError> {
        let mut state = self.lock()?;
        if state.accounts.contains_key(&account.username) {
            return Err(StoreError::UsernameTaken);
        }
        let created = build_account(account);
        state
            .accounts
            .insert(created.username.clone(), created.clone());
        Ok(created)
    }
}

#[async_trait::async_trait]
impl RegistrationStore for InMemoryStore {
    async fn redeem_invite(&self, token: u64, account: NewAccount) -> Result<Account, StoreError> {
        let mut state = self.lock()?;

        // Check both preconditions before mutating anything.
        match state.invites.get(&token) {
            None => return Err(StoreError::CodeNotFound),
            Some(invite) if invite.used => return Err(StoreError::CodeAlreadyUsed),
            Some(_) => {}
        }
        if state.accounts.contains_key(&account.username) {
            return Err(StoreError::UsernameTaken);
        }

        let created = build_account(account);
        state
            .accounts
            .insert(created.username.clone(), created.clone());
        if let Some(invite) = state.invites.get_mut(&token) {
            invite.used = true;
        }
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InviteRole;

    fn record(token: u64) -> NewInviteCode {
        NewInviteCode {
            token,
            recipient_name: "Liisa".to_string(),
            role: InviteRole::Ordinary,
            cohort: 1,
        }
    }

    fn new_account(username: &str, role: AccountRole) -> NewAccount {
        NewAccount {
            username: username.to_string(),
            password_hash: "hash".to_string(),
            display_name: username.to_string(),
            role,
            cohort: 1,
        }
    }

    #[tokio::test]
    async fn test_mark_used_if_unused_transitions_once() {
        let store = InMemoryStore::new();
        store.insert_many(&[record(5)]).await.unwrap();

        assert!(store.mark_used_if_unused(5).await.unwrap());
        assert!(!store.mark_used_if_unused(5).await.unwrap());
        assert!(!store.mark_used_if_unused(5).await.unwrap());
        assert!(!store.mark_used_if_unused(6).await.unwrap());
    }

    #[tokio::test]
    async fn test_concurrent_mark_used_succeeds_exactly_once() {
        let store = InMemoryStore::new();
        store.insert_many(&[record(9)]).await.unwrap();

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.mark_used_if_unused(9).await.unwrap() })
            })
            .collect();

        let mut successes = 0;
        for handle in handles {
            if handle.await.unwrap() {
                successes += 1;
            }
        }
        assert_eq!(successes, 1);
    }

    #[tokio::test]
    async fn test_insert_many_is_all_or_nothing() {
        let store = InMemoryStore::new();
        store.insert_many(&[record(1)]).await.unwrap();

        let result = store.insert_many(&[record(2), record(1)]).await;
        assert_eq!(result, Err(StoreError::DuplicateToken));
        assert!(store.invite(2).is_none());

        let result = store.insert_many(&[record(3), record(3)]).await;
        assert_eq!(result, Err(StoreError::DuplicateToken));
        assert!(store.invite(3).is_none());
    }

    #[tokio::test]
    async fn test_anonymous_usernames_in_use_only_counts_readers() {
        let store = InMemoryStore::new();
        store
            .create_account(new_account("haug", AccountRole::Reader))
            .await
            .unwrap();
        store
            .create_account(new_account("liisa", AccountRole::User))
            .await
            .unwrap();

        let in_use = store.anonymous_usernames_in_use().await.unwrap();
        assert_eq!(in_use, HashSet::from(["haug".to_string()]));
    }

    #[tokio::test]
    async fn test_create_account_rejects_duplicates() {
        let store = InMemoryStore::new();
        store
            .create_account(new_account("liisa", AccountRole::User))
            .await
            .unwrap();
        let result = store
            .create_account(new_account("liisa", AccountRole::User))
            .await;
        assert!(matches!(result, Err(StoreError::UsernameTaken)));
    }

    #[tokio::test]
    async fn test_redeem_invite_failure_leaves_code_unused() {
        let store = InMemoryStore::new();
        store.insert_many(&[record(11)]).await.unwrap();
        store
            .create_account(new_account("liisa", AccountRole::User))
            .await
            .unwrap();

        let result = store
            .redeem_invite(11, new_account("liisa", AccountRole::User))
            .await;
        assert!(matches!(result, Err(StoreError::UsernameTaken)));
        assert!(!store.invite(11).unwrap().used);
        assert_eq!(store.account_count(), 1);
    }

    #[tokio::test]
    async fn test_unavailable_store_fails_every_call() {
        let store = InMemoryStore::unavailable();
        assert!(matches!(
            store.all_tokens().await,
            Err(StoreError::Unavailable(_))
        ));
        assert!(matches!(
            store.username_exists("liisa").await,
            Err(StoreError::Unavailable(_))
        ));
    }
}
