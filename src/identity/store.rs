use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;

use super::account::{Account, AccountId, NewAccount, Role, RoleProfile};
use crate::security::Credentials;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("account {0} not found")]
    AccountNotFound(AccountId),
    #[error("username already taken: {0}")]
    DuplicateUsername(String),
    #[error("email already registered: {0}")]
    DuplicateEmail(String),
    #[error("credential hashing failed: {0}")]
    Credentials(String),
    #[error("account store unavailable: {0}")]
    Unavailable(String),
}

/// Editable account fields. The role tag is deliberately absent.
#[derive(Debug, Clone, Default)]
pub struct AccountUpdate {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_active: Option<bool>,
    pub address: Option<String>,
    pub gender: Option<String>,
}

/// Backing store for accounts and their role profiles.
pub trait AccountStore: Send + Sync {
    fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, StoreError>;
    fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError>;
    fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;
    fn profile(&self, id: AccountId) -> Result<Option<RoleProfile>, StoreError>;

    /// Create an account and its matching role profile.
    fn create_account(&self, new: NewAccount) -> Result<Account, StoreError>;
    /// Persist field changes; the profile is saved alongside (its `updated_at` advances).
    fn save_account(&self, id: AccountId, update: AccountUpdate) -> Result<Account, StoreError>;
    fn set_password(&self, id: AccountId, password: &str) -> Result<(), StoreError>;
    /// Remove an account together with its profile.
    fn delete_account(&self, id: AccountId) -> Result<(), StoreError>;
    fn count_by_role(&self, role: Role) -> Result<usize, StoreError>;
}

pub type SharedAccounts = Arc<dyn AccountStore>;

#[derive(Default)]
struct Tables {
    next_id: AccountId,
    accounts: HashMap<AccountId, Account>,
    profiles: HashMap<AccountId, RoleProfile>,
}

/// In-process account store.
pub struct MemoryAccountStore {
    creds: Credentials,
    tables: RwLock<Tables>,
}

impl MemoryAccountStore {
    pub fn new(creds: Credentials) -> Self {
        Self { creds, tables: RwLock::new(Tables { next_id: 1, ..Default::default() }) }
    }

    pub fn shared(creds: Credentials) -> SharedAccounts { Arc::new(Self::new(creds)) }

    fn hash(&self, password: &str) -> Result<String, StoreError> {
        self.creds.hash_password(password).map_err(|e| StoreError::Credentials(e.to_string()))
    }
}

impl AccountStore for MemoryAccountStore {
    fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        Ok(self.tables.read().accounts.get(&id).cloned())
    }

    fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError> {
        Ok(self.tables.read().accounts.values().find(|a| a.username == username).cloned())
    }

    fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        Ok(self.tables.read().accounts.values().find(|a| a.email == email).cloned())
    }

    fn profile(&self, id: AccountId) -> Result<Option<RoleProfile>, StoreError> {
        Ok(self.tables.read().profiles.get(&id).cloned())
    }

    fn create_account(&self, new: NewAccount) -> Result<Account, StoreError> {
        // Hash outside the lock; argon2 is the slow part.
        let password_hash = self.hash(&new.password)?;
        let mut t = self.tables.write();
        if t.accounts.values().any(|a| a.username == new.username) {
            return Err(StoreError::DuplicateUsername(new.username));
        }
        if t.accounts.values().any(|a| a.email == new.email) {
            return Err(StoreError::DuplicateEmail(new.email));
        }
        let id = t.next_id;
        t.next_id += 1;
        let now = Utc::now();
        let account = Account {
            id,
            username: new.username,
            email: new.email,
            password_hash,
            role: new.role,
            is_active: true,
            first_name: new.first_name,
            last_name: new.last_name,
            date_joined: now,
        };
        t.profiles.insert(id, RoleProfile {
            account_id: id,
            role: new.role,
            address: new.address,
            gender: new.gender,
            created_at: now,
            updated_at: now,
        });
        t.accounts.insert(id, account.clone());
        Ok(account)
    }

    fn save_account(&self, id: AccountId, update: AccountUpdate) -> Result<Account, StoreError> {
        let mut t = self.tables.write();
        if let Some(email) = update.email.as_deref() {
            if t.accounts.values().any(|a| a.id != id && a.email == email) {
                return Err(StoreError::DuplicateEmail(email.to_string()));
            }
        }
        let account = t.accounts.get_mut(&id).ok_or(StoreError::AccountNotFound(id))?;
        if let Some(v) = update.email { account.email = v; }
        if let Some(v) = update.first_name { account.first_name = v; }
        if let Some(v) = update.last_name { account.last_name = v; }
        if let Some(v) = update.is_active { account.is_active = v; }
        let saved = account.clone();
        if let Some(profile) = t.profiles.get_mut(&id) {
            if let Some(v) = update.address { profile.address = v; }
            if let Some(v) = update.gender { profile.gender = v; }
            // Strictly advance even when two saves land in the same clock tick.
            let now = Utc::now();
            profile.updated_at = if now > profile.updated_at { now } else { profile.updated_at + chrono::Duration::microseconds(1) };
        }
        Ok(saved)
    }

    fn set_password(&self, id: AccountId, password: &str) -> Result<(), StoreError> {
        let password_hash = self.hash(password)?;
        let mut t = self.tables.write();
        let account = t.accounts.get_mut(&id).ok_or(StoreError::AccountNotFound(id))?;
        account.password_hash = password_hash;
        Ok(())
    }

    fn delete_account(&self, id: AccountId) -> Result<(), StoreError> {
        let mut t = self.tables.write();
        t.accounts.remove(&id).ok_or(StoreError::AccountNotFound(id))?;
        t.profiles.remove(&id);
        Ok(())
    }

    fn count_by_role(&self, role: Role) -> Result<usize, StoreError> {
        Ok(self.tables.read().accounts.values().filter(|a| a.role == role).count())
    }
}
