#![allow(dead_code)]

use anyhow::Result;

use schooldesk::identity::{
    Account, AccountId, AccountStore, AccountUpdate, MemoryAccountStore, NewAccount, Role, RoleProfile, SharedAccounts,
    StoreError,
};
use schooldesk::security::Credentials;

pub struct Fixture {
    pub store: SharedAccounts,
    pub admin: Account,
    pub teacher: Account,
    pub student: Account,
}

/// One account per role, with the passwords the dashboards' QA suite uses.
pub fn three_roles() -> Result<Fixture> {
    let store = MemoryAccountStore::shared(Credentials::light());
    let admin = store.create_account(NewAccount::new("admin@example.com", "admin@example.com", "adminpass123", Role::Admin))?;
    let teacher = store.create_account(NewAccount::new("teacher@example.com", "teacher@example.com", "teacherpass123", Role::Teacher))?;
    let student = store.create_account(
        NewAccount::new("student@example.com", "student@example.com", "studentpass123", Role::Student)
            .with_name("Ana", "Solis")
            .with_profile("Alajuela", "Female"),
    )?;
    Ok(Fixture { store, admin, teacher, student })
}

/// Store whose every call fails, standing in for an unreachable backend.
pub struct DownStore;

fn down<T>() -> Result<T, StoreError> { Err(StoreError::Unavailable("down".into())) }

impl AccountStore for DownStore {
    fn find_by_id(&self, _: AccountId) -> Result<Option<Account>, StoreError> { down() }
    fn find_by_username(&self, _: &str) -> Result<Option<Account>, StoreError> { down() }
    fn find_by_email(&self, _: &str) -> Result<Option<Account>, StoreError> { down() }
    fn profile(&self, _: AccountId) -> Result<Option<RoleProfile>, StoreError> { down() }
    fn create_account(&self, _: NewAccount) -> Result<Account, StoreError> { down() }
    fn save_account(&self, _: AccountId, _: AccountUpdate) -> Result<Account, StoreError> { down() }
    fn set_password(&self, _: AccountId, _: &str) -> Result<(), StoreError> { down() }
    fn delete_account(&self, _: AccountId) -> Result<(), StoreError> { down() }
    fn count_by_role(&self, _: Role) -> Result<usize, StoreError> { down() }
}
