//! Login-by-username-or-email: precedence, wrong secrets, unknown identifiers,
//! and store failures all resolve without raising.

use std::sync::Arc;

use anyhow::Result;

use schooldesk::identity::{Account, AccountStore, EmailAuth, MemoryAccountStore, NewAccount, Role, SharedAccounts};
use schooldesk::security::Credentials;

mod common;
use common::DownStore;

fn fixture() -> Result<(SharedAccounts, Account)> {
    let store = MemoryAccountStore::shared(Credentials::light());
    let user = store.create_account(NewAccount::new("testuser", "testuser@example.com", "securepassword123", Role::Admin))?;
    Ok((store, user))
}

#[test]
fn authenticates_by_email() -> Result<()> {
    let (store, user) = fixture()?;
    let auth = EmailAuth::new(store);
    assert_eq!(auth.authenticate("testuser@example.com", "securepassword123"), Some(user));
    Ok(())
}

#[test]
fn authenticates_by_username() -> Result<()> {
    let (store, user) = fixture()?;
    let auth = EmailAuth::new(store);
    assert_eq!(auth.authenticate("testuser", "securepassword123"), Some(user));
    Ok(())
}

#[test]
fn unknown_identifier_is_no_match() -> Result<()> {
    let (store, _) = fixture()?;
    let auth = EmailAuth::new(store);
    assert!(auth.authenticate("wrong@example.com", "securepassword123").is_none());
    Ok(())
}

#[test]
fn wrong_secret_is_no_match() -> Result<()> {
    let (store, _) = fixture()?;
    let auth = EmailAuth::new(store);
    assert!(auth.authenticate("testuser@example.com", "wrongpassword").is_none());
    assert!(auth.authenticate("testuser", "wrongpassword").is_none());
    Ok(())
}

#[test]
fn empty_inputs_are_no_match() -> Result<()> {
    let (store, _) = fixture()?;
    let auth = EmailAuth::new(store);
    assert!(auth.authenticate("", "").is_none());
    assert!(auth.authenticate("", "securepassword123").is_none());
    assert!(auth.authenticate("testuser", "").is_none());
    Ok(())
}

#[test]
fn identifier_match_is_case_sensitive() -> Result<()> {
    let (store, _) = fixture()?;
    let auth = EmailAuth::new(store);
    assert!(auth.authenticate("TestUser", "securepassword123").is_none());
    assert!(auth.authenticate("TESTUSER@EXAMPLE.COM", "securepassword123").is_none());
    Ok(())
}

#[test]
fn username_match_wins_over_another_accounts_email() -> Result<()> {
    let store = MemoryAccountStore::shared(Credentials::light());
    // Created first so a naive scan over emails would meet it first.
    let by_email = store.create_account(NewAccount::new("robert", "bob", "email-secret", Role::Teacher))?;
    let by_name = store.create_account(NewAccount::new("bob", "bob@example.com", "name-secret", Role::Student))?;
    let auth = EmailAuth::new(store);

    assert_eq!(auth.authenticate("bob", "name-secret"), Some(by_name));
    // The username candidate is the only one checked; the email owner's secret does not work.
    assert!(auth.authenticate("bob", "email-secret").is_none());
    assert_eq!(auth.authenticate("robert", "email-secret"), Some(by_email));
    Ok(())
}

#[test]
fn admin_logs_in_with_email_as_username() -> Result<()> {
    let store = MemoryAccountStore::shared(Credentials::light());
    let admin = store.create_account(NewAccount::new("admin@example.com", "admin@example.com", "adminpass", Role::Admin))?;
    let auth = EmailAuth::new(store);
    assert_eq!(auth.authenticate("admin@example.com", "adminpass"), Some(admin));
    assert!(auth.authenticate("admin@example.com", "wrong").is_none());
    Ok(())
}

#[test]
fn store_failure_is_no_match() {
    let auth = EmailAuth::new(Arc::new(DownStore));
    assert!(auth.authenticate("testuser@example.com", "securepassword123").is_none());
    assert!(auth.authenticate("", "").is_none());
}
