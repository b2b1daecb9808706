//! Account lifecycle: profile creation hook, save propagation, deletion cascade and admin seeding.

use anyhow::Result;

use schooldesk::identity::{AccountStore, AccountUpdate, MemoryAccountStore, NewAccount, Role};
use schooldesk::security::{self, Credentials};

fn store() -> MemoryAccountStore { MemoryAccountStore::new(Credentials::light()) }

#[test]
fn creating_an_account_creates_its_role_profile() -> Result<()> {
    let s = store();
    for (name, role) in [("admin@example.com", Role::Admin), ("teacher@example.com", Role::Teacher), ("student@example.com", Role::Student)] {
        let account = s.create_account(NewAccount::new(name, name, "pass", role))?;
        let profile = s.profile(account.id)?.expect("profile created with account");
        assert_eq!(profile.account_id, account.id);
        assert_eq!(profile.role, role);
        assert_eq!(s.count_by_role(role)?, 1);
    }
    Ok(())
}

#[test]
fn profile_carries_role_attributes() -> Result<()> {
    let s = store();
    let t = s.create_account(
        NewAccount::new("mmora", "mmora@example.com", "pass", Role::Teacher)
            .with_name("Maria", "Mora")
            .with_profile("Alajuela", "Male"),
    )?;
    let p = s.profile(t.id)?.expect("profile");
    assert_eq!((p.address.as_str(), p.gender.as_str()), ("Alajuela", "Male"));
    assert_eq!(t.display_name(), "Maria Mora");
    Ok(())
}

#[test]
fn saving_an_account_saves_its_profile() -> Result<()> {
    let s = store();
    let a = s.create_account(NewAccount::new("admin2@example.com", "admin2@example.com", "adminpass", Role::Admin))?;
    let before = s.profile(a.id)?.expect("profile").updated_at;

    s.save_account(a.id, AccountUpdate::default())?;

    let after = s.profile(a.id)?.expect("profile").updated_at;
    assert!(after > before, "updated_at should advance: {before} -> {after}");
    Ok(())
}

#[test]
fn save_updates_account_and_profile_fields_but_not_role() -> Result<()> {
    let s = store();
    let t = s.create_account(NewAccount::new("teacher", "teacher@example.com", "pass", Role::Teacher))?;
    let saved = s.save_account(t.id, AccountUpdate {
        email: Some("mmora@gmail.com".into()),
        first_name: Some("Maria".into()),
        last_name: Some("Mora".into()),
        address: Some("San Jose".into()),
        gender: Some("Other".into()),
        ..Default::default()
    })?;
    assert_eq!(saved.email, "mmora@gmail.com");
    assert_eq!(saved.display_name(), "Maria Mora");
    assert_eq!(saved.role, Role::Teacher);
    let p = s.profile(t.id)?.expect("profile");
    assert_eq!((p.address.as_str(), p.gender.as_str()), ("San Jose", "Other"));
    assert_eq!(p.role, Role::Teacher);
    Ok(())
}

#[test]
fn deleting_an_account_removes_its_profile() -> Result<()> {
    let s = store();
    let st = s.create_account(NewAccount::new("student", "student@example.com", "1234", Role::Student))?;
    s.delete_account(st.id)?;
    assert!(s.find_by_id(st.id)?.is_none());
    assert!(s.profile(st.id)?.is_none());
    assert_eq!(s.count_by_role(Role::Student)?, 0);
    Ok(())
}

#[test]
fn default_admin_is_seeded_once() -> Result<()> {
    let s = store();
    assert!(security::ensure_default_admin(&s, "admin@example.com", "adminpass")?);
    assert!(!security::ensure_default_admin(&s, "other@example.com", "otherpass")?);
    assert_eq!(s.count_by_role(Role::Admin)?, 1);
    let admin = s.find_by_email("admin@example.com")?.expect("seeded admin");
    assert_eq!(admin.username, "admin@example.com");
    assert!(security::verify_password(&admin.password_hash, "adminpass"));
    Ok(())
}
