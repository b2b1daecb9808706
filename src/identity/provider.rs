use std::sync::Arc;

use super::account::Account;
use super::principal::{Attrs, Principal};
use super::session::{Session, SessionError, SessionManager};
use super::store::SharedAccounts;
use crate::security;

/// Resolves a login identifier to an account by username, then by email.
///
/// Every failure (unknown identifier, wrong secret, store error) collapses into
/// `None` so callers cannot tell them apart. A miss still runs one Argon2
/// verification against [`security::DUMMY_HASH`] so it costs as much as a hit.
#[derive(Clone)]
pub struct EmailAuth {
    accounts: SharedAccounts,
}

impl EmailAuth {
    pub fn new(accounts: SharedAccounts) -> Self { Self { accounts } }

    pub fn authenticate(&self, identifier: &str, secret: &str) -> Option<Account> {
        let candidate = match self.accounts.find_by_username(identifier) {
            Ok(Some(account)) => Some(account),
            Ok(None) => self.accounts.find_by_email(identifier).ok().flatten(),
            Err(_) => None,
        };
        match candidate {
            Some(account) => security::verify_password(&account.password_hash, secret).then_some(account),
            None => {
                security::verify_password(security::DUMMY_HASH, secret);
                None
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub identifier: String,
    pub password: String,
    pub ip: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LoginResponse {
    pub account: Account,
    pub session: Session,
}

pub trait AuthProvider: Send + Sync {
    /// `Ok(None)` on any credential failure; no reason is given.
    /// `Err` only when valid credentials could not be turned into a session.
    fn login(&self, req: &LoginRequest) -> Result<Option<LoginResponse>, SessionError>;
}

/// Login backed by [`EmailAuth`] and an in-process [`SessionManager`].
pub struct LocalAuthProvider {
    pub auth: EmailAuth,
    pub sessions: Arc<SessionManager>,
}

impl LocalAuthProvider {
    pub fn new(auth: EmailAuth, sessions: Arc<SessionManager>) -> Self { Self { auth, sessions } }
}

impl AuthProvider for LocalAuthProvider {
    fn login(&self, req: &LoginRequest) -> Result<Option<LoginResponse>, SessionError> {
        let Some(account) = self.auth.authenticate(&req.identifier, &req.password) else { return Ok(None) };
        let principal = Principal::for_account(&account).with_attrs(Attrs { ip: req.ip.clone() });
        let session = self.sessions.issue(principal)?;
        tracing::info!(target: "auth", account_id = account.id, role = %account.role, sid = %session.session_id, ip = ?req.ip, "auth.login");
        Ok(Some(LoginResponse { account, session }))
    }
}
