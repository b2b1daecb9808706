use std::collections::HashMap;
use std::time::{Duration, Instant};

use base64::Engine;
use parking_lot::RwLock;

use super::principal::Principal;

pub type SessionToken = String;

/// Longest session lifetime accepted from configuration.
pub const MAX_SESSION_TTL: Duration = Duration::from_secs(30 * 24 * 60 * 60);

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session token generation failed: {0}")]
    Entropy(String),
    #[error("session ttl out of range: {0:?}")]
    TtlOutOfRange(Duration),
}

#[derive(Debug, Clone)]
pub struct Session {
    pub session_id: String,
    pub token: SessionToken,
    pub principal: Principal,
    pub issued_at: Instant,
    pub expires_at: Instant,
}

fn gen_id() -> Result<String, SessionError> {
    let mut buf = [0u8; 32];
    getrandom::getrandom(&mut buf).map_err(|e| SessionError::Entropy(e.to_string()))?;
    Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buf))
}

/// Token-keyed session table.
pub struct SessionManager {
    pub ttl: Duration,
    sessions: RwLock<HashMap<SessionToken, Session>>,
}

impl Default for SessionManager {
    fn default() -> Self { Self::with_ttl(Duration::from_secs(60 * 60)) }
}

impl SessionManager {
    pub fn with_ttl(ttl: Duration) -> Self {
        Self { ttl, sessions: RwLock::new(HashMap::new()) }
    }

    /// Fails when the clock cannot represent the expiry or the OS RNG is unavailable.
    pub fn issue(&self, principal: Principal) -> Result<Session, SessionError> {
        let now = Instant::now();
        let expires_at = now.checked_add(self.ttl).ok_or(SessionError::TtlOutOfRange(self.ttl))?;
        let sess = Session { session_id: gen_id()?, token: gen_id()?, principal, issued_at: now, expires_at };
        let active = {
            let mut map = self.sessions.write();
            map.insert(sess.token.clone(), sess.clone());
            map.len()
        };
        tracing::debug!(target: "session", sid = %sess.session_id, ttl_secs = self.ttl.as_secs(), active, "session.issue");
        Ok(sess)
    }

    /// Principal for a live token. Expired sessions are dropped on sight.
    pub fn validate(&self, token: &str) -> Option<Principal> {
        let now = Instant::now();
        let expired = {
            let map = self.sessions.read();
            match map.get(token) {
                Some(s) if s.expires_at > now => return Some(s.principal.clone()),
                Some(_) => true,
                None => false,
            }
        };
        if expired {
            self.logout(token);
        }
        None
    }

    pub fn logout(&self, token: &str) -> bool {
        self.sessions.write().remove(token).is_some()
    }
}
