//! Start-up configuration read from `SCHOOLDESK_*` environment variables.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::identity::MAX_SESSION_TTL;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: String,
    pub http_port: u16,
    pub session_ttl: Duration,
    /// Seed admin (email, password), created when no admin account exists.
    pub seed_admin: Option<(String, String)>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind: "0.0.0.0".to_string(), http_port: 8000, session_ttl: Duration::from_secs(60 * 60), seed_admin: None }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Build from an arbitrary key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F: Fn(&str) -> Option<String>>(get: F) -> Result<Self> {
        let mut cfg = Self::default();
        if let Some(bind) = get("SCHOOLDESK_BIND") {
            cfg.bind = bind;
        }
        if let Some(port) = get("SCHOOLDESK_HTTP_PORT") {
            cfg.http_port = port.trim().parse().with_context(|| format!("SCHOOLDESK_HTTP_PORT is not a port: {}", port))?;
        }
        if let Some(ttl) = get("SCHOOLDESK_SESSION_TTL_SECS") {
            let secs: u64 = ttl.trim().parse().with_context(|| format!("SCHOOLDESK_SESSION_TTL_SECS is not a number: {}", ttl))?;
            if secs > MAX_SESSION_TTL.as_secs() {
                anyhow::bail!("SCHOOLDESK_SESSION_TTL_SECS must be at most {} (got {})", MAX_SESSION_TTL.as_secs(), secs);
            }
            cfg.session_ttl = Duration::from_secs(secs);
        }
        cfg.seed_admin = match (get("SCHOOLDESK_ADMIN_EMAIL"), get("SCHOOLDESK_ADMIN_PASSWORD")) {
            (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => Some((email, password)),
            (None, None) => None,
            _ => anyhow::bail!("SCHOOLDESK_ADMIN_EMAIL and SCHOOLDESK_ADMIN_PASSWORD must both be set and non-empty"),
        };
        Ok(cfg)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.bind, self.http_port)
            .parse()
            .with_context(|| format!("invalid bind address {}:{}", self.bind, self.http_port))
    }
}
