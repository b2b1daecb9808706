use anyhow::{anyhow, Result};
use argon2::{Algorithm, Argon2, Params, PasswordHasher, PasswordVerifier, Version};
use password_hash::{PasswordHash, SaltString};

use crate::identity::{AccountStore, NewAccount, Role, StoreError};

/// Argon2id cost parameters used when hashing new secrets.
/// Verification always reads the parameters embedded in the stored PHC string.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    params: Params,
}

impl Credentials {
    pub fn new(params: Params) -> Self { Self { params } }

    /// Minimum-cost parameters for fixtures and seeded test accounts.
    pub fn light() -> Self {
        let params = Params::new(Params::MIN_M_COST, 1, 1, None).unwrap_or_default();
        Self { params }
    }

    fn hasher(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    pub fn hash_password(&self, password: &str) -> Result<String> {
        let mut salt_bytes = [0u8; 16];
        getrandom::getrandom(&mut salt_bytes).map_err(|e| anyhow!(e.to_string()))?;
        let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| anyhow!(e.to_string()))?;
        let phc = self
            .hasher()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| anyhow!(e.to_string()))?
            .to_string();
        Ok(phc)
    }
}

/// Well-formed Argon2id PHC string at the default cost that matches no password.
/// Verified against when a login identifier resolves to no account.
pub const DUMMY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$c2Nob29sZGVzay1kdW1teQ$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// Check `password` against a PHC string. Malformed hashes never verify.
pub fn verify_password(hash: &str, password: &str) -> bool {
    if let Ok(parsed) = PasswordHash::new(hash) {
        Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok()
    } else { false }
}

/// Seed a single admin account when the store has none. Returns true if one was created.
pub fn ensure_default_admin(store: &dyn AccountStore, email: &str, password: &str) -> Result<bool, StoreError> {
    if store.count_by_role(Role::Admin)? > 0 {
        return Ok(false);
    }
    let account = store.create_account(NewAccount::new(email, email, password, Role::Admin))?;
    tracing::info!(target: "startup", account_id = account.id, "seeded default admin {}", account.email);
    Ok(true)
}
