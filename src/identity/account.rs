use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type AccountId = u64;

/// Role tag carried by every account. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Teacher,
    Student,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Teacher, Role::Student];

    /// Numeric `user_type` code used by account forms and fixtures.
    pub fn code(self) -> u8 {
        match self {
            Role::Admin => 1,
            Role::Teacher => 2,
            Role::Student => 3,
        }
    }

    pub fn from_code(code: u8) -> Option<Role> {
        match code {
            1 => Some(Role::Admin),
            2 => Some(Role::Teacher),
            3 => Some(Role::Student),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Teacher => "teacher",
            Role::Student => "student",
        }
    }

    /// Landing page after a successful login.
    pub fn home_path(self) -> &'static str {
        match self {
            Role::Admin => "/adminhome",
            Role::Teacher => "/teacherhome",
            Role::Student => "/studenthome",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    /// Accepts either the numeric code ("1".."3") or the lowercase name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        if let Ok(code) = t.parse::<u8>() {
            return Role::from_code(code).ok_or_else(|| format!("unknown role code: {}", code));
        }
        match t.to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "teacher" => Ok(Role::Teacher),
            "student" => Ok(Role::Student),
            _ => Err(format!("unknown role: {}", t)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub role: Role,
    pub is_active: bool,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub date_joined: DateTime<Utc>,
}

impl Account {
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() { self.username.clone() } else { full.to_string() }
    }
}

/// Input for [`super::AccountStore::create_account`]. The password is hashed by the store.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub gender: String,
}

impl NewAccount {
    pub fn new(username: impl Into<String>, email: impl Into<String>, password: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            role,
            first_name: String::new(),
            last_name: String::new(),
            address: String::new(),
            gender: String::new(),
        }
    }

    pub fn with_name(mut self, first: impl Into<String>, last: impl Into<String>) -> Self {
        self.first_name = first.into();
        self.last_name = last.into();
        self
    }

    pub fn with_profile(mut self, address: impl Into<String>, gender: impl Into<String>) -> Self {
        self.address = address.into();
        self.gender = gender.into();
        self
    }
}

/// Role-specific extension record, one per account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleProfile {
    pub account_id: AccountId,
    pub role: Role,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub gender: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
