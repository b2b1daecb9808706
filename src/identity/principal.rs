use serde::{Deserialize, Serialize};

use super::account::{Account, AccountId};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Attrs {
    #[serde(default)]
    pub ip: Option<String>,
}

/// Identity attached to an inbound request.
///
/// An `Account` principal only names an id; gates re-resolve it against the
/// store on every evaluation, so a stale or forged id is still caught.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Principal {
    #[default]
    Anonymous,
    Account {
        account_id: AccountId,
        username: String,
        #[serde(default)]
        attrs: Attrs,
    },
}

impl Principal {
    pub fn for_account(account: &Account) -> Self {
        Principal::Account { account_id: account.id, username: account.username.clone(), attrs: Attrs::default() }
    }

    pub fn with_attrs(self, attrs: Attrs) -> Self {
        match self {
            Principal::Anonymous => Principal::Anonymous,
            Principal::Account { account_id, username, .. } => Principal::Account { account_id, username, attrs },
        }
    }

    pub fn is_authenticated(&self) -> bool { matches!(self, Principal::Account { .. }) }

    pub fn account_id(&self) -> Option<AccountId> {
        match self {
            Principal::Anonymous => None,
            Principal::Account { account_id, .. } => Some(*account_id),
        }
    }

    pub fn username(&self) -> Option<&str> {
        match self {
            Principal::Anonymous => None,
            Principal::Account { username, .. } => Some(username.as_str()),
        }
    }
}
