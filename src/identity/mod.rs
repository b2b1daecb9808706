//! Accounts, login and access control.
//! Keep the public surface thin and split implementation across sub-modules.

mod account;
mod principal;
mod store;
mod session;
mod provider;
mod request_context;
pub mod gate;

pub use account::{Account, AccountId, NewAccount, Role, RoleProfile};
pub use principal::{Principal, Attrs};
pub use store::{AccountStore, AccountUpdate, MemoryAccountStore, SharedAccounts, StoreError};
pub use session::{Session, SessionError, SessionToken, SessionManager, MAX_SESSION_TTL};
pub use provider::{AuthProvider, EmailAuth, LocalAuthProvider, LoginRequest, LoginResponse};
pub use request_context::RequestContext;
pub use gate::{
    Handler, Rejection, handler, require_admin, require_authenticated, require_role, require_student, require_teacher,
    LOGIN_PATH,
};
