//! Access gates: wrappers that inspect the request principal before a page handler runs.
//!
//! A gate takes a [`Handler`] and returns a [`Handler`] with the same argument type,
//! so gates stack by plain composition:
//!
//! ```ignore
//! let page = require_authenticated(require_role(accounts.clone(), Role::Admin, handler(admin_home)));
//! ```
//!
//! Rejections never reach the wrapped handler. An anonymous caller at
//! [`require_authenticated`] is redirected to [`LOGIN_PATH`]; a role gate answers with
//! a normal 200 page carrying the rejection text.

use std::sync::Arc;

use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};

use super::account::Role;
use super::principal::Principal;
use super::request_context::RequestContext;
use super::store::{AccountStore, SharedAccounts};

pub const LOGIN_PATH: &str = "/loginpage";

pub const NOT_AUTHORISED: &str = "You are not authorised to view this page";
pub const NOT_AUTHORISED_UNRESOLVED: &str = "You are not authorised to view this page.";
pub const STUDENT_ONLY: &str = "Log in as student to view this page";

pub type Handler<A> = Arc<dyn Fn(&RequestContext, A) -> Response + Send + Sync>;

pub fn handler<A, F>(f: F) -> Handler<A>
where
    F: Fn(&RequestContext, A) -> Response + Send + Sync + 'static,
{
    Arc::new(f)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// No authenticated principal on the request.
    LoginRequired,
    /// The principal resolved to an account with a different role.
    WrongRole { required: Role },
    /// The principal did not resolve to a stored account.
    Unresolved { required: Role },
}

impl Rejection {
    /// Text shown on the rejection page. The trailing period on the unresolved
    /// variant and the student wording are matched by existing QA suites.
    pub fn message(&self) -> &'static str {
        match self {
            Rejection::LoginRequired => "Log in to view this page",
            Rejection::WrongRole { required: Role::Student } | Rejection::Unresolved { required: Role::Student } => STUDENT_ONLY,
            Rejection::WrongRole { .. } => NOT_AUTHORISED,
            Rejection::Unresolved { .. } => NOT_AUTHORISED_UNRESOLVED,
        }
    }
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        match self {
            Rejection::LoginRequired => (StatusCode::FOUND, [(header::LOCATION, LOGIN_PATH)]).into_response(),
            _ => (StatusCode::OK, Html(format!("<h3>{}</h3>", self.message()))).into_response(),
        }
    }
}

pub fn check_authenticated(principal: &Principal) -> Result<(), Rejection> {
    if principal.is_authenticated() { Ok(()) } else { Err(Rejection::LoginRequired) }
}

/// Resolve the principal against the store and compare its role tag.
/// Anonymous principals, missing rows and store failures all count as unresolved.
pub fn check_role(store: &dyn AccountStore, principal: &Principal, required: Role) -> Result<(), Rejection> {
    let account = principal
        .account_id()
        .and_then(|id| store.find_by_id(id).ok().flatten())
        .ok_or(Rejection::Unresolved { required })?;
    if account.role == required { Ok(()) } else { Err(Rejection::WrongRole { required }) }
}

pub fn require_authenticated<A: 'static>(inner: Handler<A>) -> Handler<A> {
    Arc::new(move |ctx: &RequestContext, args: A| match check_authenticated(&ctx.principal) {
        Ok(()) => inner(ctx, args),
        Err(rejection) => rejection.into_response(),
    })
}

pub fn require_role<A: 'static>(store: SharedAccounts, required: Role, inner: Handler<A>) -> Handler<A> {
    Arc::new(move |ctx: &RequestContext, args: A| match check_role(store.as_ref(), &ctx.principal, required) {
        Ok(()) => inner(ctx, args),
        Err(rejection) => rejection.into_response(),
    })
}

pub fn require_admin<A: 'static>(store: SharedAccounts, inner: Handler<A>) -> Handler<A> {
    require_role(store, Role::Admin, inner)
}

pub fn require_teacher<A: 'static>(store: SharedAccounts, inner: Handler<A>) -> Handler<A> {
    require_role(store, Role::Teacher, inner)
}

pub fn require_student<A: 'static>(store: SharedAccounts, inner: Handler<A>) -> Handler<A> {
    require_role(store, Role::Student, inner)
}
