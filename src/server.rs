//!
//! schooldesk HTTP server
//! ----------------------
//! Axum router for the login flow and the role dashboards.
//!
//! Responsibilities:
//! - Session cookie handling, resolved into an explicit `RequestContext` per request.
//! - Login/logout endpoints backed by `identity::LocalAuthProvider`.
//! - Dashboards wrapped in `require_authenticated` + `require_role` gates.

use std::sync::Arc;

use anyhow::Context;
use axum::extract::{Form, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::error::{AppError, AppResult};
use crate::identity::{
    handler, require_admin, require_authenticated, require_student, require_teacher, AccountStore, AuthProvider,
    EmailAuth, Handler, LocalAuthProvider, LoginRequest, MemoryAccountStore, Principal, RequestContext, SessionManager,
    SharedAccounts, LOGIN_PATH,
};
use crate::security::{self, Credentials};

pub mod pages;

const SESSION_COOKIE: &str = "schooldesk_session";

type Render = fn(&dyn AccountStore, &RequestContext) -> AppResult<Html<String>>;
type Gate = fn(SharedAccounts, Handler<()>) -> Handler<()>;

/// Gated dashboard handlers, built once per router.
struct Pages {
    admin_home: Handler<()>,
    teacher_home: Handler<()>,
    student_home: Handler<()>,
}

impl Pages {
    fn new(accounts: &SharedAccounts) -> Self {
        let gated = |gate: Gate, render: Render| {
            let store = accounts.clone();
            let page = handler(move |ctx: &RequestContext, ()| render(store.as_ref(), ctx).into_response());
            require_authenticated(gate(accounts.clone(), page))
        };
        Self {
            admin_home: gated(require_admin, pages::admin_home),
            teacher_home: gated(require_teacher, pages::teacher_home),
            student_home: gated(require_student, pages::student_home),
        }
    }
}

/// Shared server state injected into all handlers.
#[derive(Clone)]
pub struct AppState {
    pub accounts: SharedAccounts,
    pub sessions: Arc<SessionManager>,
    pub auth: Arc<dyn AuthProvider>,
    pages: Arc<Pages>,
}

impl AppState {
    pub fn new(accounts: SharedAccounts, sessions: Arc<SessionManager>) -> Self {
        let auth = Arc::new(LocalAuthProvider::new(EmailAuth::new(accounts.clone()), sessions.clone()));
        let pages = Arc::new(Pages::new(&accounts));
        Self { accounts, sessions, auth, pages }
    }

    /// Resolve the session cookie into the principal for this request.
    pub fn request_context(&self, headers: &HeaderMap, path: &str) -> RequestContext {
        let principal = session_token(headers)
            .and_then(|t| self.sessions.validate(&t))
            .unwrap_or(Principal::Anonymous);
        RequestContext::new(principal)
            .with_request_id(uuid::Uuid::new_v4().to_string())
            .with_path(path)
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(login_page))
        .route("/loginpage", get(login_page))
        .route("/loginuser", post(login_user))
        .route("/logoutuser", get(logout_user))
        .route("/adminhome", get(admin_home))
        .route("/teacherhome", get(teacher_home))
        .route("/studenthome", get(student_home))
        .with_state(state)
}

/// Build the in-process store, seed the admin if configured, and serve until shutdown.
pub async fn run(config: ServerConfig) -> anyhow::Result<()> {
    let accounts = MemoryAccountStore::shared(Credentials::default());
    if let Some((email, password)) = config.seed_admin.as_ref() {
        security::ensure_default_admin(accounts.as_ref(), email, password)
            .with_context(|| format!("While seeding default admin {}", email))?;
    } else {
        warn!(target: "startup", "no SCHOOLDESK_ADMIN_EMAIL configured; the account store starts empty");
    }
    let sessions = Arc::new(SessionManager::with_ttl(config.session_ttl));
    let app = router(AppState::new(accounts, sessions));

    let addr = config.socket_addr()?;
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn parse_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    for cookie in headers.get_all(header::COOKIE) {
        let Ok(s) = cookie.to_str() else { continue };
        for part in s.split(';') {
            if let Some((k, v)) = part.trim().split_once('=') {
                if k == name { return Some(v.to_string()); }
            }
        }
    }
    None
}

fn session_token(headers: &HeaderMap) -> Option<String> {
    parse_cookie(headers, SESSION_COOKIE).filter(|t| !t.is_empty())
}

fn set_session_cookie(token: &str) -> String {
    format!("{}={}; HttpOnly; SameSite=Strict; Path=/", SESSION_COOKIE, token)
}

fn clear_session_cookie() -> String {
    format!("{}=deleted; Expires=Thu, 01 Jan 1970 00:00:00 GMT; HttpOnly; SameSite=Strict; Path=/", SESSION_COOKIE)
}

fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

fn client_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

async fn login_page() -> impl IntoResponse {
    pages::login_page()
}

#[derive(Debug, Deserialize)]
struct LoginForm {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

async fn login_user(State(state): State<AppState>, headers: HeaderMap, Form(form): Form<LoginForm>) -> Response {
    let req = LoginRequest { identifier: form.email, password: form.password, ip: client_ip(&headers) };
    let auth = state.auth.clone();
    // Argon2 verification is CPU bound; keep it off the async workers.
    let outcome = match tokio::task::spawn_blocking(move || auth.login(&req)).await {
        Ok(outcome) => outcome,
        Err(e) => return AppError::internal("login_task".to_string(), e.to_string()).into_response(),
    };
    match outcome {
        Err(e) => AppError::from(e).into_response(),
        Ok(Some(resp)) => {
            let mut r = found(resp.account.role.home_path());
            if let Ok(v) = set_session_cookie(&resp.session.token).parse::<HeaderValue>() {
                r.headers_mut().insert(header::SET_COOKIE, v);
            }
            r
        }
        Ok(None) => {
            info!(target: "auth", "auth.login rejected");
            found(LOGIN_PATH)
        }
    }
}

async fn logout_user(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(token) = session_token(&headers) {
        if state.sessions.logout(&token) {
            info!(target: "auth", "auth.logout");
        }
    }
    let mut r = found("/");
    if let Ok(v) = clear_session_cookie().parse::<HeaderValue>() {
        r.headers_mut().insert(header::SET_COOKIE, v);
    }
    r
}

fn serve_page(page: &Handler<()>, state: &AppState, headers: &HeaderMap, uri: &Uri) -> Response {
    let ctx = state.request_context(headers, uri.path());
    page(&ctx, ())
}

async fn admin_home(State(state): State<AppState>, headers: HeaderMap, uri: Uri) -> Response {
    serve_page(&state.pages.admin_home, &state, &headers, &uri)
}

async fn teacher_home(State(state): State<AppState>, headers: HeaderMap, uri: Uri) -> Response {
    serve_page(&state.pages.teacher_home, &state, &headers, &uri)
}

async fn student_home(State(state): State<AppState>, headers: HeaderMap, uri: Uri) -> Response {
    serve_page(&state.pages.student_home, &state, &headers, &uri)
}
