//! Server-rendered pages. Markup is intentionally minimal; the dashboards only
//! surface counts and the caller's own profile.

use axum::response::Html;

use crate::error::{AppError, AppResult};
use crate::identity::{AccountStore, RequestContext, Role};

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!doctype html><html><head><meta charset=\"utf-8\"><title>{}</title></head><body>{}</body></html>",
        escape_html(title),
        body
    ))
}

pub fn login_page() -> Html<String> {
    layout(
        "Login",
        "<h2>Student Management</h2>\
         <form method=\"post\" action=\"/loginuser\">\
         <input type=\"text\" name=\"email\" placeholder=\"Email or username\">\
         <input type=\"password\" name=\"password\" placeholder=\"Password\">\
         <button type=\"submit\">Log in</button>\
         </form>",
    )
}

/// Account behind an already-gated context. A gate has resolved it moments ago,
/// but the row can still vanish in between.
fn current_account(store: &dyn AccountStore, ctx: &RequestContext) -> AppResult<crate::identity::Account> {
    let id = ctx.principal.account_id().ok_or_else(|| AppError::auth("unauthenticated", "no account on request"))?;
    store.find_by_id(id)?.ok_or_else(|| AppError::not_found("account_not_found".to_string(), format!("account {} not found", id)))
}

pub fn admin_home(store: &dyn AccountStore, ctx: &RequestContext) -> AppResult<Html<String>> {
    let me = current_account(store, ctx)?;
    let teachers = store.count_by_role(Role::Teacher)?;
    let students = store.count_by_role(Role::Student)?;
    Ok(layout(
        "Admin Home",
        &format!(
            "<h2>Welcome, {}</h2><ul><li id=\"teacher_count\">Teachers: {}</li><li id=\"student_count\">Students: {}</li></ul>\
             <a href=\"/logoutuser\">Log out</a>",
            escape_html(&me.display_name()),
            teachers,
            students
        ),
    ))
}

pub fn teacher_home(store: &dyn AccountStore, ctx: &RequestContext) -> AppResult<Html<String>> {
    let me = current_account(store, ctx)?;
    let students = store.count_by_role(Role::Student)?;
    Ok(layout(
        "Teacher Home",
        &format!(
            "<h2>Welcome, {}</h2><ul><li id=\"student_count\">Students: {}</li></ul><a href=\"/logoutuser\">Log out</a>",
            escape_html(&me.display_name()),
            students
        ),
    ))
}

pub fn student_home(store: &dyn AccountStore, ctx: &RequestContext) -> AppResult<Html<String>> {
    let me = current_account(store, ctx)?;
    let profile = store.profile(me.id)?;
    let (address, gender) = profile.map(|p| (p.address, p.gender)).unwrap_or_default();
    Ok(layout(
        "Student Home",
        &format!(
            "<h2>Welcome, {}</h2><dl><dt>Email</dt><dd>{}</dd><dt>Address</dt><dd>{}</dd><dt>Gender</dt><dd>{}</dd></dl>\
             <a href=\"/logoutuser\">Log out</a>",
            escape_html(&me.display_name()),
            escape_html(&me.email),
            escape_html(&address),
            escape_html(&gender)
        ),
    ))
}
