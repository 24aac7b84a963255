//! Minimal server-rendered pages. Markup only, no styling.

use uuid::Uuid;

use crate::executors::FieldErrors;
use crate::forms::FormError;
use crate::utils::http_helpers::escape_html;

/// Everything the login page needs to render.
#[derive(Debug, Default)]
pub struct LoginPage {
    pub login_form_id: Uuid,
    pub access_form_id: Uuid,
    pub username: String,
    pub login_errors: FieldErrors,
    pub email: String,
    pub access_errors: FieldErrors,
    /// The page-wide error slot, from whichever form failed last.
    pub error: Option<FormError>,
    pub show_access: bool,
}

#[derive(Debug, Default)]
pub struct RegisterPage {
    pub form_id: Uuid,
    pub email: String,
    pub field_errors: FieldErrors,
    pub error: Option<FormError>,
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>{}</title></head>\n<body>\n{}\n</body>\n</html>\n",
        escape_html(title),
        body
    )
}

fn error_banner(error: &Option<FormError>) -> String {
    match error {
        Some(e) => format!(
            "<div class=\"error\" role=\"alert\" data-origin=\"{}\">{}</div>",
            e.origin.as_str(),
            escape_html(&e.message)
        ),
        None => String::new(),
    }
}

fn field_error(errors: &FieldErrors, field: &str) -> String {
    match errors.get(field) {
        Some(message) => format!(
            "<p class=\"field-error\" data-field=\"{}\">{}</p>",
            field,
            escape_html(message)
        ),
        None => String::new(),
    }
}

fn access_form(action: &str, form_id: Uuid, email: &str, errors: &FieldErrors) -> String {
    format!(
        r#"<form method="post" action="{action}">
<input type="hidden" name="form_id" value="{form_id}">
<label for="email">Email</label>
<input id="email" name="email" type="email" value="{email}">
{email_error}
<button type="submit">Request Access</button>
</form>"#,
        action = action,
        form_id = form_id,
        email = escape_html(email),
        email_error = field_error(errors, "email"),
    )
}

pub fn landing_page() -> String {
    layout(
        "Welcome",
        r#"<h1>Welcome</h1>
<a href="/login">Login</a>
<a href="/register">Request Temporary Access</a>"#,
    )
}

pub fn login_page(page: &LoginPage) -> String {
    let access_section = if page.show_access {
        format!(
            "{}\n<a href=\"/login\">Cancel</a>",
            access_form(
                "/request-access",
                page.access_form_id,
                &page.email,
                &page.access_errors
            )
        )
    } else {
        "<a href=\"/login?request_access=true\">Request Temporary Access</a>".to_string()
    };

    let body = format!(
        r#"<h2>Login</h2>
{banner}
<form method="post" action="/login">
<input type="hidden" name="form_id" value="{form_id}">
<label for="username">Username</label>
<input id="username" name="username" type="text" value="{username}">
{username_error}
<label for="password">Password</label>
<input id="password" name="password" type="password">
{password_error}
<button type="submit">Login</button>
</form>
{access_section}"#,
        banner = error_banner(&page.error),
        form_id = page.login_form_id,
        username = escape_html(&page.username),
        username_error = field_error(&page.login_errors, "username"),
        password_error = field_error(&page.login_errors, "password"),
        access_section = access_section,
    );
    layout("Login", &body)
}

pub fn register_page(page: &RegisterPage) -> String {
    let body = format!(
        "<h2>Request Temporary Access</h2>\n{}\n{}\n<a href=\"/login\">Already have access? Go to Login</a>",
        error_banner(&page.error),
        access_form("/register", page.form_id, &page.email, &page.field_errors),
    );
    layout("Request Temporary Access", &body)
}

pub fn access_requested_page() -> String {
    layout(
        "Access Requested",
        r#"<h2>Request Temporary Access</h2>
<div class="success" role="status">Temporary access email sent successfully!</div>
<a href="/login">Go to Login</a>"#,
    )
}

pub fn welcome_page() -> String {
    layout(
        "Dashboard",
        r#"<h1>Dashboard</h1>
<p>Welcome to your protected dashboard!</p>
<form method="post" action="/logout"><button type="submit">Logout</button></form>"#,
    )
}

pub fn profile_page() -> String {
    layout(
        "Profile",
        r#"<h1>Profile</h1>
<a href="/welcome">Back to dashboard</a>
<form method="post" action="/logout"><button type="submit">Logout</button></form>"#,
    )
}
