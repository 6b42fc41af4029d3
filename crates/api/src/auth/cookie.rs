//! The session cookie.
//!
//! Browsers receive the access token as an `HttpOnly; SameSite=Lax` cookie
//! scoped to `/`. The [`AuthUser`](crate::middleware::auth::AuthUser)
//! extractor reads it back when no `Authorization` header is present.

use axum::http::header::{InvalidHeaderValue, COOKIE};
use axum::http::{HeaderMap, HeaderValue};

/// Default cookie name.
pub const DEFAULT_SESSION_COOKIE_NAME: &str = "repairdesk_session";

/// Cookie name and the `Secure` flag.
#[derive(Debug, Clone)]
pub struct SessionCookieConfig {
    pub name: String,
    /// Add `Secure` so the cookie is only sent over HTTPS.
    pub secure: bool,
}

impl Default for SessionCookieConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_SESSION_COOKIE_NAME.to_string(),
            secure: false,
        }
    }
}

impl SessionCookieConfig {
    /// | Env Var                 | Default              |
    /// |-------------------------|----------------------|
    /// | `SESSION_COOKIE_NAME`   | `repairdesk_session` |
    /// | `SESSION_COOKIE_SECURE` | `false`              |
    pub fn from_env() -> Self {
        let name = std::env::var("SESSION_COOKIE_NAME")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_SESSION_COOKIE_NAME.to_string());

        let secure = std::env::var("SESSION_COOKIE_SECURE")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Self { name, secure }
    }

    /// `Set-Cookie` value carrying `token` for `max_age_secs` seconds.
    pub fn session(&self, token: &str, max_age_secs: i64) -> Result<HeaderValue, InvalidHeaderValue> {
        HeaderValue::from_str(&self.render(token, max_age_secs))
    }

    /// `Set-Cookie` value that expires the cookie immediately.
    pub fn cleared(&self) -> Result<HeaderValue, InvalidHeaderValue> {
        HeaderValue::from_str(&self.render("", 0))
    }

    fn render(&self, value: &str, max_age_secs: i64) -> String {
        let mut cookie = format!(
            "{}={value}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_secs}",
            self.name
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }
}

/// Find the value of cookie `name` in the request's `Cookie` headers.
pub fn read_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}
