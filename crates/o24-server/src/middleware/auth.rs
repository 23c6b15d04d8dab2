//! Shared-password access gate.
//!
//! A successful login stores a token derived from the password in the
//! `site_access` cookie. Requests without a matching cookie are redirected to
//! the login page, or rejected with 401 under `/api/`.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use md5::{Digest, Md5};

use crate::error::ServerError;
use crate::state::AppState;

/// Name of the access cookie.
pub(crate) const ACCESS_COOKIE: &str = "site_access";

/// Login page path, always reachable.
pub(crate) const LOGIN_PATH: &str = "/login";

/// Checks passwords and access cookies against the configured password.
pub(crate) struct AccessGate {
    token: String,
    secure_cookie: bool,
    max_age_days: u32,
}

impl AccessGate {
    pub(crate) fn new(password: &str, secure_cookie: bool, max_age_days: u32) -> Self {
        Self {
            token: access_token(password),
            secure_cookie,
            max_age_days,
        }
    }

    /// Whether `password` matches the configured one.
    pub(crate) fn check_password(&self, password: &str) -> bool {
        access_token(password) == self.token
    }

    /// Whether the request carries a valid access cookie.
    pub(crate) fn is_authorized(&self, jar: &CookieJar) -> bool {
        jar.get(ACCESS_COOKIE)
            .is_some_and(|cookie| cookie.value() == self.token)
    }

    /// Access cookie issued after a successful login.
    pub(crate) fn access_cookie(&self) -> Cookie<'static> {
        Cookie::build((ACCESS_COOKIE, self.token.clone()))
            .path("/")
            .http_only(true)
            .secure(self.secure_cookie)
            .same_site(SameSite::Lax)
            .max_age(time::Duration::days(i64::from(self.max_age_days)))
            .build()
    }
}

/// Cookie value for a password. The password itself never leaves the server.
fn access_token(password: &str) -> String {
    hex::encode(Md5::digest(format!("o24doc-access:{password}").as_bytes()))
}

/// Reject requests without a valid access cookie.
///
/// Passes everything through when no password is configured.
pub(crate) async fn require_access(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    let Some(gate) = &state.gate else {
        return next.run(request).await;
    };

    let path = request.uri().path();
    if path == LOGIN_PATH || gate.is_authorized(&jar) {
        return next.run(request).await;
    }

    if path.starts_with("/api/") {
        tracing::debug!(path = %path, "Rejected unauthenticated API request");
        return ServerError::Unauthorized.into_response();
    }

    Redirect::to(LOGIN_PATH).into_response()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_check_password() {
        let gate = AccessGate::new("letmein", false, 7);

        assert!(gate.check_password("letmein"));
        assert!(!gate.check_password("letmein "));
        assert!(!gate.check_password(""));
    }

    #[test]
    fn test_token_hides_password() {
        let gate = AccessGate::new("letmein", false, 7);
        let cookie = gate.access_cookie();

        assert!(!cookie.value().contains("letmein"));
        assert_eq!(cookie.value().len(), 32);
    }

    #[test]
    fn test_access_cookie_attributes() {
        let gate = AccessGate::new("letmein", true, 30);
        let cookie = gate.access_cookie();

        assert_eq!(cookie.name(), ACCESS_COOKIE);
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.max_age(), Some(time::Duration::days(30)));
    }

    #[test]
    fn test_is_authorized() {
        let gate = AccessGate::new("letmein", false, 7);
        let valid = CookieJar::new().add(gate.access_cookie());
        let forged = CookieJar::new().add(Cookie::new(ACCESS_COOKIE, "letmein"));

        assert!(gate.is_authorized(&valid));
        assert!(!gate.is_authorized(&forged));
        assert!(!gate.is_authorized(&CookieJar::new()));
    }
}
