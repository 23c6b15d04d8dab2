//! Login form for the password gate.

use std::sync::Arc;

use axum::Form;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use crate::state::AppState;
use crate::templates;

/// Submitted login form.
#[derive(Deserialize)]
pub(crate) struct LoginForm {
    #[serde(default)]
    password: String,
}

/// Handle GET /login.
///
/// Redirects home when the gate is disabled or the visitor already has access.
pub(crate) async fn get_login(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    match &state.gate {
        Some(gate) if !gate.is_authorized(&jar) => {
            Html(templates::login(&state, None).into_string()).into_response()
        }
        _ => Redirect::to("/").into_response(),
    }
}

/// Handle POST /login.
pub(crate) async fn post_login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    let Some(gate) = &state.gate else {
        return Redirect::to("/").into_response();
    };

    if gate.check_password(&form.password) {
        tracing::info!("Granted site access");
        return (jar.add(gate.access_cookie()), Redirect::to("/")).into_response();
    }

    tracing::warn!("Rejected login attempt with incorrect password");
    (
        StatusCode::UNAUTHORIZED,
        Html(templates::login(&state, Some("Incorrect password")).into_string()),
    )
        .into_response()
}
