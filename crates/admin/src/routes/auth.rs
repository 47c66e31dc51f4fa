//! Authentication route handlers for admin.
//!
//! Username/password login backed by the injected [`AdminAuthenticator`].
//! Failures re-render the form with a localized message.
//!
//! [`AdminAuthenticator`]: crate::services::auth::AdminAuthenticator

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use jozoor_core::{Locale, Message};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::filters;
use crate::services::auth::{AdminGate, AuthError};
use crate::state::AppState;

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub locale: Locale,
    pub username: String,
    pub error: Option<&'static str>,
}

/// Login form data.
#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Render the login page, or go straight to the dashboard when already
/// logged in.
///
/// GET /login
pub async fn login_page(State(state): State<AppState>, session: Session) -> Response {
    if AdminGate::new(&session).is_authenticated().await {
        return Redirect::to("/").into_response();
    }

    LoginTemplate {
        locale: state.locale(),
        username: String::new(),
        error: None,
    }
    .into_response()
}

/// Check credentials and start an admin session.
///
/// POST /login
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let locale = state.locale();
    let gate = AdminGate::new(&session);

    match gate
        .login(state.authenticator(), &form.username, &form.password)
        .await
    {
        Ok(_) => Redirect::to("/").into_response(),
        Err(e) => {
            let status = match &e {
                AuthError::MissingCredentials => StatusCode::BAD_REQUEST,
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                _ => {
                    let event_id = sentry::capture_error(&e);
                    tracing::error!(error = %e, sentry_event_id = %event_id, "Login error");
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            };

            let page = LoginTemplate {
                locale,
                username: form.username.trim().to_owned(),
                error: Some(e.message(locale)),
            };
            (status, page).into_response()
        }
    }
}

/// Logout and clear session.
///
/// POST /logout
pub async fn logout(session: Session) -> impl IntoResponse {
    if let Err(e) = AdminGate::new(&session).logout().await {
        tracing::warn!(error = %e, "Failed to clear admin session");
    }

    Redirect::to("/login")
}
