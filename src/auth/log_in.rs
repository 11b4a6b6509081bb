//! This file defines the routes for displaying the log-in page and handling log-in requests.
//! The auth module handles the lower level authentication and cookie logic.

use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::PrivateCookieJar;
use maud::{Markup, html};
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    account::seed_default_accounts,
    auth::{
        cookie::{get_user_id_from_auth_cookie, set_auth_cookie},
        middleware::normalize_redirect_url,
    },
    endpoints,
    flash::{Flash, set_flash, take_flash},
    html::{auth_page, form_error, text_input},
    user::{User, get_user_by_email},
};

pub(crate) const INVALID_CREDENTIALS_ERROR_MSG: &str = "Invalid email or password.";

fn log_in_form(email: &str, error_message: Option<&str>, redirect_url: Option<&str>) -> Markup {
    html! {
        form method="post" action=(endpoints::LOG_IN_VIEW) class="entity-form"
        {
            @if let Some(redirect_url) = redirect_url {
                input type="hidden" name="redirect_url" value=(redirect_url);
            }

            (form_error(error_message))
            (text_input("Email", "email", "email", email))
            (text_input("Password", "password", "password", ""))

            button type="submit" class="button" { "Log in" }

            p
            {
                "Don't have an account? "
                a href=(endpoints::REGISTER_VIEW) { "Register here" }
            }
        }
    }
}

/// The query string parameters accepted by the log-in page.
#[derive(Debug, Deserialize)]
pub struct RedirectQuery {
    /// Where to send the user after logging in.
    pub redirect_url: Option<String>,
}

/// Display the log-in page.
///
/// Users that are already logged in are sent straight to the dashboard.
pub async fn get_log_in_page(
    jar: PrivateCookieJar,
    Query(query): Query<RedirectQuery>,
) -> Response {
    if get_user_id_from_auth_cookie(&jar).is_ok() {
        return Redirect::to(endpoints::DASHBOARD_VIEW).into_response();
    }

    let (jar, flash) = take_flash(jar);
    let redirect_url = query
        .redirect_url
        .as_deref()
        .and_then(normalize_redirect_url);
    let content = log_in_form("", None, redirect_url.as_deref());

    (jar, auth_page("Log In", &flash, &content)).into_response()
}

/// The raw data entered by the user in the log-in form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogInData {
    /// Email entered during log-in.
    pub email: String,
    /// Password entered during log-in.
    pub password: String,
    /// Optional URL to redirect to after logging in.
    /// Only accepted from the log-in form submission.
    pub redirect_url: Option<String>,
}

/// Handler for log-in requests via the POST method.
///
/// On a successful log-in request, the auth cookie is set and the client is
/// redirected to the dashboard page (or the validated redirect URL).
/// Otherwise, the form is returned with an error message explaining the
/// problem.
pub async fn post_log_in(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Form(user_data): Form<LogInData>,
) -> Response {
    let email = user_data.email.trim().to_lowercase();
    let redirect_url = user_data
        .redirect_url
        .as_deref()
        .and_then(normalize_redirect_url);

    let render_error = |message: &str| {
        auth_page(
            "Log In",
            &None,
            &log_in_form(&email, Some(message), redirect_url.as_deref()),
        )
        .into_response()
    };

    let user: User = {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(_) => return Error::DatabaseLockError.into_response(),
        };

        let user = match get_user_by_email(&email, &connection) {
            Ok(user) => user,
            Err(Error::NotFound) => return render_error(INVALID_CREDENTIALS_ERROR_MSG),
            Err(error) => {
                tracing::error!("Unhandled error while looking up user: {error}");
                return render_error("An internal error occurred. Please try again later.");
            }
        };

        let is_password_valid = match user.password_hash.verify(&user_data.password) {
            Ok(is_password_valid) => is_password_valid,
            Err(error) => {
                tracing::error!("Unhandled error while verifying credentials: {error}");
                return render_error("An internal error occurred. Please try again later.");
            }
        };

        if !is_password_valid {
            return render_error(INVALID_CREDENTIALS_ERROR_MSG);
        }

        // Idempotent repair for users that predate default accounts.
        if let Err(error) = seed_default_accounts(user.id, &connection) {
            tracing::warn!("Could not seed default accounts for {}: {error}", user.id);
        }

        user
    };

    let jar = match set_auth_cookie(jar, user.id, state.cookie_duration) {
        Ok(jar) => jar,
        Err(error) => {
            tracing::error!("Error setting auth cookie: {error}");
            return render_error("An internal error occurred. Please try again later.");
        }
    };
    let jar = set_flash(jar, Flash::success(format!("Welcome back, {}!", user.name)));

    let redirect_url = redirect_url.as_deref().unwrap_or(endpoints::DASHBOARD_VIEW);

    (jar, Redirect::to(redirect_url)).into_response()
}
