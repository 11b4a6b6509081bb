//! Authentication middleware that validates cookies, extends sessions, and handles redirects.

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::header::SET_COOKIE,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use time::Duration;

use crate::{
    AppState,
    auth::cookie::{extend_auth_cookie_duration_if_needed, get_user_id_from_auth_cookie},
    endpoints,
};

/// The state needed for the auth middleware.
#[derive(Clone)]
pub struct AuthState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<AuthState> for Key {
    fn from_ref(state: &AuthState) -> Self {
        state.cookie_key.clone()
    }
}

/// Check that a client-supplied redirect URL is a path within this app.
///
/// Anything that is not a plain absolute path (e.g. "https://evil.example" or
/// protocol-relative "//evil.example") is rejected.
pub fn normalize_redirect_url(raw_url: &str) -> Option<String> {
    if raw_url.starts_with('/') && !raw_url.starts_with("//") {
        Some(raw_url.to_owned())
    } else {
        None
    }
}

fn build_log_in_redirect_url(request: &Request) -> String {
    let target = request
        .uri()
        .path_and_query()
        .map(|path_and_query| path_and_query.as_str())
        .unwrap_or(endpoints::DASHBOARD_VIEW);

    match serde_urlencoded::to_string([("redirect_url", target)]) {
        Ok(query) => format!("{}?{}", endpoints::LOG_IN_VIEW, query),
        Err(error) => {
            tracing::warn!("could not encode redirect URL {target}: {error}");
            endpoints::LOG_IN_VIEW.to_owned()
        }
    }
}

/// Middleware function that checks for a valid authorization cookie.
/// The user ID is placed into the request and then the request executed normally if the cookie is
/// valid, otherwise a redirect to the log-in page is returned.
///
/// **Note**: Route handlers can use the function argument `Extension(user_id): Extension<UserID>`
/// to receive the user ID.
///
/// **Note**: The app state must contain an `axum_extra::extract::cookie::Key` for decrypting and
/// verifying the cookie contents.
pub async fn auth_guard(State(state): State<AuthState>, request: Request, next: Next) -> Response {
    let log_in_redirect_url = build_log_in_redirect_url(&request);

    let (mut parts, body) = request.into_parts();
    let jar = match PrivateCookieJar::from_request_parts(&mut parts, &state).await {
        Ok(jar) => jar,
        Err(err) => {
            tracing::error!("Error getting cookie jar: {err:?}. Redirecting to log in page.");
            return Redirect::to(&log_in_redirect_url).into_response();
        }
    };
    let user_id = match get_user_id_from_auth_cookie(&jar) {
        Ok(user_id) => user_id,
        Err(_) => return Redirect::to(&log_in_redirect_url).into_response(),
    };

    parts.extensions.insert(user_id);
    let request = Request::from_parts(parts, body);
    let response = next.run(request).await;

    let (mut parts, body) = response.into_parts();
    let jar = match extend_auth_cookie_duration_if_needed(jar.clone(), state.cookie_duration) {
        Ok(updated_jar) => updated_jar,
        Err(err) => {
            tracing::error!("Error extending cookie duration: {err:?}. Rolling back cookie jar.");
            jar
        }
    };
    for (key, val) in jar.into_response().headers().iter() {
        if key != SET_COOKIE {
            continue;
        }

        parts.headers.append(key, val.to_owned());
    }

    Response::from_parts(parts, body)
}
