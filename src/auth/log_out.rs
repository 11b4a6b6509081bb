//! The log-out form handler.

use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::PrivateCookieJar;

use crate::{
    auth::cookie::invalidate_auth_cookie,
    endpoints,
    flash::{Flash, set_flash},
};

/// Invalidate the auth cookies and send the user back to the log-in page.
pub async fn post_log_out(jar: PrivateCookieJar) -> Response {
    let jar = invalidate_auth_cookie(jar);
    let jar = set_flash(jar, Flash::success("You have been logged out."));

    (jar, Redirect::to(endpoints::LOG_IN_VIEW)).into_response()
}
