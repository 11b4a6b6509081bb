//! The 404 page shown for unknown routes and records that do not belong to
//! the authenticated user.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::html;

use crate::{endpoints, html::base};

/// Render the 404 page as a [Response].
pub fn get_404_not_found_response() -> Response {
    let content = html! {
        main class="page page-narrow"
        {
            h1 { "404" }
            p { "The page or record you were looking for does not exist." }
            a href=(endpoints::DASHBOARD_VIEW) { "Back to the dashboard" }
        }
    };

    (StatusCode::NOT_FOUND, base("Not Found", &[], &content)).into_response()
}

/// Route handler for unknown routes.
pub async fn get_404_not_found() -> Response {
    get_404_not_found_response()
}

#[cfg(test)]
mod not_found_tests {
    use axum::http::StatusCode;

    use super::get_404_not_found;

    #[tokio::test]
    async fn returns_404_status() {
        let response = get_404_not_found().await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
