//! Helpers shared by the endpoint tests.

use axum_test::{TestResponse, TestServer};

use crate::{AppState, build_router, endpoints, pagination::PaginationConfig};

/// A test server backed by a fresh in-memory database.
pub fn get_test_server() -> TestServer {
    let connection =
        rusqlite::Connection::open_in_memory().expect("could not open in-memory database");
    let state = AppState::new(connection, "test-secret", PaginationConfig::default())
        .expect("could not create app state");

    TestServer::new(build_router(state))
}

/// Register a user through the registration form.
pub async fn register_user(server: &TestServer, email: &str, password: &str) {
    let response = server
        .post(endpoints::REGISTER_VIEW)
        .form(&[
            ("name", "Test User"),
            ("email", email),
            ("password", password),
            ("confirm", password),
        ])
        .await;

    response.assert_status_see_other();
}

/// Log in through the log-in form. The returned response carries the auth
/// cookies for follow-up requests.
pub async fn log_in(server: &TestServer, email: &str, password: &str) -> TestResponse {
    server
        .post(endpoints::LOG_IN_VIEW)
        .form(&[("email", email), ("password", password)])
        .await
}
