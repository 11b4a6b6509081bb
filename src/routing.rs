//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router,
    extract::FromRef,
    middleware,
    response::Redirect,
    routing::{get, post},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    account::{
        create_account_endpoint, delete_account_endpoint, get_accounts_page, get_edit_account_page,
        get_new_account_page, update_account_endpoint,
    },
    auth::{
        AuthState, auth_guard, get_log_in_page, get_register_page, post_log_in, post_log_out,
        post_register,
    },
    category::{
        create_category_endpoint, delete_category_endpoint, get_categories_page,
        get_edit_category_page, get_new_category_page, update_category_endpoint,
    },
    csv_import::{get_import_page, import_transactions_endpoint},
    endpoints,
    export::{get_export_csv, get_export_excel, get_export_pdf},
    goal::{
        create_goal_endpoint, delete_goal_endpoint, get_edit_goal_page, get_goals_page,
        get_new_goal_page, update_goal_endpoint,
    },
    logging::logging_middleware,
    not_found::get_404_not_found,
    report::get_dashboard_page,
    score::{
        create_score_rule_endpoint, delete_score_rule_endpoint, get_edit_score_rule_page,
        get_new_score_rule_page, get_score_page, update_score_rule_endpoint,
    },
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, get_edit_transaction_page,
        get_new_transaction_page, get_transactions_page, update_transaction_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let auth_state = AuthState::from_ref(&state);

    let protected_routes = Router::new()
        .route(endpoints::ROOT, get(get_index))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::TRANSACTIONS_VIEW, get(get_transactions_page))
        .route(
            endpoints::NEW_TRANSACTION_VIEW,
            get(get_new_transaction_page).post(create_transaction_endpoint),
        )
        .route(
            endpoints::EDIT_TRANSACTION_VIEW,
            get(get_edit_transaction_page).post(update_transaction_endpoint),
        )
        .route(
            endpoints::DELETE_TRANSACTION,
            post(delete_transaction_endpoint),
        )
        .route(
            endpoints::IMPORT_VIEW,
            get(get_import_page).post(import_transactions_endpoint),
        )
        .route(endpoints::CATEGORIES_VIEW, get(get_categories_page))
        .route(
            endpoints::NEW_CATEGORY_VIEW,
            get(get_new_category_page).post(create_category_endpoint),
        )
        .route(
            endpoints::EDIT_CATEGORY_VIEW,
            get(get_edit_category_page).post(update_category_endpoint),
        )
        .route(endpoints::DELETE_CATEGORY, post(delete_category_endpoint))
        .route(endpoints::ACCOUNTS_VIEW, get(get_accounts_page))
        .route(
            endpoints::NEW_ACCOUNT_VIEW,
            get(get_new_account_page).post(create_account_endpoint),
        )
        .route(
            endpoints::EDIT_ACCOUNT_VIEW,
            get(get_edit_account_page).post(update_account_endpoint),
        )
        .route(endpoints::DELETE_ACCOUNT, post(delete_account_endpoint))
        .route(endpoints::GOALS_VIEW, get(get_goals_page))
        .route(
            endpoints::NEW_GOAL_VIEW,
            get(get_new_goal_page).post(create_goal_endpoint),
        )
        .route(
            endpoints::EDIT_GOAL_VIEW,
            get(get_edit_goal_page).post(update_goal_endpoint),
        )
        .route(endpoints::DELETE_GOAL, post(delete_goal_endpoint))
        .route(endpoints::SCORE_VIEW, get(get_score_page))
        .route(
            endpoints::NEW_SCORE_RULE_VIEW,
            get(get_new_score_rule_page).post(create_score_rule_endpoint),
        )
        .route(
            endpoints::EDIT_SCORE_RULE_VIEW,
            get(get_edit_score_rule_page).post(update_score_rule_endpoint),
        )
        .route(
            endpoints::DELETE_SCORE_RULE,
            post(delete_score_rule_endpoint),
        )
        .route(endpoints::EXPORT_CSV, get(get_export_csv))
        .route(endpoints::EXPORT_EXCEL, get(get_export_excel))
        .route(endpoints::EXPORT_PDF, get(get_export_pdf))
        .route_layer(middleware::from_fn_with_state(auth_state, auth_guard));

    let unprotected_routes = Router::new()
        .route(
            endpoints::REGISTER_VIEW,
            get(get_register_page).post(post_register),
        )
        .route(endpoints::LOG_IN_VIEW, get(get_log_in_page).post(post_log_in))
        .route(endpoints::LOG_OUT, post(post_log_out));

    Router::new()
        .merge(protected_routes)
        .merge(unprotected_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static"))
        .fallback(get_404_not_found)
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}

/// The root route redirects to the dashboard; the auth guard takes care of
/// bouncing logged-out users to the log-in page.
async fn get_index() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}

#[cfg(test)]
mod router_tests {
    use axum::http::StatusCode;

    use crate::{
        endpoints::{self, format_endpoint},
        test_utils::{get_test_server, log_in, register_user},
    };

    #[tokio::test]
    async fn protected_route_redirects_to_log_in_when_logged_out() {
        let server = get_test_server();

        let response = server.get(endpoints::DASHBOARD_VIEW).await;

        response.assert_status_see_other();
        assert!(
            response
                .header("location")
                .to_str()
                .unwrap()
                .starts_with(endpoints::LOG_IN_VIEW)
        );
    }

    #[tokio::test]
    async fn register_then_log_in_then_view_dashboard() {
        let server = get_test_server();
        register_user(&server, "alice@example.com", "hunter2").await;

        let response = log_in(&server, "alice@example.com", "hunter2").await;
        response.assert_status_see_other();
        let cookies = response.cookies();

        let dashboard = server
            .get(endpoints::DASHBOARD_VIEW)
            .add_cookies(cookies)
            .await;

        dashboard.assert_status_ok();
        let body = dashboard.text();
        assert!(body.contains("Welcome back"), "want welcome flash");
        assert!(body.contains("Goals"));
    }

    #[tokio::test]
    async fn log_in_with_wrong_password_shows_error() {
        let server = get_test_server();
        register_user(&server, "alice@example.com", "hunter2").await;

        let response = log_in(&server, "alice@example.com", "wrong").await;

        response.assert_status_ok();
        assert!(response.text().contains("Invalid email or password."));
    }

    #[tokio::test]
    async fn registration_seeds_default_accounts() {
        let server = get_test_server();
        register_user(&server, "alice@example.com", "hunter2").await;
        let cookies = log_in(&server, "alice@example.com", "hunter2").await.cookies();

        let accounts = server
            .get(endpoints::ACCOUNTS_VIEW)
            .add_cookies(cookies)
            .await;

        accounts.assert_status_ok();
        let body = accounts.text();
        for name in ["Wallet", "Bank", "Card", "Savings"] {
            assert!(body.contains(name), "want default account {name}");
        }
    }

    #[tokio::test]
    async fn created_transaction_appears_in_list() {
        let server = get_test_server();
        register_user(&server, "alice@example.com", "hunter2").await;
        let cookies = log_in(&server, "alice@example.com", "hunter2").await.cookies();

        let response = server
            .post(endpoints::NEW_TRANSACTION_VIEW)
            .add_cookies(cookies.clone())
            .form(&[
                ("description", "Weekly shop"),
                ("amount", "80,50"),
                ("kind", "debit"),
                ("date", "2025-05-10"),
                ("category_id", ""),
                ("account_id", ""),
            ])
            .await;
        response.assert_status_see_other();

        let list = server
            .get(endpoints::TRANSACTIONS_VIEW)
            .add_cookies(cookies)
            .await;

        list.assert_status_ok();
        let body = list.text();
        assert!(body.contains("Weekly shop"));
        assert!(body.contains("80.50"));
    }

    #[tokio::test]
    async fn other_users_records_return_404() {
        let server = get_test_server();
        register_user(&server, "alice@example.com", "hunter2").await;
        register_user(&server, "bob@example.com", "hunter2").await;

        let alice_cookies = log_in(&server, "alice@example.com", "hunter2").await.cookies();
        let response = server
            .post(endpoints::NEW_CATEGORY_VIEW)
            .add_cookies(alice_cookies)
            .form(&[("name", "Groceries")])
            .await;
        response.assert_status_see_other();

        let bob_cookies = log_in(&server, "bob@example.com", "hunter2").await.cookies();
        // Alice's category has the first rowid.
        let response = server
            .get(&format_endpoint(endpoints::EDIT_CATEGORY_VIEW, 1))
            .add_cookies(bob_cookies)
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unknown_route_returns_404() {
        let server = get_test_server();

        let response = server.get("/definitely/not/a/route").await;

        response.assert_status(StatusCode::NOT_FOUND);
    }
}
