//! The application's route URIs.
//!
//! For endpoints that take a parameter, e.g., '/transactions/{transaction_id}/edit',
//! use [format_endpoint].

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The landing page for logged in users.
pub const DASHBOARD_VIEW: &str = "/dashboard";

/// The route for the registration page and form.
pub const REGISTER_VIEW: &str = "/register";
/// The route for the log-in page and form.
pub const LOG_IN_VIEW: &str = "/login";
/// The route for logging out the current user.
pub const LOG_OUT: &str = "/logout";

/// The page for displaying a user's transactions.
pub const TRANSACTIONS_VIEW: &str = "/transactions";
/// The page and form for creating a new transaction.
pub const NEW_TRANSACTION_VIEW: &str = "/transactions/new";
/// The page and form for editing an existing transaction.
pub const EDIT_TRANSACTION_VIEW: &str = "/transactions/{transaction_id}/edit";
/// The form action for deleting a transaction.
pub const DELETE_TRANSACTION: &str = "/transactions/{transaction_id}/delete";
/// The page and form for importing transactions from a CSV file.
pub const IMPORT_VIEW: &str = "/transactions/import";

/// The page for listing all categories.
pub const CATEGORIES_VIEW: &str = "/categories";
/// The page and form for creating a new category.
pub const NEW_CATEGORY_VIEW: &str = "/categories/new";
/// The page and form for editing an existing category.
pub const EDIT_CATEGORY_VIEW: &str = "/categories/{category_id}/edit";
/// The form action for deleting a category.
pub const DELETE_CATEGORY: &str = "/categories/{category_id}/delete";

/// The page for listing all accounts.
pub const ACCOUNTS_VIEW: &str = "/accounts";
/// The page and form for creating a new account.
pub const NEW_ACCOUNT_VIEW: &str = "/accounts/new";
/// The page and form for editing an existing account.
pub const EDIT_ACCOUNT_VIEW: &str = "/accounts/{account_id}/edit";
/// The form action for deleting an account.
pub const DELETE_ACCOUNT: &str = "/accounts/{account_id}/delete";

/// The page for listing all goals.
pub const GOALS_VIEW: &str = "/goals";
/// The page and form for creating a new goal.
pub const NEW_GOAL_VIEW: &str = "/goals/new";
/// The page and form for editing an existing goal.
pub const EDIT_GOAL_VIEW: &str = "/goals/{goal_id}/edit";
/// The form action for deleting a goal.
pub const DELETE_GOAL: &str = "/goals/{goal_id}/delete";

/// The monthly score page.
pub const SCORE_VIEW: &str = "/score";
/// The page and form for creating a new score rule.
pub const NEW_SCORE_RULE_VIEW: &str = "/score/new";
/// The page and form for editing an existing score rule.
pub const EDIT_SCORE_RULE_VIEW: &str = "/score/{rule_id}/edit";
/// The form action for deleting a score rule.
pub const DELETE_SCORE_RULE: &str = "/score/{rule_id}/delete";

/// The route for downloading the month's transactions as CSV.
pub const EXPORT_CSV: &str = "/export/csv";
/// The route for downloading the month's transactions as an Excel-flavoured CSV.
pub const EXPORT_EXCEL: &str = "/export/excel";
/// The route for downloading the month's transactions as PDF.
pub const EXPORT_PDF: &str = "/export/pdf";

/// The route for static files.
pub const STATIC: &str = "/static";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/transactions/{transaction_id}/edit',
/// '{transaction_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    use super::format_endpoint;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok(), "invalid URI: {uri}");
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::ROOT);
        assert_endpoint_is_valid_uri(endpoints::DASHBOARD_VIEW);
        assert_endpoint_is_valid_uri(endpoints::REGISTER_VIEW);
        assert_endpoint_is_valid_uri(endpoints::LOG_IN_VIEW);
        assert_endpoint_is_valid_uri(endpoints::LOG_OUT);
        assert_endpoint_is_valid_uri(endpoints::TRANSACTIONS_VIEW);
        assert_endpoint_is_valid_uri(endpoints::NEW_TRANSACTION_VIEW);
        assert_endpoint_is_valid_uri(endpoints::EDIT_TRANSACTION_VIEW);
        assert_endpoint_is_valid_uri(endpoints::DELETE_TRANSACTION);
        assert_endpoint_is_valid_uri(endpoints::IMPORT_VIEW);
        assert_endpoint_is_valid_uri(endpoints::CATEGORIES_VIEW);
        assert_endpoint_is_valid_uri(endpoints::NEW_CATEGORY_VIEW);
        assert_endpoint_is_valid_uri(endpoints::EDIT_CATEGORY_VIEW);
        assert_endpoint_is_valid_uri(endpoints::DELETE_CATEGORY);
        assert_endpoint_is_valid_uri(endpoints::ACCOUNTS_VIEW);
        assert_endpoint_is_valid_uri(endpoints::NEW_ACCOUNT_VIEW);
        assert_endpoint_is_valid_uri(endpoints::EDIT_ACCOUNT_VIEW);
        assert_endpoint_is_valid_uri(endpoints::DELETE_ACCOUNT);
        assert_endpoint_is_valid_uri(endpoints::GOALS_VIEW);
        assert_endpoint_is_valid_uri(endpoints::NEW_GOAL_VIEW);
        assert_endpoint_is_valid_uri(endpoints::EDIT_GOAL_VIEW);
        assert_endpoint_is_valid_uri(endpoints::DELETE_GOAL);
        assert_endpoint_is_valid_uri(endpoints::SCORE_VIEW);
        assert_endpoint_is_valid_uri(endpoints::NEW_SCORE_RULE_VIEW);
        assert_endpoint_is_valid_uri(endpoints::EDIT_SCORE_RULE_VIEW);
        assert_endpoint_is_valid_uri(endpoints::DELETE_SCORE_RULE);
        assert_endpoint_is_valid_uri(endpoints::EXPORT_CSV);
        assert_endpoint_is_valid_uri(endpoints::EXPORT_EXCEL);
        assert_endpoint_is_valid_uri(endpoints::EXPORT_PDF);
        assert_endpoint_is_valid_uri(endpoints::STATIC);
    }

    #[test]
    fn produces_valid_uri() {
        let formatted_path = format_endpoint("/hello/{world_id}", 1);

        assert_eq!(formatted_path, "/hello/1");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn returns_original_path_with_no_parameter() {
        let formatted_path = format_endpoint("/hello/world", 1);

        assert_eq!(formatted_path, "/hello/world");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn parameter_in_middle() {
        let formatted_path = format_endpoint("/hello/{world}/bye", 1);

        assert_eq!(formatted_path, "/hello/1/bye");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }
}
