//! The page and form handler for editing a transaction.

use axum::{
    Extension, Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::PrivateCookieJar;

use crate::{
    AppState, Error,
    account::get_accounts,
    category::get_categories,
    endpoints::{self, format_endpoint},
    flash::{Flash, set_flash, take_flash},
    html::page,
    transaction::{
        core::{TransactionId, get_transaction, update_transaction},
        form::{DateFallback, TransactionForm, parse_transaction_form, transaction_form_view},
    },
    user::UserID,
};

/// Display the form for editing an existing transaction.
pub async fn get_edit_transaction_page(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserID>,
    jar: PrivateCookieJar,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    let (transaction, categories, accounts) = {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(_) => return Error::DatabaseLockError.into_response(),
        };

        let transaction = match get_transaction(transaction_id, user_id, &connection) {
            Ok(transaction) => transaction,
            Err(error) => return error.into_response(),
        };
        let categories = match get_categories(user_id, &connection) {
            Ok(categories) => categories,
            Err(error) => return error.into_response(),
        };
        let accounts = match get_accounts(user_id, &connection) {
            Ok(accounts) => accounts,
            Err(error) => return error.into_response(),
        };

        (transaction, categories, accounts)
    };

    let (jar, flash) = take_flash(jar);

    let form = TransactionForm {
        description: transaction.description.clone(),
        amount: format!("{}", transaction.amount),
        kind: transaction.kind.as_str().to_owned(),
        date: transaction.date.to_string(),
        category_id: transaction
            .category_id
            .map(|id| id.to_string())
            .unwrap_or_default(),
        account_id: transaction
            .account_id
            .map(|id| id.to_string())
            .unwrap_or_default(),
    };
    let action = format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction.id);
    let content = transaction_form_view(&form, &categories, &accounts, &action, None);

    (
        jar,
        page(
            "Edit Transaction",
            endpoints::TRANSACTIONS_VIEW,
            &flash,
            &[],
            &content,
        ),
    )
        .into_response()
}

/// Handle submission of the edit transaction form.
pub async fn update_transaction_endpoint(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserID>,
    jar: PrivateCookieJar,
    Path(transaction_id): Path<TransactionId>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(_) => return Error::DatabaseLockError.into_response(),
    };

    // The stored date is the fallback when the submitted one is invalid.
    let existing = match get_transaction(transaction_id, user_id, &connection) {
        Ok(transaction) => transaction,
        Err(error) => return error.into_response(),
    };

    let parsed = match parse_transaction_form(
        &form,
        DateFallback::Keep(existing.date),
        user_id,
        &connection,
    ) {
        Ok(parsed) => parsed,
        Err(message) => {
            let categories = get_categories(user_id, &connection).unwrap_or_default();
            let accounts = get_accounts(user_id, &connection).unwrap_or_default();
            let action = format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction_id);
            let content =
                transaction_form_view(&form, &categories, &accounts, &action, Some(&message));

            return page(
                "Edit Transaction",
                endpoints::TRANSACTIONS_VIEW,
                &None,
                &[],
                &content,
            )
            .into_response();
        }
    };

    if let Err(error) =
        update_transaction(transaction_id, parsed.new_transaction, user_id, &connection)
    {
        return error.into_response();
    }
    drop(connection);

    let flash = if parsed.date_fell_back {
        Flash::warning("Transaction updated, but the date was invalid so it was left unchanged.")
    } else {
        Flash::success("Transaction updated.")
    };
    let jar = set_flash(jar, flash);

    (jar, Redirect::to(endpoints::TRANSACTIONS_VIEW)).into_response()
}
