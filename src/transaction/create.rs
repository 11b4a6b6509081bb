//! The page and form handler for creating a transaction.

use axum::{
    Extension, Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::PrivateCookieJar;
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    account::get_accounts,
    category::get_categories,
    endpoints,
    flash::{Flash, set_flash, take_flash},
    html::page,
    transaction::{
        core::create_transaction,
        form::{DateFallback, TransactionForm, parse_transaction_form, transaction_form_view},
    },
    user::UserID,
};

/// Display the form for creating a transaction.
pub async fn get_new_transaction_page(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserID>,
    jar: PrivateCookieJar,
) -> Response {
    let (categories, accounts) = {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(_) => return Error::DatabaseLockError.into_response(),
        };

        let categories = match get_categories(user_id, &connection) {
            Ok(categories) => categories,
            Err(error) => return error.into_response(),
        };
        let accounts = match get_accounts(user_id, &connection) {
            Ok(accounts) => accounts,
            Err(error) => return error.into_response(),
        };

        (categories, accounts)
    };

    let (jar, flash) = take_flash(jar);

    let form = TransactionForm {
        date: OffsetDateTime::now_utc().date().to_string(),
        ..Default::default()
    };
    let content = transaction_form_view(
        &form,
        &categories,
        &accounts,
        endpoints::NEW_TRANSACTION_VIEW,
        None,
    );

    (
        jar,
        page(
            "New Transaction",
            endpoints::TRANSACTIONS_VIEW,
            &flash,
            &[],
            &content,
        ),
    )
        .into_response()
}

/// Handle submission of the new transaction form.
pub async fn create_transaction_endpoint(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserID>,
    jar: PrivateCookieJar,
    Form(form): Form<TransactionForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(_) => return Error::DatabaseLockError.into_response(),
    };

    let parsed = match parse_transaction_form(&form, DateFallback::Today, user_id, &connection) {
        Ok(parsed) => parsed,
        Err(message) => {
            let categories = get_categories(user_id, &connection).unwrap_or_default();
            let accounts = get_accounts(user_id, &connection).unwrap_or_default();
            let content = transaction_form_view(
                &form,
                &categories,
                &accounts,
                endpoints::NEW_TRANSACTION_VIEW,
                Some(&message),
            );

            return page(
                "New Transaction",
                endpoints::TRANSACTIONS_VIEW,
                &None,
                &[],
                &content,
            )
            .into_response();
        }
    };

    if let Err(error) = create_transaction(parsed.new_transaction, user_id, &connection) {
        return error.into_response();
    }
    drop(connection);

    let flash = if parsed.date_fell_back {
        Flash::warning("Transaction created, but the date was invalid so today's date was used.")
    } else {
        Flash::success("Transaction created!")
    };
    let jar = set_flash(jar, flash);

    (jar, Redirect::to(endpoints::TRANSACTIONS_VIEW)).into_response()
}
