//! The form handler for deleting a transaction.

use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::PrivateCookieJar;

use crate::{
    AppState, Error,
    endpoints,
    flash::{Flash, set_flash},
    transaction::core::{TransactionId, delete_transaction},
    user::UserID,
};

/// Delete a transaction. Deletion is unconditional for owned rows.
pub async fn delete_transaction_endpoint(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserID>,
    jar: PrivateCookieJar,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    let result = {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(_) => return Error::DatabaseLockError.into_response(),
        };

        delete_transaction(transaction_id, user_id, &connection)
    };

    match result {
        Ok(()) => {
            let jar = set_flash(jar, Flash::success("Transaction deleted."));
            (jar, Redirect::to(endpoints::TRANSACTIONS_VIEW)).into_response()
        }
        Err(error) => error.into_response(),
    }
}
