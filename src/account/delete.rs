//! The form handler for deleting an account.

use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::PrivateCookieJar;

use crate::{
    AppState, Error,
    account::{AccountId, delete_account},
    endpoints,
    flash::{Flash, set_flash},
    user::UserID,
};

/// Delete an account, unless transactions still reference it.
pub async fn delete_account_endpoint(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserID>,
    jar: PrivateCookieJar,
    Path(account_id): Path<AccountId>,
) -> Response {
    let result = {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(_) => return Error::DatabaseLockError.into_response(),
        };

        delete_account(account_id, user_id, &connection)
    };

    match result {
        Ok(()) => {
            let jar = set_flash(jar, Flash::success("Account deleted."));
            (jar, Redirect::to(endpoints::ACCOUNTS_VIEW)).into_response()
        }
        Err(Error::AccountInUse) => {
            let jar = set_flash(
                jar,
                Flash::error("Cannot delete: transactions are linked to this account."),
            );
            (jar, Redirect::to(endpoints::ACCOUNTS_VIEW)).into_response()
        }
        Err(error) => error.into_response(),
    }
}
