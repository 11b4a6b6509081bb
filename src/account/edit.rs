//! The page and form handler for editing an account.

use axum::{
    Extension, Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::PrivateCookieJar;
use maud::html;

use crate::{
    AppState, Error,
    account::{AccountId, create::AccountForm, create::account_form, get_account, update_account},
    endpoints::{self, format_endpoint},
    flash::{Flash, set_flash, take_flash},
    html::page,
    user::UserID,
};

/// Display the form for editing an existing account.
pub async fn get_edit_account_page(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserID>,
    jar: PrivateCookieJar,
    Path(account_id): Path<AccountId>,
) -> Response {
    let account = {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(_) => return Error::DatabaseLockError.into_response(),
        };

        match get_account(account_id, user_id, &connection) {
            Ok(account) => account,
            Err(error) => return error.into_response(),
        }
    };

    let (jar, flash) = take_flash(jar);
    let action = format_endpoint(endpoints::EDIT_ACCOUNT_VIEW, account.id);
    let content = html! {
        (account_form(&account.name, &account.kind, &action, None))
    };

    (
        jar,
        page("Edit Account", endpoints::ACCOUNTS_VIEW, &flash, &[], &content),
    )
        .into_response()
}

/// Handle submission of the edit account form.
pub async fn update_account_endpoint(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserID>,
    jar: PrivateCookieJar,
    Path(account_id): Path<AccountId>,
    Form(form): Form<AccountForm>,
) -> Response {
    let name = form.name.trim();
    let kind = form.kind.trim();
    let action = format_endpoint(endpoints::EDIT_ACCOUNT_VIEW, account_id);

    let render_error = |message: &str| {
        page(
            "Edit Account",
            endpoints::ACCOUNTS_VIEW,
            &None,
            &[],
            &account_form(name, kind, &action, Some(message)),
        )
        .into_response()
    };

    if name.is_empty() {
        return render_error("Name is required.");
    }

    if kind.is_empty() {
        return render_error("Type is required.");
    }

    let result = {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(_) => return Error::DatabaseLockError.into_response(),
        };

        update_account(account_id, name, kind, user_id, &connection)
    };

    match result {
        Ok(()) => {
            let jar = set_flash(jar, Flash::success("Account updated."));
            (jar, Redirect::to(endpoints::ACCOUNTS_VIEW)).into_response()
        }
        Err(Error::DuplicateAccountName(name)) => {
            render_error(&format!("Another account called \"{name}\" already exists."))
        }
        Err(error) => error.into_response(),
    }
}
