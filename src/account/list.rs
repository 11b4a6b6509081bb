//! The page listing a user's accounts.

use axum::{
    Extension,
    extract::State,
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;
use maud::html;

use crate::{
    AppState, Error,
    account::get_accounts,
    endpoints::{self, format_endpoint},
    flash::take_flash,
    html::page,
    user::UserID,
};

/// Display all of the user's accounts.
pub async fn get_accounts_page(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserID>,
    jar: PrivateCookieJar,
) -> Response {
    let accounts = {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(_) => return Error::DatabaseLockError.into_response(),
        };

        match get_accounts(user_id, &connection) {
            Ok(accounts) => accounts,
            Err(error) => return error.into_response(),
        }
    };

    let (jar, flash) = take_flash(jar);

    let content = html! {
        a href=(endpoints::NEW_ACCOUNT_VIEW) class="button" { "New account" }

        @if accounts.is_empty() {
            p { "No accounts yet." }
        } @else {
            table class="data-table"
            {
                thead { tr { th { "Name" } th { "Type" } th { "" } } }
                tbody
                {
                    @for account in &accounts {
                        tr
                        {
                            td { (account.name) }
                            td { (account.kind) }
                            td class="row-actions"
                            {
                                a href=(format_endpoint(endpoints::EDIT_ACCOUNT_VIEW, account.id)) { "Edit" }
                                form method="post" action=(format_endpoint(endpoints::DELETE_ACCOUNT, account.id))
                                {
                                    button type="submit" class="link-button danger" { "Delete" }
                                }
                            }
                        }
                    }
                }
            }
        }
    };

    (
        jar,
        page("Accounts", endpoints::ACCOUNTS_VIEW, &flash, &[], &content),
    )
        .into_response()
}
