//! The page and form handler for creating an account.

use axum::{
    Extension, Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::PrivateCookieJar;
use maud::{Markup, html};
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    account::create_account,
    endpoints,
    flash::{Flash, set_flash, take_flash},
    html::{form_error, page, text_input},
    user::UserID,
};

/// The form data for creating or editing an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountForm {
    /// The account name, unique per owner.
    pub name: String,
    /// A free-text label such as "wallet" or "bank".
    pub kind: String,
}

pub(super) fn account_form(
    name: &str,
    kind: &str,
    action: &str,
    error_message: Option<&str>,
) -> Markup {
    html! {
        form method="post" action=(action) class="entity-form"
        {
            (form_error(error_message))
            (text_input("Name", "name", "text", name))
            (text_input("Type", "kind", "text", kind))
            button type="submit" class="button" { "Save" }
            a href=(endpoints::ACCOUNTS_VIEW) { "Cancel" }
        }
    }
}

/// Display the form for creating an account.
pub async fn get_new_account_page(jar: PrivateCookieJar) -> Response {
    let (jar, flash) = take_flash(jar);
    let content = account_form("", "", endpoints::NEW_ACCOUNT_VIEW, None);

    (
        jar,
        page("New Account", endpoints::ACCOUNTS_VIEW, &flash, &[], &content),
    )
        .into_response()
}

/// Handle submission of the new account form.
pub async fn create_account_endpoint(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserID>,
    jar: PrivateCookieJar,
    Form(form): Form<AccountForm>,
) -> Response {
    let name = form.name.trim();
    let kind = form.kind.trim();

    let render_error = |message: &str| {
        page(
            "New Account",
            endpoints::ACCOUNTS_VIEW,
            &None,
            &[],
            &account_form(name, kind, endpoints::NEW_ACCOUNT_VIEW, Some(message)),
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

        create_account(name, kind, user_id, &connection)
    };

    match result {
        Ok(account) => {
            let jar = set_flash(jar, Flash::success(format!("Account \"{}\" created.", account.name)));
            (jar, Redirect::to(endpoints::ACCOUNTS_VIEW)).into_response()
        }
        Err(Error::DuplicateAccountName(name)) => {
            render_error(&format!("An account called \"{name}\" already exists."))
        }
        Err(error) => error.into_response(),
    }
}
