//! The registration page and form handler.

use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::PrivateCookieJar;
use maud::{Markup, html};
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error, PasswordHash,
    account::seed_default_accounts,
    auth::cookie::get_user_id_from_auth_cookie,
    endpoints,
    flash::{Flash, set_flash, take_flash},
    html::{auth_page, form_error, text_input},
    user::create_user,
};

fn register_form(name: &str, email: &str, error_message: Option<&str>) -> Markup {
    html! {
        form method="post" action=(endpoints::REGISTER_VIEW) class="entity-form"
        {
            (form_error(error_message))
            (text_input("Name", "name", "text", name))
            (text_input("Email", "email", "email", email))
            (text_input("Password", "password", "password", ""))
            (text_input("Confirm password", "confirm", "password", ""))

            button type="submit" class="button" { "Register" }

            p
            {
                "Already have an account? "
                a href=(endpoints::LOG_IN_VIEW) { "Log in here" }
            }
        }
    }
}

/// Display the registration page.
///
/// Users that are already logged in are sent straight to the dashboard.
pub async fn get_register_page(jar: PrivateCookieJar) -> Response {
    if get_user_id_from_auth_cookie(&jar).is_ok() {
        return Redirect::to(endpoints::DASHBOARD_VIEW).into_response();
    }

    let (jar, flash) = take_flash(jar);
    let content = register_form("", "", None);

    (jar, auth_page("Register", &flash, &content)).into_response()
}

/// The raw data entered by the user in the registration form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterData {
    /// The user's display name.
    pub name: String,
    /// The user's email address.
    pub email: String,
    /// The password to register with.
    pub password: String,
    /// Must match `password`.
    pub confirm: String,
}

/// Handler for registration requests via the POST method.
///
/// On success the new user gets the four default accounts seeded and is
/// redirected to the log-in page. Otherwise the form is re-rendered with an
/// error message.
pub async fn post_register(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Form(user_data): Form<RegisterData>,
) -> Response {
    let name = user_data.name.trim();
    let email = user_data.email.trim().to_lowercase();
    let password = user_data.password.trim();
    let confirm = user_data.confirm.trim();

    let render_error =
        |message: &str| auth_page("Register", &None, &register_form(name, &email, Some(message))).into_response();

    if name.is_empty() || email.is_empty() || password.is_empty() {
        return render_error("Name, email and password are required.");
    }

    if password != confirm {
        return render_error("The passwords do not match.");
    }

    let password_hash = match PasswordHash::from_raw_password(password, PasswordHash::DEFAULT_COST)
    {
        Ok(password_hash) => password_hash,
        Err(error) => {
            tracing::error!("Error hashing password: {error}");
            return render_error("An internal error occurred. Please try again later.");
        }
    };

    let result = {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(_) => return Error::DatabaseLockError.into_response(),
        };

        create_user(name, &email, password_hash, &connection).map(|user| {
            if let Err(error) = seed_default_accounts(user.id, &connection) {
                tracing::warn!("Could not seed default accounts for {}: {error}", user.id);
            }
            user
        })
    };

    match result {
        Ok(_) => {
            let jar = set_flash(jar, Flash::success("Account created! Log in."));
            (jar, Redirect::to(endpoints::LOG_IN_VIEW)).into_response()
        }
        Err(Error::DuplicateEmail(_)) => {
            let jar = set_flash(jar, Flash::error("Email already registered. Log in."));
            (jar, Redirect::to(endpoints::LOG_IN_VIEW)).into_response()
        }
        Err(error) => {
            tracing::error!("Error creating user: {error}");
            render_error("An internal error occurred. Please try again later.")
        }
    }
}
