//! The page and form handler for creating a category.

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
    category::create_category,
    endpoints,
    flash::{Flash, set_flash, take_flash},
    html::{form_error, page, text_input},
    user::UserID,
};

/// The form data for creating or editing a category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryForm {
    /// The category name, unique per owner.
    pub name: String,
}

pub(super) fn category_form(name: &str, action: &str, error_message: Option<&str>) -> Markup {
    html! {
        form method="post" action=(action) class="entity-form"
        {
            (form_error(error_message))
            (text_input("Name", "name", "text", name))
            button type="submit" class="button" { "Save" }
            a href=(endpoints::CATEGORIES_VIEW) { "Cancel" }
        }
    }
}

/// Display the form for creating a category.
pub async fn get_new_category_page(jar: PrivateCookieJar) -> Response {
    let (jar, flash) = take_flash(jar);
    let content = category_form("", endpoints::NEW_CATEGORY_VIEW, None);

    (
        jar,
        page("New Category", endpoints::CATEGORIES_VIEW, &flash, &[], &content),
    )
        .into_response()
}

/// Handle submission of the new category form.
pub async fn create_category_endpoint(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserID>,
    jar: PrivateCookieJar,
    Form(form): Form<CategoryForm>,
) -> Response {
    let name = form.name.trim();

    let render_error = |message: &str| {
        page(
            "New Category",
            endpoints::CATEGORIES_VIEW,
            &None,
            &[],
            &category_form(name, endpoints::NEW_CATEGORY_VIEW, Some(message)),
        )
        .into_response()
    };

    if name.is_empty() {
        return render_error("Name is required.");
    }

    let result = {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(_) => return Error::DatabaseLockError.into_response(),
        };

        create_category(name, user_id, &connection)
    };

    match result {
        Ok(category) => {
            let jar = set_flash(
                jar,
                Flash::success(format!("Category \"{}\" created.", category.name)),
            );
            (jar, Redirect::to(endpoints::CATEGORIES_VIEW)).into_response()
        }
        Err(Error::DuplicateCategoryName(name)) => {
            render_error(&format!("A category called \"{name}\" already exists."))
        }
        Err(error) => error.into_response(),
    }
}
