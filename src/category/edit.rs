//! The page and form handler for editing a category.

use axum::{
    Extension, Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::PrivateCookieJar;

use crate::{
    AppState, Error,
    category::{
        CategoryId,
        create::{CategoryForm, category_form},
        get_category, update_category,
    },
    endpoints::{self, format_endpoint},
    flash::{Flash, set_flash, take_flash},
    html::page,
    user::UserID,
};

/// Display the form for editing an existing category.
pub async fn get_edit_category_page(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserID>,
    jar: PrivateCookieJar,
    Path(category_id): Path<CategoryId>,
) -> Response {
    let category = {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(_) => return Error::DatabaseLockError.into_response(),
        };

        match get_category(category_id, user_id, &connection) {
            Ok(category) => category,
            Err(error) => return error.into_response(),
        }
    };

    let (jar, flash) = take_flash(jar);
    let action = format_endpoint(endpoints::EDIT_CATEGORY_VIEW, category.id);
    let content = category_form(&category.name, &action, None);

    (
        jar,
        page("Edit Category", endpoints::CATEGORIES_VIEW, &flash, &[], &content),
    )
        .into_response()
}

/// Handle submission of the edit category form.
pub async fn update_category_endpoint(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserID>,
    jar: PrivateCookieJar,
    Path(category_id): Path<CategoryId>,
    Form(form): Form<CategoryForm>,
) -> Response {
    let name = form.name.trim();
    let action = format_endpoint(endpoints::EDIT_CATEGORY_VIEW, category_id);

    let render_error = |message: &str| {
        page(
            "Edit Category",
            endpoints::CATEGORIES_VIEW,
            &None,
            &[],
            &category_form(name, &action, Some(message)),
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

        update_category(category_id, name, user_id, &connection)
    };

    match result {
        Ok(()) => {
            let jar = set_flash(jar, Flash::success("Category updated."));
            (jar, Redirect::to(endpoints::CATEGORIES_VIEW)).into_response()
        }
        Err(Error::DuplicateCategoryName(name)) => {
            render_error(&format!("Another category called \"{name}\" already exists."))
        }
        Err(error) => error.into_response(),
    }
}
