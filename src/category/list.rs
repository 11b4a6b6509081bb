//! The page listing a user's categories.

use axum::{
    Extension,
    extract::State,
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;
use maud::html;

use crate::{
    AppState, Error,
    category::get_categories,
    endpoints::{self, format_endpoint},
    flash::take_flash,
    html::page,
    user::UserID,
};

/// Display all of the user's categories.
pub async fn get_categories_page(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserID>,
    jar: PrivateCookieJar,
) -> Response {
    let categories = {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(_) => return Error::DatabaseLockError.into_response(),
        };

        match get_categories(user_id, &connection) {
            Ok(categories) => categories,
            Err(error) => return error.into_response(),
        }
    };

    let (jar, flash) = take_flash(jar);

    let content = html! {
        a href=(endpoints::NEW_CATEGORY_VIEW) class="button" { "New category" }

        @if categories.is_empty() {
            p { "No categories yet." }
        } @else {
            table class="data-table"
            {
                thead { tr { th { "Name" } th { "" } } }
                tbody
                {
                    @for category in &categories {
                        tr
                        {
                            td { (category.name) }
                            td class="row-actions"
                            {
                                a href=(format_endpoint(endpoints::EDIT_CATEGORY_VIEW, category.id)) { "Edit" }
                                form method="post" action=(format_endpoint(endpoints::DELETE_CATEGORY, category.id))
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
        page("Categories", endpoints::CATEGORIES_VIEW, &flash, &[], &content),
    )
        .into_response()
}
