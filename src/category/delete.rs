//! The form handler for deleting a category.

use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::PrivateCookieJar;

use crate::{
    AppState, Error,
    category::{CategoryId, delete_category},
    endpoints,
    flash::{Flash, set_flash},
    user::UserID,
};

/// Delete a category, unless transactions still reference it.
pub async fn delete_category_endpoint(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserID>,
    jar: PrivateCookieJar,
    Path(category_id): Path<CategoryId>,
) -> Response {
    let result = {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(_) => return Error::DatabaseLockError.into_response(),
        };

        delete_category(category_id, user_id, &connection)
    };

    match result {
        Ok(()) => {
            let jar = set_flash(jar, Flash::success("Category deleted."));
            (jar, Redirect::to(endpoints::CATEGORIES_VIEW)).into_response()
        }
        Err(Error::CategoryInUse) => {
            let jar = set_flash(
                jar,
                Flash::error("Cannot delete: transactions are linked to this category."),
            );
            (jar, Redirect::to(endpoints::CATEGORIES_VIEW)).into_response()
        }
        Err(error) => error.into_response(),
    }
}
