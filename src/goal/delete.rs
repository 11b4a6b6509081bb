//! The form handler for deleting a goal.

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
    goal::core::{GoalId, delete_goal},
    user::UserID,
};

/// Delete a goal.
pub async fn delete_goal_endpoint(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserID>,
    jar: PrivateCookieJar,
    Path(goal_id): Path<GoalId>,
) -> Response {
    let result = {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(_) => return Error::DatabaseLockError.into_response(),
        };

        delete_goal(goal_id, user_id, &connection)
    };

    match result {
        Ok(()) => {
            let jar = set_flash(jar, Flash::success("Goal deleted."));
            (jar, Redirect::to(endpoints::GOALS_VIEW)).into_response()
        }
        Err(error) => error.into_response(),
    }
}
