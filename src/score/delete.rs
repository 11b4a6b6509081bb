//! The form handler for deleting a score rule.

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
    score::core::{ScoreRuleId, delete_score_rule},
    user::UserID,
};

/// Delete a score rule.
pub async fn delete_score_rule_endpoint(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserID>,
    jar: PrivateCookieJar,
    Path(rule_id): Path<ScoreRuleId>,
) -> Response {
    let result = {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(_) => return Error::DatabaseLockError.into_response(),
        };

        delete_score_rule(rule_id, user_id, &connection)
    };

    match result {
        Ok(()) => {
            let jar = set_flash(jar, Flash::success("Score rule removed."));
            (jar, Redirect::to(endpoints::SCORE_VIEW)).into_response()
        }
        Err(error) => error.into_response(),
    }
}
