//! The page and form handler for editing a goal.

use axum::{
    Extension, Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::PrivateCookieJar;

use crate::{
    AppState, Error,
    category::get_categories,
    endpoints::{self, format_endpoint},
    flash::{Flash, set_flash, take_flash},
    goal::{
        core::{GoalId, get_goal, update_goal},
        create::{GoalForm, goal_form_view, parse_goal_form},
    },
    html::page,
    money::format_amount,
    user::UserID,
};

/// Display the form for editing an existing goal.
pub async fn get_edit_goal_page(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserID>,
    jar: PrivateCookieJar,
    Path(goal_id): Path<GoalId>,
) -> Response {
    let (goal, categories) = {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(_) => return Error::DatabaseLockError.into_response(),
        };

        let goal = match get_goal(goal_id, user_id, &connection) {
            Ok(goal) => goal,
            Err(error) => return error.into_response(),
        };
        let categories = match get_categories(user_id, &connection) {
            Ok(categories) => categories,
            Err(error) => return error.into_response(),
        };

        (goal, categories)
    };

    let (jar, flash) = take_flash(jar);

    let form = GoalForm {
        name: goal.name.clone(),
        kind: goal.kind.as_str().to_owned(),
        target_amount: format_amount(goal.target_amount),
        month: goal.month.clone().unwrap_or_default(),
        category_id: goal
            .category_id
            .map(|id| id.to_string())
            .unwrap_or_default(),
    };
    let action = format_endpoint(endpoints::EDIT_GOAL_VIEW, goal.id);
    let content = goal_form_view(&form, &categories, &action, None);

    (
        jar,
        page("Edit Goal", endpoints::GOALS_VIEW, &flash, &[], &content),
    )
        .into_response()
}

/// Handle submission of the edit goal form.
pub async fn update_goal_endpoint(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserID>,
    jar: PrivateCookieJar,
    Path(goal_id): Path<GoalId>,
    Form(form): Form<GoalForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(_) => return Error::DatabaseLockError.into_response(),
    };

    let new_goal = match parse_goal_form(&form, user_id, &connection) {
        Ok(new_goal) => new_goal,
        Err(message) => {
            let categories = get_categories(user_id, &connection).unwrap_or_default();
            let action = format_endpoint(endpoints::EDIT_GOAL_VIEW, goal_id);
            let content = goal_form_view(&form, &categories, &action, Some(&message));

            return page("Edit Goal", endpoints::GOALS_VIEW, &None, &[], &content).into_response();
        }
    };

    if let Err(error) = update_goal(goal_id, new_goal, user_id, &connection) {
        return error.into_response();
    }
    drop(connection);

    let jar = set_flash(jar, Flash::success("Goal updated."));

    (jar, Redirect::to(endpoints::GOALS_VIEW)).into_response()
}
