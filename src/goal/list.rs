//! The page listing a user's goals.

use axum::{
    Extension,
    extract::State,
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;
use maud::html;

use crate::{
    AppState, Error,
    endpoints::{self, format_endpoint},
    flash::take_flash,
    goal::core::get_goal_rows,
    html::{currency, page},
    user::UserID,
};

/// Display all of the user's goals.
pub async fn get_goals_page(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserID>,
    jar: PrivateCookieJar,
) -> Response {
    let goals = {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(_) => return Error::DatabaseLockError.into_response(),
        };

        match get_goal_rows(user_id, &connection) {
            Ok(goals) => goals,
            Err(error) => return error.into_response(),
        }
    };

    let (jar, flash) = take_flash(jar);

    let content = html! {
        a href=(endpoints::NEW_GOAL_VIEW) class="button" { "New goal" }

        @if goals.is_empty() {
            p { "No goals yet. Goal progress is shown on the dashboard." }
        } @else {
            table class="data-table"
            {
                thead
                {
                    tr
                    {
                        th { "Name" }
                        th { "Kind" }
                        th class="amount" { "Target" }
                        th { "Month" }
                        th { "Category" }
                        th { "" }
                    }
                }
                tbody
                {
                    @for row in &goals {
                        @let goal = &row.goal;
                        tr
                        {
                            td { (goal.name) }
                            td { (goal.kind.label()) }
                            td class="amount" { (currency(goal.target_amount)) }
                            td { (goal.month.as_deref().unwrap_or("Every month")) }
                            td { (row.category_name.as_deref().unwrap_or("-")) }
                            td class="row-actions"
                            {
                                a href=(format_endpoint(endpoints::EDIT_GOAL_VIEW, goal.id)) { "Edit" }
                                form method="post" action=(format_endpoint(endpoints::DELETE_GOAL, goal.id))
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
        page("Goals", endpoints::GOALS_VIEW, &flash, &[], &content),
    )
        .into_response()
}
