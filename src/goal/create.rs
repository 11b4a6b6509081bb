//! The page and form handler for creating a goal.

use axum::{
    Extension, Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::PrivateCookieJar;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    category::{Category, get_categories, get_category},
    endpoints,
    flash::{Flash, set_flash, take_flash},
    goal::core::{GoalKind, NewGoal, create_goal},
    html::{form_error, page, select_input, text_input},
    money::parse_amount,
    month::MonthWindow,
    user::UserID,
};

/// The raw strings submitted by the goal form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoalForm {
    /// The goal name.
    pub name: String,
    /// One of the [GoalKind] strings.
    pub kind: String,
    /// The target amount, in either comma- or dot-decimal format.
    pub target_amount: String,
    /// An optional `YYYY-MM` month tag. Empty means "every month".
    #[serde(default)]
    pub month: String,
    /// The selected category ID, or the empty string for no category.
    #[serde(default)]
    pub category_id: String,
}

pub(super) fn goal_form_view(
    form: &GoalForm,
    categories: &[Category],
    action: &str,
    error_message: Option<&str>,
) -> Markup {
    let kind_options: Vec<(String, String)> = GoalKind::all()
        .iter()
        .map(|kind| (kind.as_str().to_owned(), kind.label().to_owned()))
        .collect();
    let category_options: Vec<(String, String)> = categories
        .iter()
        .map(|category| (category.id.to_string(), category.name.clone()))
        .collect();

    html! {
        form method="post" action=(action) class="entity-form"
        {
            (form_error(error_message))
            (text_input("Name", "name", "text", &form.name))
            (select_input("Kind", "kind", &kind_options, Some(form.kind.as_str()), None))
            (text_input("Target amount", "target_amount", "text", &form.target_amount))
            (text_input("Month (YYYY-MM, optional)", "month", "text", &form.month))
            (select_input(
                "Category (for category caps)",
                "category_id",
                &category_options,
                Some(form.category_id.as_str()),
                Some("(none)"),
            ))

            button type="submit" class="button" { "Save" }
            a href=(endpoints::GOALS_VIEW) { "Cancel" }
        }
    }
}

/// Validate a submitted goal form against the owner's categories.
///
/// # Errors
/// Returns a user-facing message when a field is invalid.
pub(super) fn parse_goal_form(
    form: &GoalForm,
    user_id: UserID,
    connection: &Connection,
) -> Result<NewGoal, String> {
    let name = form.name.trim();
    if name.is_empty() {
        return Err("Name is required.".to_owned());
    }

    let kind = GoalKind::parse(form.kind.trim()).ok_or_else(|| "Invalid goal kind.".to_owned())?;

    let target_amount =
        parse_amount(&form.target_amount).map_err(|_| "Invalid target amount.".to_owned())?;
    if target_amount <= 0.0 {
        return Err("Target amount must be greater than zero.".to_owned());
    }

    let month = form.month.trim();
    let month = if month.is_empty() {
        None
    } else {
        // Normalize the tag so "2025-5" matches the dashboard's "2025-05".
        Some(
            MonthWindow::parse(month)
                .map_err(|_| "Month must be of the form YYYY-MM.".to_owned())?
                .tag(),
        )
    };

    let category_raw = form.category_id.trim();
    let category_id = if category_raw.is_empty() {
        None
    } else {
        let id: i64 = category_raw
            .parse()
            .map_err(|_| "Invalid category.".to_owned())?;
        get_category(id, user_id, connection).map_err(|_| "Invalid category.".to_owned())?;
        Some(id)
    };

    if kind == GoalKind::CategorySpendCap && category_id.is_none() {
        return Err("Choose a category for a category spending cap.".to_owned());
    }

    Ok(NewGoal {
        name: name.to_owned(),
        kind,
        target_amount,
        month,
        category_id,
    })
}

/// Display the form for creating a goal.
pub async fn get_new_goal_page(
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
    let content = goal_form_view(
        &GoalForm::default(),
        &categories,
        endpoints::NEW_GOAL_VIEW,
        None,
    );

    (
        jar,
        page("New Goal", endpoints::GOALS_VIEW, &flash, &[], &content),
    )
        .into_response()
}

/// Handle submission of the new goal form.
pub async fn create_goal_endpoint(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserID>,
    jar: PrivateCookieJar,
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
            let content =
                goal_form_view(&form, &categories, endpoints::NEW_GOAL_VIEW, Some(&message));

            return page("New Goal", endpoints::GOALS_VIEW, &None, &[], &content).into_response();
        }
    };

    if let Err(error) = create_goal(new_goal, user_id, &connection) {
        return error.into_response();
    }
    drop(connection);

    let jar = set_flash(jar, Flash::success("Goal created!"));

    (jar, Redirect::to(endpoints::GOALS_VIEW)).into_response()
}
