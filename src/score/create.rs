//! The page and form handler for creating (or upserting) a score rule.

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
    category::{Category, get_categories, get_category},
    endpoints,
    flash::{Flash, set_flash, take_flash},
    html::{form_error, page, select_input, text_input},
    money::parse_amount,
    score::core::upsert_score_rule,
    user::UserID,
};

/// The raw strings submitted by the score rule form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreRuleForm {
    /// The selected category ID.
    #[serde(default)]
    pub category_id: String,
    /// The monthly limit, in either comma- or dot-decimal format.
    pub monthly_limit: String,
    /// The warning threshold fraction, e.g. "0.80".
    pub warning_pct: String,
}

pub(super) fn score_rule_form_view(
    form: &ScoreRuleForm,
    categories: &[Category],
    action: &str,
    error_message: Option<&str>,
) -> Markup {
    let category_options: Vec<(String, String)> = categories
        .iter()
        .map(|category| (category.id.to_string(), category.name.clone()))
        .collect();

    html! {
        form method="post" action=(action) class="entity-form"
        {
            (form_error(error_message))
            (select_input(
                "Category",
                "category_id",
                &category_options,
                Some(form.category_id.as_str()),
                Some("Choose a category"),
            ))
            (text_input("Monthly limit", "monthly_limit", "text", &form.monthly_limit))
            (text_input("Warning threshold (e.g. 0.80)", "warning_pct", "text", &form.warning_pct))

            button type="submit" class="button" { "Save" }
            a href=(endpoints::SCORE_VIEW) { "Cancel" }
        }
    }
}

/// Parse the limit and warning threshold fields shared by the create and edit
/// forms.
///
/// # Errors
/// Returns a user-facing message when a value is out of range.
pub(super) fn parse_limit_and_warning(
    monthly_limit: &str,
    warning_pct: &str,
) -> Result<(f64, f64), String> {
    let monthly_limit = parse_amount(monthly_limit).map_err(|_| "Invalid values.".to_owned())?;
    let warning_pct = parse_amount(warning_pct).map_err(|_| "Invalid values.".to_owned())?;

    if monthly_limit <= 0.0 {
        return Err("The monthly limit must be greater than zero.".to_owned());
    }

    if warning_pct <= 0.0 || warning_pct >= 1.5 {
        return Err("Invalid warning threshold. Use something like 0.80.".to_owned());
    }

    Ok((monthly_limit, warning_pct))
}

/// Display the form for creating a score rule.
pub async fn get_new_score_rule_page(
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
    let form = ScoreRuleForm {
        warning_pct: "0.80".to_owned(),
        ..Default::default()
    };
    let content = score_rule_form_view(&form, &categories, endpoints::NEW_SCORE_RULE_VIEW, None);

    (
        jar,
        page("New Score Rule", endpoints::SCORE_VIEW, &flash, &[], &content),
    )
        .into_response()
}

/// Handle submission of the new score rule form.
///
/// Creating a rule for a category that already has one updates and
/// re-activates the existing rule instead of failing.
pub async fn create_score_rule_endpoint(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserID>,
    jar: PrivateCookieJar,
    Form(form): Form<ScoreRuleForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(_) => return Error::DatabaseLockError.into_response(),
    };

    let render_error = |message: &str, connection: &rusqlite::Connection| {
        let categories = get_categories(user_id, connection).unwrap_or_default();
        let content =
            score_rule_form_view(&form, &categories, endpoints::NEW_SCORE_RULE_VIEW, Some(message));

        page("New Score Rule", endpoints::SCORE_VIEW, &None, &[], &content).into_response()
    };

    let category_id: i64 = match form.category_id.trim().parse() {
        Ok(category_id) => category_id,
        Err(_) => return render_error("Choose a category.", &connection),
    };

    if get_category(category_id, user_id, &connection).is_err() {
        return render_error("Choose a category.", &connection);
    }

    let (monthly_limit, warning_pct) =
        match parse_limit_and_warning(&form.monthly_limit, &form.warning_pct) {
            Ok(values) => values,
            Err(message) => return render_error(&message, &connection),
        };

    if let Err(error) = upsert_score_rule(category_id, monthly_limit, warning_pct, user_id, &connection)
    {
        return error.into_response();
    }
    drop(connection);

    let jar = set_flash(jar, Flash::success("Score rule saved!"));

    (jar, Redirect::to(endpoints::SCORE_VIEW)).into_response()
}
