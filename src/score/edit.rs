//! The page and form handler for editing a score rule.

use axum::{
    Extension, Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::PrivateCookieJar;
use maud::html;

use crate::{
    AppState, Error,
    category::get_category,
    endpoints::{self, format_endpoint},
    flash::{Flash, set_flash, take_flash},
    html::{form_error, page, text_input},
    money::format_amount,
    score::{
        core::{ScoreRuleId, get_score_rule, update_score_rule},
        create::parse_limit_and_warning,
    },
    user::UserID,
};

/// The raw strings submitted by the edit score rule form. The category of an
/// existing rule cannot be changed.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct EditScoreRuleForm {
    /// The monthly limit, in either comma- or dot-decimal format.
    pub monthly_limit: String,
    /// The warning threshold fraction, e.g. "0.80".
    pub warning_pct: String,
}

fn edit_form_view(
    form: &EditScoreRuleForm,
    category_name: &str,
    action: &str,
    error_message: Option<&str>,
) -> maud::Markup {
    html! {
        form method="post" action=(action) class="entity-form"
        {
            (form_error(error_message))

            div class="field"
            {
                label { "Category" }
                p { (category_name) }
            }

            (text_input("Monthly limit", "monthly_limit", "text", &form.monthly_limit))
            (text_input("Warning threshold (e.g. 0.80)", "warning_pct", "text", &form.warning_pct))

            button type="submit" class="button" { "Save" }
            a href=(endpoints::SCORE_VIEW) { "Cancel" }
        }
    }
}

/// Display the form for editing an existing score rule.
pub async fn get_edit_score_rule_page(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserID>,
    jar: PrivateCookieJar,
    Path(rule_id): Path<ScoreRuleId>,
) -> Response {
    let (rule, category_name) = {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(_) => return Error::DatabaseLockError.into_response(),
        };

        let rule = match get_score_rule(rule_id, user_id, &connection) {
            Ok(rule) => rule,
            Err(error) => return error.into_response(),
        };
        let category_name = match get_category(rule.category_id, user_id, &connection) {
            Ok(category) => category.name,
            Err(error) => return error.into_response(),
        };

        (rule, category_name)
    };

    let (jar, flash) = take_flash(jar);

    let form = EditScoreRuleForm {
        monthly_limit: format_amount(rule.monthly_limit),
        warning_pct: format!("{:.2}", rule.warning_pct),
    };
    let action = format_endpoint(endpoints::EDIT_SCORE_RULE_VIEW, rule.id);
    let content = edit_form_view(&form, &category_name, &action, None);

    (
        jar,
        page("Edit Score Rule", endpoints::SCORE_VIEW, &flash, &[], &content),
    )
        .into_response()
}

/// Handle submission of the edit score rule form.
pub async fn update_score_rule_endpoint(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserID>,
    jar: PrivateCookieJar,
    Path(rule_id): Path<ScoreRuleId>,
    Form(form): Form<EditScoreRuleForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(_) => return Error::DatabaseLockError.into_response(),
    };

    let rule = match get_score_rule(rule_id, user_id, &connection) {
        Ok(rule) => rule,
        Err(error) => return error.into_response(),
    };

    let (monthly_limit, warning_pct) =
        match parse_limit_and_warning(&form.monthly_limit, &form.warning_pct) {
            Ok(values) => values,
            Err(message) => {
                let category_name = get_category(rule.category_id, user_id, &connection)
                    .map(|category| category.name)
                    .unwrap_or_default();
                let action = format_endpoint(endpoints::EDIT_SCORE_RULE_VIEW, rule_id);
                let content = edit_form_view(&form, &category_name, &action, Some(&message));

                return page("Edit Score Rule", endpoints::SCORE_VIEW, &None, &[], &content)
                    .into_response();
            }
        };

    if let Err(error) = update_score_rule(rule_id, monthly_limit, warning_pct, user_id, &connection)
    {
        return error.into_response();
    }
    drop(connection);

    let jar = set_flash(jar, Flash::success("Score rule updated!"));

    (jar, Redirect::to(endpoints::SCORE_VIEW)).into_response()
}
