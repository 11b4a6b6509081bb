//! The monthly score page: each active rule's spending vs its limit.

use axum::{
    Extension,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;
use maud::{Markup, html};
use serde::Deserialize;
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    endpoints::{self, format_endpoint},
    flash::take_flash,
    html::{currency, page},
    month::MonthWindow,
    report::month_expense_by_category,
    score::core::{ScoreRule, ScoreStatus, classify_spending, get_active_rules_with_categories},
    user::UserID,
};

/// The query string parameters accepted by the score page.
#[derive(Debug, Deserialize)]
pub struct ScoreQuery {
    /// The year to report on. Defaults to the current year.
    pub year: Option<i32>,
    /// The month number (1-12). Out-of-range values are clamped.
    pub m: Option<u8>,
}

/// One row of the score table.
struct ScoreEntry {
    rule: ScoreRule,
    category_name: String,
    spent: f64,
    ratio: f64,
    status: ScoreStatus,
    remaining: f64,
}

/// Display the score page for a month: every active rule's category spending
/// against its limit, classified as ok, warning or over limit.
pub async fn get_score_page(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserID>,
    jar: PrivateCookieJar,
    Query(query): Query<ScoreQuery>,
) -> Response {
    let today = OffsetDateTime::now_utc().date();
    let year = query.year.unwrap_or(today.year());
    let month = query.m.unwrap_or(today.month() as u8).clamp(1, 12);
    let window = match MonthWindow::from_year_month(year, month) {
        Ok(window) => window,
        Err(_) => MonthWindow::current(),
    };

    let (rules, spent_by_category) = {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(_) => return Error::DatabaseLockError.into_response(),
        };

        let rules = match get_active_rules_with_categories(user_id, &connection) {
            Ok(rules) => rules,
            Err(error) => return error.into_response(),
        };
        let spent = match month_expense_by_category(window, user_id, &connection) {
            Ok(breakdown) => breakdown,
            Err(error) => return error.into_response(),
        };

        (rules, spent)
    };

    let spent_of = |category_id: i64| -> f64 {
        spent_by_category
            .iter()
            .find(|(id, _, _)| *id == category_id)
            .map(|(_, _, total)| *total)
            .unwrap_or(0.0)
    };

    let entries: Vec<ScoreEntry> = rules
        .into_iter()
        .map(|(rule, category_name)| {
            let spent = spent_of(rule.category_id);
            let (ratio, status) = classify_spending(spent, rule.monthly_limit, rule.warning_pct);

            ScoreEntry {
                remaining: rule.monthly_limit - spent,
                rule,
                category_name,
                spent,
                ratio,
                status,
            }
        })
        .collect();

    let (jar, flash) = take_flash(jar);

    let content = html! {
        (month_nav(window))

        a href=(endpoints::NEW_SCORE_RULE_VIEW) class="button" { "New rule" }

        (score_table(&entries))
    };

    (
        jar,
        page("Score", endpoints::SCORE_VIEW, &flash, &[], &content),
    )
        .into_response()
}

fn month_nav(window: MonthWindow) -> Markup {
    let link_for = |window: MonthWindow| {
        format!(
            "{}?year={}&m={}",
            endpoints::SCORE_VIEW,
            window.start.year(),
            window.start.month() as u8
        )
    };

    html! {
        nav class="month-nav"
        {
            a href=(link_for(window.previous())) { "< Previous" }
            span class="month-label" { (window.label()) }
            a href=(link_for(window.following())) { "Next >" }
        }
    }
}

fn score_table(entries: &[ScoreEntry]) -> Markup {
    html! {
        @if entries.is_empty() {
            p { "No active score rules. Create one to track category spending." }
        } @else {
            table class="data-table"
            {
                thead
                {
                    tr
                    {
                        th { "Category" }
                        th class="amount" { "Limit" }
                        th class="amount" { "Spent" }
                        th class="amount" { "Remaining" }
                        th { "Usage" }
                        th { "Status" }
                        th { "" }
                    }
                }
                tbody
                {
                    @for entry in entries {
                        tr
                        {
                            td { (entry.category_name) }
                            td class="amount" { (currency(entry.rule.monthly_limit)) }
                            td class="amount" { (currency(entry.spent)) }
                            td class="amount" { (currency(entry.remaining)) }
                            td { (format!("{:.0}%", entry.ratio * 100.0)) }
                            td
                            {
                                span class={ "status-badge " (entry.status.css_class()) }
                                {
                                    (entry.status.label())
                                }
                            }
                            td class="row-actions"
                            {
                                a href=(format_endpoint(endpoints::EDIT_SCORE_RULE_VIEW, entry.rule.id)) { "Edit" }
                                form method="post" action=(format_endpoint(endpoints::DELETE_SCORE_RULE, entry.rule.id))
                                {
                                    button type="submit" class="link-button danger" { "Delete" }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
