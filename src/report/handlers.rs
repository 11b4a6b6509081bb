//! The dashboard route handler and its view.

use std::collections::HashMap;

use axum::{
    Extension,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    AppState, Error,
    endpoints,
    flash::take_flash,
    goal::get_goals_for_month,
    html::{HeadElement, currency, page},
    month::MonthWindow,
    report::{
        aggregation::{
            GoalProgress, Totals, all_time_totals, daily_running_balance, goal_progress,
            month_expense_by_category, month_totals,
        },
        charts::{
            DashboardChart, charts_script, charts_view, daily_balance_chart, expense_pie_chart,
            month_bar_chart,
        },
    },
    user::UserID,
};

const ECHARTS_CDN: &str = "https://cdn.jsdelivr.net/npm/echarts@5.5.1/dist/echarts.min.js";

/// The query string parameters accepted by the dashboard.
#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    /// The `YYYY-MM` month to aggregate. Missing or invalid values fall back
    /// to the current month.
    pub month: Option<String>,
}

/// Display the dashboard: totals, goal progress and charts for one month.
pub async fn get_dashboard_page(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserID>,
    jar: PrivateCookieJar,
    Query(query): Query<DashboardQuery>,
) -> Response {
    let window = MonthWindow::parse_or_current(query.month.as_deref());

    let (all_time, month, breakdown, series, goals) = {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(_) => return Error::DatabaseLockError.into_response(),
        };

        let all_time = match all_time_totals(user_id, &connection) {
            Ok(totals) => totals,
            Err(error) => return error.into_response(),
        };
        let month = match month_totals(window, user_id, &connection) {
            Ok(totals) => totals,
            Err(error) => return error.into_response(),
        };
        let breakdown = match month_expense_by_category(window, user_id, &connection) {
            Ok(breakdown) => breakdown,
            Err(error) => return error.into_response(),
        };
        let series = match daily_running_balance(window, user_id, &connection) {
            Ok(series) => series,
            Err(error) => return error.into_response(),
        };
        let goals = match get_goals_for_month(&window.tag(), user_id, &connection) {
            Ok(goals) => goals,
            Err(error) => return error.into_response(),
        };

        (all_time, month, breakdown, series, goals)
    };

    let expense_by_category: HashMap<_, _> = breakdown
        .iter()
        .map(|(category_id, _, total)| (*category_id, *total))
        .collect();
    let progress = goal_progress(&goals, &month, &expense_by_category);

    let charts = [
        DashboardChart {
            id: "expense-pie-chart",
            options: expense_pie_chart(&breakdown).to_string(),
        },
        DashboardChart {
            id: "daily-balance-chart",
            options: daily_balance_chart(&series).to_string(),
        },
        DashboardChart {
            id: "month-bar-chart",
            options: month_bar_chart(&month).to_string(),
        },
    ];

    let (jar, flash) = take_flash(jar);

    let content = html! {
        (month_nav(window))
        (summary_cards(&all_time, &month))
        (goals_view(&progress))
        (charts_view(&charts))

        div class="page-actions"
        {
            a href={ (endpoints::EXPORT_CSV) "?month=" (window.tag()) } { "Export CSV" }
            a href={ (endpoints::EXPORT_EXCEL) "?month=" (window.tag()) } { "Export Excel" }
            a href={ (endpoints::EXPORT_PDF) "?month=" (window.tag()) } { "Export PDF" }
        }
    };
    let head_elements = [
        HeadElement::ScriptLink(ECHARTS_CDN.to_owned()),
        charts_script(&charts),
    ];

    (
        jar,
        page(
            "Dashboard",
            endpoints::DASHBOARD_VIEW,
            &flash,
            &head_elements,
            &content,
        ),
    )
        .into_response()
}

fn month_nav(window: MonthWindow) -> Markup {
    html! {
        nav class="month-nav"
        {
            a href={ (endpoints::DASHBOARD_VIEW) "?month=" (window.previous().tag()) } { "< Previous" }
            span class="month-label" { (window.label()) }
            a href={ (endpoints::DASHBOARD_VIEW) "?month=" (window.following().tag()) } { "Next >" }
        }
    }
}

fn summary_cards(all_time: &Totals, month: &Totals) -> Markup {
    html! {
        section class="summary-cards"
        {
            div class="card"
            {
                h2 { "Balance" }
                p class="card-value" { (currency(all_time.balance())) }
            }
            div class="card"
            {
                h2 { "All-time income" }
                p class="card-value" { (currency(all_time.income)) }
            }
            div class="card"
            {
                h2 { "All-time expenses" }
                p class="card-value" { (currency(all_time.expense)) }
            }
            div class="card"
            {
                h2 { "Month income" }
                p class="card-value" { (currency(month.income)) }
            }
            div class="card"
            {
                h2 { "Month expenses" }
                p class="card-value" { (currency(month.expense)) }
            }
        }
    }
}

fn goals_view(progress: &[GoalProgress]) -> Markup {
    html! {
        section class="goals"
        {
            h2 { "Goals" }

            @if progress.is_empty() {
                p
                {
                    "No goals for this month. "
                    a href=(endpoints::NEW_GOAL_VIEW) { "Create one" }
                }
            } @else {
                @for goal in progress {
                    div class="goal-progress"
                    {
                        span class="goal-name"
                        {
                            (goal.name)
                            @if let Some(category_name) = &goal.category_name {
                                " (" (category_name) ")"
                            }
                        }
                        span class="goal-numbers"
                        {
                            (currency(goal.current)) " of " (currency(goal.target))
                        }
                        div class="progress-bar"
                        {
                            div class="progress-fill" style=(format!("width: {:.1}%", goal.percent)) {}
                        }
                        span class="goal-percent" { (format!("{:.1}%", goal.percent)) }
                    }
                }
            }
        }
    }
}
