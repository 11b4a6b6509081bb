//! The dashboard: month-scoped aggregation of transactions, goal progress,
//! and the charts built from them.
//!
//! All aggregation is read-only and recomputed per request.

mod aggregation;
mod charts;
mod handlers;

pub use aggregation::{
    DailyBalancePoint, GoalProgress, Totals, all_time_totals, daily_running_balance, goal_percent,
    goal_progress, month_expense_by_category, month_totals,
};
pub use handlers::get_dashboard_page;
