//! The aggregation queries behind the dashboard and score pages.

use std::collections::HashMap;

use rusqlite::Connection;
use time::Date;

use crate::{
    Error,
    category::CategoryId,
    goal::{GoalKind, GoalRow},
    month::MonthWindow,
    transaction::TransactionKind,
    user::UserID,
};

/// Total income and expense for some period. Both values are positive sums.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Totals {
    /// The sum of credit amounts.
    pub income: f64,
    /// The sum of debit amounts.
    pub expense: f64,
}

impl Totals {
    /// Income minus expense.
    pub fn balance(&self) -> f64 {
        self.income - self.expense
    }
}

/// `user_id`'s all-time income and expense totals, via conditional sums.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn all_time_totals(user_id: UserID, connection: &Connection) -> Result<Totals, Error> {
    connection
        .prepare(
            "SELECT COALESCE(SUM(CASE WHEN kind = 'credit' THEN amount ELSE 0 END), 0),
                    COALESCE(SUM(CASE WHEN kind = 'debit' THEN amount ELSE 0 END), 0)
             FROM \"transaction\"
             WHERE user_id = ?1",
        )?
        .query_row([user_id.as_i64()], |row| {
            Ok(Totals {
                income: row.get(0)?,
                expense: row.get(1)?,
            })
        })
        .map_err(|error| error.into())
}

/// `user_id`'s income and expense totals within `window`.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn month_totals(
    window: MonthWindow,
    user_id: UserID,
    connection: &Connection,
) -> Result<Totals, Error> {
    connection
        .prepare(
            "SELECT COALESCE(SUM(CASE WHEN kind = 'credit' THEN amount ELSE 0 END), 0),
                    COALESCE(SUM(CASE WHEN kind = 'debit' THEN amount ELSE 0 END), 0)
             FROM \"transaction\"
             WHERE user_id = ?1 AND date >= ?2 AND date < ?3",
        )?
        .query_row(
            (user_id.as_i64(), window.start, window.next),
            |row| {
                Ok(Totals {
                    income: row.get(0)?,
                    expense: row.get(1)?,
                })
            },
        )
        .map_err(|error| error.into())
}

/// The month's expenses grouped by category: `(category id, name, total)`,
/// largest first. Categories with no spending in the month are omitted.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn month_expense_by_category(
    window: MonthWindow,
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<(CategoryId, String, f64)>, Error> {
    connection
        .prepare(
            "SELECT category.id, category.name, COALESCE(SUM(\"transaction\".amount), 0) AS total
             FROM \"transaction\"
             INNER JOIN category ON category.id = \"transaction\".category_id
             WHERE \"transaction\".user_id = ?1
               AND category.user_id = ?1
               AND \"transaction\".kind = 'debit'
               AND \"transaction\".date >= ?2
               AND \"transaction\".date < ?3
             GROUP BY category.id
             HAVING total > 0
             ORDER BY total DESC, category.name ASC",
        )?
        .query_map((user_id.as_i64(), window.start, window.next), |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?))
        })?
        .map(|maybe_row| maybe_row.map_err(|error| error.into()))
        .collect()
}

/// One point of the daily running-balance series.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyBalancePoint {
    /// The calendar day.
    pub date: Date,
    /// The cumulative signed balance of the month up to and including `date`.
    pub balance: f64,
}

/// The cumulative signed balance for every calendar day of the month,
/// including days with no transactions.
///
/// The series starts at the month's first day and its last value equals the
/// month's income minus its expenses.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn daily_running_balance(
    window: MonthWindow,
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<DailyBalancePoint>, Error> {
    let transactions: Vec<(Date, TransactionKind, f64)> = connection
        .prepare(
            "SELECT date, kind, amount FROM \"transaction\"
             WHERE user_id = ?1 AND date >= ?2 AND date < ?3",
        )?
        .query_map((user_id.as_i64(), window.start, window.next), |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(build_daily_balance_series(window, &transactions))
}

/// Fold per-day signed deltas into a cumulative series covering every day of
/// the month.
fn build_daily_balance_series(
    window: MonthWindow,
    transactions: &[(Date, TransactionKind, f64)],
) -> Vec<DailyBalancePoint> {
    let mut delta_by_day: HashMap<Date, f64> = HashMap::new();

    for (date, kind, amount) in transactions {
        *delta_by_day.entry(*date).or_insert(0.0) += kind.signed(*amount);
    }

    let mut series = Vec::with_capacity(window.day_count() as usize);
    let mut running = 0.0;

    for day in window.days() {
        running += delta_by_day.get(&day).copied().unwrap_or(0.0);
        series.push(DailyBalancePoint {
            date: day,
            balance: running,
        });
    }

    series
}

/// A goal evaluated against the month's aggregates.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalProgress {
    /// The goal's name.
    pub name: String,
    /// The metric the goal tracks.
    pub kind: GoalKind,
    /// The target amount.
    pub target: f64,
    /// The current value of the tracked metric.
    pub current: f64,
    /// `current` as a percentage of `target`, clamped to `[0, 100]`.
    pub percent: f64,
    /// The name of the goal's category, if it has one.
    pub category_name: Option<String>,
}

/// `current` as a percentage of `target`, clamped to `[0, 100]`.
/// Zero when the target is not positive.
pub fn goal_percent(current: f64, target: f64) -> f64 {
    if target > 0.0 {
        (current / target * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    }
}

/// Evaluate each goal's current value against the month's aggregates.
///
/// `expense_by_category` maps category IDs to the month's expense sums, as
/// returned by [month_expense_by_category].
pub fn goal_progress(
    goals: &[GoalRow],
    month_totals: &Totals,
    expense_by_category: &HashMap<CategoryId, f64>,
) -> Vec<GoalProgress> {
    goals
        .iter()
        .map(|row| {
            let current = match row.goal.kind {
                GoalKind::MonthlySpendCap => month_totals.expense,
                GoalKind::NetSavings => month_totals.balance(),
                GoalKind::CategorySpendCap => row
                    .goal
                    .category_id
                    .and_then(|category_id| expense_by_category.get(&category_id))
                    .copied()
                    .unwrap_or(0.0),
            };

            GoalProgress {
                name: row.goal.name.clone(),
                kind: row.goal.kind,
                target: row.goal.target_amount,
                current,
                percent: goal_percent(current, row.goal.target_amount),
                category_name: row.category_name.clone(),
            }
        })
        .collect()
}

#[cfg(test)]
mod aggregation_tests {
    use std::collections::HashMap;

    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        PasswordHash,
        category::create_category,
        db::initialize,
        goal::{Goal, GoalKind, GoalRow},
        month::MonthWindow,
        transaction::{NewTransaction, TransactionKind, create_transaction},
        user::{UserID, create_user},
    };

    use super::{
        all_time_totals, build_daily_balance_series, daily_running_balance, goal_percent,
        goal_progress, month_expense_by_category, month_totals,
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn create_test_user(email: &str, conn: &Connection) -> UserID {
        create_user("Test", email, PasswordHash::new_unchecked("hunter2"), conn)
            .expect("could not create test user")
            .id
    }

    fn insert_transaction(
        amount: f64,
        kind: TransactionKind,
        date: time::Date,
        category_id: Option<i64>,
        user_id: UserID,
        conn: &Connection,
    ) {
        create_transaction(
            NewTransaction {
                description: "test".to_owned(),
                amount,
                kind,
                date,
                category_id,
                account_id: None,
            },
            user_id,
            conn,
        )
        .expect("could not create transaction");
    }

    #[test]
    fn totals_use_conditional_sums() {
        let conn = get_test_connection();
        let user_id = create_test_user("alice@example.com", &conn);
        insert_transaction(100.0, TransactionKind::Credit, date!(2025 - 05 - 01), None, user_id, &conn);
        insert_transaction(40.0, TransactionKind::Debit, date!(2025 - 05 - 02), None, user_id, &conn);
        // Outside the month window.
        insert_transaction(999.0, TransactionKind::Credit, date!(2025 - 04 - 30), None, user_id, &conn);

        let window = MonthWindow::parse("2025-05").unwrap();
        let month = month_totals(window, user_id, &conn).unwrap();
        let all_time = all_time_totals(user_id, &conn).unwrap();

        assert_eq!(month.income, 100.0);
        assert_eq!(month.expense, 40.0);
        assert_eq!(month.balance(), 60.0);
        assert_eq!(all_time.income, 1099.0);
    }

    #[test]
    fn totals_are_scoped_to_the_owner() {
        let conn = get_test_connection();
        let alice = create_test_user("alice@example.com", &conn);
        let bob = create_test_user("bob@example.com", &conn);
        insert_transaction(100.0, TransactionKind::Credit, date!(2025 - 05 - 01), None, alice, &conn);
        insert_transaction(7.0, TransactionKind::Credit, date!(2025 - 05 - 01), None, bob, &conn);

        let totals = all_time_totals(alice, &conn).unwrap();

        assert_eq!(totals.income, 100.0);
    }

    #[test]
    fn category_breakdown_omits_zero_and_sorts_descending() {
        let conn = get_test_connection();
        let user_id = create_test_user("alice@example.com", &conn);
        let groceries = create_category("Groceries", user_id, &conn).unwrap();
        let transport = create_category("Transport", user_id, &conn).unwrap();
        create_category("Unused", user_id, &conn).unwrap();

        insert_transaction(30.0, TransactionKind::Debit, date!(2025 - 05 - 05), Some(groceries.id), user_id, &conn);
        insert_transaction(50.0, TransactionKind::Debit, date!(2025 - 05 - 06), Some(groceries.id), user_id, &conn);
        insert_transaction(20.0, TransactionKind::Debit, date!(2025 - 05 - 07), Some(transport.id), user_id, &conn);
        // Income must not show up in the expense breakdown.
        insert_transaction(500.0, TransactionKind::Credit, date!(2025 - 05 - 08), Some(groceries.id), user_id, &conn);

        let window = MonthWindow::parse("2025-05").unwrap();
        let breakdown = month_expense_by_category(window, user_id, &conn).unwrap();

        assert_eq!(
            breakdown,
            vec![
                (groceries.id, "Groceries".to_owned(), 80.0),
                (transport.id, "Transport".to_owned(), 20.0),
            ]
        );
    }

    #[test]
    fn daily_series_covers_every_day_of_the_month() {
        let conn = get_test_connection();
        let user_id = create_test_user("alice@example.com", &conn);
        insert_transaction(100.0, TransactionKind::Credit, date!(2025 - 02 - 03), None, user_id, &conn);
        insert_transaction(30.0, TransactionKind::Debit, date!(2025 - 02 - 10), None, user_id, &conn);

        let window = MonthWindow::parse("2025-02").unwrap();
        let series = daily_running_balance(window, user_id, &conn).unwrap();

        assert_eq!(series.len(), 28);
        assert_eq!(series[0].date, date!(2025 - 02 - 01));
        assert_eq!(series[0].balance, 0.0);
        assert_eq!(series[2].balance, 100.0);
        assert_eq!(series[9].balance, 70.0);

        let month = month_totals(window, user_id, &conn).unwrap();
        let last = series.last().unwrap();
        assert_eq!(last.balance, month.balance());
    }

    #[test]
    fn daily_series_accumulates_same_day_deltas() {
        let window = MonthWindow::parse("2025-05").unwrap();
        let transactions = [
            (date!(2025 - 05 - 01), TransactionKind::Credit, 10.0),
            (date!(2025 - 05 - 01), TransactionKind::Debit, 4.0),
            (date!(2025 - 05 - 31), TransactionKind::Debit, 1.0),
        ];

        let series = build_daily_balance_series(window, &transactions);

        assert_eq!(series.len(), 31);
        assert_eq!(series[0].balance, 6.0);
        assert_eq!(series[15].balance, 6.0);
        assert_eq!(series[30].balance, 5.0);
    }

    #[test]
    fn goal_percent_is_clamped() {
        assert_eq!(goal_percent(50.0, 100.0), 50.0);
        assert_eq!(goal_percent(150.0, 100.0), 100.0);
        assert_eq!(goal_percent(-10.0, 100.0), 0.0);
        assert_eq!(goal_percent(50.0, 0.0), 0.0);
        assert_eq!(goal_percent(50.0, -10.0), 0.0);
    }

    fn goal_row(kind: GoalKind, target: f64, category_id: Option<i64>) -> GoalRow {
        GoalRow {
            goal: Goal {
                id: 1,
                user_id: UserID::new(1),
                name: "Test goal".to_owned(),
                kind,
                target_amount: target,
                month: None,
                category_id,
                created_at: time::OffsetDateTime::UNIX_EPOCH,
            },
            category_name: category_id.map(|_| "Groceries".to_owned()),
        }
    }

    #[test]
    fn goal_progress_uses_the_right_metric_per_kind() {
        let totals = super::Totals {
            income: 1000.0,
            expense: 400.0,
        };
        let expense_by_category = HashMap::from([(7, 120.0)]);
        let goals = [
            goal_row(GoalKind::MonthlySpendCap, 500.0, None),
            goal_row(GoalKind::NetSavings, 1200.0, None),
            goal_row(GoalKind::CategorySpendCap, 100.0, Some(7)),
            goal_row(GoalKind::CategorySpendCap, 100.0, Some(99)),
        ];

        let progress = goal_progress(&goals, &totals, &expense_by_category);

        assert_eq!(progress[0].current, 400.0);
        assert_eq!(progress[0].percent, 80.0);
        assert_eq!(progress[1].current, 600.0);
        assert_eq!(progress[1].percent, 50.0);
        assert_eq!(progress[2].current, 120.0);
        assert_eq!(progress[2].percent, 100.0);
        assert_eq!(progress[3].current, 0.0, "unknown category counts as zero");
    }
}
