//! Defines the goal model and its database queries.

use rusqlite::{
    Connection, Row,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use time::OffsetDateTime;

use crate::{Error, category::CategoryId, database_id::DatabaseId, user::UserID};

/// The ID type for goals.
pub type GoalId = DatabaseId;

/// The metric a goal tracks for its month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalKind {
    /// Keep the month's total expenses under the target.
    MonthlySpendCap,
    /// Save at least the target amount (income minus expenses).
    NetSavings,
    /// Keep one category's month expenses under the target.
    CategorySpendCap,
}

impl GoalKind {
    /// The string stored in the database and used in forms.
    pub fn as_str(self) -> &'static str {
        match self {
            GoalKind::MonthlySpendCap => "monthly-spend-cap",
            GoalKind::NetSavings => "net-savings",
            GoalKind::CategorySpendCap => "category-spend-cap",
        }
    }

    /// The label displayed to users.
    pub fn label(self) -> &'static str {
        match self {
            GoalKind::MonthlySpendCap => "Monthly spending cap",
            GoalKind::NetSavings => "Net savings target",
            GoalKind::CategorySpendCap => "Category spending cap",
        }
    }

    /// Parse the strings produced by [GoalKind::as_str].
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "monthly-spend-cap" => Some(GoalKind::MonthlySpendCap),
            "net-savings" => Some(GoalKind::NetSavings),
            "category-spend-cap" => Some(GoalKind::CategorySpendCap),
            _ => None,
        }
    }

    /// All kinds, for rendering the form select.
    pub fn all() -> [GoalKind; 3] {
        [
            GoalKind::MonthlySpendCap,
            GoalKind::NetSavings,
            GoalKind::CategorySpendCap,
        ]
    }
}

impl ToSql for GoalKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for GoalKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;
        Self::parse(text).ok_or(FromSqlError::InvalidType)
    }
}

/// A monthly target tracked on the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct Goal {
    /// The ID of the goal.
    pub id: GoalId,
    /// The user who owns the goal.
    pub user_id: UserID,
    /// The name displayed on the dashboard.
    pub name: String,
    /// The metric the goal tracks.
    pub kind: GoalKind,
    /// The target amount.
    pub target_amount: f64,
    /// The `YYYY-MM` month the goal applies to, or `None` for every month.
    pub month: Option<String>,
    /// The category for [GoalKind::CategorySpendCap] goals.
    pub category_id: Option<CategoryId>,
    /// When the goal was created.
    pub created_at: OffsetDateTime,
}

/// The data needed to create a goal.
#[derive(Debug, Clone, PartialEq)]
pub struct NewGoal {
    /// The name displayed on the dashboard.
    pub name: String,
    /// The metric the goal tracks.
    pub kind: GoalKind,
    /// The target amount.
    pub target_amount: f64,
    /// The `YYYY-MM` month the goal applies to, or `None` for every month.
    pub month: Option<String>,
    /// The category for [GoalKind::CategorySpendCap] goals.
    pub category_id: Option<CategoryId>,
}

/// A goal together with its category name for display.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalRow {
    /// The goal itself.
    pub goal: Goal,
    /// The name of the goal's category, if it has one.
    pub category_name: Option<String>,
}

/// Create the goal table.
///
/// # Errors
/// Returns an error if the table cannot be created.
pub fn create_goal_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS goal (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                kind TEXT NOT NULL,
                target_amount REAL NOT NULL,
                month TEXT,
                category_id INTEGER,
                created_at TEXT NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE,
                FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE SET NULL
                )",
        (),
    )?;

    Ok(())
}

/// Create a goal for `user_id`.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn create_goal(
    new_goal: NewGoal,
    user_id: UserID,
    connection: &Connection,
) -> Result<Goal, Error> {
    let created_at = OffsetDateTime::now_utc();

    connection.execute(
        "INSERT INTO goal (user_id, name, kind, target_amount, month, category_id, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        (
            user_id.as_i64(),
            &new_goal.name,
            new_goal.kind,
            new_goal.target_amount,
            &new_goal.month,
            new_goal.category_id,
            created_at,
        ),
    )?;

    Ok(Goal {
        id: connection.last_insert_rowid(),
        user_id,
        name: new_goal.name,
        kind: new_goal.kind,
        target_amount: new_goal.target_amount,
        month: new_goal.month,
        category_id: new_goal.category_id,
        created_at,
    })
}

/// Retrieve the goal `goal_id` belonging to `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if the goal does not exist or belongs to another user,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_goal(goal_id: GoalId, user_id: UserID, connection: &Connection) -> Result<Goal, Error> {
    connection
        .prepare(
            "SELECT id, user_id, name, kind, target_amount, month, category_id, created_at
             FROM goal WHERE id = :id AND user_id = :user_id",
        )?
        .query_row(
            &[(":id", &goal_id), (":user_id", &user_id.as_i64())],
            map_goal_row,
        )
        .map_err(|error| error.into())
}

/// Retrieve all of `user_id`'s goals with their category names, ordered by name.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn get_goal_rows(user_id: UserID, connection: &Connection) -> Result<Vec<GoalRow>, Error> {
    connection
        .prepare(
            "SELECT goal.id, goal.user_id, goal.name, goal.kind, goal.target_amount, goal.month,
                    goal.category_id, goal.created_at, category.name
             FROM goal
             LEFT JOIN category ON category.id = goal.category_id
             WHERE goal.user_id = :user_id
             ORDER BY goal.name ASC",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], |row| {
            Ok(GoalRow {
                goal: map_goal_row(row)?,
                category_name: row.get(8)?,
            })
        })?
        .map(|maybe_row| maybe_row.map_err(|error| error.into()))
        .collect()
}

/// Retrieve the goals that apply to the month tagged `month_tag`: goals with
/// a matching month plus goals with no month set.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn get_goals_for_month(
    month_tag: &str,
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<GoalRow>, Error> {
    connection
        .prepare(
            "SELECT goal.id, goal.user_id, goal.name, goal.kind, goal.target_amount, goal.month,
                    goal.category_id, goal.created_at, category.name
             FROM goal
             LEFT JOIN category ON category.id = goal.category_id
             WHERE goal.user_id = :user_id AND (goal.month = :month OR goal.month IS NULL)
             ORDER BY goal.name ASC",
        )?
        .query_map(
            &[
                (":user_id", &user_id.as_i64() as &dyn rusqlite::ToSql),
                (":month", &month_tag),
            ],
            |row| {
                Ok(GoalRow {
                    goal: map_goal_row(row)?,
                    category_name: row.get(8)?,
                })
            },
        )?
        .map(|maybe_row| maybe_row.map_err(|error| error.into()))
        .collect()
}

/// Overwrite the goal `goal_id` belonging to `user_id` with `new_goal`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if the goal does not exist or belongs to another user,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_goal(
    goal_id: GoalId,
    new_goal: NewGoal,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE goal SET name = ?1, kind = ?2, target_amount = ?3, month = ?4, category_id = ?5
         WHERE id = ?6 AND user_id = ?7",
        (
            &new_goal.name,
            new_goal.kind,
            new_goal.target_amount,
            &new_goal.month,
            new_goal.category_id,
            goal_id,
            user_id.as_i64(),
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Delete the goal `goal_id` belonging to `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if the goal does not exist or belongs to another user,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_goal(goal_id: GoalId, user_id: UserID, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM goal WHERE id = ?1 AND user_id = ?2",
        (goal_id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

fn map_goal_row(row: &Row) -> Result<Goal, rusqlite::Error> {
    Ok(Goal {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        name: row.get(2)?,
        kind: row.get(3)?,
        target_amount: row.get(4)?,
        month: row.get(5)?,
        category_id: row.get(6)?,
        created_at: row.get(7)?,
    })
}
