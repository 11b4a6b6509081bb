//! Defines the score rule model, its database queries, and the monthly
//! spending classification.

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{Error, category::CategoryId, database_id::DatabaseId, user::UserID};

/// The ID type for score rules.
pub type ScoreRuleId = DatabaseId;

/// A per-category monthly spending limit.
///
/// `warning_pct` is the fraction of the limit (e.g. 0.80 for 80%) at which
/// the category's status turns from ok to warning.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreRule {
    /// The ID of the rule.
    pub id: ScoreRuleId,
    /// The user who owns the rule.
    pub user_id: UserID,
    /// The category the rule applies to. One rule per category per owner.
    pub category_id: CategoryId,
    /// The monthly spending limit.
    pub monthly_limit: f64,
    /// The fraction of the limit at which the status becomes a warning.
    pub warning_pct: f64,
    /// Inactive rules are kept but not shown on the score page.
    pub active: bool,
    /// When the rule was created.
    pub created_at: OffsetDateTime,
    /// When the rule was last changed.
    pub updated_at: OffsetDateTime,
}

/// How a category's month spending compares to its rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreStatus {
    /// Spending is comfortably under the limit.
    Ok,
    /// Spending has reached the warning threshold.
    Warning,
    /// Spending exceeds the limit.
    OverLimit,
}

impl ScoreStatus {
    /// The label displayed to users.
    pub fn label(self) -> &'static str {
        match self {
            ScoreStatus::Ok => "ok",
            ScoreStatus::Warning => "warning",
            ScoreStatus::OverLimit => "over limit",
        }
    }

    /// The CSS class used to colour the status badge.
    pub fn css_class(self) -> &'static str {
        match self {
            ScoreStatus::Ok => "status-ok",
            ScoreStatus::Warning => "status-warning",
            ScoreStatus::OverLimit => "status-over-limit",
        }
    }
}

/// Compare a month's spending against a rule's limit.
///
/// Returns the spent/limit ratio (0 when the limit is not positive) and the
/// status: over the limit, at or past the warning threshold, or ok. The
/// warning boundary is inclusive, so spending exactly at the threshold is
/// already a warning.
pub fn classify_spending(spent: f64, limit: f64, warning_pct: f64) -> (f64, ScoreStatus) {
    let ratio = if limit > 0.0 { spent / limit } else { 0.0 };

    let status = if ratio > 1.0 {
        ScoreStatus::OverLimit
    } else if ratio >= warning_pct {
        ScoreStatus::Warning
    } else {
        ScoreStatus::Ok
    };

    (ratio, status)
}

/// Create the score rule table.
///
/// # Errors
/// Returns an error if the table cannot be created.
pub fn create_score_rule_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS score_rule (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                category_id INTEGER NOT NULL,
                monthly_limit REAL NOT NULL,
                warning_pct REAL NOT NULL DEFAULT 0.80,
                active INTEGER NOT NULL DEFAULT 1,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE,
                FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE CASCADE,
                UNIQUE(user_id, category_id)
                )",
        (),
    )?;

    Ok(())
}

/// Create a rule for `category_id`, or update and re-activate the existing
/// one. There is at most one rule per (owner, category).
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error,
/// e.g. a category ID that does not exist.
pub fn upsert_score_rule(
    category_id: CategoryId,
    monthly_limit: f64,
    warning_pct: f64,
    user_id: UserID,
    connection: &Connection,
) -> Result<ScoreRule, Error> {
    let now = OffsetDateTime::now_utc();

    connection.execute(
        "INSERT INTO score_rule (user_id, category_id, monthly_limit, warning_pct, active, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, 1, ?5, ?5)
         ON CONFLICT(user_id, category_id) DO UPDATE SET
            monthly_limit = excluded.monthly_limit,
            warning_pct = excluded.warning_pct,
            active = 1,
            updated_at = excluded.updated_at",
        (user_id.as_i64(), category_id, monthly_limit, warning_pct, now),
    )?;

    connection
        .prepare(
            "SELECT id, user_id, category_id, monthly_limit, warning_pct, active, created_at, updated_at
             FROM score_rule WHERE user_id = :user_id AND category_id = :category_id",
        )?
        .query_row(
            &[(":user_id", &user_id.as_i64()), (":category_id", &category_id)],
            map_score_rule_row,
        )
        .map_err(|error| error.into())
}

/// Retrieve the rule `rule_id` belonging to `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if the rule does not exist or belongs to another user,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_score_rule(
    rule_id: ScoreRuleId,
    user_id: UserID,
    connection: &Connection,
) -> Result<ScoreRule, Error> {
    connection
        .prepare(
            "SELECT id, user_id, category_id, monthly_limit, warning_pct, active, created_at, updated_at
             FROM score_rule WHERE id = :id AND user_id = :user_id",
        )?
        .query_row(
            &[(":id", &rule_id), (":user_id", &user_id.as_i64())],
            map_score_rule_row,
        )
        .map_err(|error| error.into())
}

/// Retrieve `user_id`'s active rules with their category names, ordered by
/// category name.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn get_active_rules_with_categories(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<(ScoreRule, String)>, Error> {
    connection
        .prepare(
            "SELECT score_rule.id, score_rule.user_id, score_rule.category_id,
                    score_rule.monthly_limit, score_rule.warning_pct, score_rule.active,
                    score_rule.created_at, score_rule.updated_at, category.name
             FROM score_rule
             INNER JOIN category ON category.id = score_rule.category_id
             WHERE score_rule.user_id = :user_id AND score_rule.active = 1
             ORDER BY category.name ASC",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], |row| {
            Ok((map_score_rule_row(row)?, row.get(8)?))
        })?
        .map(|maybe_row| maybe_row.map_err(|error| error.into()))
        .collect()
}

/// Update the limit and warning threshold of the rule `rule_id` belonging to
/// `user_id`, re-activating it.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if the rule does not exist or belongs to another user,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_score_rule(
    rule_id: ScoreRuleId,
    monthly_limit: f64,
    warning_pct: f64,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE score_rule SET monthly_limit = ?1, warning_pct = ?2, active = 1, updated_at = ?3
         WHERE id = ?4 AND user_id = ?5",
        (
            monthly_limit,
            warning_pct,
            OffsetDateTime::now_utc(),
            rule_id,
            user_id.as_i64(),
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Delete the rule `rule_id` belonging to `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if the rule does not exist or belongs to another user,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_score_rule(
    rule_id: ScoreRuleId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM score_rule WHERE id = ?1 AND user_id = ?2",
        (rule_id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

fn map_score_rule_row(row: &Row) -> Result<ScoreRule, rusqlite::Error> {
    Ok(ScoreRule {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        category_id: row.get(2)?,
        monthly_limit: row.get(3)?,
        warning_pct: row.get(4)?,
        active: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}


#[cfg(test)]
mod score_rule_db_tests {
    use rusqlite::Connection;

    use crate::{
        Error, PasswordHash,
        category::create_category,
        db::initialize,
        user::{UserID, create_user},
    };

    use super::{
        delete_score_rule, get_active_rules_with_categories, get_score_rule, update_score_rule,
        upsert_score_rule,
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

    #[test]
    fn upsert_creates_then_updates() {
        let conn = get_test_connection();
        let user_id = create_test_user("alice@example.com", &conn);
        let category = create_category("Groceries", user_id, &conn).unwrap();

        let created = upsert_score_rule(category.id, 100.0, 0.80, user_id, &conn).unwrap();
        assert_eq!(created.monthly_limit, 100.0);
        assert!(created.active);

        let updated = upsert_score_rule(category.id, 250.0, 0.90, user_id, &conn).unwrap();
        assert_eq!(updated.id, created.id, "upsert must not create a second rule");
        assert_eq!(updated.monthly_limit, 250.0);
        assert_eq!(updated.warning_pct, 0.90);
    }

    #[test]
    fn get_rule_does_not_leak_other_users_rows() {
        let conn = get_test_connection();
        let alice = create_test_user("alice@example.com", &conn);
        let bob = create_test_user("bob@example.com", &conn);
        let category = create_category("Groceries", alice, &conn).unwrap();
        let rule = upsert_score_rule(category.id, 100.0, 0.80, alice, &conn).unwrap();

        assert_eq!(get_score_rule(rule.id, bob, &conn), Err(Error::NotFound));
    }

    #[test]
    fn active_rules_are_sorted_by_category_name() {
        let conn = get_test_connection();
        let user_id = create_test_user("alice@example.com", &conn);
        let transport = create_category("Transport", user_id, &conn).unwrap();
        let groceries = create_category("Groceries", user_id, &conn).unwrap();
        upsert_score_rule(transport.id, 50.0, 0.80, user_id, &conn).unwrap();
        upsert_score_rule(groceries.id, 100.0, 0.80, user_id, &conn).unwrap();

        let rules = get_active_rules_with_categories(user_id, &conn).unwrap();

        let names: Vec<_> = rules.iter().map(|(_, name)| name.as_str()).collect();
        assert_eq!(names, ["Groceries", "Transport"]);
    }

    #[test]
    fn update_rule_changes_limit() {
        let conn = get_test_connection();
        let user_id = create_test_user("alice@example.com", &conn);
        let category = create_category("Groceries", user_id, &conn).unwrap();
        let rule = upsert_score_rule(category.id, 100.0, 0.80, user_id, &conn).unwrap();

        update_score_rule(rule.id, 300.0, 0.75, user_id, &conn).unwrap();

        let got = get_score_rule(rule.id, user_id, &conn).unwrap();
        assert_eq!(got.monthly_limit, 300.0);
        assert_eq!(got.warning_pct, 0.75);
    }

    #[test]
    fn delete_missing_rule_returns_not_found() {
        let conn = get_test_connection();
        let user_id = create_test_user("alice@example.com", &conn);

        assert_eq!(
            delete_score_rule(999, user_id, &conn),
            Err(Error::NotFound)
        );
    }
}
