//! Database initialization for the application's domain models.

use rusqlite::Connection;

use crate::{
    account::create_account_table, category::create_category_table, goal::create_goal_table,
    score::create_score_rule_table, transaction::create_transaction_table, user::create_user_table,
};

/// Create the tables for all of the application's domain models.
///
/// The `CREATE TABLE` statements use `IF NOT EXISTS`, so it is safe to call
/// this function on an existing database.
///
/// # Errors
/// Returns an error if any of the tables cannot be created.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.pragma_update(None, "foreign_keys", true)?;

    create_user_table(connection)?;
    create_account_table(connection)?;
    create_category_table(connection)?;
    create_transaction_table(connection)?;
    create_goal_table(connection)?;
    create_score_rule_table(connection)?;

    Ok(())
}

#[cfg(test)]
mod initialize_tests {
    use rusqlite::Connection;

    use super::initialize;

    #[test]
    fn creates_all_tables() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).expect("could not initialize database");

        let count: i64 = connection
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN
                ('user', 'account', 'category', 'transaction', 'goal', 'score_rule')",
                [],
                |row| row.get(0),
            )
            .unwrap();

        assert_eq!(count, 6);
    }

    #[test]
    fn is_idempotent() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).expect("could not initialize database");
        initialize(&connection).expect("initializing twice should succeed");
    }
}
