//! Defines the core data models and database queries for transactions.

use rusqlite::{
    Connection, Row,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use time::Date;

use crate::{Error, account::AccountId, category::CategoryId, database_id::DatabaseId, user::UserID};

/// The ID type for transactions.
pub type TransactionId = DatabaseId;

/// Whether a transaction adds money (credit) or removes money (debit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    /// Money earned, e.g. a salary payment.
    Credit,
    /// Money spent, e.g. a supermarket purchase.
    Debit,
}

impl TransactionKind {
    /// The string stored in the database and used in forms and CSV files.
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Credit => "credit",
            TransactionKind::Debit => "debit",
        }
    }

    /// The label displayed to users.
    pub fn label(self) -> &'static str {
        match self {
            TransactionKind::Credit => "Income",
            TransactionKind::Debit => "Expense",
        }
    }

    /// Parse the strings produced by [TransactionKind::as_str].
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "credit" => Some(TransactionKind::Credit),
            "debit" => Some(TransactionKind::Debit),
            _ => None,
        }
    }

    /// Apply the transaction's sign to `amount`: positive for credits,
    /// negative for debits.
    pub fn signed(self, amount: f64) -> f64 {
        match self {
            TransactionKind::Credit => amount,
            TransactionKind::Debit => -amount,
        }
    }
}

impl ToSql for TransactionKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;
        Self::parse(text).ok_or(FromSqlError::InvalidType)
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The user who owns the transaction.
    pub user_id: UserID,
    /// A text description of what the transaction was for.
    pub description: String,
    /// The amount of money spent or earned. Always positive, the direction is
    /// given by `kind`.
    pub amount: f64,
    /// Whether money was earned or spent.
    pub kind: TransactionKind,
    /// When the transaction happened.
    pub date: Date,
    /// The category the transaction belongs to, if any.
    pub category_id: Option<CategoryId>,
    /// The account the transaction was made against, if any.
    pub account_id: Option<AccountId>,
}

/// The data needed to create a transaction.
///
/// `category_id` and `account_id` must already be validated as belonging to
/// the owner, e.g. via [crate::category::get_category].
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// A text description of what the transaction was for.
    pub description: String,
    /// The amount of money spent or earned. Must be positive.
    pub amount: f64,
    /// Whether money was earned or spent.
    pub kind: TransactionKind,
    /// When the transaction happened.
    pub date: Date,
    /// The category the transaction belongs to, if any.
    pub category_id: Option<CategoryId>,
    /// The account the transaction was made against, if any.
    pub account_id: Option<AccountId>,
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                description TEXT NOT NULL,
                amount REAL NOT NULL,
                kind TEXT NOT NULL,
                date TEXT NOT NULL,
                category_id INTEGER,
                account_id INTEGER,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE,
                FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE SET NULL,
                FOREIGN KEY(account_id) REFERENCES account(id) ON UPDATE CASCADE ON DELETE SET NULL
                )",
        (),
    )?;

    // Covers the list page ordering and the month-window aggregation queries.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_user_date ON \"transaction\"(user_id, date)",
        (),
    )?;

    Ok(())
}

/// Create a new transaction owned by `user_id`.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error,
/// e.g. a category or account ID that does not exist.
pub fn create_transaction(
    new_transaction: NewTransaction,
    user_id: UserID,
    connection: &Connection,
) -> Result<Transaction, Error> {
    connection.execute(
        "INSERT INTO \"transaction\" (user_id, description, amount, kind, date, category_id, account_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        (
            user_id.as_i64(),
            &new_transaction.description,
            new_transaction.amount,
            new_transaction.kind,
            new_transaction.date,
            new_transaction.category_id,
            new_transaction.account_id,
        ),
    )?;

    Ok(Transaction {
        id: connection.last_insert_rowid(),
        user_id,
        description: new_transaction.description,
        amount: new_transaction.amount,
        kind: new_transaction.kind,
        date: new_transaction.date,
        category_id: new_transaction.category_id,
        account_id: new_transaction.account_id,
    })
}

/// Retrieve the transaction `transaction_id` belonging to `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if the transaction does not exist or belongs to another user,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_transaction(
    transaction_id: TransactionId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Transaction, Error> {
    connection
        .prepare(
            "SELECT id, user_id, description, amount, kind, date, category_id, account_id
             FROM \"transaction\" WHERE id = :id AND user_id = :user_id",
        )?
        .query_row(
            &[(":id", &transaction_id), (":user_id", &user_id.as_i64())],
            map_transaction_row,
        )
        .map_err(|error| error.into())
}

/// Overwrite the transaction `transaction_id` belonging to `user_id` with
/// `new_transaction`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if the transaction does not exist or belongs to another user,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_transaction(
    transaction_id: TransactionId,
    new_transaction: NewTransaction,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE \"transaction\"
         SET description = ?1, amount = ?2, kind = ?3, date = ?4, category_id = ?5, account_id = ?6
         WHERE id = ?7 AND user_id = ?8",
        (
            &new_transaction.description,
            new_transaction.amount,
            new_transaction.kind,
            new_transaction.date,
            new_transaction.category_id,
            new_transaction.account_id,
            transaction_id,
            user_id.as_i64(),
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Delete the transaction `transaction_id` belonging to `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if the transaction does not exist or belongs to another user,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_transaction(
    transaction_id: TransactionId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM \"transaction\" WHERE id = ?1 AND user_id = ?2",
        (transaction_id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Map a database row to a [Transaction].
///
/// Expects the columns in the order they were defined in the table.
pub(crate) fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        description: row.get(2)?,
        amount: row.get(3)?,
        kind: row.get(4)?,
        date: row.get(5)?,
        category_id: row.get(6)?,
        account_id: row.get(7)?,
    })
}

#[cfg(test)]
mod transaction_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error, PasswordHash,
        db::initialize,
        user::{UserID, create_user},
    };

    use super::{
        NewTransaction, TransactionKind, create_transaction, delete_transaction, get_transaction,
        update_transaction,
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

    fn new_test_transaction(amount: f64, kind: TransactionKind) -> NewTransaction {
        NewTransaction {
            description: "Test transaction".to_owned(),
            amount,
            kind,
            date: date!(2025 - 05 - 10),
            category_id: None,
            account_id: None,
        }
    }

    #[test]
    fn create_and_get_round_trips() {
        let conn = get_test_connection();
        let user_id = create_test_user("alice@example.com", &conn);

        let transaction = create_transaction(
            new_test_transaction(12.34, TransactionKind::Credit),
            user_id,
            &conn,
        )
        .expect("could not create transaction");

        let got = get_transaction(transaction.id, user_id, &conn).unwrap();
        assert_eq!(got, transaction);
        assert_eq!(got.kind, TransactionKind::Credit);
    }

    #[test]
    fn get_does_not_leak_other_users_rows() {
        let conn = get_test_connection();
        let alice = create_test_user("alice@example.com", &conn);
        let bob = create_test_user("bob@example.com", &conn);
        let transaction =
            create_transaction(new_test_transaction(5.0, TransactionKind::Debit), alice, &conn)
                .unwrap();

        assert_eq!(
            get_transaction(transaction.id, bob, &conn),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn update_overwrites_fields() {
        let conn = get_test_connection();
        let user_id = create_test_user("alice@example.com", &conn);
        let transaction = create_transaction(
            new_test_transaction(5.0, TransactionKind::Debit),
            user_id,
            &conn,
        )
        .unwrap();

        let updated = NewTransaction {
            description: "Updated".to_owned(),
            amount: 99.99,
            kind: TransactionKind::Credit,
            date: date!(2025 - 06 - 01),
            category_id: None,
            account_id: None,
        };
        update_transaction(transaction.id, updated.clone(), user_id, &conn).unwrap();

        let got = get_transaction(transaction.id, user_id, &conn).unwrap();
        assert_eq!(got.description, updated.description);
        assert_eq!(got.amount, updated.amount);
        assert_eq!(got.kind, updated.kind);
        assert_eq!(got.date, updated.date);
    }

    #[test]
    fn update_other_users_row_returns_not_found() {
        let conn = get_test_connection();
        let alice = create_test_user("alice@example.com", &conn);
        let bob = create_test_user("bob@example.com", &conn);
        let transaction =
            create_transaction(new_test_transaction(5.0, TransactionKind::Debit), alice, &conn)
                .unwrap();

        let result = update_transaction(
            transaction.id,
            new_test_transaction(1.0, TransactionKind::Debit),
            bob,
            &conn,
        );

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn delete_removes_row() {
        let conn = get_test_connection();
        let user_id = create_test_user("alice@example.com", &conn);
        let transaction = create_transaction(
            new_test_transaction(5.0, TransactionKind::Debit),
            user_id,
            &conn,
        )
        .unwrap();

        delete_transaction(transaction.id, user_id, &conn).unwrap();

        assert_eq!(
            get_transaction(transaction.id, user_id, &conn),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn delete_other_users_row_returns_not_found() {
        let conn = get_test_connection();
        let alice = create_test_user("alice@example.com", &conn);
        let bob = create_test_user("bob@example.com", &conn);
        let transaction =
            create_transaction(new_test_transaction(5.0, TransactionKind::Debit), alice, &conn)
                .unwrap();

        assert_eq!(
            delete_transaction(transaction.id, bob, &conn),
            Err(Error::NotFound)
        );
        assert!(get_transaction(transaction.id, alice, &conn).is_ok());
    }

    #[test]
    fn signed_applies_direction() {
        assert_eq!(TransactionKind::Credit.signed(10.0), 10.0);
        assert_eq!(TransactionKind::Debit.signed(10.0), -10.0);
    }

    #[test]
    fn kind_parse_round_trips() {
        assert_eq!(
            TransactionKind::parse(TransactionKind::Credit.as_str()),
            Some(TransactionKind::Credit)
        );
        assert_eq!(
            TransactionKind::parse(TransactionKind::Debit.as_str()),
            Some(TransactionKind::Debit)
        );
        assert_eq!(TransactionKind::parse("transfer"), None);
    }
}
