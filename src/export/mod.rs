//! Exporting a month's transactions as CSV, Excel-flavoured CSV, or PDF.

mod csv;
mod endpoints;
mod pdf;

pub use self::csv::write_transactions_csv;
pub use self::endpoints::{get_export_csv, get_export_excel, get_export_pdf};
pub use self::pdf::render_transactions_pdf;

use rusqlite::Connection;
use time::Date;

use crate::{Error, month::MonthWindow, transaction::TransactionKind, user::UserID};

/// One exported transaction with its category and account names resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRow {
    /// When the transaction happened.
    pub date: Date,
    /// A text description of what the transaction was for.
    pub description: String,
    /// Whether money was earned or spent.
    pub kind: TransactionKind,
    /// The name of the transaction's category, if it has one.
    pub category: Option<String>,
    /// The name of the transaction's account, if it has one.
    pub account: Option<String>,
    /// The amount of money spent or earned.
    pub amount: f64,
}

/// `user_id`'s transactions within `window` with joined category and account
/// names, oldest first.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn month_transactions(
    window: MonthWindow,
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<ExportRow>, Error> {
    connection
        .prepare(
            "SELECT \"transaction\".date, \"transaction\".description, \"transaction\".kind,
                    category.name, account.name, \"transaction\".amount
             FROM \"transaction\"
             LEFT JOIN category ON category.id = \"transaction\".category_id
             LEFT JOIN account ON account.id = \"transaction\".account_id
             WHERE \"transaction\".user_id = ?1
               AND \"transaction\".date >= ?2
               AND \"transaction\".date < ?3
             ORDER BY \"transaction\".date ASC, \"transaction\".id ASC",
        )?
        .query_map((user_id.as_i64(), window.start, window.next), |row| {
            Ok(ExportRow {
                date: row.get(0)?,
                description: row.get(1)?,
                kind: row.get(2)?,
                category: row.get(3)?,
                account: row.get(4)?,
                amount: row.get(5)?,
            })
        })?
        .map(|maybe_row| maybe_row.map_err(|error| error.into()))
        .collect()
}

#[cfg(test)]
mod month_transactions_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        PasswordHash,
        category::create_category,
        db::initialize,
        month::MonthWindow,
        transaction::{NewTransaction, TransactionKind, create_transaction},
        user::{UserID, create_user},
    };

    use super::month_transactions;

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
    fn returns_month_rows_oldest_first_with_names() {
        let conn = get_test_connection();
        let user_id = create_test_user("alice@example.com", &conn);
        let category = create_category("Food", user_id, &conn).unwrap();

        for (day, amount) in [(15, 20.0), (2, 10.0)] {
            create_transaction(
                NewTransaction {
                    description: format!("day {day}"),
                    amount,
                    kind: TransactionKind::Debit,
                    date: date!(2025 - 05 - 01).replace_day(day).unwrap(),
                    category_id: Some(category.id),
                    account_id: None,
                },
                user_id,
                &conn,
            )
            .unwrap();
        }
        // Outside the window.
        create_transaction(
            NewTransaction {
                description: "June".to_owned(),
                amount: 1.0,
                kind: TransactionKind::Debit,
                date: date!(2025 - 06 - 01),
                category_id: None,
                account_id: None,
            },
            user_id,
            &conn,
        )
        .unwrap();

        let window = MonthWindow::parse("2025-05").unwrap();
        let rows = month_transactions(window, user_id, &conn).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date, date!(2025 - 05 - 02));
        assert_eq!(rows[1].date, date!(2025 - 05 - 15));
        assert_eq!(rows[0].category.as_deref(), Some("Food"));
        assert_eq!(rows[0].account, None);
    }
}
