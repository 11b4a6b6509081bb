//! The CSV import endpoint: parse the upload, then insert every good row in
//! one database transaction.

use axum::{
    Extension,
    extract::{Multipart, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::PrivateCookieJar;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    account::get_or_create_account,
    category::get_or_create_category,
    csv_import::csv::{ImportRow, parse_transactions_csv},
    endpoints,
    flash::{Flash, set_flash},
    transaction::{NewTransaction, create_transaction},
    user::UserID,
};

/// Handle a CSV upload.
///
/// Every row that parsed is inserted in a single database transaction;
/// categories and accounts named in the file are created for the owner when
/// missing. If anything fails at the database level the whole import is
/// rolled back.
pub async fn import_transactions_endpoint(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserID>,
    jar: PrivateCookieJar,
    mut multipart: Multipart,
) -> Response {
    let flash_and_redirect = |jar: PrivateCookieJar, flash: Flash, target: &str| {
        (set_flash(jar, flash), Redirect::to(target)).into_response()
    };

    let mut csv_text = None;

    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                if field.file_name().is_none() {
                    continue;
                }

                match field.text().await {
                    Ok(text) => {
                        csv_text = Some(text);
                        break;
                    }
                    Err(error) => {
                        return Error::MultipartError(error.to_string()).into_response();
                    }
                }
            }
            Ok(None) => break,
            Err(error) => return Error::MultipartError(error.to_string()).into_response(),
        }
    }

    let csv_text = match csv_text {
        Some(text) if !text.trim().is_empty() => text,
        _ => {
            return flash_and_redirect(
                jar,
                Flash::error("Choose a CSV file to import."),
                endpoints::IMPORT_VIEW,
            );
        }
    };

    let parsed = match parse_transactions_csv(&csv_text) {
        Ok(parsed) => parsed,
        Err(Error::InvalidCsv(message)) => {
            return flash_and_redirect(
                jar,
                Flash::error(format!("Could not import the file: {message}.")),
                endpoints::IMPORT_VIEW,
            );
        }
        Err(error) => return error.into_response(),
    };

    for message in &parsed.errors {
        tracing::warn!("CSV import row skipped: {message}");
    }

    let import_result = {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(_) => return Error::DatabaseLockError.into_response(),
        };

        let transaction = match connection.unchecked_transaction() {
            Ok(transaction) => transaction,
            Err(error) => {
                tracing::error!("could not start import transaction: {error}");
                return flash_and_redirect(
                    jar,
                    Flash::error("Import failed, no rows were imported."),
                    endpoints::IMPORT_VIEW,
                );
            }
        };

        import_rows(parsed.rows, user_id, &transaction).and_then(|imported| {
            transaction.commit()?;
            Ok(imported)
        })
    };

    match import_result {
        Ok(imported) => flash_and_redirect(
            jar,
            Flash::success(format!(
                "{imported} transactions imported! ({} skipped)",
                parsed.skipped
            )),
            endpoints::TRANSACTIONS_VIEW,
        ),
        Err(error) => {
            tracing::error!("CSV import failed, rolling back: {error}");
            flash_and_redirect(
                jar,
                Flash::error("Import failed, no rows were imported."),
                endpoints::IMPORT_VIEW,
            )
        }
    }
}

/// Insert the parsed rows, resolving category and account names per owner.
///
/// # Errors
/// Returns the first database error; the caller owns the transaction and
/// must roll back.
fn import_rows(
    rows: Vec<ImportRow>,
    user_id: UserID,
    connection: &Connection,
) -> Result<usize, Error> {
    let mut imported = 0;

    for row in rows {
        let category_id = match &row.category {
            Some(name) => Some(get_or_create_category(name, user_id, connection)?.id),
            None => None,
        };
        let account_id = match &row.account {
            Some(name) => Some(get_or_create_account(name, user_id, connection)?.id),
            None => None,
        };

        create_transaction(
            NewTransaction {
                description: row.description,
                amount: row.amount,
                kind: row.kind,
                date: row.date,
                category_id,
                account_id,
            },
            user_id,
            connection,
        )?;

        imported += 1;
    }

    Ok(imported)
}

#[cfg(test)]
mod import_rows_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        PasswordHash,
        account::get_accounts,
        category::get_categories,
        csv_import::csv::ImportRow,
        db::initialize,
        transaction::{TransactionFilter, TransactionKind, query_transactions},
        user::{UserID, create_user},
    };

    use super::import_rows;

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
    fn imports_rows_and_auto_creates_names() {
        let conn = get_test_connection();
        let user_id = create_test_user("alice@example.com", &conn);

        let rows = vec![
            ImportRow {
                date: date!(2025 - 05 - 01),
                description: "Salary".to_owned(),
                kind: TransactionKind::Credit,
                amount: 2500.0,
                category: None,
                account: Some("Bank".to_owned()),
            },
            ImportRow {
                date: date!(2025 - 05 - 02),
                description: "Groceries".to_owned(),
                kind: TransactionKind::Debit,
                amount: 80.0,
                category: Some("Food".to_owned()),
                account: Some("Bank".to_owned()),
            },
        ];

        let imported = import_rows(rows, user_id, &conn).unwrap();

        assert_eq!(imported, 2);
        assert_eq!(get_categories(user_id, &conn).unwrap().len(), 1);
        assert_eq!(
            get_accounts(user_id, &conn).unwrap().len(),
            1,
            "the two rows must share one Bank account"
        );

        let page = query_transactions(&TransactionFilter::default(), 1, 10, user_id, &conn).unwrap();
        assert_eq!(page.total_count, 2);
    }

    #[test]
    fn rollback_leaves_no_partial_import() {
        let conn = get_test_connection();
        let user_id = create_test_user("alice@example.com", &conn);

        let transaction = conn.unchecked_transaction().unwrap();
        let rows = vec![ImportRow {
            date: date!(2025 - 05 - 01),
            description: "Salary".to_owned(),
            kind: TransactionKind::Credit,
            amount: 2500.0,
            category: Some("Income".to_owned()),
            account: None,
        }];
        import_rows(rows, user_id, &transaction).unwrap();
        drop(transaction); // rolls back

        let page = query_transactions(&TransactionFilter::default(), 1, 10, user_id, &conn).unwrap();
        assert_eq!(page.total_count, 0);
        assert!(get_categories(user_id, &conn).unwrap().is_empty());
    }
}
