//! The filtered, paginated query behind the transactions page.

use rusqlite::{Connection, ToSql};
use time::Date;

use crate::{
    Error,
    account::AccountId,
    category::CategoryId,
    transaction::core::{Transaction, TransactionKind, map_transaction_row},
    user::UserID,
};

/// The filter combination supported by the transactions page.
///
/// Every field is optional; `None` means "do not filter on this field".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    /// Only include transactions of this kind.
    pub kind: Option<TransactionKind>,
    /// Only include transactions in this category.
    pub category_id: Option<CategoryId>,
    /// Only include transactions against this account.
    pub account_id: Option<AccountId>,
    /// Only include transactions on or after this date.
    pub start_date: Option<Date>,
    /// Only include transactions on or before this date.
    pub end_date: Option<Date>,
    /// Only include transactions with at least this amount.
    pub min_amount: Option<f64>,
    /// Only include transactions with at most this amount.
    pub max_amount: Option<f64>,
}

impl TransactionFilter {
    /// The `WHERE` clauses and bound parameters for this filter, excluding
    /// the owner clause which is always present.
    fn clauses_and_params(&self) -> (Vec<&'static str>, Vec<Box<dyn ToSql>>) {
        let mut clauses = Vec::new();
        let mut params: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(kind) = self.kind {
            clauses.push("\"transaction\".kind = ?");
            params.push(Box::new(kind.as_str()));
        }

        if let Some(category_id) = self.category_id {
            clauses.push("\"transaction\".category_id = ?");
            params.push(Box::new(category_id));
        }

        if let Some(account_id) = self.account_id {
            clauses.push("\"transaction\".account_id = ?");
            params.push(Box::new(account_id));
        }

        if let Some(start_date) = self.start_date {
            clauses.push("\"transaction\".date >= ?");
            params.push(Box::new(start_date));
        }

        if let Some(end_date) = self.end_date {
            // Inclusive end date: compare against the start of the next day.
            clauses.push("\"transaction\".date < ?");
            params.push(Box::new(end_date.next_day().unwrap_or(end_date)));
        }

        if let Some(min_amount) = self.min_amount {
            clauses.push("\"transaction\".amount >= ?");
            params.push(Box::new(min_amount));
        }

        if let Some(max_amount) = self.max_amount {
            clauses.push("\"transaction\".amount <= ?");
            params.push(Box::new(max_amount));
        }

        (clauses, params)
    }
}

/// A transaction together with its category and account names for display.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRow {
    /// The transaction itself.
    pub transaction: Transaction,
    /// The name of the transaction's category, if it has one.
    pub category_name: Option<String>,
    /// The name of the transaction's account, if it has one.
    pub account_name: Option<String>,
}

/// One page of filtered transactions.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionPageData {
    /// The transactions on this page, ordered by date descending.
    pub rows: Vec<TransactionRow>,
    /// The 1-based page number, clamped to the available pages.
    pub page: u64,
    /// The total number of pages. At least 1, even with no results.
    pub page_count: u64,
    /// The total number of transactions matching the filter.
    pub total_count: u64,
}

/// Query one page of `user_id`'s transactions matching `filter`, ordered by
/// date descending and then by ID descending so that the newest entries come
/// first.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn query_transactions(
    filter: &TransactionFilter,
    page: u64,
    page_size: u64,
    user_id: UserID,
    connection: &Connection,
) -> Result<TransactionPageData, Error> {
    let (clauses, _) = filter.clauses_and_params();
    let where_clause = if clauses.is_empty() {
        String::new()
    } else {
        format!(" AND {}", clauses.join(" AND "))
    };

    let total_count: u64 = {
        let (_, params) = filter.clauses_and_params();
        let mut count_params: Vec<Box<dyn ToSql>> = vec![Box::new(user_id.as_i64())];
        count_params.extend(params);
        let param_refs: Vec<&dyn ToSql> = count_params.iter().map(|param| param.as_ref()).collect();

        connection
            .prepare(&format!(
                "SELECT COUNT(*) FROM \"transaction\" WHERE user_id = ?{where_clause}"
            ))?
            .query_row(&param_refs[..], |row| row.get::<_, i64>(0))? as u64
    };

    let page_size = page_size.max(1);
    let page_count = total_count.div_ceil(page_size).max(1);
    let page = page.clamp(1, page_count);
    let offset = (page - 1) * page_size;

    let (_, params) = filter.clauses_and_params();
    let mut select_params: Vec<Box<dyn ToSql>> = vec![Box::new(user_id.as_i64())];
    select_params.extend(params);
    select_params.push(Box::new(page_size as i64));
    select_params.push(Box::new(offset as i64));
    let param_refs: Vec<&dyn ToSql> = select_params.iter().map(|param| param.as_ref()).collect();

    let rows = connection
        .prepare(&format!(
            "SELECT \"transaction\".id, \"transaction\".user_id, \"transaction\".description,
                    \"transaction\".amount, \"transaction\".kind, \"transaction\".date,
                    \"transaction\".category_id, \"transaction\".account_id,
                    category.name, account.name
             FROM \"transaction\"
             LEFT JOIN category ON category.id = \"transaction\".category_id
             LEFT JOIN account ON account.id = \"transaction\".account_id
             WHERE \"transaction\".user_id = ?{where_clause}
             ORDER BY \"transaction\".date DESC, \"transaction\".id DESC
             LIMIT ? OFFSET ?"
        ))?
        .query_map(&param_refs[..], |row| {
            Ok(TransactionRow {
                transaction: map_transaction_row(row)?,
                category_name: row.get(8)?,
                account_name: row.get(9)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(TransactionPageData {
        rows,
        page,
        page_count,
        total_count,
    })
}

#[cfg(test)]
mod query_transactions_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        PasswordHash,
        account::create_account,
        category::create_category,
        db::initialize,
        transaction::{NewTransaction, TransactionKind, create_transaction},
        user::{UserID, create_user},
    };

    use super::{TransactionFilter, query_transactions};

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
        user_id: UserID,
        conn: &Connection,
    ) {
        create_transaction(
            NewTransaction {
                description: format!("{} {amount}", kind.as_str()),
                amount,
                kind,
                date,
                category_id: None,
                account_id: None,
            },
            user_id,
            conn,
        )
        .expect("could not create transaction");
    }

    #[test]
    fn returns_only_own_rows_newest_first() {
        let conn = get_test_connection();
        let alice = create_test_user("alice@example.com", &conn);
        let bob = create_test_user("bob@example.com", &conn);

        insert_transaction(1.0, TransactionKind::Debit, date!(2025 - 05 - 01), alice, &conn);
        insert_transaction(2.0, TransactionKind::Debit, date!(2025 - 05 - 03), alice, &conn);
        insert_transaction(3.0, TransactionKind::Debit, date!(2025 - 05 - 02), bob, &conn);

        let page = query_transactions(&TransactionFilter::default(), 1, 10, alice, &conn).unwrap();

        assert_eq!(page.total_count, 2);
        assert_eq!(page.rows.len(), 2);
        assert!(page.rows.iter().all(|row| row.transaction.user_id == alice));
        assert_eq!(page.rows[0].transaction.date, date!(2025 - 05 - 03));
        assert_eq!(page.rows[1].transaction.date, date!(2025 - 05 - 01));
    }

    #[test]
    fn filters_by_kind() {
        let conn = get_test_connection();
        let user_id = create_test_user("alice@example.com", &conn);
        insert_transaction(1.0, TransactionKind::Credit, date!(2025 - 05 - 01), user_id, &conn);
        insert_transaction(2.0, TransactionKind::Debit, date!(2025 - 05 - 02), user_id, &conn);

        let filter = TransactionFilter {
            kind: Some(TransactionKind::Credit),
            ..Default::default()
        };
        let page = query_transactions(&filter, 1, 10, user_id, &conn).unwrap();

        assert_eq!(page.total_count, 1);
        assert_eq!(page.rows[0].transaction.kind, TransactionKind::Credit);
    }

    #[test]
    fn filters_by_category_and_account() {
        let conn = get_test_connection();
        let user_id = create_test_user("alice@example.com", &conn);
        let category = create_category("Groceries", user_id, &conn).unwrap();
        let account = create_account("Bank", "bank", user_id, &conn).unwrap();

        create_transaction(
            NewTransaction {
                description: "Weekly shop".to_owned(),
                amount: 80.0,
                kind: TransactionKind::Debit,
                date: date!(2025 - 05 - 10),
                category_id: Some(category.id),
                account_id: Some(account.id),
            },
            user_id,
            &conn,
        )
        .unwrap();
        insert_transaction(2.0, TransactionKind::Debit, date!(2025 - 05 - 11), user_id, &conn);

        let filter = TransactionFilter {
            category_id: Some(category.id),
            account_id: Some(account.id),
            ..Default::default()
        };
        let page = query_transactions(&filter, 1, 10, user_id, &conn).unwrap();

        assert_eq!(page.total_count, 1);
        assert_eq!(page.rows[0].category_name.as_deref(), Some("Groceries"));
        assert_eq!(page.rows[0].account_name.as_deref(), Some("Bank"));
    }

    #[test]
    fn date_range_is_inclusive_of_end_date() {
        let conn = get_test_connection();
        let user_id = create_test_user("alice@example.com", &conn);
        insert_transaction(1.0, TransactionKind::Debit, date!(2025 - 05 - 01), user_id, &conn);
        insert_transaction(2.0, TransactionKind::Debit, date!(2025 - 05 - 15), user_id, &conn);
        insert_transaction(3.0, TransactionKind::Debit, date!(2025 - 05 - 16), user_id, &conn);

        let filter = TransactionFilter {
            start_date: Some(date!(2025 - 05 - 01)),
            end_date: Some(date!(2025 - 05 - 15)),
            ..Default::default()
        };
        let page = query_transactions(&filter, 1, 10, user_id, &conn).unwrap();

        assert_eq!(page.total_count, 2);
    }

    #[test]
    fn filters_by_amount_range() {
        let conn = get_test_connection();
        let user_id = create_test_user("alice@example.com", &conn);
        insert_transaction(5.0, TransactionKind::Debit, date!(2025 - 05 - 01), user_id, &conn);
        insert_transaction(50.0, TransactionKind::Debit, date!(2025 - 05 - 02), user_id, &conn);
        insert_transaction(500.0, TransactionKind::Debit, date!(2025 - 05 - 03), user_id, &conn);

        let filter = TransactionFilter {
            min_amount: Some(10.0),
            max_amount: Some(100.0),
            ..Default::default()
        };
        let page = query_transactions(&filter, 1, 10, user_id, &conn).unwrap();

        assert_eq!(page.total_count, 1);
        assert_eq!(page.rows[0].transaction.amount, 50.0);
    }

    #[test]
    fn paginates_with_fixed_page_size() {
        let conn = get_test_connection();
        let user_id = create_test_user("alice@example.com", &conn);
        for day in 1..=25 {
            insert_transaction(
                day as f64,
                TransactionKind::Debit,
                date!(2025 - 05 - 01).replace_day(day).unwrap(),
                user_id,
                &conn,
            );
        }

        let first = query_transactions(&TransactionFilter::default(), 1, 10, user_id, &conn).unwrap();
        assert_eq!(first.rows.len(), 10);
        assert_eq!(first.page_count, 3);
        assert_eq!(first.total_count, 25);

        let last = query_transactions(&TransactionFilter::default(), 3, 10, user_id, &conn).unwrap();
        assert_eq!(last.rows.len(), 5);

        // Pages beyond the end are clamped to the last page.
        let clamped =
            query_transactions(&TransactionFilter::default(), 99, 10, user_id, &conn).unwrap();
        assert_eq!(clamped.page, 3);
        assert_eq!(clamped.rows, last.rows);
    }

    #[test]
    fn empty_result_still_reports_one_page() {
        let conn = get_test_connection();
        let user_id = create_test_user("alice@example.com", &conn);

        let page = query_transactions(&TransactionFilter::default(), 1, 10, user_id, &conn).unwrap();

        assert_eq!(page.page, 1);
        assert_eq!(page.page_count, 1);
        assert_eq!(page.total_count, 0);
        assert!(page.rows.is_empty());
    }
}
