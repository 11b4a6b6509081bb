//! Transactions record money earned (credits) and spent (debits), optionally
//! against a category and an account.

mod core;
mod create;
mod delete;
mod edit;
mod form;
mod list_page;
mod query;

pub use self::core::{
    NewTransaction, Transaction, TransactionId, TransactionKind, create_transaction,
    create_transaction_table, delete_transaction, get_transaction, update_transaction,
};
pub use self::create::{create_transaction_endpoint, get_new_transaction_page};
pub use self::delete::delete_transaction_endpoint;
pub use self::edit::{get_edit_transaction_page, update_transaction_endpoint};
pub use self::list_page::get_transactions_page;
pub use self::query::{TransactionFilter, TransactionPageData, TransactionRow, query_transactions};

pub(crate) use self::form::DATE_FORMAT;
