//! Importing transactions from user-uploaded CSV files.

mod csv;
mod import_endpoint;
mod import_page;

pub use self::csv::{ImportRow, MAX_ROW_ERRORS, ParsedCsv, parse_transactions_csv};
pub use self::import_endpoint::import_transactions_endpoint;
pub use self::import_page::get_import_page;
