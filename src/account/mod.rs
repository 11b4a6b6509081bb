//! Accounts are user-defined money holders, e.g. "Wallet" or "Bank", that
//! transactions can be recorded against.

mod core;
mod create;
mod delete;
mod edit;
mod list;

pub use self::core::{
    Account, AccountId, create_account, create_account_table, delete_account, get_account,
    get_account_by_name, get_accounts, get_or_create_account, seed_default_accounts,
    update_account,
};
pub use self::create::{create_account_endpoint, get_new_account_page};
pub use self::delete::delete_account_endpoint;
pub use self::edit::{get_edit_account_page, update_account_endpoint};
pub use self::list::get_accounts_page;
