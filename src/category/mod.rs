//! Categories label transactions for reporting, e.g. "Groceries" or "Rent".

mod core;
mod create;
mod delete;
mod edit;
mod list;

pub use self::core::{
    Category, CategoryId, create_category, create_category_table, delete_category, get_categories,
    get_category, get_category_by_name, get_or_create_category, update_category,
};
pub use self::create::{create_category_endpoint, get_new_category_page};
pub use self::delete::delete_category_endpoint;
pub use self::edit::{get_edit_category_page, update_category_endpoint};
pub use self::list::get_categories_page;
