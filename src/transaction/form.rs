//! Parsing and rendering of the transaction create/edit form.

use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    account::{Account, get_account},
    category::{Category, get_category},
    endpoints,
    html::{form_error, select_input, text_input},
    money::parse_amount,
    transaction::core::{NewTransaction, TransactionKind},
    user::UserID,
};

pub(crate) const DATE_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year]-[month]-[day]");

/// The raw strings submitted by the transaction form.
///
/// Everything is kept as strings so that invalid input can be re-rendered
/// back to the user unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionForm {
    /// The description text.
    pub description: String,
    /// The amount, in either comma- or dot-decimal format.
    pub amount: String,
    /// "credit" or "debit".
    pub kind: String,
    /// The transaction date as `YYYY-MM-DD`.
    pub date: String,
    /// The selected category ID, or the empty string for no category.
    #[serde(default)]
    pub category_id: String,
    /// The selected account ID, or the empty string for no account.
    #[serde(default)]
    pub account_id: String,
}

/// What to do with the transaction date when the submitted one is invalid.
pub(super) enum DateFallback {
    /// Use today's date (creating a new transaction).
    Today,
    /// Keep a previously stored date (editing a transaction).
    Keep(Date),
}

/// The outcome of parsing a [TransactionForm].
pub(super) struct ParsedTransactionForm {
    /// The validated transaction data.
    pub new_transaction: NewTransaction,
    /// Set when the submitted date was invalid and the fallback was used.
    /// The caller should warn the user.
    pub date_fell_back: bool,
}

/// Validate a submitted transaction form against the owner's categories and
/// accounts.
///
/// An invalid date is not an error: the fallback date is used and
/// `date_fell_back` is set so the handler can warn the user.
///
/// # Errors
/// Returns a user-facing message when the description is empty, the kind or
/// amount is invalid, or a referenced category/account does not belong to
/// `user_id`.
pub(super) fn parse_transaction_form(
    form: &TransactionForm,
    date_fallback: DateFallback,
    user_id: UserID,
    connection: &Connection,
) -> Result<ParsedTransactionForm, String> {
    let description = form.description.trim();
    if description.is_empty() {
        return Err("Description is required.".to_owned());
    }

    let kind = TransactionKind::parse(form.kind.trim())
        .ok_or_else(|| "Type must be income or expense.".to_owned())?;

    let amount = parse_amount(&form.amount).map_err(|_| "Invalid amount.".to_owned())?;
    if amount <= 0.0 {
        return Err("Amount must be greater than zero.".to_owned());
    }

    let (date, date_fell_back) = match Date::parse(form.date.trim(), DATE_FORMAT) {
        Ok(date) => (date, false),
        Err(_) => {
            let fallback = match date_fallback {
                DateFallback::Today => time::OffsetDateTime::now_utc().date(),
                DateFallback::Keep(date) => date,
            };
            (fallback, true)
        }
    };

    let category_id = parse_owned_reference(&form.category_id, "category", |id| {
        get_category(id, user_id, connection).map(|_| ())
    })?;
    let account_id = parse_owned_reference(&form.account_id, "account", |id| {
        get_account(id, user_id, connection).map(|_| ())
    })?;

    Ok(ParsedTransactionForm {
        new_transaction: NewTransaction {
            description: description.to_owned(),
            amount,
            kind,
            date,
            category_id,
            account_id,
        },
        date_fell_back,
    })
}

/// Parse an optional ID field, checking the referenced row belongs to the
/// owner. The empty string means "no selection".
fn parse_owned_reference(
    raw: &str,
    field_name: &str,
    check_owned: impl Fn(i64) -> Result<(), crate::Error>,
) -> Result<Option<i64>, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    let id: i64 = raw
        .parse()
        .map_err(|_| format!("Invalid {field_name}."))?;

    check_owned(id).map_err(|_| format!("Invalid {field_name}."))?;

    Ok(Some(id))
}

/// Render the transaction form with the given values filled in.
pub(super) fn transaction_form_view(
    form: &TransactionForm,
    categories: &[Category],
    accounts: &[Account],
    action: &str,
    error_message: Option<&str>,
) -> Markup {
    let category_options: Vec<(String, String)> = categories
        .iter()
        .map(|category| (category.id.to_string(), category.name.clone()))
        .collect();
    let account_options: Vec<(String, String)> = accounts
        .iter()
        .map(|account| (account.id.to_string(), account.name.clone()))
        .collect();

    html! {
        form method="post" action=(action) class="entity-form"
        {
            (form_error(error_message))
            (text_input("Description", "description", "text", &form.description))
            (text_input("Amount", "amount", "text", &form.amount))

            div class="field"
            {
                label { "Type" }
                div class="radio-group"
                {
                    label
                    {
                        input type="radio" name="kind" value="credit"
                            checked[form.kind == "credit"];
                        " Income"
                    }
                    label
                    {
                        input type="radio" name="kind" value="debit"
                            checked[form.kind == "debit" || form.kind.is_empty()];
                        " Expense"
                    }
                }
            }

            (text_input("Date", "date", "date", &form.date))
            (select_input(
                "Category",
                "category_id",
                &category_options,
                Some(form.category_id.as_str()),
                Some("(none)"),
            ))
            (select_input(
                "Account",
                "account_id",
                &account_options,
                Some(form.account_id.as_str()),
                Some("(none)"),
            ))

            button type="submit" class="button" { "Save" }
            a href=(endpoints::TRANSACTIONS_VIEW) { "Cancel" }
        }
    }
}
