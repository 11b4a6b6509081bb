//! Parsing and formatting of monetary amounts.
//!
//! Users enter amounts in either a comma-decimal ("1.234,56") or dot-decimal
//! ("1234.56") format, so the parser has to accept both. When both separators
//! are present the comma is taken as the decimal separator and the dots as
//! thousands separators.

use crate::Error;

/// Parse a user-entered amount string.
///
/// Accepted formats include "10,50", "10.50" and "1.234,56". Spaces are
/// ignored.
///
/// # Errors
/// Returns [Error::InvalidAmount] if the string is empty or is not a number
/// in either format.
pub fn parse_amount(raw: &str) -> Result<f64, Error> {
    let stripped = raw.trim().replace(' ', "");

    if stripped.is_empty() {
        return Err(Error::InvalidAmount(raw.to_owned()));
    }

    let normalized = if stripped.contains(',') && stripped.contains('.') {
        stripped.replace('.', "").replace(',', ".")
    } else {
        stripped.replace(',', ".")
    };

    normalized
        .parse()
        .map_err(|_| Error::InvalidAmount(raw.to_owned()))
}

/// Format an amount with exactly two decimal places, e.g. for CSV export.
pub fn format_amount(amount: f64) -> String {
    format!("{amount:.2}")
}
