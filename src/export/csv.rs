//! Writing the semicolon-delimited transactions CSV.

use crate::{Error, export::ExportRow, money::format_amount};

/// The fixed export column order.
const CSV_HEADER: [&str; 6] = ["Date", "Description", "Type", "Category", "Account", "Amount"];

/// Render `rows` as a semicolon-delimited CSV document with a fixed header
/// and two-decimal amounts.
///
/// # Errors
/// Returns [Error::CsvWriteError] if the CSV writer fails.
pub fn write_transactions_csv(rows: &[ExportRow]) -> Result<Vec<u8>, Error> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_writer(Vec::new());

    writer
        .write_record(CSV_HEADER)
        .map_err(|error| Error::CsvWriteError(error.to_string()))?;

    for row in rows {
        writer
            .write_record([
                row.date.to_string(),
                row.description.clone(),
                row.kind.as_str().to_owned(),
                row.category.clone().unwrap_or_default(),
                row.account.clone().unwrap_or_default(),
                format_amount(row.amount),
            ])
            .map_err(|error| Error::CsvWriteError(error.to_string()))?;
    }

    writer
        .into_inner()
        .map_err(|error| Error::CsvWriteError(error.to_string()))
}

#[cfg(test)]
mod write_transactions_csv_tests {
    use time::macros::date;

    use crate::{csv_import::parse_transactions_csv, export::ExportRow, transaction::TransactionKind};

    use super::write_transactions_csv;

    fn test_rows() -> Vec<ExportRow> {
        vec![
            ExportRow {
                date: date!(2025 - 05 - 01),
                description: "Salary".to_owned(),
                kind: TransactionKind::Credit,
                category: None,
                account: Some("Bank".to_owned()),
                amount: 2500.0,
            },
            ExportRow {
                date: date!(2025 - 05 - 02),
                description: "Groceries".to_owned(),
                kind: TransactionKind::Debit,
                category: Some("Food".to_owned()),
                account: Some("Card".to_owned()),
                amount: 80.5,
            },
        ]
    }

    #[test]
    fn writes_fixed_header_and_two_decimal_amounts() {
        let bytes = write_transactions_csv(&test_rows()).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("Date;Description;Type;Category;Account;Amount")
        );
        assert_eq!(lines.next(), Some("2025-05-01;Salary;credit;;Bank;2500.00"));
        assert_eq!(
            lines.next(),
            Some("2025-05-02;Groceries;debit;Food;Card;80.50")
        );
    }

    #[test]
    fn export_then_import_round_trips() {
        let rows = test_rows();

        let bytes = write_transactions_csv(&rows).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let parsed = parse_transactions_csv(&text).unwrap();

        assert_eq!(parsed.skipped, 0);
        assert_eq!(parsed.rows.len(), rows.len());

        for (imported, exported) in parsed.rows.iter().zip(&rows) {
            assert_eq!(imported.date, exported.date);
            assert_eq!(imported.description, exported.description);
            assert_eq!(imported.kind, exported.kind);
            assert_eq!(imported.amount, exported.amount);
            assert_eq!(imported.category, exported.category);
            assert_eq!(imported.account, exported.account);
        }
    }
}
