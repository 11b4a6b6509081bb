//! Parsing of uploaded transaction CSV files.
//!
//! The delimiter is auto-detected (comma or semicolon), headers are matched
//! case-insensitively and accept both the English and the legacy Portuguese
//! column names. Bad rows are skipped rather than failing the whole file;
//! only a missing required column rejects the upload entirely.

use time::Date;

use crate::{
    Error,
    money::parse_amount,
    transaction::{DATE_FORMAT, TransactionKind},
};

/// How many row errors are collected before the rest are only counted.
pub const MAX_ROW_ERRORS: usize = 10;

/// One successfully parsed CSV row.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportRow {
    /// When the transaction happened.
    pub date: Date,
    /// A text description of what the transaction was for.
    pub description: String,
    /// Whether money was earned or spent.
    pub kind: TransactionKind,
    /// The amount of money spent or earned.
    pub amount: f64,
    /// The category name, to be resolved or created per owner.
    pub category: Option<String>,
    /// The account name, to be resolved or created per owner.
    pub account: Option<String>,
}

/// The outcome of parsing a CSV file: the good rows plus the skipped count
/// and the first few row errors.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCsv {
    /// The rows that parsed successfully, in file order.
    pub rows: Vec<ImportRow>,
    /// How many rows were skipped.
    pub skipped: usize,
    /// The first [MAX_ROW_ERRORS] row error messages.
    pub errors: Vec<String>,
}

struct Columns {
    date: usize,
    description: usize,
    kind: usize,
    amount: usize,
    category: Option<usize>,
    account: Option<usize>,
}

/// Parse the text of an uploaded transactions CSV.
///
/// # Errors
/// Returns [Error::InvalidCsv] if the file is empty or a required column
/// (date, description, type, amount) is missing. Individual bad rows are
/// reported via [ParsedCsv::skipped] and [ParsedCsv::errors] instead.
pub fn parse_transactions_csv(text: &str) -> Result<ParsedCsv, Error> {
    let header_line = text
        .lines()
        .next()
        .ok_or_else(|| Error::InvalidCsv("the file is empty".to_owned()))?;
    let delimiter = detect_delimiter(header_line);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|error| Error::InvalidCsv(error.to_string()))?
        .clone();

    let find_column = |names: &[&str]| -> Option<usize> {
        headers
            .iter()
            .position(|header| names.contains(&header.trim().to_lowercase().as_str()))
    };
    let required_column = |names: &[&str]| -> Result<usize, Error> {
        find_column(names)
            .ok_or_else(|| Error::InvalidCsv(format!("missing required column \"{}\"", names[0])))
    };

    let columns = Columns {
        date: required_column(&["date", "data"])?,
        description: required_column(&["description", "descricao", "descrição"])?,
        kind: required_column(&["type", "tipo"])?,
        amount: required_column(&["amount", "valor"])?,
        category: find_column(&["category", "categoria"]),
        account: find_column(&["account", "conta"]),
    };

    let mut rows = Vec::new();
    let mut skipped = 0;
    let mut errors = Vec::new();

    for (record_index, record) in reader.records().enumerate() {
        // The header occupies line 1.
        let line = record_index + 2;

        let outcome = record
            .map_err(|error| error.to_string())
            .and_then(|record| parse_record(&record, &columns));

        match outcome {
            Ok(row) => rows.push(row),
            Err(message) => {
                skipped += 1;
                if errors.len() < MAX_ROW_ERRORS {
                    errors.push(format!("line {line}: {message}"));
                }
            }
        }
    }

    Ok(ParsedCsv {
        rows,
        skipped,
        errors,
    })
}

/// Pick the delimiter with the most occurrences in the header line.
/// Comma wins a tie.
fn detect_delimiter(header_line: &str) -> u8 {
    let commas = header_line.matches(',').count();
    let semicolons = header_line.matches(';').count();

    if semicolons > commas { b';' } else { b',' }
}

/// Accepts the kinds written by the exporter plus the legacy Portuguese
/// spellings, case-insensitively.
fn parse_import_kind(raw: &str) -> Option<TransactionKind> {
    match raw.trim().to_lowercase().as_str() {
        "credit" | "entrada" => Some(TransactionKind::Credit),
        "debit" | "saida" | "saída" => Some(TransactionKind::Debit),
        _ => None,
    }
}

fn parse_record(record: &csv::StringRecord, columns: &Columns) -> Result<ImportRow, String> {
    let field = |index: usize| record.get(index).unwrap_or("").trim();

    let date_raw = field(columns.date);
    let date =
        Date::parse(date_raw, DATE_FORMAT).map_err(|_| format!("invalid date \"{date_raw}\""))?;

    let description = field(columns.description);
    if description.is_empty() {
        return Err("empty description".to_owned());
    }

    let kind_raw = field(columns.kind);
    let kind = parse_import_kind(kind_raw).ok_or(format!("invalid type \"{kind_raw}\""))?;

    let amount_raw = field(columns.amount);
    let amount = parse_amount(amount_raw).map_err(|_| format!("invalid amount \"{amount_raw}\""))?;
    if amount <= 0.0 {
        return Err(format!("invalid amount \"{amount_raw}\""));
    }

    let optional_name = |index: Option<usize>| -> Option<String> {
        index
            .map(field)
            .filter(|name| !name.is_empty())
            .map(str::to_owned)
    };

    Ok(ImportRow {
        date,
        description: description.to_owned(),
        kind,
        amount,
        category: optional_name(columns.category),
        account: optional_name(columns.account),
    })
}

#[cfg(test)]
mod parse_transactions_csv_tests {
    use time::macros::date;

    use crate::{Error, transaction::TransactionKind};

    use super::{MAX_ROW_ERRORS, parse_transactions_csv};

    #[test]
    fn parses_comma_delimited_english_headers() {
        let text = "date,description,type,amount,category,account\n\
                    2025-05-01,Salary,credit,2500.00,,Bank\n\
                    2025-05-02,Groceries,debit,80.50,Food,Card\n";

        let parsed = parse_transactions_csv(text).unwrap();

        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.skipped, 0);
        assert!(parsed.errors.is_empty());

        let first = &parsed.rows[0];
        assert_eq!(first.date, date!(2025 - 05 - 01));
        assert_eq!(first.kind, TransactionKind::Credit);
        assert_eq!(first.category, None);
        assert_eq!(first.account.as_deref(), Some("Bank"));

        let second = &parsed.rows[1];
        assert_eq!(second.amount, 80.50);
        assert_eq!(second.category.as_deref(), Some("Food"));
    }

    #[test]
    fn parses_semicolon_delimited_portuguese_headers() {
        let text = "Data;Descricao;Tipo;Valor\n\
                    2025-05-01;Mercado;saida;1.234,56\n\
                    2025-05-02;Salario;entrada;3000,00\n";

        let parsed = parse_transactions_csv(text).unwrap();

        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.rows[0].kind, TransactionKind::Debit);
        assert_eq!(parsed.rows[0].amount, 1234.56);
        assert_eq!(parsed.rows[1].kind, TransactionKind::Credit);
    }

    #[test]
    fn missing_required_column_rejects_whole_file() {
        let text = "date,description,amount\n2025-05-01,Salary,2500.00\n";

        let result = parse_transactions_csv(text);

        assert_eq!(
            result,
            Err(Error::InvalidCsv(
                "missing required column \"type\"".to_owned()
            ))
        );
    }

    #[test]
    fn empty_file_is_rejected() {
        assert!(matches!(
            parse_transactions_csv(""),
            Err(Error::InvalidCsv(_))
        ));
    }

    #[test]
    fn bad_rows_are_skipped_with_errors() {
        let text = "date,description,type,amount\n\
                    not-a-date,Salary,credit,100\n\
                    2025-05-02,,debit,50\n\
                    2025-05-03,Rent,transfer,50\n\
                    2025-05-04,Lunch,debit,abc\n\
                    2025-05-05,Dinner,debit,30\n";

        let parsed = parse_transactions_csv(text).unwrap();

        assert_eq!(parsed.rows.len(), 1);
        assert_eq!(parsed.rows[0].description, "Dinner");
        assert_eq!(parsed.skipped, 4);
        assert_eq!(parsed.errors.len(), 4);
        assert!(parsed.errors[0].starts_with("line 2:"), "{:?}", parsed.errors);
    }

    #[test]
    fn only_the_first_ten_errors_are_collected() {
        let mut text = String::from("date,description,type,amount\n");
        for day in 1..=15 {
            text.push_str(&format!("2025-05-{day:02},Bad row,transfer,10\n"));
        }

        let parsed = parse_transactions_csv(&text).unwrap();

        assert_eq!(parsed.rows.len(), 0);
        assert_eq!(parsed.skipped, 15);
        assert_eq!(parsed.errors.len(), MAX_ROW_ERRORS);
    }

    #[test]
    fn header_match_is_case_insensitive() {
        let text = "DATE,DESCRIPTION,TYPE,AMOUNT\n2025-05-01,Salary,CREDIT,100\n";

        let parsed = parse_transactions_csv(text).unwrap();

        assert_eq!(parsed.rows.len(), 1);
        assert_eq!(parsed.rows[0].kind, TransactionKind::Credit);
    }
}
