//! Rendering the month's transactions as a paginated PDF document.

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference};

use crate::{Error, export::ExportRow, money::format_amount, month::MonthWindow};

/// How many transaction lines fit on one page.
const LINES_PER_PAGE: usize = 40;

const PAGE_WIDTH_MM: f64 = 210.0;
const PAGE_HEIGHT_MM: f64 = 297.0;
const MARGIN_LEFT_MM: f64 = 15.0;
const TOP_Y_MM: f64 = 280.0;
const LINE_HEIGHT_MM: f64 = 6.0;
const FONT_SIZE: f64 = 9.0;

/// Render `rows` as an A4 PDF: a title, a header line, and one fixed-layout
/// line per transaction, split across pages at a fixed number of lines.
///
/// # Errors
/// Returns [Error::PdfError] if the document cannot be built.
pub fn render_transactions_pdf(
    rows: &[ExportRow],
    window: MonthWindow,
) -> Result<Vec<u8>, Error> {
    let (doc, first_page, first_layer) = PdfDocument::new(
        format!("Transactions {}", window.tag()),
        Mm(PAGE_WIDTH_MM as _),
        Mm(PAGE_HEIGHT_MM as _),
        "Layer 1",
    );
    let font = doc
        .add_builtin_font(BuiltinFont::Courier)
        .map_err(|error| Error::PdfError(error.to_string()))?;

    let title = format!("Transactions - {}", window.label());
    let header = format_line("Date", "Description", "Type", "Category", "Account", "Amount");

    if rows.is_empty() {
        let layer = doc.get_page(first_page).get_layer(first_layer);
        place_text(&layer, &title, TOP_Y_MM, &font);
        place_text(&layer, "No transactions this month.", TOP_Y_MM - 2.0 * LINE_HEIGHT_MM, &font);

        return save_to_bytes(doc);
    }

    for (page_index, chunk) in rows.chunks(LINES_PER_PAGE).enumerate() {
        let layer = if page_index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page, layer) = doc.add_page(
                Mm(PAGE_WIDTH_MM as _),
                Mm(PAGE_HEIGHT_MM as _),
                "Layer 1",
            );
            doc.get_page(page).get_layer(layer)
        };

        place_text(&layer, &title, TOP_Y_MM, &font);
        place_text(&layer, &header, TOP_Y_MM - 2.0 * LINE_HEIGHT_MM, &font);

        let mut y = TOP_Y_MM - 3.0 * LINE_HEIGHT_MM;
        for row in chunk {
            let line = format_line(
                &row.date.to_string(),
                &row.description,
                row.kind.as_str(),
                row.category.as_deref().unwrap_or("-"),
                row.account.as_deref().unwrap_or("-"),
                &format_amount(row.amount),
            );
            place_text(&layer, &line, y, &font);
            y -= LINE_HEIGHT_MM;
        }
    }

    save_to_bytes(doc)
}

fn place_text(layer: &printpdf::PdfLayerReference, text: &str, y_mm: f64, font: &IndirectFontRef) {
    layer.use_text(text, FONT_SIZE as _, Mm(MARGIN_LEFT_MM as _), Mm(y_mm as _), font);
}

/// One fixed-width line of the transaction table. Long fields are truncated
/// so the columns stay aligned in the monospaced font.
fn format_line(
    date: &str,
    description: &str,
    kind: &str,
    category: &str,
    account: &str,
    amount: &str,
) -> String {
    format!(
        "{:<10}  {:<28}  {:<7}  {:<14}  {:<14}  {:>10}",
        truncate(date, 10),
        truncate(description, 28),
        truncate(kind, 7),
        truncate(category, 14),
        truncate(account, 14),
        truncate(amount, 10),
    )
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

fn save_to_bytes(doc: PdfDocumentReference) -> Result<Vec<u8>, Error> {
    doc.save_to_bytes()
        .map_err(|error| Error::PdfError(error.to_string()))
}

#[cfg(test)]
mod render_transactions_pdf_tests {
    use time::macros::date;

    use crate::{export::ExportRow, month::MonthWindow, transaction::TransactionKind};

    use super::{LINES_PER_PAGE, format_line, render_transactions_pdf};

    fn test_row(day: u8) -> ExportRow {
        ExportRow {
            date: date!(2025 - 05 - 01).replace_day(day).unwrap(),
            description: format!("transaction {day}"),
            kind: TransactionKind::Debit,
            category: None,
            account: None,
            amount: day as f64,
        }
    }

    #[test]
    fn renders_a_pdf_document() {
        let rows: Vec<_> = (1..=3).map(test_row).collect();
        let window = MonthWindow::parse("2025-05").unwrap();

        let bytes = render_transactions_pdf(&rows, window).unwrap();

        assert!(bytes.starts_with(b"%PDF"), "output must be a PDF document");
    }

    #[test]
    fn paginates_past_one_page() {
        // More rows than fit on one page must still render.
        let rows: Vec<_> = (0..(LINES_PER_PAGE + 5))
            .map(|i| test_row((i % 28 + 1) as u8))
            .collect();
        let window = MonthWindow::parse("2025-05").unwrap();

        let single_page_rows: Vec<_> = (1..=3).map(test_row).collect();
        let single = render_transactions_pdf(&single_page_rows, window).unwrap();
        let multi = render_transactions_pdf(&rows, window).unwrap();

        assert!(multi.len() > single.len());
    }

    #[test]
    fn empty_month_renders_placeholder() {
        let window = MonthWindow::parse("2025-05").unwrap();

        let bytes = render_transactions_pdf(&[], window).unwrap();

        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn long_fields_are_truncated() {
        let line = format_line(
            "2025-05-01",
            "a very long description that would overflow the column",
            "debit",
            "-",
            "-",
            "10.00",
        );

        assert!(line.contains("a very long description that"));
        assert!(!line.contains("overflow"));
    }
}
