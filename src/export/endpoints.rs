//! The CSV, Excel and PDF download endpoints.

use axum::{
    Extension,
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::{
    AppState, Error,
    export::{csv::write_transactions_csv, month_transactions, pdf::render_transactions_pdf},
    month::MonthWindow,
    user::UserID,
};

/// The query string parameters accepted by the export endpoints.
#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    /// The `YYYY-MM` month to export. Missing or invalid values fall back to
    /// the current month.
    pub month: Option<String>,
}

/// Download the month's transactions as a semicolon-delimited CSV file.
pub async fn get_export_csv(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<ExportQuery>,
) -> Response {
    export_csv_with_content_type(
        state,
        user_id,
        query,
        "text/csv; charset=utf-8",
        "csv",
    )
}

/// Download the month's transactions as an Excel-flavoured CSV file.
///
/// The content is byte-identical to the CSV export; only the content type
/// and file extension differ.
pub async fn get_export_excel(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<ExportQuery>,
) -> Response {
    export_csv_with_content_type(state, user_id, query, "application/vnd.ms-excel", "xls")
}

/// Download the month's transactions as a PDF document.
pub async fn get_export_pdf(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<ExportQuery>,
) -> Response {
    let window = MonthWindow::parse_or_current(query.month.as_deref());

    let rows = {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(_) => return Error::DatabaseLockError.into_response(),
        };

        match month_transactions(window, user_id, &connection) {
            Ok(rows) => rows,
            Err(error) => return error.into_response(),
        }
    };

    let bytes = match render_transactions_pdf(&rows, window) {
        Ok(bytes) => bytes,
        Err(error) => return error.into_response(),
    };

    download_response(
        bytes,
        "application/pdf",
        format!("transactions-{}.pdf", window.tag()),
    )
}

fn export_csv_with_content_type(
    state: AppState,
    user_id: UserID,
    query: ExportQuery,
    content_type: &str,
    extension: &str,
) -> Response {
    let window = MonthWindow::parse_or_current(query.month.as_deref());

    let rows = {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(_) => return Error::DatabaseLockError.into_response(),
        };

        match month_transactions(window, user_id, &connection) {
            Ok(rows) => rows,
            Err(error) => return error.into_response(),
        }
    };

    let bytes = match write_transactions_csv(&rows) {
        Ok(bytes) => bytes,
        Err(error) => return error.into_response(),
    };

    download_response(
        bytes,
        content_type,
        format!("transactions-{}.{extension}", window.tag()),
    )
}

fn download_response(bytes: Vec<u8>, content_type: &str, filename: String) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_owned()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response()
}
