//! Dinheiro is a web app for tracking personal income and spending.
//!
//! It serves HTML pages directly: users register and log in, record credit
//! and debit transactions against their own categories and accounts, set
//! monthly goals and per-category spending limits, and view an aggregated
//! dashboard. Data can be imported from and exported to CSV, and exported to
//! PDF.
//!
//! Every row in the database belongs to exactly one user, and every query
//! takes the owner as an explicit parameter.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod account;
mod app_state;
mod auth;
mod category;
mod csv_import;
mod database_id;
mod db;
mod endpoints;
mod export;
mod flash;
mod goal;
mod html;
mod logging;
mod money;
mod month;
mod navigation;
mod not_found;
mod pagination;
mod password;
mod report;
mod routing;
mod score;
#[cfg(test)]
mod test_utils;
mod transaction;
mod user;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use logging::logging_middleware;
pub use password::PasswordHash;
pub use routing::build_router;
pub use user::{User, UserID};

use crate::not_found::get_404_not_found_response;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The email and password combination did not match a registered user.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Either the user ID or expiry cookie is missing from the cookie jar in
    /// the request.
    #[error("no auth cookies in the cookie jar")]
    CookieMissing,

    /// There was an error parsing the date in the cookie or creating the new
    /// expiry date time.
    ///
    /// Callers should pass in the original error as a string and the date
    /// string that caused the error.
    #[error("could not format expiry cookie date-time string \"{1}\": {0}")]
    InvalidDateFormat(String, String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The email address is already registered.
    #[error("the email \"{0}\" is already registered")]
    DuplicateEmail(String),

    /// The user already has an account with this name.
    #[error("the account \"{0}\" already exists")]
    DuplicateAccountName(String),

    /// The user already has a category with this name.
    #[error("the category \"{0}\" already exists")]
    DuplicateCategoryName(String),

    /// Tried to delete an account that still has transactions linked to it.
    #[error("the account has transactions linked to it")]
    AccountInUse,

    /// Tried to delete a category that still has transactions linked to it.
    #[error("the category has transactions linked to it")]
    CategoryInUse,

    /// A string could not be parsed as a monetary amount.
    #[error("could not parse \"{0}\" as an amount")]
    InvalidAmount(String),

    /// A string could not be parsed as a `YYYY-MM` month tag.
    #[error("could not parse \"{0}\" as a month")]
    InvalidMonth(String),

    /// The multipart form could not be parsed as an uploaded file.
    #[error("could not parse multipart form: {0}")]
    MultipartError(String),

    /// The CSV had issues that prevented it from being parsed at all, e.g. a
    /// missing required column.
    #[error("could not parse the CSV file: {0}")]
    InvalidCsv(String),

    /// An error occurred while writing CSV output.
    #[error("could not write CSV output: {0}")]
    CsvWriteError(String),

    /// An error occurred while rendering a PDF document.
    #[error("could not render PDF: {0}")]
    PdfError(String),

    /// The requested resource was not found, or does not belong to the
    /// authenticated user.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("user.email") =>
            {
                Error::DuplicateEmail(String::new())
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}
