//! The user table and the queries used by registration and log-in.

use std::fmt::Display;

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, PasswordHash};

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from other types of IDs, leading to better compile time
/// errors, and more flexible generics that can have distinct implementations for multiple ID types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserID(i64);

impl UserID {
    /// Create a new user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A registered user of the application. Owns all of the other domain models.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserID,
    /// The user's display name.
    pub name: String,
    /// The user's email address, stored lowercased.
    pub email: String,
    /// The user's password hash.
    pub password_hash: PasswordHash,
    /// When the user registered.
    pub created_at: OffsetDateTime,
}

/// Create the user table.
///
/// # Errors
/// This function will return an error if the SQL query failed.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                password TEXT NOT NULL,
                created_at TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Create and insert a new user into the database.
///
/// `email` should already be trimmed and lowercased.
///
/// # Errors
/// This function will return a:
/// - [Error::DuplicateEmail] if a user with `email` already exists,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_user(
    name: &str,
    email: &str,
    password_hash: PasswordHash,
    connection: &Connection,
) -> Result<User, Error> {
    let created_at = OffsetDateTime::now_utc();

    connection
        .execute(
            "INSERT INTO user (name, email, password, created_at) VALUES (?1, ?2, ?3, ?4)",
            (name, email, password_hash.as_str(), created_at),
        )
        .map_err(|error| match Error::from(error) {
            Error::DuplicateEmail(_) => Error::DuplicateEmail(email.to_owned()),
            error => error,
        })?;

    let id = UserID::new(connection.last_insert_rowid());

    Ok(User {
        id,
        name: name.to_owned(),
        email: email.to_owned(),
        password_hash,
        created_at,
    })
}

/// Get the user from the database with an ID equal to `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `user_id` does not belong to a registered user,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_user_by_id(user_id: UserID, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare("SELECT id, name, email, password, created_at FROM user WHERE id = :id")?
        .query_row(&[(":id", &user_id.as_i64())], map_user_row)
        .map_err(|error| error.into())
}

/// Get the user from the database with an email equal to `email`.
///
/// `email` should already be trimmed and lowercased.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `email` does not belong to a registered user,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_user_by_email(email: &str, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare("SELECT id, name, email, password, created_at FROM user WHERE email = :email")?
        .query_row(&[(":email", &email)], map_user_row)
        .map_err(|error| error.into())
}

fn map_user_row(row: &Row) -> Result<User, rusqlite::Error> {
    let id = UserID::new(row.get(0)?);
    let name = row.get(1)?;
    let email = row.get(2)?;
    let raw_password_hash: String = row.get(3)?;
    let created_at = row.get(4)?;

    Ok(User {
        id,
        name,
        email,
        password_hash: PasswordHash::new_unchecked(&raw_password_hash),
        created_at,
    })
}
