//! Defines the account model and its database queries.
//!
//! Account names are unique per owner, and an account cannot be deleted while
//! transactions still reference it.

use rusqlite::{Connection, Row};

use crate::{Error, database_id::DatabaseId, user::UserID};

/// The ID type for accounts.
pub type AccountId = DatabaseId;

/// A place money is kept, e.g. a wallet, bank account or credit card.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    /// The ID of the account.
    pub id: AccountId,
    /// The user who owns the account.
    pub user_id: UserID,
    /// The name of the account, unique per owner.
    pub name: String,
    /// A free-text label such as "wallet" or "bank".
    pub kind: String,
}

/// The accounts created for every new user.
const DEFAULT_ACCOUNTS: [(&str, &str); 4] = [
    ("Wallet", "wallet"),
    ("Bank", "bank"),
    ("Card", "card"),
    ("Savings", "savings"),
];

/// Create the account table.
///
/// # Errors
/// Returns an error if the table cannot be created.
pub fn create_account_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS account (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                kind TEXT NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE,
                UNIQUE(user_id, name)
                )",
        (),
    )?;

    Ok(())
}

/// Create an account for `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::DuplicateAccountName] if the user already has an account called `name`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_account(
    name: &str,
    kind: &str,
    user_id: UserID,
    connection: &Connection,
) -> Result<Account, Error> {
    connection
        .execute(
            "INSERT INTO account (user_id, name, kind) VALUES (?1, ?2, ?3)",
            (user_id.as_i64(), name, kind),
        )
        .map_err(|error| map_duplicate_name(error, name))?;

    Ok(Account {
        id: connection.last_insert_rowid(),
        user_id,
        name: name.to_owned(),
        kind: kind.to_owned(),
    })
}

/// Retrieve the account `account_id` belonging to `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if the account does not exist or belongs to another user,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_account(
    account_id: AccountId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Account, Error> {
    connection
        .prepare("SELECT id, user_id, name, kind FROM account WHERE id = :id AND user_id = :user_id")?
        .query_row(
            &[(":id", &account_id), (":user_id", &user_id.as_i64())],
            map_account_row,
        )
        .map_err(|error| error.into())
}

/// Retrieve the account named `name` belonging to `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if the user has no account called `name`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_account_by_name(
    name: &str,
    user_id: UserID,
    connection: &Connection,
) -> Result<Account, Error> {
    connection
        .prepare(
            "SELECT id, user_id, name, kind FROM account WHERE name = :name AND user_id = :user_id",
        )?
        .query_row(
            &[
                (":name", &name as &dyn rusqlite::ToSql),
                (":user_id", &user_id.as_i64()),
            ],
            map_account_row,
        )
        .map_err(|error| error.into())
}

/// Retrieve all of `user_id`'s accounts, ordered by name.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn get_accounts(user_id: UserID, connection: &Connection) -> Result<Vec<Account>, Error> {
    connection
        .prepare("SELECT id, user_id, name, kind FROM account WHERE user_id = :user_id ORDER BY name ASC")?
        .query_map(&[(":user_id", &user_id.as_i64())], map_account_row)?
        .map(|maybe_account| maybe_account.map_err(|error| error.into()))
        .collect()
}

/// Retrieve the account named `name`, creating it with an empty kind when the
/// user does not have one yet. Used by the CSV importer.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn get_or_create_account(
    name: &str,
    user_id: UserID,
    connection: &Connection,
) -> Result<Account, Error> {
    match get_account_by_name(name, user_id, connection) {
        Ok(account) => Ok(account),
        Err(Error::NotFound) => create_account(name, "imported", user_id, connection),
        Err(error) => Err(error),
    }
}

/// Update the name and kind of the account `account_id` belonging to `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if the account does not exist or belongs to another user,
/// - [Error::DuplicateAccountName] if the user already has another account called `name`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_account(
    account_id: AccountId,
    name: &str,
    kind: &str,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection
        .execute(
            "UPDATE account SET name = ?1, kind = ?2 WHERE id = ?3 AND user_id = ?4",
            (name, kind, account_id, user_id.as_i64()),
        )
        .map_err(|error| map_duplicate_name(error, name))?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Delete the account `account_id` belonging to `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::AccountInUse] if any of the user's transactions reference the account,
/// - [Error::NotFound] if the account does not exist or belongs to another user,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_account(
    account_id: AccountId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let in_use: bool = connection.query_row(
        "SELECT EXISTS(SELECT 1 FROM \"transaction\" WHERE account_id = ?1 AND user_id = ?2)",
        (account_id, user_id.as_i64()),
        |row| row.get(0),
    )?;

    if in_use {
        return Err(Error::AccountInUse);
    }

    let rows_affected = connection.execute(
        "DELETE FROM account WHERE id = ?1 AND user_id = ?2",
        (account_id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Create the default accounts for `user_id` if they have none.
///
/// This runs on registration, and again on log-in as an idempotent repair for
/// users that existed before default accounts were introduced.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn seed_default_accounts(user_id: UserID, connection: &Connection) -> Result<(), Error> {
    let count: i64 = connection.query_row(
        "SELECT COUNT(id) FROM account WHERE user_id = ?1",
        [user_id.as_i64()],
        |row| row.get(0),
    )?;

    if count > 0 {
        return Ok(());
    }

    for (name, kind) in DEFAULT_ACCOUNTS {
        create_account(name, kind, user_id, connection)?;
    }

    Ok(())
}

fn map_duplicate_name(error: rusqlite::Error, name: &str) -> Error {
    match error {
        rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
            if sql_error.extended_code == 2067 && desc.contains("account.") =>
        {
            Error::DuplicateAccountName(name.to_owned())
        }
        error => error.into(),
    }
}

fn map_account_row(row: &Row) -> Result<Account, rusqlite::Error> {
    Ok(Account {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        name: row.get(2)?,
        kind: row.get(3)?,
    })
}
