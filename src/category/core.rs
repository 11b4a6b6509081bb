//! Defines the category model and its database queries.
//!
//! Category names are unique per owner, and a category cannot be deleted
//! while transactions still reference it.

use rusqlite::{Connection, Row};

use crate::{Error, database_id::DatabaseId, user::UserID};

/// The ID type for categories.
pub type CategoryId = DatabaseId;

/// A label for grouping transactions, e.g. "Groceries", "Transport", "Rent".
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    /// The ID of the category.
    pub id: CategoryId,
    /// The user who owns the category.
    pub user_id: UserID,
    /// The name of the category, unique per owner.
    pub name: String,
}

/// Create the category table.
///
/// # Errors
/// Returns an error if the table cannot be created.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS category (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE,
                UNIQUE(user_id, name)
                )",
        (),
    )?;

    Ok(())
}

/// Create a category for `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::DuplicateCategoryName] if the user already has a category called `name`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_category(
    name: &str,
    user_id: UserID,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .execute(
            "INSERT INTO category (user_id, name) VALUES (?1, ?2)",
            (user_id.as_i64(), name),
        )
        .map_err(|error| map_duplicate_name(error, name))?;

    Ok(Category {
        id: connection.last_insert_rowid(),
        user_id,
        name: name.to_owned(),
    })
}

/// Retrieve the category `category_id` belonging to `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if the category does not exist or belongs to another user,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_category(
    category_id: CategoryId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .prepare("SELECT id, user_id, name FROM category WHERE id = :id AND user_id = :user_id")?
        .query_row(
            &[(":id", &category_id), (":user_id", &user_id.as_i64())],
            map_category_row,
        )
        .map_err(|error| error.into())
}

/// Retrieve the category named `name` belonging to `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if the user has no category called `name`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_category_by_name(
    name: &str,
    user_id: UserID,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .prepare(
            "SELECT id, user_id, name FROM category WHERE name = :name AND user_id = :user_id",
        )?
        .query_row(
            &[
                (":name", &name as &dyn rusqlite::ToSql),
                (":user_id", &user_id.as_i64()),
            ],
            map_category_row,
        )
        .map_err(|error| error.into())
}

/// Retrieve all of `user_id`'s categories, ordered by name.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn get_categories(user_id: UserID, connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, name FROM category WHERE user_id = :user_id ORDER BY name ASC",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_category_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Retrieve the category named `name`, creating it when the user does not
/// have one yet. Used by the CSV importer.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn get_or_create_category(
    name: &str,
    user_id: UserID,
    connection: &Connection,
) -> Result<Category, Error> {
    match get_category_by_name(name, user_id, connection) {
        Ok(category) => Ok(category),
        Err(Error::NotFound) => create_category(name, user_id, connection),
        Err(error) => Err(error),
    }
}

/// Rename the category `category_id` belonging to `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if the category does not exist or belongs to another user,
/// - [Error::DuplicateCategoryName] if the user already has another category called `name`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_category(
    category_id: CategoryId,
    name: &str,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection
        .execute(
            "UPDATE category SET name = ?1 WHERE id = ?2 AND user_id = ?3",
            (name, category_id, user_id.as_i64()),
        )
        .map_err(|error| map_duplicate_name(error, name))?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Delete the category `category_id` belonging to `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::CategoryInUse] if any of the user's transactions reference the category,
/// - [Error::NotFound] if the category does not exist or belongs to another user,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_category(
    category_id: CategoryId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let in_use: bool = connection.query_row(
        "SELECT EXISTS(SELECT 1 FROM \"transaction\" WHERE category_id = ?1 AND user_id = ?2)",
        (category_id, user_id.as_i64()),
        |row| row.get(0),
    )?;

    if in_use {
        return Err(Error::CategoryInUse);
    }

    let rows_affected = connection.execute(
        "DELETE FROM category WHERE id = ?1 AND user_id = ?2",
        (category_id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

fn map_duplicate_name(error: rusqlite::Error, name: &str) -> Error {
    match error {
        rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
            if sql_error.extended_code == 2067 && desc.contains("category.") =>
        {
            Error::DuplicateCategoryName(name.to_owned())
        }
        error => error.into(),
    }
}

fn map_category_row(row: &Row) -> Result<Category, rusqlite::Error> {
    Ok(Category {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        name: row.get(2)?,
    })
}
