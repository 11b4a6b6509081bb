//! Type aliases for integer database IDs.

/// The integer rowid type used for all database tables.
pub type DatabaseId = i64;
