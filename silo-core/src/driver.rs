use crate::{Connection, Result, SqlWriter};

/// A backend: knows how to open connections and which SQL dialect to write.
///
/// The driver value carries whatever configuration its backend needs
/// (URL, credentials, file path); the core never looks inside.
pub trait Driver {
    type Connection: Connection;
    type SqlWriter: SqlWriter;

    /// Acquire a fresh connection, scoped to the repository call that asked
    /// for it.
    fn connect(&self) -> Result<Self::Connection>;

    fn sql_writer(&self) -> Self::SqlWriter;
}
