use crate::{Result, RowLabeled, RowsAffected};

/// A live channel to the store, able to run literal SQL text.
///
/// The repository acquires one per call and drops it when the call returns;
/// implementations release their backend handle in `Drop`. Nothing here is
/// pooled, retried or shared between calls.
pub trait Connection {
    /// Run a modify/DDL statement and report its effect.
    fn execute(&mut self, sql: &str) -> Result<RowsAffected>;

    /// Run a query and drain the full result set.
    fn fetch(&mut self, sql: &str) -> Result<Vec<RowLabeled>>;
}
