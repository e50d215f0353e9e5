use crate::Value;
use thiserror::Error;

/// Fault taxonomy of the repository layer.
///
/// "Not found" is not a fault: by-id lookups return `Ok(None)`.
#[derive(Debug, Error)]
pub enum Error {
    /// Repository type name does not follow the `<Entity>Repository`
    /// convention. Construction-time, unrecoverable.
    #[error("repository type name `{0}` does not end with the `Repository` suffix")]
    Construction(String),
    /// The driver could not produce a usable connection.
    #[error("could not acquire a connection")]
    Connection(#[source] anyhow::Error),
    /// The store rejected a statement (syntax, constraint, missing table).
    #[error("statement rejected by the store")]
    Execution(#[source] anyhow::Error),
    /// A row value does not fit the entity field it maps to.
    #[error("cannot convert {value:?} into a `{target}` field")]
    Mapping { value: Value, target: &'static str },
}

pub type Result<T> = std::result::Result<T, Error>;
