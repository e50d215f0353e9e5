use crate::{ColumnDef, Result, RowLabeled, TableRef, Value};
use std::iter::zip;

/// A persistable record: one instance corresponds to one table row.
///
/// Implemented by `#[derive(Entity)]`, which builds the column descriptor
/// table from the struct's fields in declaration order, or by hand for types
/// that need an explicitly registered descriptor table.
///
/// The column literally named `id` is the integer primary key: auto-generated
/// by the store and therefore excluded from [`Entity::values`].
pub trait Entity: Default {
    /// Identity of the backing table.
    fn table() -> TableRef;

    /// Column descriptors in field declaration order, primary key included.
    fn columns() -> &'static [ColumnDef];

    /// Column descriptors excluding the generated primary key.
    fn data_columns() -> impl Iterator<Item = &'static ColumnDef> {
        Self::columns().iter().filter(|c| !c.primary_key)
    }

    /// Current field values excluding `id`, in declaration order.
    ///
    /// Recomputed on every call: the repository is low-volume administrative
    /// CRUD and caching would only add lifetime baggage.
    fn values(&self) -> Vec<(&'static str, Value)>;

    /// Write one column value into the matching field.
    ///
    /// Returns `Ok(false)` when the column is not declared on this entity;
    /// the caller skips it and the field keeps its default.
    fn set_field(&mut self, column: &str, value: &Value) -> Result<bool>;

    fn id(&self) -> i64;
    fn set_id(&mut self, id: i64);
}

/// Materialize one entity from a query row.
///
/// Starts from `E::default()` and applies the inbound coercion for every row
/// column that matches a declared field. NULL cells and columns the entity
/// does not declare leave the field default-valued.
pub fn from_row<E: Entity>(row: &RowLabeled) -> Result<E> {
    let mut entity = E::default();
    for (label, value) in zip(row.labels.iter(), row.values.iter()) {
        if value.is_null() {
            continue;
        }
        entity.set_field(label, value)?;
    }
    Ok(entity)
}
