/// The abstract classification of an entity field, independent of any
/// backend's concrete type system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemanticType {
    Integer,
    Float32,
    Float64,
    Boolean,
    Text,
}

/// Declarative description of one table column.
///
/// The derive emits these as a `static` slice in field declaration order.
/// That order is load-bearing: INSERT column and value lists are both driven
/// by the same traversal of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    /// Column name (defaults to the field name).
    pub name: &'static str,
    /// Field classification, also drives the CREATE TABLE type keyword.
    pub ty: SemanticType,
    /// True only for the auto-generated integer `id` column.
    pub primary_key: bool,
}
