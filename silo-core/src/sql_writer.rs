use crate::{ColumnDef, SemanticType, TableRef, Value, separated_by};
use std::fmt::Write;

/// Maps a field classification to the target store's column type keyword.
pub trait TypeMapper {
    fn sql_type(&self, ty: SemanticType) -> &'static str;
}

/// The MySQL-flavored keyword table used by the generated DDL.
pub struct MysqlTypeMapper;

impl TypeMapper for MysqlTypeMapper {
    fn sql_type(&self, ty: SemanticType) -> &'static str {
        match ty {
            SemanticType::Integer => "INT",
            SemanticType::Float32 => "FLOAT",
            SemanticType::Float64 => "DOUBLE",
            // Transport-encoded 0/1.
            SemanticType::Boolean => "INT",
            SemanticType::Text => "TEXT",
        }
    }
}

/// Pure string assembly of every statement the repository executes.
///
/// One method per statement kind, all appending to a caller-owned buffer.
/// Values are embedded as SQL literals: numbers unquoted, booleans as 1/0,
/// text single-quoted with `'` doubled. INSERT renders its column list and
/// value list from the same slice in a single traversal, so the two cannot
/// fall out of alignment.
pub trait SqlWriter {
    fn type_mapper(&self) -> &dyn TypeMapper {
        &MysqlTypeMapper
    }

    fn write_value(&self, out: &mut String, value: &Value) {
        match value {
            Value::Null => out.push_str("NULL"),
            Value::Integer(v) => {
                let mut buffer = itoa::Buffer::new();
                out.push_str(buffer.format(*v));
            }
            Value::Float32(v) => {
                let mut buffer = ryu::Buffer::new();
                out.push_str(buffer.format(*v));
            }
            Value::Float64(v) => {
                let mut buffer = ryu::Buffer::new();
                out.push_str(buffer.format(*v));
            }
            Value::Boolean(v) => out.push_str(["0", "1"][*v as usize]),
            Value::Text(v) => self.write_value_string(out, v),
        }
    }

    fn write_value_string(&self, out: &mut String, value: &str) {
        out.push('\'');
        let mut position = 0;
        for (i, c) in value.char_indices() {
            if c == '\'' {
                out.push_str(&value[position..i]);
                out.push_str("''");
                position = i + 1;
            }
        }
        out.push_str(&value[position..]);
        out.push('\'');
    }

    fn write_select_all(&self, out: &mut String, table: &TableRef, limit: Option<u32>) {
        out.push_str("SELECT * FROM ");
        out.push_str(&table.name);
        if let Some(limit) = limit {
            let _ = write!(out, " LIMIT {}", limit);
        }
    }

    fn write_select_by_id(&self, out: &mut String, table: &TableRef, id: i64) {
        out.push_str("SELECT * FROM ");
        out.push_str(&table.name);
        let _ = write!(out, " WHERE id={}", id);
    }

    fn write_insert(&self, out: &mut String, table: &TableRef, row: &[(&'static str, Value)]) {
        out.push_str("INSERT INTO ");
        out.push_str(&table.name);
        out.push_str(" (");
        separated_by(out, row, |out, (name, _)| out.push_str(name), ", ");
        out.push_str(") VALUES (");
        separated_by(out, row, |out, (_, value)| self.write_value(out, value), ", ");
        out.push(')');
    }

    fn write_update(
        &self,
        out: &mut String,
        table: &TableRef,
        row: &[(&'static str, Value)],
        id: i64,
    ) {
        out.push_str("UPDATE ");
        out.push_str(&table.name);
        out.push_str(" SET ");
        separated_by(
            out,
            row,
            |out, (name, value)| {
                out.push_str(name);
                out.push('=');
                self.write_value(out, value);
            },
            ", ",
        );
        let _ = write!(out, " WHERE id={}", id);
    }

    fn write_delete_by_id(&self, out: &mut String, table: &TableRef, id: i64) {
        out.push_str("DELETE FROM ");
        out.push_str(&table.name);
        let _ = write!(out, " WHERE id={}", id);
    }

    fn write_truncate(&self, out: &mut String, table: &TableRef) {
        out.push_str("TRUNCATE TABLE ");
        out.push_str(&table.name);
    }

    fn write_create_table(&self, out: &mut String, table: &TableRef, columns: &[ColumnDef]) {
        out.push_str("CREATE TABLE IF NOT EXISTS ");
        out.push_str(&table.name);
        out.push_str(" (id integer PRIMARY KEY AUTO_INCREMENT");
        for column in columns.iter().filter(|c| !c.primary_key) {
            out.push_str(", ");
            out.push_str(column.name);
            out.push(' ');
            out.push_str(self.type_mapper().sql_type(column.ty));
        }
        out.push(')');
    }

    fn write_drop_table(&self, out: &mut String, table: &TableRef) {
        out.push_str("DROP TABLE IF EXISTS ");
        out.push_str(&table.name);
    }
}

/// Writer producing the portable statement grammar shared by every
/// persistence-layer-compatible store.
pub struct GenericSqlWriter;

impl GenericSqlWriter {
    pub const fn new() -> Self {
        Self {}
    }
}

impl Default for GenericSqlWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlWriter for GenericSqlWriter {}
