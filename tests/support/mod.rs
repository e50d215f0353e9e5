//! In-memory backend for repository tests.
//!
//! Interprets exactly the statement grammar the core renders, nothing more.
//! Rows live in a store shared by every connection the driver hands out, so
//! a test can run several repository calls against the same tables.

use silo::{Connection, Driver, Error, GenericSqlWriter, Result, RowLabeled, RowsAffected, Value};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::sync::Arc;

#[derive(Default)]
struct Table {
    columns: Vec<String>,
    next_id: i64,
    rows: BTreeMap<i64, Vec<Value>>,
}

#[derive(Default)]
struct Store {
    tables: BTreeMap<String, Table>,
}

#[derive(Clone, Default)]
pub struct MemoryDriver {
    store: Rc<RefCell<Store>>,
}

impl MemoryDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_table(&self, name: &str) -> bool {
        self.store.borrow().tables.contains_key(name)
    }

    pub fn row_count(&self, name: &str) -> usize {
        self.store
            .borrow()
            .tables
            .get(name)
            .map(|t| t.rows.len())
            .unwrap_or(0)
    }
}

impl Driver for MemoryDriver {
    type Connection = MemoryConnection;
    type SqlWriter = GenericSqlWriter;

    fn connect(&self) -> Result<Self::Connection> {
        Ok(MemoryConnection {
            store: self.store.clone(),
        })
    }

    fn sql_writer(&self) -> Self::SqlWriter {
        GenericSqlWriter::new()
    }
}

/// Driver whose connections never materialize, for degrade-path tests.
pub struct UnreachableDriver;

impl Driver for UnreachableDriver {
    type Connection = MemoryConnection;
    type SqlWriter = GenericSqlWriter;

    fn connect(&self) -> Result<Self::Connection> {
        Err(Error::Connection(anyhow::anyhow!("store is unreachable")))
    }

    fn sql_writer(&self) -> Self::SqlWriter {
        GenericSqlWriter::new()
    }
}

pub struct MemoryConnection {
    store: Rc<RefCell<Store>>,
}

fn rejected(message: String) -> Error {
    Error::Execution(anyhow::anyhow!(message))
}

/// Split a fragment on top-level commas, ignoring commas inside quoted text.
fn split_top_level(input: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_quote = false;
    for (i, c) in input.char_indices() {
        match c {
            '\'' => in_quote = !in_quote,
            ',' if !in_quote => {
                parts.push(input[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    let last = input[start..].trim();
    if !last.is_empty() || !parts.is_empty() {
        parts.push(last);
    }
    parts
}

fn parse_value(token: &str) -> Value {
    if token == "NULL" {
        return Value::Null;
    }
    if let Some(inner) = token.strip_prefix('\'').and_then(|t| t.strip_suffix('\'')) {
        return Value::Text(inner.replace("''", "'"));
    }
    if token.contains('.') || token.contains('e') {
        Value::Float64(token.parse().expect("malformed float literal"))
    } else {
        Value::Integer(token.parse().expect("malformed integer literal"))
    }
}

impl MemoryConnection {
    fn create_table(&self, rest: &str) -> Result<RowsAffected> {
        let (name, body) = rest
            .split_once(" (")
            .ok_or_else(|| rejected(format!("malformed CREATE TABLE: {rest}")))?;
        let body = body
            .strip_suffix(')')
            .ok_or_else(|| rejected(format!("malformed CREATE TABLE: {rest}")))?;
        let mut columns = Vec::new();
        for fragment in split_top_level(body) {
            let column = fragment
                .split_whitespace()
                .next()
                .ok_or_else(|| rejected(format!("malformed column: {fragment}")))?;
            if column != "id" {
                columns.push(column.to_string());
            }
        }
        let mut store = self.store.borrow_mut();
        store.tables.entry(name.to_string()).or_insert(Table {
            columns,
            next_id: 0,
            rows: BTreeMap::new(),
        });
        Ok(RowsAffected::default())
    }

    fn insert(&self, rest: &str) -> Result<RowsAffected> {
        let (name, body) = rest
            .split_once(" (")
            .ok_or_else(|| rejected(format!("malformed INSERT: {rest}")))?;
        let (columns, values) = body
            .split_once(") VALUES (")
            .ok_or_else(|| rejected(format!("malformed INSERT: {rest}")))?;
        let values = values
            .strip_suffix(')')
            .ok_or_else(|| rejected(format!("malformed INSERT: {rest}")))?;
        let columns = split_top_level(columns);
        let values: Vec<Value> = split_top_level(values)
            .iter()
            .map(|v| parse_value(v))
            .collect();
        if columns.len() != values.len() {
            return Err(rejected(format!(
                "column count {} does not match value count {}",
                columns.len(),
                values.len()
            )));
        }
        let mut store = self.store.borrow_mut();
        let table = store
            .tables
            .get_mut(name)
            .ok_or_else(|| rejected(format!("no such table: {name}")))?;
        let mut row = vec![Value::Null; table.columns.len()];
        for (column, value) in columns.iter().zip(values) {
            let position = table
                .columns
                .iter()
                .position(|c| c == column)
                .ok_or_else(|| rejected(format!("no such column: {column}")))?;
            row[position] = value;
        }
        table.next_id += 1;
        let id = table.next_id;
        table.rows.insert(id, row);
        Ok(RowsAffected {
            rows_affected: 1,
            last_affected_id: Some(id),
        })
    }

    fn update(&self, rest: &str) -> Result<RowsAffected> {
        let (name, body) = rest
            .split_once(" SET ")
            .ok_or_else(|| rejected(format!("malformed UPDATE: {rest}")))?;
        let (assignments, id) = body
            .split_once(" WHERE id=")
            .ok_or_else(|| rejected(format!("malformed UPDATE: {rest}")))?;
        let id: i64 = id.parse().map_err(|_| rejected(format!("bad id: {id}")))?;
        let mut store = self.store.borrow_mut();
        let table = store
            .tables
            .get_mut(name)
            .ok_or_else(|| rejected(format!("no such table: {name}")))?;
        let positions: Vec<(usize, Value)> = split_top_level(assignments)
            .iter()
            .map(|assignment| {
                let (column, value) = assignment
                    .split_once('=')
                    .ok_or_else(|| rejected(format!("malformed assignment: {assignment}")))?;
                let position = table
                    .columns
                    .iter()
                    .position(|c| c == column)
                    .ok_or_else(|| rejected(format!("no such column: {column}")))?;
                Ok((position, parse_value(value)))
            })
            .collect::<Result<_>>()?;
        let Some(row) = table.rows.get_mut(&id) else {
            return Ok(RowsAffected::default());
        };
        for (position, value) in positions {
            row[position] = value;
        }
        Ok(RowsAffected {
            rows_affected: 1,
            last_affected_id: None,
        })
    }

    fn labeled(table: &Table, id: i64, row: &[Value]) -> RowLabeled {
        let labels: Arc<[String]> = std::iter::once("id".to_string())
            .chain(table.columns.iter().cloned())
            .collect();
        let values: Vec<Value> = std::iter::once(Value::Integer(id))
            .chain(row.iter().cloned())
            .collect();
        RowLabeled::new(labels, values.into_boxed_slice())
    }
}

impl Connection for MemoryConnection {
    fn execute(&mut self, sql: &str) -> Result<RowsAffected> {
        if let Some(rest) = sql.strip_prefix("CREATE TABLE IF NOT EXISTS ") {
            self.create_table(rest)
        } else if let Some(name) = sql.strip_prefix("DROP TABLE IF EXISTS ") {
            self.store.borrow_mut().tables.remove(name);
            Ok(RowsAffected::default())
        } else if let Some(name) = sql.strip_prefix("TRUNCATE TABLE ") {
            let mut store = self.store.borrow_mut();
            let table = store
                .tables
                .get_mut(name)
                .ok_or_else(|| rejected(format!("no such table: {name}")))?;
            let dropped = table.rows.len() as u64;
            table.rows.clear();
            Ok(RowsAffected {
                rows_affected: dropped,
                last_affected_id: None,
            })
        } else if let Some(rest) = sql.strip_prefix("INSERT INTO ") {
            self.insert(rest)
        } else if let Some(rest) = sql.strip_prefix("UPDATE ") {
            self.update(rest)
        } else if let Some(rest) = sql.strip_prefix("DELETE FROM ") {
            let (name, id) = rest
                .split_once(" WHERE id=")
                .ok_or_else(|| rejected(format!("malformed DELETE: {rest}")))?;
            let id: i64 = id.parse().map_err(|_| rejected(format!("bad id: {id}")))?;
            let mut store = self.store.borrow_mut();
            let table = store
                .tables
                .get_mut(name)
                .ok_or_else(|| rejected(format!("no such table: {name}")))?;
            let removed = table.rows.remove(&id).is_some() as u64;
            Ok(RowsAffected {
                rows_affected: removed,
                last_affected_id: None,
            })
        } else {
            Err(rejected(format!("unsupported statement: {sql}")))
        }
    }

    fn fetch(&mut self, sql: &str) -> Result<Vec<RowLabeled>> {
        let rest = sql
            .strip_prefix("SELECT * FROM ")
            .ok_or_else(|| rejected(format!("unsupported query: {sql}")))?;
        let store = self.store.borrow();
        if let Some((name, id)) = rest.split_once(" WHERE id=") {
            let id: i64 = id.parse().map_err(|_| rejected(format!("bad id: {id}")))?;
            let table = store
                .tables
                .get(name)
                .ok_or_else(|| rejected(format!("no such table: {name}")))?;
            return Ok(table
                .rows
                .get(&id)
                .map(|row| Self::labeled(table, id, row))
                .into_iter()
                .collect());
        }
        let (name, limit) = match rest.split_once(" LIMIT ") {
            Some((name, limit)) => (
                name,
                limit
                    .parse::<usize>()
                    .map_err(|_| rejected(format!("bad limit: {limit}")))?,
            ),
            None => (rest, usize::MAX),
        };
        let table = store
            .tables
            .get(name)
            .ok_or_else(|| rejected(format!("no such table: {name}")))?;
        Ok(table
            .rows
            .iter()
            .take(limit)
            .map(|(id, row)| Self::labeled(table, *id, row))
            .collect())
    }
}
