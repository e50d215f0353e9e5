use crate::{Connection, Driver, Entity, Error, Result, RowsAffected, SqlWriter, TableRef, from_row};
use log::{debug, error};
use std::marker::PhantomData;

/// Legacy row-scan budget applied by the lenient facade, matching the fixed
/// result array of the original implementation.
const LEGACY_ROW_CAP: usize = 1000;

/// The CRUD facade for one entity type over one backend.
///
/// Table identity is resolved once at construction and never changes. Every
/// operation acquires its own connection from the driver, renders one
/// statement, executes it and lets the connection drop. Faults surface as
/// [`Error`]; callers that want the historical swallow-and-degrade behavior
/// use [`Repository::lenient`].
pub struct Repository<E: Entity, D: Driver> {
    driver: D,
    table: TableRef,
    scan_limit: Option<u32>,
    _entity: PhantomData<E>,
}

impl<E: Entity, D: Driver> Repository<E, D> {
    /// Build a repository on the entity's own table identity.
    pub fn new(driver: D) -> Self {
        Self::with_table(driver, E::table())
    }

    /// Build a repository against an explicitly supplied table identity,
    /// e.g. one resolved through [`TableRef::from_repository_name`].
    pub fn with_table(driver: D, table: TableRef) -> Self {
        Self {
            driver,
            table,
            scan_limit: None,
            _entity: PhantomData,
        }
    }

    /// Cap full-table scans at `limit` rows. Unbounded by default.
    pub fn with_scan_limit(mut self, limit: u32) -> Self {
        self.scan_limit = Some(limit);
        self
    }

    pub fn table(&self) -> &TableRef {
        &self.table
    }

    fn connect(&self) -> Result<D::Connection> {
        self.driver.connect()
    }

    fn execute(&self, sql: String) -> Result<RowsAffected> {
        debug!("{}", sql);
        self.connect()?.execute(&sql)
    }

    /// Fetch every row of the table, materialized in result-set order.
    pub fn find_all(&self) -> Result<Vec<E>> {
        let writer = self.driver.sql_writer();
        let mut sql = String::with_capacity(64);
        writer.write_select_all(&mut sql, &self.table, self.scan_limit);
        debug!("{}", sql);
        let rows = self.connect()?.fetch(&sql)?;
        rows.iter().map(from_row).collect()
    }

    /// Fetch the row with the given primary key. `Ok(None)` when absent.
    pub fn find(&self, id: i64) -> Result<Option<E>> {
        let writer = self.driver.sql_writer();
        let mut sql = String::with_capacity(64);
        writer.write_select_by_id(&mut sql, &self.table, id);
        debug!("{}", sql);
        let rows = self.connect()?.fetch(&sql)?;
        rows.first().map(from_row).transpose()
    }

    /// Insert one row. On success the store-generated key is written back
    /// into the entity's `id` field.
    pub fn insert(&self, entity: &mut E) -> Result<()> {
        let writer = self.driver.sql_writer();
        let row = entity.values();
        let mut sql = String::with_capacity(128);
        writer.write_insert(&mut sql, &self.table, &row);
        let affected = self.execute(sql)?;
        let id = affected.last_affected_id.ok_or_else(|| {
            Error::Execution(anyhow::anyhow!(
                "INSERT into `{}` returned no generated key",
                self.table.name
            ))
        })?;
        entity.set_id(id);
        Ok(())
    }

    /// Insert each entity independently. A failing item is logged and
    /// skipped, never aborting the rest of the batch; returns how many rows
    /// made it in.
    pub fn insert_many(&self, entities: &mut [E]) -> usize {
        let mut inserted = 0;
        for entity in entities {
            match self.insert(entity) {
                Ok(()) => inserted += 1,
                Err(e) => error!("insert into `{}` failed: {:#}", self.table.name, e),
            }
        }
        inserted
    }

    /// Rewrite every non-key column of the row carrying the entity's `id`.
    /// Fire-and-forget: the affected row count is not surfaced.
    pub fn update(&self, entity: &E) -> Result<()> {
        let writer = self.driver.sql_writer();
        let row = entity.values();
        let mut sql = String::with_capacity(128);
        writer.write_update(&mut sql, &self.table, &row, entity.id());
        self.execute(sql)?;
        Ok(())
    }

    /// Delete the row with the given primary key.
    pub fn delete(&self, id: i64) -> Result<()> {
        let writer = self.driver.sql_writer();
        let mut sql = String::with_capacity(64);
        writer.write_delete_by_id(&mut sql, &self.table, id);
        self.execute(sql)?;
        Ok(())
    }

    /// Truncate the table.
    pub fn delete_all(&self) -> Result<()> {
        let writer = self.driver.sql_writer();
        let mut sql = String::with_capacity(64);
        writer.write_truncate(&mut sql, &self.table);
        self.execute(sql)?;
        Ok(())
    }

    /// Create the table from the entity's column descriptors.
    pub fn create_table(&self) -> Result<()> {
        let writer = self.driver.sql_writer();
        let mut sql = String::with_capacity(128);
        writer.write_create_table(&mut sql, &self.table, E::columns());
        self.execute(sql)?;
        Ok(())
    }

    /// Drop the table if it exists.
    pub fn drop_table(&self) -> Result<()> {
        let writer = self.driver.sql_writer();
        let mut sql = String::with_capacity(64);
        writer.write_drop_table(&mut sql, &self.table);
        self.execute(sql)?;
        Ok(())
    }

    /// Drop, re-create, then truncate the table.
    ///
    /// The trailing truncate of a table that was just created is redundant;
    /// it is kept because callers of the historical API observed its
    /// statement sequence.
    pub fn reset_table(&self) -> Result<()> {
        self.drop_table()?;
        self.create_table()?;
        self.delete_all()
    }

    /// The swallow-and-degrade view of this repository.
    pub fn lenient(&self) -> Lenient<'_, E, D> {
        Lenient(self)
    }
}

/// Compatibility facade reproducing the original call surface: every fault
/// is logged and the call degrades to an empty, default or `false` result
/// instead of propagating. New code should call [`Repository`] directly.
pub struct Lenient<'a, E: Entity, D: Driver>(&'a Repository<E, D>);

impl<E: Entity, D: Driver> Lenient<'_, E, D> {
    /// Full scan, capped at the legacy 1000-row budget. Empty on fault.
    pub fn find_all(&self) -> Vec<E> {
        match self.0.find_all() {
            Ok(mut rows) => {
                rows.truncate(LEGACY_ROW_CAP);
                rows
            }
            Err(e) => {
                error!("SELECT from `{}` failed: {:#}", self.0.table.name, e);
                Vec::new()
            }
        }
    }

    /// By-id lookup returning a default-valued entity when the row is
    /// absent or the store unreachable, exactly like the original.
    pub fn find(&self, id: i64) -> E {
        match self.0.find(id) {
            Ok(Some(entity)) => entity,
            Ok(None) => E::default(),
            Err(e) => {
                error!("SELECT from `{}` failed: {:#}", self.0.table.name, e);
                E::default()
            }
        }
    }

    pub fn insert(&self, entity: &mut E) -> bool {
        match self.0.insert(entity) {
            Ok(()) => true,
            Err(e) => {
                error!("INSERT into `{}` failed: {:#}", self.0.table.name, e);
                false
            }
        }
    }

    pub fn insert_many(&self, entities: &mut [E]) {
        self.0.insert_many(entities);
    }

    pub fn update(&self, entity: &E) {
        if let Err(e) = self.0.update(entity) {
            error!("UPDATE of `{}` failed: {:#}", self.0.table.name, e);
        }
    }

    pub fn delete(&self, id: i64) {
        if let Err(e) = self.0.delete(id) {
            error!("DELETE from `{}` failed: {:#}", self.0.table.name, e);
        }
    }

    pub fn delete_all(&self) {
        if let Err(e) = self.0.delete_all() {
            error!("TRUNCATE of `{}` failed: {:#}", self.0.table.name, e);
        }
    }

    pub fn create_table(&self) {
        if let Err(e) = self.0.create_table() {
            error!("CREATE of `{}` failed: {:#}", self.0.table.name, e);
        }
    }

    pub fn drop_table(&self) {
        if let Err(e) = self.0.drop_table() {
            error!("DROP of `{}` failed: {:#}", self.0.table.name, e);
        }
    }

    pub fn reset_table(&self) {
        if let Err(e) = self.0.reset_table() {
            error!("reset of `{}` failed: {:#}", self.0.table.name, e);
        }
    }
}
