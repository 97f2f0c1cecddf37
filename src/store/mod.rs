//! Named-table storage the engine reads inputs from and materializes into

use std::collections::BTreeMap;

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::error::{EngineError, Result};
use crate::relation::Relation;

pub mod name;

pub use name::TableName;

/// Capability set the engine needs from a tabular backend.
///
/// Reads hand out owned snapshots; later writes to the store are never
/// visible through a relation that was already returned.
pub trait TableStore: Send + Sync {
    fn table(&self, name: &TableName) -> Result<Relation>;

    fn has_table(&self, name: &TableName) -> bool;

    /// Table names, ascending
    fn list_tables(&self) -> Vec<TableName>;

    /// Persist `relation` under `name`. Fails with `TableExists` rather than
    /// replacing an existing table.
    fn materialize(&self, name: &TableName, relation: Relation) -> Result<()>;

    /// Remove a table, returning its last contents
    fn drop_table(&self, name: &TableName) -> Result<Relation>;
}

/// Process-local store keeping every table in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<BTreeMap<TableName, Relation>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience for loaders: materialize a table from a plain string name
    pub fn insert(&self, name: &str, relation: Relation) -> Result<TableName> {
        let name = TableName::new(name)?;
        self.materialize(&name, relation)?;
        Ok(name)
    }
}

impl TableStore for MemoryStore {
    fn table(&self, name: &TableName) -> Result<Relation> {
        self.tables
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| EngineError::TableNotFound(name.to_string()))
    }

    fn has_table(&self, name: &TableName) -> bool {
        self.tables.read().contains_key(name)
    }

    fn list_tables(&self) -> Vec<TableName> {
        self.tables.read().keys().cloned().collect()
    }

    fn materialize(&self, name: &TableName, relation: Relation) -> Result<()> {
        let mut tables = self.tables.write();
        if tables.contains_key(name) {
            return Err(EngineError::TableExists(name.to_string()));
        }
        info!(table = %name, rows = relation.num_rows(), "materialized table");
        tables.insert(name.clone(), relation);
        Ok(())
    }

    fn drop_table(&self, name: &TableName) -> Result<Relation> {
        let dropped = self
            .tables
            .write()
            .remove(name)
            .ok_or_else(|| EngineError::TableNotFound(name.to_string()))?;
        debug!(table = %name, "dropped table");
        Ok(dropped)
    }
}
