//! Test and benchmark utilities.
//!
//! This module is only available when the `testutil` feature is enabled.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use object_store::ObjectStore;
use object_store::memory::InMemory;

use crate::conf::{DEFAULT_TABLES, FailurePolicy};
use crate::core::ExtractError;
use crate::extract::{RunCoordinator, ScratchArea, SnapshotRotator};
use crate::snapshot::{Row, TableSnapshot};
use crate::source::TableSource;
use crate::store::{RunPartition, SnapshotStore};

/// In-memory [`TableSource`] whose tables can be edited between runs.
#[derive(Default)]
pub struct MemorySource {
    tables: Mutex<HashMap<String, TableSnapshot>>,
    failing: Mutex<HashSet<String>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Source holding `rows` for every default table, all with the staff header.
    pub fn with_default_tables(rows: usize) -> Self {
        let source = Self::new();
        for table in DEFAULT_TABLES {
            source.set_table(table, staff_snapshot(rows));
        }
        source
    }

    pub fn set_table(&self, table: &str, snapshot: TableSnapshot) {
        self.tables
            .lock()
            .unwrap()
            .insert(table.to_string(), snapshot);
    }

    pub fn update_table(&self, table: &str, f: impl FnOnce(&mut TableSnapshot)) {
        let mut tables = self.tables.lock().unwrap();
        let snapshot = tables.entry(table.to_string()).or_default();
        f(snapshot);
    }

    /// Current content of `table`. Panics when the table was never set.
    pub fn table(&self, table: &str) -> TableSnapshot {
        self.tables.lock().unwrap()[table].clone()
    }

    /// Makes `fetch_table` fail for this table until [`MemorySource::heal`].
    pub fn fail_table(&self, table: &str) {
        self.failing.lock().unwrap().insert(table.to_string());
    }

    pub fn heal(&self, table: &str) {
        self.failing.lock().unwrap().remove(table);
    }
}

#[async_trait]
impl TableSource for MemorySource {
    async fn fetch_table(&self, table: &str) -> Result<TableSnapshot, ExtractError> {
        if self.failing.lock().unwrap().contains(table) {
            return Err(ExtractError::DatabaseError(format!(
                "query for table {table} failed"
            )));
        }
        self.tables
            .lock()
            .unwrap()
            .get(table)
            .cloned()
            .ok_or_else(|| ExtractError::TableNotFound(table.to_string()))
    }
}

pub const STAFF_HEADER: [&str; 7] = [
    "staff_id",
    "first_name",
    "last_name",
    "department_id",
    "email_address",
    "created_at",
    "last_updated",
];

/// Deterministic staff row for index `i` (ids start at 1).
pub fn staff_row(i: usize) -> Row {
    let id = i + 1;
    vec![
        id.to_string(),
        format!("First{id}"),
        format!("Last{id}"),
        (id % 3 + 1).to_string(),
        format!("first{id}.last{id}@example.com"),
        "2023-08-10 08:00:00".to_string(),
        "2023-08-10 08:00:00".to_string(),
    ]
}

pub fn staff_snapshot(rows: usize) -> TableSnapshot {
    TableSnapshot::new(
        STAFF_HEADER.iter().map(|s| s.to_string()).collect(),
        (0..rows).map(staff_row).collect(),
    )
}

pub fn partition_at(h: u32, m: u32, s: u32) -> RunPartition {
    RunPartition::from_datetime(
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap(),
    )
}

pub fn memory_object_store() -> Arc<dyn ObjectStore> {
    Arc::new(InMemory::new())
}

/// Coordinator over `source` and `store` with the default table list and
/// scratch files in the system temp dir.
pub fn make_coordinator(
    source: Arc<MemorySource>,
    store: Arc<dyn ObjectStore>,
    policy: FailurePolicy,
) -> RunCoordinator<Arc<MemorySource>> {
    let rotator = SnapshotRotator::new(SnapshotStore::new(store, ""), ScratchArea::default());
    RunCoordinator::new(
        source,
        rotator,
        DEFAULT_TABLES.iter().map(|t| t.to_string()).collect(),
        policy,
    )
}
