use log::{info, warn};

use crate::core::ExtractError;
use crate::snapshot::TableSnapshot;
use crate::store::{RunPartition, SnapshotStore};

use super::differ::{HeaderWarning, diff};
use super::scratch::ScratchArea;

/// What a successful rotation did for one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RotationOutcome {
    /// No current snapshot existed; the full table was written as both the
    /// pointer and the run's delta.
    Bootstrapped { rows: usize },
    /// The delta against the previous pointer was recorded and the pointer
    /// moved forward.
    Rotated {
        changed: usize,
        dropped: usize,
        header_warning: Option<HeaderWarning>,
    },
}

/// Moves one table's current snapshot forward, recording the delta first.
pub struct SnapshotRotator {
    store: SnapshotStore,
    scratch: ScratchArea,
}

impl SnapshotRotator {
    pub fn new(store: SnapshotStore, scratch: ScratchArea) -> Self {
        Self { store, scratch }
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    /// Records `queried` as the table's new current snapshot.
    ///
    /// The history record for `partition` is always written before the
    /// pointer, so a failure part way leaves the previous pointer in place.
    pub async fn rotate(
        &self,
        table: &str,
        queried: &TableSnapshot,
        partition: &RunPartition,
    ) -> Result<RotationOutcome, ExtractError> {
        let new_bytes = queried.to_csv()?;

        let Some(previous_bytes) = self.store.get_current(table).await? else {
            self.store
                .put_delta(partition, table, new_bytes.clone())
                .await?;
            self.store.put_current(table, new_bytes).await?;
            info!(
                "Table '{}': bootstrapped with {} rows",
                table,
                queried.num_rows()
            );
            return Ok(RotationOutcome::Bootstrapped {
                rows: queried.num_rows(),
            });
        };

        let scratch = self.scratch.acquire(table)?;
        scratch.stage_previous(&previous_bytes).await?;
        scratch.stage_new(&new_bytes).await?;

        let previous = scratch.load_previous().await?;
        let fresh = scratch.load_new().await?;

        let result = diff(&previous, &fresh);
        if let Some(warning) = &result.header_warning {
            warn!("Table '{}': {}", table, warning);
        }
        if result.dropped > 0 {
            info!(
                "Table '{}': {} trailing rows no longer present, not recorded in delta",
                table, result.dropped
            );
        }

        let changed = result.changed.len();
        let dropped = result.dropped;
        let header_warning = result.header_warning.clone();

        let delta = result.into_snapshot().to_csv()?;
        self.store.put_delta(partition, table, delta).await?;
        self.store.put_current(table, new_bytes).await?;

        info!("Table '{}': rotated, {} changed rows", table, changed);
        Ok(RotationOutcome::Rotated {
            changed,
            dropped,
            header_warning,
        })
    }
}
