//! Change detection and versioning for the raw-data store.

mod coordinator;
mod differ;
mod rotator;
mod scratch;

pub use coordinator::{RunCoordinator, RunReport, TableReport, TableResult};
pub use differ::{HeaderWarning, TableDiff, check_headers, diff};
pub use rotator::{RotationOutcome, SnapshotRotator};
pub use scratch::{ScratchArea, ScratchFiles};
