//! The raw-data snapshot store: one current CSV per table under `source/`
//! and one delta CSV per table per run under `history/<partition>`.

mod connect;
mod keys;
mod partition;
mod snapshot_store;

pub use connect::{create_local_store, create_s3_store, create_store};
pub use keys::{DIFFERENCES_FILE_SUFFIX, HISTORY_PATH, SOURCE_FILE_SUFFIX, SOURCE_PATH};
pub use partition::RunPartition;
pub use snapshot_store::SnapshotStore;
