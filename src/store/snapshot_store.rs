use std::sync::Arc;

use bytes::Bytes;
use log::debug;
use object_store::path::Path as ObjectPath;
use object_store::{ObjectStore, PutPayload};
use tokio_stream::StreamExt;

use crate::core::ExtractError;

use super::RunPartition;
use super::keys::KeyLayout;

/// Current snapshot pointers and per-run delta records on top of an
/// [`ObjectStore`].
///
/// The pointer slot of each table is overwritten in place with no
/// concurrency token, so a store must only ever be written by one run at a
/// time.
#[derive(Clone)]
pub struct SnapshotStore {
    store: Arc<dyn ObjectStore>,
    keys: KeyLayout,
}

impl SnapshotStore {
    pub fn new(store: Arc<dyn ObjectStore>, prefix: &str) -> Self {
        Self {
            store,
            keys: KeyLayout::new(prefix),
        }
    }

    pub fn current_key(&self, table: &str) -> ObjectPath {
        self.keys.current(table)
    }

    pub fn delta_key(&self, partition: &RunPartition, table: &str) -> ObjectPath {
        self.keys.delta(partition, table)
    }

    /// Checks the store can be listed at its root.
    pub async fn probe(&self) -> Result<(), ExtractError> {
        let root = self.keys.root();
        self.store
            .list_with_delimiter(root.as_ref())
            .await
            .map(|_| ())
            .map_err(|e| ExtractError::DiscoveryError(format!("snapshot store unreachable: {e}")))
    }

    /// Content of the table's current snapshot, or `None` before the first run.
    pub async fn get_current(&self, table: &str) -> Result<Option<Bytes>, ExtractError> {
        self.get_optional(&self.keys.current(table)).await
    }

    pub async fn put_current(&self, table: &str, data: Bytes) -> Result<(), ExtractError> {
        self.put(&self.keys.current(table), data).await
    }

    pub async fn get_delta(
        &self,
        partition: &RunPartition,
        table: &str,
    ) -> Result<Option<Bytes>, ExtractError> {
        self.get_optional(&self.keys.delta(partition, table)).await
    }

    pub async fn put_delta(
        &self,
        partition: &RunPartition,
        table: &str,
        data: Bytes,
    ) -> Result<(), ExtractError> {
        self.put(&self.keys.delta(partition, table), data).await
    }

    /// Names of the tables that have a delta record in the given run, sorted.
    pub async fn list_deltas(&self, partition: &RunPartition) -> Result<Vec<String>, ExtractError> {
        let dir = self.keys.partition_dir(partition);
        let mut tables = Vec::new();
        let mut stream = self.store.list(Some(&dir));

        while let Some(result) = stream.next().await {
            let meta = result?;
            // Only direct children of the partition directory.
            let Some(rest) = meta.location.prefix_match(&dir) else {
                continue;
            };
            let parts: Vec<_> = rest.collect();
            if let [file] = parts.as_slice() {
                if let Some(table) = KeyLayout::table_from_delta_filename(file.as_ref()) {
                    tables.push(table.to_string());
                }
            }
        }

        tables.sort();
        Ok(tables)
    }

    async fn get_optional(&self, path: &ObjectPath) -> Result<Option<Bytes>, ExtractError> {
        match self.store.get(path).await {
            Ok(result) => Ok(Some(result.bytes().await?)),
            Err(object_store::Error::NotFound { .. }) => {
                debug!("object {path} not found");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn put(&self, path: &ObjectPath, data: Bytes) -> Result<(), ExtractError> {
        let size = data.len();
        self.store
            .put(path, PutPayload::from(data))
            .await
            .map_err(|e| ExtractError::StoreError(format!("writing {path}: {e}")))?;
        debug!("wrote {size} bytes to {path}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use object_store::local::LocalFileSystem;
    use object_store::memory::InMemory;
    use tempfile::TempDir;

    fn partition(second: u32) -> RunPartition {
        RunPartition::from_datetime(
            NaiveDate::from_ymd_opt(2024, 2, 29)
                .unwrap()
                .and_hms_opt(13, 45, second)
                .unwrap(),
        )
    }

    fn memory_store() -> SnapshotStore {
        SnapshotStore::new(Arc::new(InMemory::new()), "")
    }

    #[tokio::test]
    async fn test_missing_current_is_none() {
        let store = memory_store();
        assert_eq!(store.get_current("staff").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_current_roundtrip_overwrites() {
        let store = memory_store();
        store
            .put_current("staff", Bytes::from_static(b"id\n1\n"))
            .await
            .unwrap();
        store
            .put_current("staff", Bytes::from_static(b"id\n2\n"))
            .await
            .unwrap();
        assert_eq!(
            store.get_current("staff").await.unwrap(),
            Some(Bytes::from_static(b"id\n2\n"))
        );
    }

    #[tokio::test]
    async fn test_list_deltas_groups_by_partition() {
        let store = memory_store();
        let first = partition(0);
        let second = partition(1);

        for table in ["staff", "currency", "design"] {
            store
                .put_delta(&first, table, Bytes::from_static(b"id\n"))
                .await
                .unwrap();
        }
        store
            .put_delta(&second, "payment", Bytes::from_static(b"id\n"))
            .await
            .unwrap();
        store
            .put_current("staff", Bytes::from_static(b"id\n"))
            .await
            .unwrap();

        assert_eq!(
            store.list_deltas(&first).await.unwrap(),
            vec!["currency", "design", "staff"]
        );
        assert_eq!(store.list_deltas(&second).await.unwrap(), vec!["payment"]);
    }

    #[tokio::test]
    async fn test_prefixed_store_keys() {
        let inner: Arc<dyn ObjectStore> = Arc::new(InMemory::new());
        let store = SnapshotStore::new(inner.clone(), "raw");
        store
            .put_current("design", Bytes::from_static(b"design_id\n"))
            .await
            .unwrap();

        let raw = inner
            .get(&ObjectPath::from("raw/source/design_new.csv"))
            .await
            .unwrap()
            .bytes()
            .await
            .unwrap();
        assert_eq!(&raw[..], b"design_id\n");
    }

    #[tokio::test]
    async fn test_local_store_layout_on_disk() {
        let dir = TempDir::new().unwrap();
        let fs = LocalFileSystem::new_with_prefix(dir.path()).unwrap();
        let store = SnapshotStore::new(Arc::new(fs), "");

        store
            .put_delta(&partition(5), "address", Bytes::from_static(b"address_id\n"))
            .await
            .unwrap();

        let expected = dir
            .path()
            .join("history/2024/02/29/13:45:05/address_differences.csv");
        assert!(expected.is_file());
    }

    #[tokio::test]
    async fn test_probe_memory_store() {
        assert!(memory_store().probe().await.is_ok());
    }
}
