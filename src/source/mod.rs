mod postgres;

pub use postgres::PostgresSource;

use std::sync::Arc;

use async_trait::async_trait;

use crate::core::ExtractError;
use crate::snapshot::TableSnapshot;

/// Live operational database, queried for a table's full content.
#[async_trait]
pub trait TableSource: Send + Sync {
    /// Full current content of `table`: ordered column names plus every row,
    /// all values rendered as text.
    async fn fetch_table(&self, table: &str) -> Result<TableSnapshot, ExtractError>;
}

#[async_trait]
impl<T: TableSource + ?Sized> TableSource for Arc<T> {
    async fn fetch_table(&self, table: &str) -> Result<TableSnapshot, ExtractError> {
        (**self).fetch_table(table).await
    }
}
