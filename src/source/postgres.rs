use async_trait::async_trait;
use log::debug;
use sqlx::Row;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};

use crate::conf::DatabaseConfig;
use crate::core::ExtractError;
use crate::snapshot::{Row as SnapshotRow, TableSnapshot};

use super::TableSource;

const COLUMNS_QUERY: &str = "SELECT column_name::text \
     FROM information_schema.columns \
     WHERE table_schema = current_schema() AND table_name = $1 \
     ORDER BY ordinal_position";

/// [`TableSource`] backed by a PostgreSQL connection pool.
pub struct PostgresSource {
    pool: PgPool,
}

impl PostgresSource {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, ExtractError> {
        let creds = config.credentials()?;
        let options = PgConnectOptions::new()
            .host(&creds.host)
            .port(creds.port)
            .username(&creds.user)
            .password(&creds.password)
            .database(&creds.database);

        // Tables are read one after another, so one connection is enough.
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(config.connect_timeout)
            .connect_with(options)
            .await
            .map_err(|e| {
                ExtractError::DiscoveryError(format!(
                    "Failed to connect to database '{}' on {}:{}: {}",
                    creds.database, creds.host, creds.port, e
                ))
            })?;

        Ok(Self { pool })
    }

    pub fn with_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn close(self) {
        self.pool.close().await;
    }

    async fn column_names(&self, table: &str) -> Result<Vec<String>, ExtractError> {
        let rows = sqlx::query(COLUMNS_QUERY)
            .bind(table)
            .fetch_all(&self.pool)
            .await?;
        rows.iter()
            .map(|row| row.try_get::<String, _>(0).map_err(ExtractError::from))
            .collect()
    }
}

#[async_trait]
impl TableSource for PostgresSource {
    async fn fetch_table(&self, table: &str) -> Result<TableSnapshot, ExtractError> {
        let header = self.column_names(table).await?;
        if header.is_empty() {
            return Err(ExtractError::TableNotFound(table.to_string()));
        }

        let sql = select_all_as_text(table, &header);
        debug!("querying {table}: {sql}");

        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        let mut data = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut values: SnapshotRow = Vec::with_capacity(header.len());
            for idx in 0..header.len() {
                let value: Option<String> = row.try_get(idx)?;
                values.push(value.unwrap_or_default());
            }
            data.push(values);
        }

        Ok(TableSnapshot::new(header, data))
    }
}

fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Every column cast to text, ordered by the first column so the row order
/// is stable between runs.
fn select_all_as_text(table: &str, columns: &[String]) -> String {
    let projection = columns
        .iter()
        .map(|c| format!("{}::text", quote_ident(c)))
        .collect::<Vec<_>>()
        .join(", ");
    let mut sql = format!("SELECT {} FROM {}", projection, quote_ident(table));
    if let Some(first) = columns.first() {
        sql.push_str(&format!(" ORDER BY {}", quote_ident(first)));
    }
    sql
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_ident_escapes_quotes() {
        assert_eq!(quote_ident("transaction"), "\"transaction\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }

    #[test]
    fn test_select_all_as_text() {
        let columns = vec!["currency_id".to_string(), "currency_code".to_string()];
        assert_eq!(
            select_all_as_text("currency", &columns),
            "SELECT \"currency_id\"::text, \"currency_code\"::text FROM \"currency\" \
             ORDER BY \"currency_id\""
        );
    }
}
