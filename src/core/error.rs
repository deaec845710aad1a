use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ExtractError {
    #[error("Cannot parse config: {0}")]
    ConfigParsingError(String),
    #[error("Discovery error: {0}")]
    DiscoveryError(String),
    #[error("Store error: {0}")]
    StoreError(String),
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("CSV error: {0}")]
    CsvError(String),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Scratch error: {0}")]
    ScratchError(String),
    #[error("Table '{0}' not found in source database")]
    TableNotFound(String),
    #[error("Invalid run partition: {0}")]
    InvalidPartition(String),
    #[error("Extract of table '{table}' failed: {source}")]
    TableFailed {
        table: String,
        #[source]
        source: Box<ExtractError>,
    },
    #[error("Run {partition} failed for tables: {}", .failed.join(", "))]
    RunFailed {
        partition: String,
        failed: Vec<String>,
    },
}

impl ExtractError {
    pub fn table_failed(table: &str, cause: ExtractError) -> Self {
        ExtractError::TableFailed {
            table: table.to_string(),
            source: Box::new(cause),
        }
    }
}

impl From<std::io::Error> for ExtractError {
    fn from(err: std::io::Error) -> Self {
        ExtractError::IoError(err.to_string())
    }
}

impl From<object_store::Error> for ExtractError {
    fn from(err: object_store::Error) -> Self {
        ExtractError::StoreError(err.to_string())
    }
}

impl From<csv::Error> for ExtractError {
    fn from(err: csv::Error) -> Self {
        ExtractError::CsvError(err.to_string())
    }
}

impl From<sqlx::Error> for ExtractError {
    fn from(err: sqlx::Error) -> Self {
        ExtractError::DatabaseError(err.to_string())
    }
}
