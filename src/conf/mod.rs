mod config;
mod database;
mod run;
mod store;

pub use config::Config;
pub use database::{DatabaseConfig, DatabaseCredentials};
pub use run::{DEFAULT_TABLES, FailurePolicy, RunConfig};
pub use store::{LocalStoreConfig, S3StoreConfig, StoreConfig};
