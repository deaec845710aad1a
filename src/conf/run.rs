use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Source tables mirrored on every run, in processing order.
pub const DEFAULT_TABLES: [&str; 11] = [
    "sales_order",
    "design",
    "currency",
    "staff",
    "counterparty",
    "address",
    "department",
    "purchase_order",
    "payment_type",
    "payment",
    "transaction",
];

/// What the coordinator does with the remaining tables once one has failed.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop at the first failed table; later tables are skipped.
    #[default]
    Abort,
    /// Keep rotating the remaining tables, then fail the run.
    Continue,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    #[serde(default = "RunConfig::default_tables")]
    pub tables: Vec<String>,
    #[serde(default)]
    pub on_table_error: FailurePolicy,
    #[serde(default)]
    pub scratch_dir: Option<PathBuf>,
}

impl RunConfig {
    fn default_tables() -> Vec<String> {
        DEFAULT_TABLES.iter().map(|t| t.to_string()).collect()
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            tables: Self::default_tables(),
            on_table_error: FailurePolicy::default(),
            scratch_dir: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_default() {
        let run = RunConfig::default();
        assert_eq!(run.tables.len(), 11);
        assert_eq!(run.tables[0], "sales_order");
        assert_eq!(run.tables[10], "transaction");
        assert_eq!(run.on_table_error, FailurePolicy::Abort);
        assert!(run.scratch_dir.is_none());
    }
}
