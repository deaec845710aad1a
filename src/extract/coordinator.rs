use log::{error, info};

use crate::conf::FailurePolicy;
use crate::core::ExtractError;
use crate::source::TableSource;
use crate::store::RunPartition;

use super::rotator::{RotationOutcome, SnapshotRotator};

#[derive(Debug, Clone, PartialEq)]
pub enum TableResult {
    Succeeded(RotationOutcome),
    Failed(ExtractError),
    /// Not attempted because an earlier table failed under [`FailurePolicy::Abort`].
    Skipped,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableReport {
    pub table: String,
    pub result: TableResult,
}

/// Per-table results of one run, all sharing the same partition.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub partition: RunPartition,
    pub tables: Vec<TableReport>,
}

impl RunReport {
    pub fn failed(&self) -> impl Iterator<Item = (&str, &ExtractError)> {
        self.tables.iter().filter_map(|t| match &t.result {
            TableResult::Failed(e) => Some((t.table.as_str(), e)),
            _ => None,
        })
    }

    pub fn succeeded(&self) -> usize {
        self.tables
            .iter()
            .filter(|t| matches!(t.result, TableResult::Succeeded(_)))
            .count()
    }

    /// The run is all-or-nothing from the caller's point of view: one failed
    /// table fails the run with its cause, several fail it with their names.
    pub fn into_result(self) -> Result<RunReport, ExtractError> {
        let mut failed: Vec<(String, ExtractError)> = self
            .failed()
            .map(|(table, e)| (table.to_string(), e.clone()))
            .collect();

        match failed.len() {
            0 => Ok(self),
            1 => {
                let (table, cause) = failed.remove(0);
                Err(ExtractError::table_failed(&table, cause))
            }
            _ => Err(ExtractError::RunFailed {
                partition: self.partition.to_string(),
                failed: failed.into_iter().map(|(table, _)| table).collect(),
            }),
        }
    }
}

/// Runs the extract stage over a fixed, ordered list of tables.
pub struct RunCoordinator<S: TableSource> {
    source: S,
    rotator: SnapshotRotator,
    tables: Vec<String>,
    policy: FailurePolicy,
}

impl<S: TableSource> RunCoordinator<S> {
    pub fn new(
        source: S,
        rotator: SnapshotRotator,
        tables: Vec<String>,
        policy: FailurePolicy,
    ) -> Self {
        Self {
            source,
            rotator,
            tables,
            policy,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn rotator(&self) -> &SnapshotRotator {
        &self.rotator
    }

    pub fn into_source(self) -> S {
        self.source
    }

    /// Runs every table against a partition taken from the wall clock once,
    /// at the start of the run.
    pub async fn run(&self) -> Result<RunPartition, ExtractError> {
        let report = self.run_at(RunPartition::now()).await?;
        Ok(report.partition)
    }

    pub async fn run_at(&self, partition: RunPartition) -> Result<RunReport, ExtractError> {
        self.execute(partition).await.into_result()
    }

    /// Processes the tables one at a time, in order, collecting a result for
    /// each. Completed tables are never rolled back.
    pub async fn execute(&self, partition: RunPartition) -> RunReport {
        info!(
            "Starting extract run {} over {} tables",
            partition,
            self.tables.len()
        );

        let mut reports = Vec::with_capacity(self.tables.len());
        let mut aborted = false;

        for table in &self.tables {
            if aborted {
                reports.push(TableReport {
                    table: table.clone(),
                    result: TableResult::Skipped,
                });
                continue;
            }

            let result = match self.extract_table(table, &partition).await {
                Ok(outcome) => TableResult::Succeeded(outcome),
                Err(e) => {
                    error!("Table '{}': extract failed: {}", table, e);
                    if self.policy == FailurePolicy::Abort {
                        aborted = true;
                    }
                    TableResult::Failed(e)
                }
            };
            reports.push(TableReport {
                table: table.clone(),
                result,
            });
        }

        let report = RunReport {
            partition,
            tables: reports,
        };
        info!(
            "Extract run {} finished: {}/{} tables succeeded",
            report.partition,
            report.succeeded(),
            report.tables.len()
        );
        report
    }

    async fn extract_table(
        &self,
        table: &str,
        partition: &RunPartition,
    ) -> Result<RotationOutcome, ExtractError> {
        let queried = self.source.fetch_table(table).await?;
        self.rotator.rotate(table, &queried, partition).await
    }
}
