use anyhow::Context;
use clap::Parser;
use log::info;
use serde_json::json;

use rawsnap::conf::Config;
use rawsnap::core::{CliArgs, setup_logging};
use rawsnap::extract::{RunCoordinator, ScratchArea, SnapshotRotator};
use rawsnap::source::PostgresSource;
use rawsnap::store::{SnapshotStore, create_store};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_logging();
    let args = CliArgs::parse();
    info!(args = args; "rawsnap started.");

    let mut config = Config::load(args.config.as_deref()).context("loading configuration")?;
    if let Some(policy) = args.on_table_error {
        config.run.on_table_error = policy;
    }

    let store = SnapshotStore::new(create_store(&config.store)?, config.store.prefix());
    store.probe().await?;

    let source = PostgresSource::connect(&config.database).await?;
    let rotator = SnapshotRotator::new(store, ScratchArea::new(config.run.scratch_dir.clone()));
    let coordinator = RunCoordinator::new(
        source,
        rotator,
        config.run.tables.clone(),
        config.run.on_table_error,
    );

    let result = coordinator.run().await;
    coordinator.into_source().close().await;
    let partition = result?;

    info!("Successfully uploaded raw data for run {partition}");
    println!("{}", json!({ "time_prefix": partition.to_string() }));
    Ok(())
}
