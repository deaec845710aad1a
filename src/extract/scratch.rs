use std::path::{Path, PathBuf};

use bytes::Bytes;
use tempfile::TempDir;

use crate::core::ExtractError;
use crate::snapshot::TableSnapshot;

/// Where rotations stage their transient previous/new CSV copies.
#[derive(Debug, Clone, Default)]
pub struct ScratchArea {
    root: Option<PathBuf>,
}

impl ScratchArea {
    /// Scratch directories go under `root`, or the system temp dir when `None`.
    pub fn new(root: Option<PathBuf>) -> Self {
        Self { root }
    }

    pub fn acquire(&self, table: &str) -> Result<ScratchFiles, ExtractError> {
        let mut builder = tempfile::Builder::new();
        let prefix = format!("{table}-");
        builder.prefix(&prefix);

        let dir = match &self.root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        }
        .map_err(|e| ExtractError::ScratchError(format!("creating scratch dir for {table}: {e}")))?;

        Ok(ScratchFiles {
            previous: dir.path().join(format!("{table}.csv")),
            new: dir.path().join(format!("{table}_new.csv")),
            dir,
        })
    }
}

/// The two scratch files of one rotation. The directory holding them is
/// removed when this value is dropped.
#[derive(Debug)]
pub struct ScratchFiles {
    dir: TempDir,
    previous: PathBuf,
    new: PathBuf,
}

impl ScratchFiles {
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn previous_path(&self) -> &Path {
        &self.previous
    }

    pub fn new_path(&self) -> &Path {
        &self.new
    }

    pub async fn stage_previous(&self, data: &Bytes) -> Result<(), ExtractError> {
        write_file(&self.previous, data).await
    }

    pub async fn stage_new(&self, data: &Bytes) -> Result<(), ExtractError> {
        write_file(&self.new, data).await
    }

    pub async fn load_previous(&self) -> Result<TableSnapshot, ExtractError> {
        read_snapshot(&self.previous).await
    }

    pub async fn load_new(&self) -> Result<TableSnapshot, ExtractError> {
        read_snapshot(&self.new).await
    }
}

async fn write_file(path: &Path, data: &Bytes) -> Result<(), ExtractError> {
    tokio::fs::write(path, data)
        .await
        .map_err(|e| ExtractError::ScratchError(format!("writing {}: {e}", path.display())))
}

async fn read_snapshot(path: &Path) -> Result<TableSnapshot, ExtractError> {
    let data = tokio::fs::read(path)
        .await
        .map_err(|e| ExtractError::ScratchError(format!("reading {}: {e}", path.display())))?;
    TableSnapshot::from_csv(&data).map_err(|e| {
        ExtractError::ScratchError(format!("malformed scratch file {}: {e}", path.display()))
    })
}
