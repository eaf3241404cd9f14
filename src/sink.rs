//! Append-only JSONL corpus.
//!
//! One open per batch, one `write_all` per line. If a later line fails, the earlier
//! lines of the same batch stay in the file; existing content is never touched.

use std::{
  fs::OpenOptions,
  io::Write,
  path::{Path, PathBuf},
};

use tracing::{debug, instrument};

use crate::domain::NormalizedRecord;
use crate::error::GenError;

#[derive(Clone, Debug)]
pub struct CorpusSink {
  path: PathBuf,
}

impl CorpusSink {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Append `records`, one JSON object per line. An empty batch does not open the file.
  #[instrument(level = "debug", skip(self, records), fields(path = %self.path.display(), batch = records.len()))]
  pub fn append(&self, records: &[NormalizedRecord]) -> Result<usize, GenError> {
    if records.is_empty() {
      return Ok(0);
    }
    let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
    let written = write_records(&mut file, records)?;
    debug!(written, "Appended batch to corpus");
    Ok(written)
  }
}

/// Serialize each record as a single line. Stops at the first failure.
pub fn write_records<W: Write>(out: &mut W, records: &[NormalizedRecord]) -> Result<usize, GenError> {
  for (i, record) in records.iter().enumerate() {
    let mut line = serde_json::to_string(record)?;
    line.push('\n');
    if let Err(e) = out.write_all(line.as_bytes()) {
      debug!(line = i, error = %e, "Corpus write failed mid-batch");
      return Err(e.into());
    }
  }
  out.flush()?;
  Ok(records.len())
}
