//! Fault taxonomy for one generation iteration.
//!
//! Only the model call and the corpus write can fail. Recovery and
//! normalization never produce an error; they shrink the batch instead.

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenError {
  /// The model endpoint failed (network, quota, malformed request, bad envelope).
  #[error("model transport failure: {0}")]
  Transport(String),
  #[error(transparent)]
  Io(#[from] io::Error),
  #[error("record encoding failed: {0}")]
  Encode(#[from] serde_json::Error),
}
