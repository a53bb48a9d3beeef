//! Error type for `agora-ingest`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("csv error: {0}")]
  Csv(#[from] csv::Error),

  #[error("missing required column {0:?}")]
  MissingColumn(&'static str),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
