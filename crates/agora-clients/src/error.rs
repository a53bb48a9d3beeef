//! Error type for `agora-clients`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("{endpoint} returned {status}")]
  Status {
    endpoint: &'static str,
    status:   reqwest::StatusCode,
  },

  #[error("{endpoint} reply missing {field}")]
  MissingField {
    endpoint: &'static str,
    field:    &'static str,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
