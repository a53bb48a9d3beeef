//! HTTP clients for the hosted services agora depends on.
//!
//! Implements the `agora-core` service traits over [`reqwest`]. Each call is
//! a single request bounded by the client's 30-second timeout; there are no
//! retries. Failures are returned as-is, and the pipeline owns the
//! degradation policy.

pub mod error;

mod language;
mod websearch;

pub use error::{Error, Result};
pub use language::{LanguageClient, LanguageConfig};
pub use websearch::{WebSearchClient, WebSearchConfig};
