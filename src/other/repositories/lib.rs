pub mod identity;
pub mod profile;

use thiserror::Error as ThisError;

/// A record could not be loaded: transport, server or decoding error.
/// Recovered by rendering, never fatal.
#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct FetchFailure(pub String);
