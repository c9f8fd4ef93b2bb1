//! Error types for queries, layer selection and box-select gestures.
//!
//! Every variant's message is user-facing: the session shows it verbatim as a
//! notice on the map surface when it refuses an action.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("Please enter a keyword")]
    EmptyKeyword,

    #[error("Please select a layer first")]
    NoActiveLayer,

    #[error("Layer '{0}' does not support queries or has not finished loading; select a vector layer")]
    NotVectorLayer(String),

    #[error("Discarded stale response for layer '{name}' (selection {ticket})")]
    StaleSelection { name: String, ticket: u64 },

    #[error("Unknown match mode: {0} (expected 'exact' or 'contains')")]
    UnknownMatchMode(String),
}
