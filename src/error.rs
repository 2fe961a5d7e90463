// Typed errors for the halo sampling library
//
// Envelope-bound violations during rejection sampling are deliberately NOT
// represented here: they are expected, self-correcting numerical events and
// surface only as tracing diagnostics.

use thiserror::Error;

/// Errors arising from model construction, configuration, or snapshot export.
#[derive(Debug, Error)]
pub enum HaloError {
    /// A model or configuration parameter is outside its valid range
    /// (e.g. non-positive mass or scale radius).
    #[error("invalid parameter {name}: {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// The configuration record could not be parsed.
    #[error("failed to parse halo configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// Snapshot export was requested but no writer capability was supplied
    /// to the pipeline at construction time. Fatal only for that call.
    #[error("no snapshot writer configured; initial-conditions export is unavailable")]
    WriterUnavailable,

    /// The configured snapshot writer failed to persist the batch.
    #[error("snapshot writer failed: {0}")]
    Writer(String),
}
