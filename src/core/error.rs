use thiserror::Error;

/// Errors that can occur during batch processing or generation.
///
/// Row-level problems never surface here — they are collected as message
/// lists on the affected [`BookingCandidate`](super::BookingCandidate).
/// This enum covers only batch-fatal conditions.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StapelError {
    /// The batch header could not be interpreted. No rows are parsed.
    #[error("Stapelkopf ungültig: {0}")]
    Header(String),

    /// Batch generation was asked for something impossible
    /// (e.g. an invalid target period).
    #[error("Export fehlgeschlagen: {0}")]
    Export(String),
}
