//! Import orchestration: validated parse candidates into the store.
//!
//! Partial-success batch import. Invalid candidates, pre-existing exact
//! duplicates, and per-row persistence failures are all recorded with
//! their row numbers; none of them aborts the remaining rows.

use serde::{Deserialize, Serialize};

use crate::core::{BookingCandidate, BookingId, CompanyId};
use crate::dedup::is_exact_duplicate;
use crate::store::{BookingStore, PeriodFilter, StorageError};

/// Why a candidate row was not imported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipCause {
    /// The row carried parse/validation errors.
    Invalid(Vec<String>),
    /// An exact-tier duplicate of this persisted booking already exists.
    DuplicateOf(BookingId),
    /// The storage collaborator rejected a valid candidate.
    Storage(String),
}

/// One skipped row with its source position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRow {
    pub row: u32,
    pub cause: SkipCause,
}

/// Outcome of one import run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
    pub reasons: Vec<SkippedRow>,
}

/// Import parse candidates for a company, within a period.
///
/// Filters to candidates with zero errors, skips rows that are exact
/// duplicates of bookings already persisted in the same company/period
/// (so re-importing the same file is a no-op), and persists the rest one
/// by one. Only a failure to *read* the existing bookings is fatal; a
/// failed create is recorded and the batch continues.
pub fn import_batch<S: BookingStore>(
    store: &mut S,
    company: CompanyId,
    candidates: &[BookingCandidate],
    period: &PeriodFilter,
) -> Result<ImportSummary, StorageError> {
    let existing = store.list_bookings(company, period)?;

    let mut summary = ImportSummary::default();
    for candidate in candidates {
        if !candidate.is_valid() {
            summary.skipped += 1;
            summary.reasons.push(SkippedRow {
                row: candidate.row_number,
                cause: SkipCause::Invalid(candidate.errors.clone()),
            });
            continue;
        }

        if let Some(duplicate) = existing.iter().find(|b| is_exact_duplicate(candidate, b)) {
            summary.skipped += 1;
            summary.reasons.push(SkippedRow {
                row: candidate.row_number,
                cause: SkipCause::DuplicateOf(duplicate.id),
            });
            continue;
        }

        match store.create_booking(company, candidate) {
            Ok(_) => summary.imported += 1,
            Err(e) => {
                summary.skipped += 1;
                summary.reasons.push(SkippedRow {
                    row: candidate.row_number,
                    cause: SkipCause::Storage(e.to_string()),
                });
            }
        }
    }

    Ok(summary)
}
