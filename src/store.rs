//! Storage-collaborator seam.
//!
//! Persistence of bookings lives outside this crate. The import
//! orchestrator and the duplicate detector talk to it through
//! [`BookingStore`]; the core itself holds no state and no connection.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{Booking, BookingCandidate, CompanyId};
use crate::dedup::PairKey;

/// A failure reported by the storage collaborator.
#[derive(Debug, Clone, Error)]
#[error("storage error: {0}")]
pub struct StorageError(pub String);

/// An inclusive date window bounding a booking query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodFilter {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl PeriodFilter {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Read/write API of the booking store, implemented elsewhere.
///
/// The core assumes at-least-once invocation of its import path and
/// relies on its own pre-import duplicate guard for idempotence rather
/// than on transactional guarantees from the implementor.
pub trait BookingStore {
    /// All bookings of a company within the window.
    fn list_bookings(
        &self,
        company: CompanyId,
        period: &PeriodFilter,
    ) -> Result<Vec<Booking>, StorageError>;

    /// Persist one validated candidate as a new booking.
    fn create_booking(
        &mut self,
        company: CompanyId,
        candidate: &BookingCandidate,
    ) -> Result<Booking, StorageError>;

    /// Pairs a reviewer has confirmed as not-duplicates; the detector
    /// excludes these before scoring.
    fn confirmed_non_duplicates(&self, company: CompanyId)
    -> Result<Vec<PairKey>, StorageError>;
}
