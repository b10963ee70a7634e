//! Multi-tier duplicate-booking detection.
//!
//! Pairwise scan over a caller-bounded booking window. Each unordered
//! pair is scored once, at the highest tier whose predicate matches:
//!
//! 1. **Exact** (100) — same amount, same document date, same account.
//! 2. **ReferenceMatch** (95) — identical non-empty Belegfeld 1, which
//!    catches a voucher re-entered under a corrected amount.
//! 3. **Fuzzy** (85) — same amount and booking text, dates within ±3 days.
//!
//! The confidences are the flat per-tier percentages communicated to end
//! users; there is no intra-tier weighting. O(n²) over the window is
//! intentional — the caller bounds n to a reporting period.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::core::{Booking, BookingCandidate, BookingId, CompanyId};
use crate::store::{BookingStore, PeriodFilter, StorageError};

/// Confidence tier of a duplicate finding, highest first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum MatchTier {
    Exact,
    ReferenceMatch,
    Fuzzy,
}

impl MatchTier {
    /// The user-facing confidence percentage of this tier.
    pub fn confidence(&self) -> u8 {
        match self {
            Self::Exact => 100,
            Self::ReferenceMatch => 95,
            Self::Fuzzy => 85,
        }
    }
}

/// Which booking fields drove a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchField {
    Amount,
    DocumentDate,
    Account,
    DocumentRef,
    BookingText,
}

/// Unordered identity of a booking pair: lower id always first, so
/// (A,B) and (B,A) collapse to the same key.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct PairKey(BookingId, BookingId);

impl PairKey {
    pub fn new(a: BookingId, b: BookingId) -> Self {
        if a <= b { Self(a, b) } else { Self(b, a) }
    }
}

/// One probable-duplicate finding. `a < b` by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicatePair {
    pub a: BookingId,
    pub b: BookingId,
    pub tier: MatchTier,
    /// Flat per-tier confidence, for ranking.
    pub confidence: u8,
    pub matched_on: Vec<MatchField>,
}

impl DuplicatePair {
    pub fn key(&self) -> PairKey {
        PairKey::new(self.a, self.b)
    }
}

/// Scan a booking window for probable duplicates.
///
/// Suppressed pairs (reviewed and confirmed as not-duplicates) are
/// excluded before scoring. Results are sorted by confidence descending,
/// then by booking ids, and contain each unordered pair at most once.
pub fn find_duplicates(
    window: &[Booking],
    suppressed: &HashSet<PairKey>,
) -> Vec<DuplicatePair> {
    let mut seen: HashSet<PairKey> = HashSet::new();
    let mut pairs = Vec::new();

    for (i, x) in window.iter().enumerate() {
        for y in &window[i + 1..] {
            if x.id == y.id {
                continue;
            }
            let key = PairKey::new(x.id, y.id);
            if suppressed.contains(&key) || !seen.insert(key) {
                continue;
            }
            if let Some((tier, matched_on)) = classify(x, y) {
                let PairKey(a, b) = key;
                pairs.push(DuplicatePair {
                    a,
                    b,
                    tier,
                    confidence: tier.confidence(),
                    matched_on,
                });
            }
        }
    }

    pairs.sort_by(|p, q| p.tier.cmp(&q.tier).then(p.a.cmp(&q.a)).then(p.b.cmp(&q.b)));
    pairs
}

/// Pull the window and suppression set through the storage collaborator,
/// then scan. Company and window are explicit on every call; the
/// detector keeps no session state.
pub fn find_duplicates_for_company<S: BookingStore>(
    store: &S,
    company: CompanyId,
    window: &PeriodFilter,
) -> Result<Vec<DuplicatePair>, StorageError> {
    let bookings = store.list_bookings(company, window)?;
    let suppressed: HashSet<PairKey> =
        store.confirmed_non_duplicates(company)?.into_iter().collect();
    Ok(find_duplicates(&bookings, &suppressed))
}

/// Tier predicates in precedence order; the first match wins.
fn classify(x: &Booking, y: &Booking) -> Option<(MatchTier, Vec<MatchField>)> {
    if x.amount == y.amount
        && x.document_date == y.document_date
        && x.account == y.account
    {
        return Some((
            MatchTier::Exact,
            vec![MatchField::Amount, MatchField::DocumentDate, MatchField::Account],
        ));
    }

    if !x.document_ref1.is_empty() && x.document_ref1 == y.document_ref1 {
        return Some((MatchTier::ReferenceMatch, vec![MatchField::DocumentRef]));
    }

    let day_gap = (x.document_date - y.document_date).num_days().abs();
    if x.amount == y.amount && x.booking_text == y.booking_text && day_gap <= 3 {
        return Some((
            MatchTier::Fuzzy,
            vec![MatchField::Amount, MatchField::BookingText, MatchField::DocumentDate],
        ));
    }

    None
}

/// Exact-tier check of a parse candidate against a persisted booking.
/// The import orchestrator uses this as its cheap pre-import guard.
pub(crate) fn is_exact_duplicate(candidate: &BookingCandidate, booking: &Booking) -> bool {
    candidate.amount == booking.amount
        && candidate.document_date == Some(booking.document_date)
        && candidate.account == booking.account
}
