use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Metadata of one EXTF interchange batch, taken from its first line.
///
/// Immutable after construction; one instance per parse or per export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchHeader {
    /// Format name token, always `"EXTF"` for a recognised batch.
    pub format_name: String,
    /// Format version (700 for current files, 510 for legacy ones).
    pub version: u32,
    /// DATEV consultant number (Beraternummer).
    pub advisor_number: u32,
    /// DATEV client number (Mandantennummer).
    pub client_number: u32,
    /// First month of the fiscal year (Wirtschaftsjahr-Beginn), 1-12.
    pub fiscal_year_start_month: u32,
    /// First day of the declared posting period, if the header carries one.
    pub period_start: Option<NaiveDate>,
    /// Last day of the declared posting period, if the header carries one.
    pub period_end: Option<NaiveDate>,
    /// ISO 4217 currency code, `EUR` when absent.
    pub currency: String,
    /// Festschreibung flag — postings are locked on import.
    pub locked: bool,
}

/// Soll/Haben indicator of a posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DebitCredit {
    /// Soll (debit), written as `S`.
    Soll,
    /// Haben (credit), written as `H`.
    Haben,
}

impl DebitCredit {
    /// The single-letter wire code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Soll => "S",
            Self::Haben => "H",
        }
    }

    /// Parse the wire code, case-insensitively.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "S" | "s" => Some(Self::Soll),
            "H" | "h" => Some(Self::Haben),
            _ => None,
        }
    }
}

/// One interchange row, as parsed, before any persistence decision.
///
/// Malformed fields do not abort the row: every problem is collected into
/// `errors` or `warnings` and the candidate is returned regardless. A
/// candidate with a non-empty error list is never eligible for import.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingCandidate {
    /// Gross amount (Umsatz), non-negative; zero only on a broken row.
    pub amount: Decimal,
    /// Soll/Haben indicator.
    pub debit_credit: DebitCredit,
    /// ISO 4217 currency code (WKZ), `EUR` when absent.
    pub currency: String,
    /// Destination account number (Konto).
    pub account: String,
    /// Contra account number (Gegenkonto).
    pub contra_account: String,
    /// BU-Schlüssel (posting/tax key).
    pub posting_key: Option<String>,
    /// Document date (Belegdatum); absence is a warning, not an error.
    pub document_date: Option<NaiveDate>,
    /// Belegfeld 1 — invoice/voucher number.
    pub document_ref1: String,
    /// Belegfeld 2.
    pub document_ref2: Option<String>,
    /// Skonto (cash discount).
    pub discount: Option<Decimal>,
    /// Posting text (Buchungstext).
    pub booking_text: String,
    /// Cost centre reference (KOST1).
    pub cost_center: Option<String>,
    /// 1-based position among the data rows of the source file.
    pub row_number: u32,
    /// Conditions that make this row unimportable.
    pub errors: Vec<String>,
    /// Suspect but importable conditions, surfaced for review.
    pub warnings: Vec<String>,
}

impl BookingCandidate {
    /// A candidate is importable iff it collected no errors.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// A placeholder candidate for a row that could not be decomposed at
    /// all, carrying its original row number and a single fatal error.
    pub(crate) fn rejected(row_number: u32, error: String) -> Self {
        Self {
            row_number,
            errors: vec![error],
            ..Self::default()
        }
    }
}

impl Default for BookingCandidate {
    fn default() -> Self {
        Self {
            amount: Decimal::ZERO,
            debit_credit: DebitCredit::Soll,
            currency: "EUR".into(),
            account: String::new(),
            contra_account: String::new(),
            posting_key: None,
            document_date: None,
            document_ref1: String::new(),
            document_ref2: None,
            discount: None,
            booking_text: String::new(),
            cost_center: None,
            row_number: 0,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

/// Summary counters of one parse run.
///
/// Invariant: `valid_rows + invalid_rows == total_rows`; `total_amount`
/// sums the amounts of valid rows only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseStats {
    pub total_rows: usize,
    pub valid_rows: usize,
    pub invalid_rows: usize,
    pub total_amount: Decimal,
}

impl ParseStats {
    pub(crate) fn record(&mut self, candidate: &BookingCandidate) {
        self.total_rows += 1;
        if candidate.is_valid() {
            self.valid_rows += 1;
            self.total_amount += candidate.amount;
        } else {
            self.invalid_rows += 1;
        }
    }
}

/// Aggregate result of parsing one interchange file.
///
/// [`parse_batch`](crate::extf::parse_batch) always returns one of these,
/// never an `Err`: batch-fatal conditions arrive as an entry in `errors`
/// with `header` unset and no candidates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParseResult {
    /// The batch header; `None` after a batch-fatal header failure.
    pub header: Option<BatchHeader>,
    /// One candidate per input data row, in file order.
    pub candidates: Vec<BookingCandidate>,
    /// Batch-level errors (malformed header, empty file).
    pub errors: Vec<String>,
    /// Batch-level warnings.
    pub warnings: Vec<String>,
    pub stats: ParseStats,
}

/// Identity of a persisted booking, assigned by the storage collaborator.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct BookingId(pub u64);

/// Identity of a company (Unternehmen) whose ledger is being processed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct CompanyId(pub u64);

/// Classification of a persisted booking, derived from its account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingKind {
    /// Ertrag — revenue; written as `H` on export.
    Revenue,
    /// Aufwand — expense.
    Expense,
    /// Anlage — fixed asset.
    Asset,
    /// Everything else.
    Other,
}

/// Workflow state of a persisted booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingStatus {
    /// Entwurf — still editable, not eligible for export.
    Draft,
    /// Geprüft — reviewed and complete.
    Reviewed,
    /// Already part of a generated batch.
    Exported,
}

impl BookingStatus {
    /// Terminal, export-eligible states.
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Reviewed | Self::Exported)
    }

    /// The status code as the surrounding application stores it.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Draft => "entwurf",
            Self::Reviewed => "geprueft",
            Self::Exported => "exportiert",
        }
    }
}

/// Settlement state of a persisted booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentState {
    Open,
    PartiallyPaid,
    Paid,
    Overdue,
}

/// A persisted, validated accounting entry.
///
/// Owned by the storage collaborator; this crate only reads bookings and
/// proposes new ones. Unlike a [`BookingCandidate`], a booking always has
/// a document date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub company: CompanyId,
    pub amount: Decimal,
    pub debit_credit: DebitCredit,
    pub currency: String,
    pub account: String,
    pub contra_account: String,
    pub posting_key: Option<String>,
    pub document_date: NaiveDate,
    pub document_ref1: String,
    pub document_ref2: Option<String>,
    pub discount: Option<Decimal>,
    pub booking_text: String,
    pub cost_center: Option<String>,
    pub kind: BookingKind,
    pub status: BookingStatus,
    pub payment_state: PaymentState,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
