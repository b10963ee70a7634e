//! Single-row parser: one interchange data line in, one candidate out.
//!
//! Malformed content never aborts the row. Every rule failure is recorded
//! as a distinct German message on the candidate, so a 500-row file with
//! three bad rows still yields 497 importable candidates.

use rust_decimal::Decimal;

use super::fields::{parse_amount, parse_date, split_fields, unquote_field};
use crate::core::{BatchHeader, BookingCandidate, DebitCredit};

// Standard DATEV Buchungsstapel column order.
const COL_AMOUNT: usize = 0;
const COL_DEBIT_CREDIT: usize = 1;
const COL_CURRENCY: usize = 2;
const COL_ACCOUNT: usize = 6;
const COL_CONTRA_ACCOUNT: usize = 7;
const COL_POSTING_KEY: usize = 8;
const COL_DOCUMENT_DATE: usize = 9;
const COL_DOCUMENT_REF1: usize = 10;
const COL_DOCUMENT_REF2: usize = 11;
const COL_DISCOUNT: usize = 12;
const COL_BOOKING_TEXT: usize = 13;
const COL_COST_CENTER: usize = 36;

/// A data row must reach at least the Buchungstext column.
pub(crate) const MIN_FIELDS: usize = 14;

/// Dialect width of Belegfeld 1; longer references are truncated on export.
pub(crate) const DOCUMENT_REF_MAX: usize = 36;

/// Dialect width of the Buchungstext field.
pub(crate) const BOOKING_TEXT_MAX: usize = 60;

/// Parse one data line into a [`BookingCandidate`].
///
/// A line that cannot even be decomposed into enough columns is still
/// returned as a candidate carrying its row number and a single fatal
/// error — no input line is ever dropped silently.
pub(crate) fn parse_row(
    line: &str,
    row_number: u32,
    header: Option<&BatchHeader>,
) -> BookingCandidate {
    let raw = split_fields(line);
    if raw.len() < MIN_FIELDS {
        return BookingCandidate::rejected(
            row_number,
            format!(
                "Zeile hat zu wenige Felder ({} statt mindestens {MIN_FIELDS})",
                raw.len()
            ),
        );
    }

    let fields: Vec<String> = raw.into_iter().map(unquote_field).collect();
    let field = |i: usize| fields.get(i).map(String::as_str).unwrap_or("");

    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let amount = match parse_amount(field(COL_AMOUNT)) {
        Ok(v) if v > Decimal::ZERO => v,
        _ => {
            errors.push("Betrag ungültig".to_string());
            Decimal::ZERO
        }
    };

    let debit_credit = match DebitCredit::from_code(field(COL_DEBIT_CREDIT)) {
        Some(dc) => dc,
        None => {
            errors.push("Soll/Haben-Kennzeichen ungültig".to_string());
            DebitCredit::Soll
        }
    };

    let account = field(COL_ACCOUNT).to_string();
    if account.is_empty() {
        errors.push("Konto fehlt".to_string());
    }
    let contra_account = field(COL_CONTRA_ACCOUNT).to_string();
    if contra_account.is_empty() {
        errors.push("Gegenkonto fehlt".to_string());
    }

    // Out-of-period postings are legal, so date problems only warn.
    let document_date = match field(COL_DOCUMENT_DATE) {
        "" => {
            warnings.push("Belegdatum fehlt".to_string());
            None
        }
        token => match parse_date(token) {
            Ok(date) => {
                if let Some(h) = header {
                    if let (Some(start), Some(end)) = (h.period_start, h.period_end) {
                        if date < start || date > end {
                            warnings.push(
                                "Belegdatum außerhalb des Stapelzeitraums".to_string(),
                            );
                        }
                    }
                }
                Some(date)
            }
            Err(_) => {
                warnings.push(format!("Belegdatum ungültig: '{token}'"));
                None
            }
        },
    };

    let document_ref1 = field(COL_DOCUMENT_REF1).to_string();
    if document_ref1.chars().count() > DOCUMENT_REF_MAX {
        warnings.push(format!(
            "Belegfeld 1 länger als {DOCUMENT_REF_MAX} Zeichen, wird beim Export gekürzt"
        ));
    }

    let booking_text = field(COL_BOOKING_TEXT).to_string();
    if booking_text.is_empty() {
        warnings.push("Buchungstext fehlt".to_string());
    }

    let currency = match field(COL_CURRENCY) {
        "" => header.map_or("EUR", |h| h.currency.as_str()).to_string(),
        c => c.to_string(),
    };

    let discount = match parse_amount(field(COL_DISCOUNT)) {
        Ok(v) if v > Decimal::ZERO => Some(v),
        _ => None,
    };

    BookingCandidate {
        amount,
        debit_credit,
        currency,
        account,
        contra_account,
        posting_key: non_empty(field(COL_POSTING_KEY)),
        document_date,
        document_ref1,
        document_ref2: non_empty(field(COL_DOCUMENT_REF2)),
        discount,
        booking_text,
        cost_center: non_empty(field(COL_COST_CENTER)),
        row_number,
        errors,
        warnings,
    }
}

fn non_empty(token: &str) -> Option<String> {
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}
