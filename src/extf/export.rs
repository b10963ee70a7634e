//! Batch generation: persisted bookings out to EXTF interchange bytes.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::fields::{format_amount, format_date, quote_field, truncate};
use super::header::write_header;
use super::row::{BOOKING_TEXT_MAX, DOCUMENT_REF_MAX};
use crate::core::{Booking, BookingKind, StapelError};
use crate::store::PeriodFilter;

/// Configuration for batch generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// DATEV consultant number (Beraternummer).
    pub advisor_number: u32,
    /// DATEV client number (Mandantennummer).
    pub client_number: u32,
    /// First month of the fiscal year (Wirtschaftsjahr-Beginn), 1-12.
    pub fiscal_year_start_month: u32,
    /// G/L account length (Sachkontenlänge), typically 4.
    pub account_length: u8,
    /// ISO 4217 currency code of the batch.
    pub currency: String,
    /// Source identifier for the header (Herkunft), max 2 chars.
    pub source: String,
    /// Name of the exporting system (Exportiert von), max 25 chars.
    pub exported_by: String,
    /// Batch description (Bezeichnung), max 30 chars.
    pub description: String,
    /// Lock postings on import (Festschreibung).
    pub lock_postings: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            advisor_number: 0,
            client_number: 0,
            fiscal_year_start_month: 1,
            account_length: 4,
            currency: "EUR".into(),
            source: "BS".into(),
            exported_by: String::new(),
            description: "Buchungsstapel".into(),
            lock_postings: false,
        }
    }
}

/// Builder for [`ExportConfig`].
///
/// # Example
///
/// ```
/// use buchstapel::extf::ExportConfigBuilder;
///
/// let config = ExportConfigBuilder::new(29098, 55003)
///     .fiscal_year_start_month(1)
///     .exported_by("buchstapel")
///     .build();
/// ```
pub struct ExportConfigBuilder {
    config: ExportConfig,
}

impl ExportConfigBuilder {
    /// Create a new builder with required advisor and client numbers.
    pub fn new(advisor_number: u32, client_number: u32) -> Self {
        Self {
            config: ExportConfig {
                advisor_number,
                client_number,
                ..Default::default()
            },
        }
    }

    /// Set the first month of the fiscal year (1-12).
    pub fn fiscal_year_start_month(mut self, month: u32) -> Self {
        self.config.fiscal_year_start_month = month;
        self
    }

    /// Set the G/L account length (typically 4).
    pub fn account_length(mut self, len: u8) -> Self {
        self.config.account_length = len;
        self
    }

    /// Set the batch currency.
    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.config.currency = currency.into();
        self
    }

    /// Set the source identifier (max 2 chars).
    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.config.source = source.into();
        self
    }

    /// Set the "exported by" label (max 25 chars).
    pub fn exported_by(mut self, name: impl Into<String>) -> Self {
        self.config.exported_by = name.into();
        self
    }

    /// Set the batch description (max 30 chars).
    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.config.description = desc.into();
        self
    }

    /// Enable posting lock on import.
    pub fn lock_postings(mut self, lock: bool) -> Self {
        self.config.lock_postings = lock;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> ExportConfig {
        self.config
    }
}

/// One calendar month targeted by a batch export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportPeriod {
    pub year: i32,
    /// Calendar month, 1-12.
    pub month: u32,
}

impl ExportPeriod {
    /// First day of the month; `None` for an impossible month.
    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// Last calendar day of the month, leap-year aware.
    pub fn last_day(&self) -> Option<NaiveDate> {
        let (year, month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(year, month, 1)?.pred_opt()
    }

    /// The period as a storage filter.
    pub fn to_filter(&self) -> Option<PeriodFilter> {
        Some(PeriodFilter::new(self.first_day()?, self.last_day()?))
    }
}

/// Output of one batch generation.
#[derive(Debug, Clone)]
pub struct ExportOutcome {
    /// The complete file, Latin-1 encoded.
    pub bytes: Vec<u8>,
    /// How many supplied bookings were excluded from the batch.
    pub skipped: usize,
    /// One entry per excluded booking, saying why.
    pub skip_reasons: Vec<String>,
}

const COLUMN_NAMES: [&str; 14] = [
    "Umsatz (ohne Soll/Haben-Kz)",
    "Soll/Haben-Kennzeichen",
    "WKZ Umsatz",
    "Kurs",
    "Basisumsatz",
    "WKZ Basisumsatz",
    "Konto",
    "Gegenkonto (ohne BU-Schlüssel)",
    "BU-Schlüssel",
    "Belegdatum",
    "Belegfeld 1",
    "Belegfeld 2",
    "Skonto",
    "Buchungstext",
];

// Rows and the column-name line are padded out to the KOST1 column so a
// cost centre survives a generate→parse round trip.
const COST_CENTER_FIELD: usize = 36;

/// Generate an EXTF batch from a caller-supplied ordered list of
/// persisted bookings.
///
/// Only bookings in a terminal complete state are eligible; the rest are
/// excluded and counted — never dropped silently. Returns the Latin-1
/// file bytes together with the skip count and per-booking reasons.
pub fn generate_batch(
    bookings: &[Booking],
    period: &ExportPeriod,
    config: &ExportConfig,
) -> Result<ExportOutcome, StapelError> {
    let (Some(period_start), Some(period_end)) = (period.first_day(), period.last_day())
    else {
        return Err(StapelError::Export(format!(
            "ungültiger Zeitraum {}-{:02}",
            period.year, period.month
        )));
    };
    if !(1..=12).contains(&config.fiscal_year_start_month) {
        return Err(StapelError::Export(format!(
            "ungültiger Wirtschaftsjahr-Beginn {}",
            config.fiscal_year_start_month
        )));
    }

    // The fiscal year containing the period start.
    let fiscal_year = if config.fiscal_year_start_month <= period_start.month() {
        period_start.year()
    } else {
        period_start.year() - 1
    };
    let fiscal_year_start =
        NaiveDate::from_ymd_opt(fiscal_year, config.fiscal_year_start_month, 1)
            .unwrap_or(period_start);

    let mut out = String::new();
    write_header(&mut out, config, fiscal_year_start, period_start, period_end);
    write_column_names(&mut out);

    let mut skipped = 0;
    let mut skip_reasons = Vec::new();
    for booking in bookings {
        if !booking.status.is_complete() {
            skipped += 1;
            skip_reasons.push(format!(
                "Buchung {} übersprungen: Status '{}' ist nicht abgeschlossen",
                booking.id.0,
                booking.status.code()
            ));
            continue;
        }
        write_data_row(&mut out, booking);
    }

    Ok(ExportOutcome {
        bytes: encoding_rs::mem::encode_latin1_lossy(&out).into_owned(),
        skipped,
        skip_reasons,
    })
}

fn write_column_names(out: &mut String) {
    for (i, name) in COLUMN_NAMES.iter().enumerate() {
        if i > 0 {
            out.push(';');
        }
        out.push_str(&quote_field(name));
    }
    for _ in COLUMN_NAMES.len()..=COST_CENTER_FIELD {
        out.push(';');
    }
    out.push_str(&quote_field("KOST1 - Kostenstelle"));
    out.push('\n');
}

fn write_data_row(out: &mut String, booking: &Booking) {
    // Field 1: Umsatz — comma decimal, unquoted
    out.push_str(&format_amount(booking.amount));
    out.push(';');

    // Field 2: Soll/Haben — derived from the booking kind, not stored
    // state: revenue postings leave as H, everything else as S.
    let indicator = if booking.kind == BookingKind::Revenue {
        "H"
    } else {
        "S"
    };
    out.push_str(&quote_field(indicator));
    out.push(';');

    // Field 3: WKZ
    out.push_str(&quote_field(&booking.currency));
    out.push(';');

    // Fields 4-6: Kurs, Basisumsatz, WKZ Basisumsatz — empty
    out.push_str(";;;");

    // Fields 7-8: Konto, Gegenkonto
    out.push_str(&booking.account);
    out.push(';');
    out.push_str(&booking.contra_account);
    out.push(';');

    // Field 9: BU-Schlüssel
    if let Some(key) = &booking.posting_key {
        out.push_str(key);
    }
    out.push(';');

    // Field 10: Belegdatum, DDMMYYYY
    out.push_str(&format_date(booking.document_date));
    out.push(';');

    // Fields 11-12: Belegfeld 1 (width-limited) and 2
    out.push_str(&quote_field(&truncate(&booking.document_ref1, DOCUMENT_REF_MAX)));
    out.push(';');
    out.push_str(&quote_field(booking.document_ref2.as_deref().unwrap_or("")));
    out.push(';');

    // Field 13: Skonto
    if let Some(discount) = booking.discount {
        out.push_str(&format_amount(discount));
    }
    out.push(';');

    // Field 14: Buchungstext
    out.push_str(&quote_field(&truncate(&booking.booking_text, BOOKING_TEXT_MAX)));

    // Pad to the KOST1 column
    for _ in COLUMN_NAMES.len()..=COST_CENTER_FIELD {
        out.push(';');
    }
    if let Some(cost_center) = &booking.cost_center {
        out.push_str(&quote_field(cost_center));
    }

    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_bounds_are_leap_aware() {
        let feb_2024 = ExportPeriod { year: 2024, month: 2 };
        assert_eq!(feb_2024.last_day(), NaiveDate::from_ymd_opt(2024, 2, 29));
        let feb_2025 = ExportPeriod { year: 2025, month: 2 };
        assert_eq!(feb_2025.last_day(), NaiveDate::from_ymd_opt(2025, 2, 28));
        let dec = ExportPeriod { year: 2025, month: 12 };
        assert_eq!(dec.last_day(), NaiveDate::from_ymd_opt(2025, 12, 31));
    }

    #[test]
    fn invalid_period_is_rejected() {
        let bad = ExportPeriod { year: 2025, month: 13 };
        let err = generate_batch(&[], &bad, &ExportConfig::default()).unwrap_err();
        assert!(err.to_string().contains("ungültiger Zeitraum"));
    }
}
