//! Batch header line: fixed-position reader and writer.
//!
//! The header is a single quoted, semicolon-delimited record. The field
//! positions follow the EXTF 700 layout; a legacy 510 header that keeps
//! the same positions for consultant/client and period bounds parses too.

use chrono::NaiveDate;

use super::fields::{split_fields, truncate, unquote_field};
use crate::core::{BatchHeader, StapelError};
use crate::extf::export::ExportConfig;

/// Format name token of a recognised batch.
pub const FORMAT_NAME: &str = "EXTF";

// Field positions within the header record.
const POS_VERSION: usize = 1;
const POS_ADVISOR: usize = 10;
const POS_CLIENT: usize = 11;
const POS_FISCAL_YEAR: usize = 12;
const POS_PERIOD_START: usize = 14;
const POS_PERIOD_END: usize = 15;
const POS_LOCKED: usize = 20;
const POS_CURRENCY: usize = 21;

/// Parse the first line of a batch into a [`BatchHeader`].
///
/// Unknown or missing optional fields default rather than fail. The only
/// batch-fatal conditions are an unrecognised format name and non-numeric
/// advisor/client numbers.
pub(crate) fn parse_header(
    line: &str,
    warnings: &mut Vec<String>,
) -> Result<BatchHeader, StapelError> {
    let fields: Vec<String> = split_fields(line).into_iter().map(unquote_field).collect();
    let field = |i: usize| fields.get(i).map(String::as_str).unwrap_or("");

    if field(0) != FORMAT_NAME {
        return Err(StapelError::Header(format!(
            "unbekanntes Format '{}'",
            field(0)
        )));
    }

    let advisor_number = parse_required_number(field(POS_ADVISOR), "Beraternummer")?;
    let client_number = parse_required_number(field(POS_CLIENT), "Mandantennummer")?;

    let version = field(POS_VERSION).parse().unwrap_or(700);
    let fiscal_year_start_month = parse_fiscal_year_month(field(POS_FISCAL_YEAR));

    let mut period_start = parse_header_date(field(POS_PERIOD_START));
    let mut period_end = parse_header_date(field(POS_PERIOD_END));
    if let (Some(start), Some(end)) = (period_start, period_end) {
        if start > end {
            warnings.push(
                "Zeitraum im Stapelkopf ist invertiert und wird ignoriert".to_string(),
            );
            period_start = None;
            period_end = None;
        }
    }

    let currency = match field(POS_CURRENCY) {
        "" => "EUR".to_string(),
        c => c.to_string(),
    };

    Ok(BatchHeader {
        format_name: FORMAT_NAME.to_string(),
        version,
        advisor_number,
        client_number,
        fiscal_year_start_month,
        period_start,
        period_end,
        currency,
        locked: field(POS_LOCKED) == "1",
    })
}

fn parse_required_number(token: &str, name: &str) -> Result<u32, StapelError> {
    if token.is_empty() {
        return Ok(0);
    }
    token
        .parse()
        .map_err(|_| StapelError::Header(format!("{name} ist nicht numerisch: '{token}'")))
}

/// Fiscal-year start: EXTF 700 writes a full `YYYYMMDD` date, legacy 510
/// files a zero-padded month. Anything else defaults to January.
fn parse_fiscal_year_month(token: &str) -> u32 {
    if let Some(date) = parse_header_date(token) {
        return chrono::Datelike::month(&date);
    }
    match token.parse::<u32>() {
        Ok(m) if (1..=12).contains(&m) => m,
        _ => 1,
    }
}

/// Header dates are `YYYYMMDD` (unlike the `DDMMYYYY` data rows).
fn parse_header_date(token: &str) -> Option<NaiveDate> {
    let token = token.trim();
    if token.len() != 8 || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year: i32 = token[0..4].parse().ok()?;
    let month: u32 = token[4..6].parse().ok()?;
    let day: u32 = token[6..8].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Write the 31-field EXTF 700 header line, stamped with the current
/// local time.
pub(crate) fn write_header(
    out: &mut String,
    config: &ExportConfig,
    fiscal_year_start: NaiveDate,
    period_start: NaiveDate,
    period_end: NaiveDate,
) {
    let now = chrono::Local::now().format("%Y%m%d%H%M%S000");
    let fy = fiscal_year_start.format("%Y%m%d");
    let ps = period_start.format("%Y%m%d");
    let pe = period_end.format("%Y%m%d");

    out.push_str(&format!(
        "\"EXTF\";700;21;\"Buchungsstapel\";13;{now};;\"{}\";\"{}\";\"\";\
         {};{};{fy};{};{ps};{pe};\"{}\";\"\";1;0;{};\"{}\";;\"\";;;\"\";;;\"\"",
        truncate(&config.source, 2),
        truncate(&config.exported_by, 25),
        config.advisor_number,
        config.client_number,
        config.account_length,
        truncate(&config.description, 30),
        if config.lock_postings { 1 } else { 0 },
        config.currency,
    ));
    out.push('\n');
}
