//! Field-level codec for EXTF tokens.
//!
//! Pure conversions between the interchange format's textual tokens
//! (German-locale decimals, compact dates, quoted strings) and typed
//! values. Parse→Format→Parse is lossless for any value the format
//! functions produced.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// Why a single field token could not be converted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("empty field")]
    Empty,
    #[error("not a number: '{0}'")]
    Number(String),
    #[error("not a calendar date: '{0}'")]
    Date(String),
}

/// Parse a German-locale amount token.
///
/// Accepts both comma-decimal tokens with optional `.` digit grouping
/// (`"1.234,56"`) and plain dot-decimal tokens (`"1234.56"`). The result
/// is normalised to two fractional digits so monetary sums never drift.
pub fn parse_amount(token: &str) -> Result<Decimal, FieldError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(FieldError::Empty);
    }

    // Comma present: German notation, dots are grouping. Otherwise the
    // token is taken as-is with a dot decimal separator.
    let normalized = if token.contains(',') {
        token.replace('.', "").replace(',', ".")
    } else {
        token.to_string()
    };

    normalized
        .parse::<Decimal>()
        .map(|d| d.round_dp(2))
        .map_err(|_| FieldError::Number(token.to_string()))
}

/// Parse a document-date token: compact 8-digit `DDMMYYYY` or ISO
/// `YYYY-MM-DD`. Impossible calendar dates are rejected.
pub fn parse_date(token: &str) -> Result<NaiveDate, FieldError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(FieldError::Empty);
    }

    if token.len() == 8 && token.bytes().all(|b| b.is_ascii_digit()) {
        let day: u32 = token[0..2].parse().unwrap_or(0);
        let month: u32 = token[2..4].parse().unwrap_or(0);
        let year: i32 = token[4..8].parse().unwrap_or(0);
        return NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| FieldError::Date(token.to_string()));
    }

    NaiveDate::parse_from_str(token, "%Y-%m-%d")
        .map_err(|_| FieldError::Date(token.to_string()))
}

/// Format a Decimal as a German number: comma separator, 2 decimal places.
pub fn format_amount(d: Decimal) -> String {
    let scaled = d.round_dp(2);
    format!("{:.2}", scaled).replace('.', ",")
}

/// Format a date in the compact 8-digit `DDMMYYYY` form.
pub fn format_date(d: NaiveDate) -> String {
    d.format("%d%m%Y").to_string()
}

/// Wrap a text field in double quotes, doubling embedded quotes. Quoting
/// also protects embedded `;` separators from the tokenizer.
pub fn quote_field(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for ch in text.chars() {
        if ch == '"' {
            out.push_str("\"\"");
        } else {
            out.push(ch);
        }
    }
    out.push('"');
    out
}

/// Inverse of [`quote_field`]; tolerates unquoted legacy tokens, which are
/// returned trimmed.
pub fn unquote_field(token: &str) -> String {
    let token = token.trim();
    if token.len() >= 2 && token.starts_with('"') && token.ends_with('"') {
        token[1..token.len() - 1].replace("\"\"", "\"")
    } else {
        token.to_string()
    }
}

/// Split one record into raw field tokens on `;`, respecting quoted-field
/// escaping. Tokens keep their quotes; pass them through
/// [`unquote_field`] to decode.
pub fn split_fields(line: &str) -> Vec<&str> {
    let mut fields = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;
    for (i, c) in line.char_indices() {
        match c {
            // A doubled quote toggles twice and stays inside the field.
            '"' => in_quotes = !in_quotes,
            ';' if !in_quotes => {
                fields.push(&line[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    fields.push(&line[start..]);
    fields
}

/// Char-safe prefix truncation for fixed-width dialect fields.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
