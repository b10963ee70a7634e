//! Whole-file parse orchestration.
//!
//! Decodes the raw bytes (Latin-1 unless a UTF-8 BOM is present), reads
//! the header, then parses every remaining non-empty line independently.
//! One row's failure never affects another row; a header failure is
//! batch-fatal and returns an otherwise-empty result.

use super::header::parse_header;
use super::row::parse_row;
use crate::core::ParseResult;

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Parse one uploaded interchange file into a [`ParseResult`].
///
/// Never returns an error: batch-fatal conditions (empty file, malformed
/// header) are reported through `ParseResult::errors` so the caller can
/// render "0 valid rows, reason: …" uniformly.
pub fn parse_batch(bytes: &[u8]) -> ParseResult {
    let content = decode(bytes);
    let lines: Vec<&str> = content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect();

    let mut result = ParseResult::default();

    let Some(header_line) = lines.first() else {
        result.errors.push("Datei ist leer".to_string());
        return result;
    };

    match parse_header(header_line, &mut result.warnings) {
        Ok(header) => result.header = Some(header),
        Err(e) => {
            result.errors.push(e.to_string());
            return result;
        }
    }

    // Line 2 is the fixed column-name line; data rows start after it and
    // are numbered 1-based by their position among the data lines.
    for (i, line) in lines.iter().enumerate().skip(2) {
        let row_number = (i - 1) as u32;
        let candidate = parse_row(line, row_number, result.header.as_ref());
        result.stats.record(&candidate);
        result.candidates.push(candidate);
    }

    result
}

/// Decode the file bytes before any tokenization: UTF-8 when the file
/// carries a byte-order mark, the dialect's legacy Latin-1 otherwise.
fn decode(bytes: &[u8]) -> String {
    if bytes.starts_with(&UTF8_BOM) {
        let (text, _) = encoding_rs::UTF_8.decode_with_bom_removal(bytes);
        text.into_owned()
    } else {
        encoding_rs::mem::decode_latin1(bytes).into_owned()
    }
}
