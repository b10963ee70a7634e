use buchstapel::core::DebitCredit;
use buchstapel::extf::parse_batch;
use chrono::NaiveDate;
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn header_line() -> &'static str {
    "\"EXTF\";700;21;\"Buchungsstapel\";13;20250101120000000;;\"RE\";\"buchstapel\";\"\";29098;55003;20250101;4;20250101;20250131;\"Januar\";\"\";1;0;0;\"EUR\";;\"\";;;\"\";;;\"\""
}

fn column_line() -> &'static str {
    "\"Umsatz (ohne Soll/Haben-Kz)\";\"Soll/Haben-Kennzeichen\";\"WKZ Umsatz\";\"Kurs\";\"Basisumsatz\";\"WKZ Basisumsatz\";\"Konto\";\"Gegenkonto (ohne BU-Schlüssel)\";\"BU-Schlüssel\";\"Belegdatum\";\"Belegfeld 1\";\"Belegfeld 2\";\"Skonto\";\"Buchungstext\""
}

/// Assemble a batch file and encode it as Latin-1, the dialect's default.
fn batch(rows: &[&str]) -> Vec<u8> {
    let mut content = String::new();
    content.push_str(header_line());
    content.push('\n');
    content.push_str(column_line());
    content.push('\n');
    for row in rows {
        content.push_str(row);
        content.push('\n');
    }
    encoding_rs::mem::encode_latin1_lossy(&content).into_owned()
}

const GOOD_ROW: &str = "\"100,50\";\"S\";\"EUR\";;;;\"4400\";\"70000\";\"\";\"15012025\";\"RE-2025-001\";\"\";;\"Büromaterial\";0;;;;;\"\";\"\"";

// ---------------------------------------------------------------------------
// Header
// ---------------------------------------------------------------------------

#[test]
fn header_fields_are_parsed() {
    let result = parse_batch(&batch(&[]));
    let header = result.header.expect("header should parse");
    assert_eq!(header.format_name, "EXTF");
    assert_eq!(header.version, 700);
    assert_eq!(header.advisor_number, 29098);
    assert_eq!(header.client_number, 55003);
    assert_eq!(header.fiscal_year_start_month, 1);
    assert_eq!(header.period_start, Some(date(2025, 1, 1)));
    assert_eq!(header.period_end, Some(date(2025, 1, 31)));
    assert_eq!(header.currency, "EUR");
    assert!(!header.locked);
}

#[test]
fn non_numeric_advisor_is_batch_fatal() {
    let bytes = batch(&[GOOD_ROW]);
    let content = String::from_utf8_lossy(&bytes).replace("29098", "\"abc\"");
    let result = parse_batch(content.as_bytes());
    assert!(result.header.is_none());
    assert_eq!(result.errors.len(), 1);
    assert!(result.candidates.is_empty(), "no candidates after fatal header");
    assert_eq!(result.stats.total_rows, 0);
}

#[test]
fn unknown_format_is_batch_fatal() {
    let result = parse_batch(b"\"DTVF\";700;21\nline2\nline3");
    assert!(result.header.is_none());
    assert_eq!(result.errors.len(), 1);
    assert!(result.candidates.is_empty());
}

// ---------------------------------------------------------------------------
// Well-formed rows
// ---------------------------------------------------------------------------

#[test]
fn scenario_row_parses_cleanly() {
    let result = parse_batch(&batch(&[GOOD_ROW]));
    assert_eq!(result.stats.total_rows, 1);
    assert_eq!(result.stats.valid_rows, 1);

    let c = &result.candidates[0];
    assert!(c.is_valid(), "unexpected errors: {:?}", c.errors);
    assert!(c.warnings.is_empty(), "unexpected warnings: {:?}", c.warnings);
    assert_eq!(c.amount, dec!(100.50));
    assert_eq!(c.debit_credit, DebitCredit::Soll);
    assert_eq!(c.currency, "EUR");
    assert_eq!(c.account, "4400");
    assert_eq!(c.contra_account, "70000");
    assert_eq!(c.document_date, Some(date(2025, 1, 15)));
    assert_eq!(c.document_ref1, "RE-2025-001");
    assert_eq!(c.booking_text, "Büromaterial");
    assert_eq!(c.row_number, 1);
}

#[test]
fn rows_are_numbered_by_data_position() {
    let rows = [GOOD_ROW, GOOD_ROW, GOOD_ROW];
    let result = parse_batch(&batch(&rows));
    let numbers: Vec<u32> = result.candidates.iter().map(|c| c.row_number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
}

#[test]
fn blank_lines_are_ignored() {
    let mut content = format!("{}\n{}\n\n{}\n   \n", header_line(), column_line(), GOOD_ROW);
    content.push('\n');
    let result = parse_batch(content.as_bytes());
    assert_eq!(result.stats.total_rows, 1);
}

// ---------------------------------------------------------------------------
// Row errors
// ---------------------------------------------------------------------------

#[test]
fn zero_amount_is_row_fatal() {
    let row = GOOD_ROW.replace("100,50", "0,00");
    let result = parse_batch(&batch(&[&row]));
    let c = &result.candidates[0];
    assert!(!c.is_valid());
    assert!(c.errors.contains(&"Betrag ungültig".to_string()));
    assert_eq!(result.stats.invalid_rows, 1);
}

#[test]
fn unparsable_amount_is_row_fatal() {
    let row = GOOD_ROW.replace("100,50", "viel");
    let result = parse_batch(&batch(&[&row]));
    assert!(result.candidates[0]
        .errors
        .contains(&"Betrag ungültig".to_string()));
}

#[test]
fn invalid_indicator_is_row_fatal() {
    let row = GOOD_ROW.replace("\"S\"", "\"X\"");
    let result = parse_batch(&batch(&[&row]));
    assert!(result.candidates[0]
        .errors
        .contains(&"Soll/Haben-Kennzeichen ungültig".to_string()));
}

#[test]
fn missing_accounts_are_row_fatal() {
    let row = GOOD_ROW
        .replace("\"4400\"", "\"\"")
        .replace("\"70000\"", "\"\"");
    let result = parse_batch(&batch(&[&row]));
    let errors = &result.candidates[0].errors;
    assert!(errors.contains(&"Konto fehlt".to_string()));
    assert!(errors.contains(&"Gegenkonto fehlt".to_string()));
}

#[test]
fn short_row_becomes_rejected_candidate() {
    let result = parse_batch(&batch(&[GOOD_ROW, "\"100,50\";\"S\"", GOOD_ROW]));
    assert_eq!(result.stats.total_rows, 3, "no line may be dropped silently");
    let c = &result.candidates[1];
    assert_eq!(c.row_number, 2);
    assert_eq!(c.errors.len(), 1);
    assert!(c.errors[0].contains("zu wenige Felder"));
}

// ---------------------------------------------------------------------------
// Row warnings
// ---------------------------------------------------------------------------

#[test]
fn out_of_period_date_only_warns() {
    let row = GOOD_ROW.replace("15012025", "15022025");
    let result = parse_batch(&batch(&[&row]));
    let c = &result.candidates[0];
    assert!(c.is_valid(), "out-of-period postings are legal");
    assert!(c
        .warnings
        .contains(&"Belegdatum außerhalb des Stapelzeitraums".to_string()));
}

#[test]
fn missing_date_only_warns() {
    let row = GOOD_ROW.replace("\"15012025\"", "\"\"");
    let result = parse_batch(&batch(&[&row]));
    let c = &result.candidates[0];
    assert!(c.is_valid());
    assert_eq!(c.document_date, None);
    assert!(c.warnings.contains(&"Belegdatum fehlt".to_string()));
}

#[test]
fn oversized_reference_warns() {
    let long_ref = "R".repeat(40);
    let row = GOOD_ROW.replace("RE-2025-001", &long_ref);
    let result = parse_batch(&batch(&[&row]));
    let c = &result.candidates[0];
    assert!(c.is_valid());
    assert!(c.warnings.iter().any(|w| w.contains("Belegfeld 1")));
}

#[test]
fn empty_text_warns() {
    let row = GOOD_ROW.replace("\"Büromaterial\"", "\"\"");
    let result = parse_batch(&batch(&[&row]));
    let c = &result.candidates[0];
    assert!(c.is_valid());
    assert!(c.warnings.contains(&"Buchungstext fehlt".to_string()));
}

// ---------------------------------------------------------------------------
// Summary counters
// ---------------------------------------------------------------------------

#[test]
fn counters_add_up() {
    let bad = GOOD_ROW.replace("100,50", "0,00");
    let second = GOOD_ROW.replace("100,50", "49,50");
    let result = parse_batch(&batch(&[GOOD_ROW, &bad, &second]));
    assert_eq!(result.stats.total_rows, 3);
    assert_eq!(result.stats.valid_rows, 2);
    assert_eq!(result.stats.invalid_rows, 1);
    assert_eq!(
        result.stats.valid_rows + result.stats.invalid_rows,
        result.stats.total_rows
    );
    // Only valid rows contribute to the total amount.
    assert_eq!(result.stats.total_amount, dec!(150.00));
}

#[test]
fn parse_result_serialises_to_json() {
    // Backends hand the result straight to their API layer.
    let result = parse_batch(&batch(&[GOOD_ROW]));
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["stats"]["valid_rows"], 1);
    assert_eq!(json["candidates"][0]["account"], "4400");
    assert_eq!(json["header"]["advisor_number"], 29098);
}

// ---------------------------------------------------------------------------
// Encodings
// ---------------------------------------------------------------------------

#[test]
fn latin1_umlauts_decode() {
    // batch() encodes as Latin-1, so "Büromaterial" arrives as 0xFC.
    let bytes = batch(&[GOOD_ROW]);
    assert!(bytes.contains(&0xFCu8), "fixture should be Latin-1 encoded");
    let result = parse_batch(&bytes);
    assert_eq!(result.candidates[0].booking_text, "Büromaterial");
}

#[test]
fn utf8_bom_switches_encoding() {
    let mut bytes = vec![0xEF, 0xBB, 0xBF];
    let content = format!("{}\n{}\n{}\n", header_line(), column_line(), GOOD_ROW);
    bytes.extend_from_slice(content.as_bytes());
    let result = parse_batch(&bytes);
    assert_eq!(result.candidates[0].booking_text, "Büromaterial");
}

#[test]
fn utf8_without_bom_is_mojibake_not_panic() {
    // UTF-8 bytes without a BOM are decoded as Latin-1 by contract;
    // the umlaut comes out wrong but parsing still succeeds.
    let content = format!("{}\n{}\n{}\n", header_line(), column_line(), GOOD_ROW);
    let result = parse_batch(content.as_bytes());
    assert_eq!(result.stats.valid_rows, 1);
    assert_ne!(result.candidates[0].booking_text, "Büromaterial");
}
