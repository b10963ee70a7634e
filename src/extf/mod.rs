//! DATEV EXTF Buchungsstapel interchange: parse and generate.
//!
//! One batch file is a header line, a column-name line, and N data rows —
//! semicolon-separated, text fields double-quoted with internal quotes
//! doubled, comma decimals, `DDMMYYYY` dates, Latin-1 encoded unless a
//! UTF-8 BOM says otherwise.
//!
//! # Example
//!
//! ```ignore
//! use buchstapel::extf::{parse_batch, generate_batch, ExportConfigBuilder, ExportPeriod};
//!
//! let result = parse_batch(&file_bytes);
//! println!("{} of {} rows valid", result.stats.valid_rows, result.stats.total_rows);
//!
//! let config = ExportConfigBuilder::new(29098, 55003).build();
//! let outcome = generate_batch(&bookings, &ExportPeriod { year: 2025, month: 1 }, &config)?;
//! ```

pub mod fields;
mod header;
mod parse;
mod row;

mod export;

pub use export::{ExportConfig, ExportConfigBuilder, ExportOutcome, ExportPeriod, generate_batch};
pub use fields::FieldError;
pub use header::FORMAT_NAME;
pub use parse::parse_batch;
