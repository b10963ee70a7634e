//! # buchstapel
//!
//! DATEV EXTF *Buchungsstapel* interchange for German bookkeeping
//! backends: a line-oriented codec (parse + generate), row-level field
//! validation with German-locale numeric and date conventions, and a
//! multi-tier duplicate-booking detector — untrusted external text in,
//! validated domain records out.
//!
//! All monetary values use [`rust_decimal::Decimal`] — never floating
//! point. Persistence stays outside the crate, behind
//! [`store::BookingStore`]; every operation takes the company and date
//! window explicitly, so the library is stateless.
//!
//! ## Quick Start
//!
//! ```rust
//! use buchstapel::extf::parse_batch;
//! use rust_decimal_macros::dec;
//!
//! // A minimal Latin-1 batch: header, column names, one data row.
//! let file: &[u8] = b"\"EXTF\";700;21;\"Buchungsstapel\";13;20250101120000000;;\"RE\";\"buchstapel\";\"\";29098;55003;20250101;4;20250101;20250131;\"Januar\";\"\";1;0;0;\"EUR\";;\"\";;;\"\";;;\"\"\n\
//! \"Umsatz (ohne Soll/Haben-Kz)\";\"Soll/Haben-Kennzeichen\"\n\
//! \"100,50\";\"S\";\"EUR\";;;;\"4400\";\"70000\";\"\";\"15012025\";\"RE-2025-001\";\"\";;\"B\xFCromaterial\"\n";
//!
//! let result = parse_batch(file);
//! assert!(result.errors.is_empty());
//! assert_eq!(result.stats.valid_rows, 1);
//!
//! let row = &result.candidates[0];
//! assert_eq!(row.amount, dec!(100.50));
//! assert_eq!(row.account, "4400");
//! assert_eq!(row.booking_text, "Büromaterial");
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`core`] | Batch/booking types, error taxonomy |
//! | [`extf`] | EXTF codec: field level, header, rows, whole batches |
//! | [`dedup`] | Tiered duplicate detection over a booking window |
//! | [`import`] | Partial-success import with a duplicate guard |
//! | [`store`] | The storage-collaborator trait this crate consumes |

pub mod core;
pub mod dedup;
pub mod extf;
pub mod import;
pub mod store;

// Re-export core types at crate root for convenience
pub use crate::core::*;
