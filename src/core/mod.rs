//! Core domain types and error taxonomy.
//!
//! Everything the codec, detector, and orchestrators exchange lives here:
//! batch headers, booking candidates with their collected error/warning
//! lists, parse results, and the persisted [`Booking`] entity owned by the
//! storage collaborator.

mod error;
mod types;

pub use error::*;
pub use types::*;
