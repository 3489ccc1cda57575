//! lp-core: stable foundation for labpanel.
//!
//! Contains:
//! - units (unit identifiers, SI prefix scales derived with uom)
//! - numeric (Real, tolerances, loose numeric/flag coercion)
//! - ids (compact view IDs, hardware channel IDs)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{LpError, LpResult};
pub use ids::*;
pub use numeric::*;
pub use units::*;
