//! Calibrations for labpanel output channels.
//!
//! A calibration converts between the unit a channel is driven in on the
//! hardware side and the units an operator may pick in the UI. Calibrations
//! are built from a kind key plus a parameter mapping through the
//! [`CalibrationRegistry`], which rejects unknown kinds and bad parameters up
//! front and shares one instance between channels configured identically.
//!
//! # Architecture
//!
//! - [`Calibration`] is the conversion capability channels depend on
//! - [`ConversionTable`] is the standard implementation: an explicit table
//!   from each human unit to a pair of pure conversion functions
//! - [`builtin`] holds the factories shipped with the crate (`linear`,
//!   `si_prefix`)

pub mod builtin;
pub mod calibration;
pub mod error;
pub mod params;
pub mod registry;
pub mod table;

pub use calibration::Calibration;
pub use error::{CalibrationResult, ConfigurationError, ConversionDomainError};
pub use params::{CalibrationParams, ParamValue};
pub use registry::{CalibrationFactory, CalibrationRegistry};
pub use table::{ConversionTable, ConversionTableBuilder, UnitConversion};
