//! Error types for calibration construction and use.

use lp_core::UnitId;
use thiserror::Error;

/// Result type for calibration construction.
pub type CalibrationResult<T> = Result<T, ConfigurationError>;

/// A calibration could not be built for a channel.
///
/// Channels treat this as recoverable: they fall back to operating in their
/// default unit only and report the error through their calibration status.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigurationError {
    /// No factory is registered under this kind.
    #[error("Unknown calibration kind '{kind}'")]
    UnknownKind { kind: String },

    /// A factory is already registered under this kind.
    #[error("Calibration kind '{kind}' is already registered")]
    DuplicateKind { kind: String },

    /// A required parameter is absent.
    #[error("Calibration '{kind}' is missing parameter '{key}'")]
    MissingParameter { kind: String, key: String },

    /// A parameter is present but unusable.
    #[error("Calibration '{kind}' has malformed parameter '{key}': {reason}")]
    MalformedParameter {
        kind: String,
        key: String,
        reason: String,
    },

    /// The conversion table itself is inconsistent.
    #[error("Invalid conversion table: {what}")]
    InvalidTable { what: String },

    /// The calibration drives the hardware in a different unit than the channel.
    #[error("Calibration '{kind}' uses hardware unit '{found}' but the channel expects '{expected}'")]
    HardwareUnitMismatch {
        kind: String,
        expected: UnitId,
        found: UnitId,
    },
}

/// A conversion was requested for a unit the calibration does not declare.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("Unit '{unit}' is not a human unit of the calibration (hardware unit '{hardware_unit}')")]
pub struct ConversionDomainError {
    pub unit: UnitId,
    pub hardware_unit: UnitId,
}
