//! Error types for channel operations.

use lp_calibration::ConversionDomainError;
use lp_core::{ChannelId, LpError, ViewId};
use thiserror::Error;

/// Result type for channel operations.
pub type ChannelResult<T> = Result<T, ChannelError>;

/// Errors raised by channel operations. None of them leaves a channel
/// partially updated.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ChannelError {
    /// Conversion requested for a unit outside the channel's calibration.
    #[error(transparent)]
    ConversionDomain(#[from] ConversionDomainError),

    /// Input could not be coerced or limits are unusable.
    #[error("Invalid input: {0}")]
    Input(#[from] LpError),

    /// Interactive edit attempted while the channel is locked.
    #[error("Channel '{channel}' is locked")]
    Locked { channel: ChannelId },

    /// Event routed from a view the channel does not own.
    #[error("View {view} is not bound to channel '{channel}'")]
    UnknownView { channel: ChannelId, view: ViewId },

    /// Unit selector index outside the shared unit list.
    #[error("Unit selection {index} out of range ({len} units)")]
    Selection { index: usize, len: usize },

    /// Event kind this channel type does not handle.
    #[error("Channel '{channel}' does not handle {what}")]
    UnsupportedEvent {
        channel: ChannelId,
        what: &'static str,
    },
}
