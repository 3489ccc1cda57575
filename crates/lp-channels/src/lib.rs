//! Output channels for labpanel.
//!
//! A channel owns the canonical state of one hardware output and keeps any
//! number of views of it in sync. Views never touch channel state: they post
//! events through a [`ViewPort`] and the channel interprets them in
//! [`dispatch_pending`](AnalogChannel::dispatch_pending).
//!
//! # Architecture
//!
//! - [`AnalogChannel`] holds one value model in the current display unit and
//!   converts through its calibration when the unit changes
//! - [`DigitalChannel`] holds one boolean toggle state
//! - [`SignalGate`] suppresses the events a view echoes while the channel is
//!   driving it
//! - [`headless`] provides toolkit-free views used by the app layer and tests
//!
//! Changes that originate from the user (or a script setting a new target)
//! are forwarded to the channel's update callback. Readbacks of hardware
//! state are not, so hardware -> UI -> hardware loops cannot form.

pub mod adjustment;
pub mod analog;
pub mod digital;
pub mod error;
pub mod event;
pub mod headless;
pub mod menu;
pub mod rf;
pub mod signal;
pub mod view;

pub use adjustment::Adjustment;
pub use analog::{AnalogChannel, AnalogChannelConfig, CalibrationSpec, CalibrationStatus, Limits};
pub use digital::{DigitalChannel, DigitalChannelConfig};
pub use error::{ChannelError, ChannelResult};
pub use event::{DispatchSummary, OutputUpdate, PostedEvent, UpdateCallback, UpdateKind, ViewEvent, ViewPort};
pub use headless::{HeadlessAnalogView, HeadlessDigitalView};
pub use menu::{ChannelListener, ContextMenu, MenuAction, MenuEntry};
pub use rf::{GatedRf, RfSetting};
pub use signal::{SignalBlock, SignalGate};
pub use view::{AnalogView, DigitalView};
