//! Shared application service layer for labpanel.
//!
//! Loads panel files, assembles their channels with headless views and
//! answers unit queries for frontends.

pub mod error;
pub mod panel_service;
pub mod query;

pub use error::{AppError, AppResult};
pub use panel_service::{
    AnalogOutput, CalibrationFallback, DigitalOutput, OutputKind, OutputSummary, Panel,
    PanelReport, build_panel, list_outputs, load_panel,
};
pub use query::{Conversion, UnitChoices, convert, unit_choices};
