//! Unit queries and conversions on assembled panels.

use lp_channels::UpdateKind;
use lp_core::{Tolerances, UnitId, nearly_equal};

use crate::error::{AppError, AppResult};
use crate::panel_service::Panel;

/// Units offered for an analog channel and the one it is driven in.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitChoices {
    pub hardware_unit: UnitId,
    pub units: Vec<UnitId>,
    /// Calibration kind that was requested but rejected, if any.
    pub fallback: Option<String>,
}

pub fn unit_choices(panel: &Panel, channel: &str) -> AppResult<UnitChoices> {
    let output = panel
        .analog(channel)
        .ok_or_else(|| AppError::ChannelNotFound(channel.to_string()))?;
    let status = output.channel.calibration_status();
    Ok(UnitChoices {
        hardware_unit: output.channel.hardware_unit().clone(),
        units: output.channel.units().to_vec(),
        fallback: status.error().map(|e| e.to_string()),
    })
}

/// A hardware value shown in another unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub unit: UnitId,
    pub display_value: f64,
    pub display_range: (f64, f64),
    /// Hardware value actually in effect after clamping to the limits.
    pub hardware_value: f64,
    pub clamped: bool,
}

/// Drive `channel` to `value` (hardware unit) as a readback, then switch its
/// display to `unit` and report what the views show.
///
/// Nothing is forwarded to hardware.
pub fn convert(panel: &mut Panel, channel: &str, value: f64, unit: &UnitId) -> AppResult<Conversion> {
    let output = panel.analog_mut(channel)?;
    let analog = &mut output.channel;
    let view = analog
        .view_ids()
        .first()
        .copied()
        .ok_or_else(|| AppError::Channel(format!("{channel} has no views")))?;

    analog.set_value(value, UpdateKind::Readback)?;
    let hardware_value = analog.value()?;
    analog.on_unit_changed(view, unit)?;

    let adjustment = analog.adjustment();
    Ok(Conversion {
        unit: unit.clone(),
        display_value: adjustment.value(),
        display_range: (adjustment.lower(), adjustment.upper()),
        hardware_value,
        clamped: !nearly_equal(hardware_value, value, Tolerances::default()),
    })
}
