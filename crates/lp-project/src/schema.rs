//! Panel file schema definitions.

use lp_calibration::CalibrationParams;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PanelDef {
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub analog_outputs: Vec<AnalogOutputDef>,
    #[serde(default)]
    pub digital_outputs: Vec<DigitalOutputDef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rf_outputs: Vec<RfOutputDef>,
}

impl PanelDef {
    pub fn analog(&self, channel: &str) -> Option<&AnalogOutputDef> {
        self.analog_outputs.iter().find(|o| o.channel == channel)
    }

    pub fn digital(&self, channel: &str) -> Option<&DigitalOutputDef> {
        self.digital_outputs.iter().find(|o| o.channel == channel)
    }

    /// Channel ids of every output, in file order.
    pub fn channel_ids(&self) -> impl Iterator<Item = &str> {
        self.analog_outputs
            .iter()
            .map(|o| o.channel.as_str())
            .chain(self.digital_outputs.iter().map(|o| o.channel.as_str()))
            .chain(self.rf_outputs.iter().map(|o| o.channel.as_str()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalogOutputDef {
    pub name: String,
    pub channel: String,
    /// Unit the hardware is driven in.
    pub default_unit: String,
    pub min: f64,
    pub max: f64,
    /// Required from version 2 on; older files get a default during migration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calibration: Option<CalibrationDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalibrationDef {
    pub kind: String,
    #[serde(default)]
    pub params: CalibrationParams,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DigitalOutputDef {
    pub name: String,
    pub channel: String,
}

/// RF output switched by one of the panel's digital outputs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RfOutputDef {
    pub name: String,
    pub channel: String,
    /// Channel id of the gating digital output.
    pub gate: String,
    pub amplitude: f64,
    pub frequency: f64,
    #[serde(default)]
    pub phase: f64,
}
