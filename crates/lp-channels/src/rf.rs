//! RF output settings.

use serde::{Deserialize, Serialize};

/// Amplitude, frequency and phase of an RF output.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RfSetting {
    pub amplitude: f64,
    pub frequency: f64,
    pub phase: f64,
}

impl RfSetting {
    pub fn new(amplitude: f64, frequency: f64, phase: f64) -> Self {
        Self {
            amplitude,
            frequency,
            phase,
        }
    }
}

/// RF setting paired with the gate that switches it, e.g. a digital channel id.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GatedRf<G> {
    pub rf: RfSetting,
    pub gate: G,
}

impl<G> GatedRf<G> {
    pub fn new(rf: RfSetting, gate: G) -> Self {
        Self { rf, gate }
    }

    pub fn rf(&self) -> &RfSetting {
        &self.rf
    }

    pub fn gate(&self) -> &G {
        &self.gate
    }
}
