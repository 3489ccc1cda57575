//! Panel loading and assembly.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use lp_calibration::CalibrationRegistry;
use lp_channels::{
    AnalogChannel, AnalogChannelConfig, CalibrationStatus, DigitalChannel, DigitalChannelConfig,
    GatedRf, HeadlessAnalogView, HeadlessDigitalView, Limits, OutputUpdate, RfSetting,
};
use lp_core::ChannelId;
use lp_project::schema::{AnalogOutputDef, PanelDef};
use tracing::info;

use crate::error::{AppError, AppResult};

/// Load and validate a panel file (YAML or JSON).
pub fn load_panel(path: &Path) -> AppResult<PanelDef> {
    Ok(lp_project::load(path)?)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Analog,
    Digital,
    Rf,
}

/// Summary of one output for listing.
#[derive(Debug, Clone)]
pub struct OutputSummary {
    pub channel: String,
    pub name: String,
    pub kind: OutputKind,
    pub calibration: Option<String>,
}

pub fn list_outputs(panel: &PanelDef) -> Vec<OutputSummary> {
    let analog = panel.analog_outputs.iter().map(|o| OutputSummary {
        channel: o.channel.clone(),
        name: o.name.clone(),
        kind: OutputKind::Analog,
        calibration: o.calibration.as_ref().map(|c| c.kind.clone()),
    });
    let digital = panel.digital_outputs.iter().map(|o| OutputSummary {
        channel: o.channel.clone(),
        name: o.name.clone(),
        kind: OutputKind::Digital,
        calibration: None,
    });
    let rf = panel.rf_outputs.iter().map(|o| OutputSummary {
        channel: o.channel.clone(),
        name: o.name.clone(),
        kind: OutputKind::Rf,
        calibration: None,
    });
    analog.chain(digital).chain(rf).collect()
}

/// Analog channel together with the headless view it was created with.
#[derive(Debug)]
pub struct AnalogOutput {
    pub channel: AnalogChannel,
    pub view: HeadlessAnalogView,
}

#[derive(Debug)]
pub struct DigitalOutput {
    pub channel: DigitalChannel,
    pub view: HeadlessDigitalView,
}

/// Calibration that could not be applied to a channel.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationFallback {
    pub channel: ChannelId,
    pub kind: String,
    pub reason: String,
}

/// Outcome of assembling a panel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PanelReport {
    pub analog_count: usize,
    pub digital_count: usize,
    pub rf_count: usize,
    pub fallbacks: Vec<CalibrationFallback>,
}

impl PanelReport {
    pub fn is_clean(&self) -> bool {
        self.fallbacks.is_empty()
    }
}

/// Every output of a panel file, live, with headless views.
///
/// Changes forwarded by the channels are collected in order and can be
/// taken with [`drain_updates`](Panel::drain_updates).
#[derive(Debug)]
pub struct Panel {
    pub name: String,
    pub analog: Vec<AnalogOutput>,
    pub digital: Vec<DigitalOutput>,
    pub rf: Vec<(String, GatedRf<ChannelId>)>,
    updates: Rc<RefCell<Vec<OutputUpdate>>>,
}

impl Panel {
    pub fn analog(&self, channel: &str) -> Option<&AnalogOutput> {
        self.analog.iter().find(|o| o.channel.channel_id().as_str() == channel)
    }

    pub fn analog_mut(&mut self, channel: &str) -> AppResult<&mut AnalogOutput> {
        self.analog
            .iter_mut()
            .find(|o| o.channel.channel_id().as_str() == channel)
            .ok_or_else(|| AppError::ChannelNotFound(channel.to_string()))
    }

    pub fn digital_mut(&mut self, channel: &str) -> AppResult<&mut DigitalOutput> {
        self.digital
            .iter_mut()
            .find(|o| o.channel.channel_id().as_str() == channel)
            .ok_or_else(|| AppError::ChannelNotFound(channel.to_string()))
    }

    pub fn rf(&self, channel: &str) -> Option<&GatedRf<ChannelId>> {
        self.rf.iter().find(|(id, _)| id == channel).map(|(_, rf)| rf)
    }

    /// Take every change forwarded to hardware since the last call.
    pub fn drain_updates(&self) -> Vec<OutputUpdate> {
        self.updates.borrow_mut().drain(..).collect()
    }
}

/// Build every channel of `def`, sharing calibrations through `registry`.
pub fn build_panel(
    def: &PanelDef,
    registry: &mut CalibrationRegistry,
) -> AppResult<(Panel, PanelReport)> {
    let updates: Rc<RefCell<Vec<OutputUpdate>>> = Rc::default();
    let mut report = PanelReport::default();

    let mut analog = Vec::with_capacity(def.analog_outputs.len());
    for output in &def.analog_outputs {
        let view = HeadlessAnalogView::new();
        let sink = Rc::clone(&updates);
        let channel = AnalogChannel::new(analog_config(output)?, view.clone(), registry, move |u| {
            sink.borrow_mut().push(u.clone())
        })?;
        if let CalibrationStatus::Fallback { kind, error } = channel.calibration_status() {
            report.fallbacks.push(CalibrationFallback {
                channel: channel.channel_id().clone(),
                kind: kind.clone(),
                reason: error.to_string(),
            });
        }
        analog.push(AnalogOutput { channel, view });
    }

    let mut digital = Vec::with_capacity(def.digital_outputs.len());
    for output in &def.digital_outputs {
        let view = HeadlessDigitalView::new();
        let sink = Rc::clone(&updates);
        let channel = DigitalChannel::new(
            DigitalChannelConfig::new(output.name.as_str(), output.channel.as_str()),
            view.clone(),
            move |u: &OutputUpdate| sink.borrow_mut().push(u.clone()),
        );
        digital.push(DigitalOutput { channel, view });
    }

    let rf = def
        .rf_outputs
        .iter()
        .map(|o| {
            let setting = RfSetting::new(o.amplitude, o.frequency, o.phase);
            (o.channel.clone(), GatedRf::new(setting, ChannelId::from(o.gate.as_str())))
        })
        .collect::<Vec<_>>();

    report.analog_count = analog.len();
    report.digital_count = digital.len();
    report.rf_count = rf.len();
    info!(
        panel = %def.name,
        analog = report.analog_count,
        digital = report.digital_count,
        rf = report.rf_count,
        fallbacks = report.fallbacks.len(),
        "panel assembled"
    );

    let panel = Panel {
        name: def.name.clone(),
        analog,
        digital,
        rf,
        updates,
    };
    Ok((panel, report))
}

fn analog_config(output: &AnalogOutputDef) -> AppResult<AnalogChannelConfig> {
    let step = output.step.ok_or_else(|| {
        AppError::InvalidInput(format!("{}: step is required", output.channel))
    })?;
    let limits = Limits {
        min: output.min,
        max: output.max,
        step,
    };
    let config = AnalogChannelConfig::new(
        output.name.as_str(),
        output.channel.as_str(),
        output.default_unit.as_str(),
        limits,
    );
    Ok(match &output.calibration {
        Some(calibration) => config.with_calibration(calibration.kind.as_str(), calibration.params.clone()),
        None => config,
    })
}
