//! Schema migration framework.

use crate::ProjectError;
use crate::schema::PanelDef;

pub const LATEST_VERSION: u32 = 2;

/// Version 1 files may omit `step`; it becomes this fraction of the range.
pub const DEFAULT_STEP_FRACTION: f64 = 1e-3;

pub fn migrate_to_latest(mut panel: PanelDef) -> Result<PanelDef, ProjectError> {
    while panel.version < LATEST_VERSION {
        panel = migrate_one_version(panel)?;
    }
    Ok(panel)
}

fn migrate_one_version(panel: PanelDef) -> Result<PanelDef, ProjectError> {
    match panel.version {
        1 => migrate_v1_to_v2(panel),
        v => Err(ProjectError::Migration {
            what: format!("No migration path from version {}", v),
        }),
    }
}

fn migrate_v1_to_v2(mut panel: PanelDef) -> Result<PanelDef, ProjectError> {
    for output in &mut panel.analog_outputs {
        if output.step.is_none() {
            let span = output.max - output.min;
            // degenerate ranges are left for validation to report
            if span.is_finite() && span > 0.0 {
                output.step = Some(span * DEFAULT_STEP_FRACTION);
            }
        }
    }
    panel.version = 2;
    Ok(panel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::AnalogOutputDef;

    fn v1_panel(step: Option<f64>) -> PanelDef {
        PanelDef {
            version: 1,
            name: "legacy".to_string(),
            analog_outputs: vec![AnalogOutputDef {
                name: "Bias".to_string(),
                channel: "ao/0".to_string(),
                default_unit: "V".to_string(),
                min: -5.0,
                max: 5.0,
                step,
                calibration: None,
            }],
            digital_outputs: Vec::new(),
            rf_outputs: Vec::new(),
        }
    }

    #[test]
    fn v1_missing_step_gets_default() {
        let panel = migrate_to_latest(v1_panel(None)).unwrap();
        assert_eq!(panel.version, LATEST_VERSION);
        let step = panel.analog_outputs[0].step.unwrap();
        assert!((step - 0.01).abs() < 1e-15);
    }

    #[test]
    fn v1_explicit_step_is_kept() {
        let panel = migrate_to_latest(v1_panel(Some(0.5))).unwrap();
        assert_eq!(panel.analog_outputs[0].step, Some(0.5));
    }

    #[test]
    fn version_zero_has_no_path() {
        let mut panel = v1_panel(None);
        panel.version = 0;
        assert!(matches!(
            migrate_to_latest(panel),
            Err(ProjectError::Migration { .. })
        ));
    }
}
