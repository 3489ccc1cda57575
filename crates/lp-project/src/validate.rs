//! Panel validation logic.

use crate::schema::{AnalogOutputDef, PanelDef, RfOutputDef};
use std::collections::HashSet;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_panel(panel: &PanelDef) -> Result<(), ValidationError> {
    if panel.version > crate::migrate::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: panel.version,
        });
    }

    let mut channel_ids = HashSet::new();
    for id in panel.channel_ids() {
        if id.trim().is_empty() {
            return Err(invalid("channel", id, "must not be empty"));
        }
        if !channel_ids.insert(id) {
            return Err(ValidationError::DuplicateId {
                id: id.to_string(),
                context: "outputs".to_string(),
            });
        }
    }

    for output in &panel.analog_outputs {
        validate_analog(output)?;
    }

    for output in &panel.digital_outputs {
        require_name(&output.name, &output.channel)?;
    }

    let digital: HashSet<&str> = panel
        .digital_outputs
        .iter()
        .map(|o| o.channel.as_str())
        .collect();
    for output in &panel.rf_outputs {
        validate_rf(output, &digital)?;
    }

    Ok(())
}

fn validate_analog(output: &AnalogOutputDef) -> Result<(), ValidationError> {
    let ch = &output.channel;
    require_name(&output.name, ch)?;

    if output.default_unit.trim().is_empty() {
        return Err(invalid(
            &format!("{ch}.default_unit"),
            &output.default_unit,
            "must not be empty",
        ));
    }

    require_finite(&format!("{ch}.min"), output.min)?;
    require_finite(&format!("{ch}.max"), output.max)?;
    if output.min > output.max {
        return Err(invalid(
            &format!("{ch}.min"),
            &output.min.to_string(),
            &format!("exceeds max {}", output.max),
        ));
    }

    match output.step {
        None => return Err(invalid(&format!("{ch}.step"), "none", "step is required")),
        Some(step) => {
            require_finite(&format!("{ch}.step"), step)?;
            if step <= 0.0 {
                return Err(invalid(&format!("{ch}.step"), &step.to_string(), "must be positive"));
            }
        }
    }

    if let Some(calibration) = &output.calibration
        && calibration.kind.trim().is_empty()
    {
        return Err(invalid(
            &format!("{ch}.calibration.kind"),
            &calibration.kind,
            "must not be empty",
        ));
    }
    Ok(())
}

fn validate_rf(output: &RfOutputDef, digital: &HashSet<&str>) -> Result<(), ValidationError> {
    let ch = &output.channel;
    require_name(&output.name, ch)?;
    if !digital.contains(output.gate.as_str()) {
        return Err(ValidationError::MissingReference {
            id: output.gate.clone(),
            context: format!("{ch}.gate"),
        });
    }
    require_finite(&format!("{ch}.amplitude"), output.amplitude)?;
    require_finite(&format!("{ch}.frequency"), output.frequency)?;
    require_finite(&format!("{ch}.phase"), output.phase)?;
    if output.frequency < 0.0 {
        return Err(invalid(
            &format!("{ch}.frequency"),
            &output.frequency.to_string(),
            "must not be negative",
        ));
    }
    Ok(())
}

fn require_name(name: &str, channel: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(invalid(&format!("{channel}.name"), name, "must not be empty"));
    }
    Ok(())
}

fn require_finite(field: &str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(invalid(field, &value.to_string(), "must be finite"));
    }
    Ok(())
}

fn invalid(field: &str, value: &str, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
