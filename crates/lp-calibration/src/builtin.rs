//! Calibration factories shipped with labpanel.
//!
//! - `linear`: one human unit related to the hardware unit by
//!   `human = slope * hardware + offset` (e.g. a current source driven by a
//!   control voltage). The slope may be negative.
//! - `si_prefix`: SI-prefixed variants of a base unit (`V` -> `mV`, `kV`, ...),
//!   with scale factors taken from `uom`.

use std::sync::Arc;

use lp_core::{QuantityKind, UnitId};

use crate::calibration::Calibration;
use crate::error::{CalibrationResult, ConfigurationError};
use crate::params::CalibrationParams;
use crate::table::{ConversionTable, UnitConversion};

pub const LINEAR: &str = "linear";
pub const SI_PREFIX: &str = "si_prefix";

/// `linear` calibration.
///
/// Parameters: `hardware_unit` (text), `unit` (text), `slope` (nonzero
/// number), `offset` (number, default 0).
pub fn linear(params: &CalibrationParams) -> CalibrationResult<Arc<dyn Calibration>> {
    params.only(LINEAR, &["hardware_unit", "unit", "slope", "offset"])?;
    let hardware_unit = params.text(LINEAR, "hardware_unit")?;
    let unit = params.text(LINEAR, "unit")?;
    let slope = params.number(LINEAR, "slope")?;
    let offset = params.number_or(LINEAR, "offset", 0.0)?;

    if slope == 0.0 {
        return Err(ConfigurationError::MalformedParameter {
            kind: LINEAR.to_string(),
            key: "slope".to_string(),
            reason: "slope must be nonzero".to_string(),
        });
    }

    let table = ConversionTable::builder(hardware_unit)
        .unit(unit, UnitConversion::affine(slope, offset))
        .build()?;
    Ok(Arc::new(table))
}

/// `si_prefix` calibration.
///
/// Parameters: `quantity` (`voltage`, `current`, `frequency` or `power`),
/// `units` (optional list of prefixed symbols; defaults to every prefix known
/// for the quantity). The hardware unit is the unprefixed SI symbol.
pub fn si_prefix(params: &CalibrationParams) -> CalibrationResult<Arc<dyn Calibration>> {
    params.only(SI_PREFIX, &["quantity", "units"])?;
    let name = params.text(SI_PREFIX, "quantity")?;
    let quantity =
        QuantityKind::from_name(name).ok_or_else(|| ConfigurationError::MalformedParameter {
            kind: SI_PREFIX.to_string(),
            key: "quantity".to_string(),
            reason: format!("unknown quantity '{name}'"),
        })?;

    let symbols = match params.names(SI_PREFIX, "units")? {
        Some(symbols) => symbols,
        None => quantity
            .prefixed_symbols()
            .iter()
            .map(|s| s.to_string())
            .collect(),
    };

    let mut builder = ConversionTable::builder(quantity.base_symbol());
    for symbol in symbols {
        // size of one human unit in base units: hardware = human * scale
        let scale =
            quantity
                .scale_of(&symbol)
                .ok_or_else(|| ConfigurationError::MalformedParameter {
                    kind: SI_PREFIX.to_string(),
                    key: "units".to_string(),
                    reason: format!("'{symbol}' is not a unit of {quantity}"),
                })?;
        builder = builder.unit(
            UnitId::from(symbol),
            UnitConversion::new(move |human| human * scale, move |hardware| hardware / scale),
        );
    }
    Ok(Arc::new(builder.build()?))
}
