//! Explicit unit conversion tables.
//!
//! Each human unit maps to a pair of pure conversion functions. Tables are
//! validated when built, so a table that exists is known to be consistent
//! with its declared unit set.

use std::collections::HashSet;
use std::fmt;

use lp_core::UnitId;

use crate::calibration::Calibration;
use crate::error::{CalibrationResult, ConfigurationError, ConversionDomainError};

type ConvertFn = Box<dyn Fn(f64) -> f64 + Send + Sync>;

/// Hardware values used to probe a conversion for monotonicity when a table is built.
const PROBE_POINTS: [f64; 4] = [-1.0, 0.0, 1.0, 10.0];

/// Conversion pair for one human unit.
pub struct UnitConversion {
    to_hardware: ConvertFn,
    from_hardware: ConvertFn,
}

impl UnitConversion {
    /// Build a conversion from two mutually inverse functions.
    pub fn new(
        to_hardware: impl Fn(f64) -> f64 + Send + Sync + 'static,
        from_hardware: impl Fn(f64) -> f64 + Send + Sync + 'static,
    ) -> Self {
        Self {
            to_hardware: Box::new(to_hardware),
            from_hardware: Box::new(from_hardware),
        }
    }

    /// `human = hardware * factor`.
    pub fn scale(factor: f64) -> Self {
        Self::affine(factor, 0.0)
    }

    /// `human = slope * hardware + offset`.
    pub fn affine(slope: f64, offset: f64) -> Self {
        Self::new(
            move |human| (human - offset) / slope,
            move |hardware| slope * hardware + offset,
        )
    }

    pub fn to_hardware(&self, value: f64) -> f64 {
        (self.to_hardware)(value)
    }

    pub fn from_hardware(&self, value: f64) -> f64 {
        (self.from_hardware)(value)
    }
}

impl fmt::Debug for UnitConversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("UnitConversion(<functions>)")
    }
}

/// Calibration backed by an explicit unit -> conversion table.
#[derive(Debug)]
pub struct ConversionTable {
    hardware_unit: UnitId,
    units: Vec<UnitId>,
    conversions: Vec<UnitConversion>,
}

impl ConversionTable {
    pub fn builder(hardware_unit: impl Into<UnitId>) -> ConversionTableBuilder {
        ConversionTableBuilder {
            hardware_unit: hardware_unit.into(),
            entries: Vec::new(),
        }
    }

    fn lookup(&self, unit: &UnitId) -> Result<&UnitConversion, ConversionDomainError> {
        self.units
            .iter()
            .position(|u| u == unit)
            .map(|idx| &self.conversions[idx])
            .ok_or_else(|| ConversionDomainError {
                unit: unit.clone(),
                hardware_unit: self.hardware_unit.clone(),
            })
    }
}

impl Calibration for ConversionTable {
    fn hardware_unit(&self) -> &UnitId {
        &self.hardware_unit
    }

    fn human_units(&self) -> &[UnitId] {
        &self.units
    }

    fn to_hardware(&self, unit: &UnitId, value: f64) -> Result<f64, ConversionDomainError> {
        Ok(self.lookup(unit)?.to_hardware(value))
    }

    fn from_hardware(&self, unit: &UnitId, value: f64) -> Result<f64, ConversionDomainError> {
        Ok(self.lookup(unit)?.from_hardware(value))
    }
}

/// Collects unit entries and validates them into a [`ConversionTable`].
#[derive(Debug)]
pub struct ConversionTableBuilder {
    hardware_unit: UnitId,
    entries: Vec<(UnitId, UnitConversion)>,
}

impl ConversionTableBuilder {
    pub fn unit(mut self, unit: impl Into<UnitId>, conversion: UnitConversion) -> Self {
        self.entries.push((unit.into(), conversion));
        self
    }

    /// Validate the table.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidTable`] when the table declares no
    /// human unit, repeats a unit, reuses the hardware unit as a human unit,
    /// or has a conversion that is not finite and strictly monotonic over the
    /// probe points.
    pub fn build(self) -> CalibrationResult<ConversionTable> {
        if self.hardware_unit.as_str().trim().is_empty() {
            return Err(invalid("hardware unit name is empty".to_string()));
        }
        if self.entries.is_empty() {
            return Err(invalid(format!(
                "no human units declared for hardware unit '{}'",
                self.hardware_unit
            )));
        }

        let mut seen = HashSet::new();
        for (unit, conversion) in &self.entries {
            if unit.as_str().trim().is_empty() {
                return Err(invalid("human unit name is empty".to_string()));
            }
            if *unit == self.hardware_unit {
                return Err(invalid(format!(
                    "human unit '{unit}' duplicates the hardware unit"
                )));
            }
            if !seen.insert(unit.clone()) {
                return Err(invalid(format!("unit '{unit}' declared twice")));
            }
            check_monotonic(unit, conversion)?;
        }

        let (units, conversions) = self.entries.into_iter().unzip();
        Ok(ConversionTable {
            hardware_unit: self.hardware_unit,
            units,
            conversions,
        })
    }
}

fn check_monotonic(unit: &UnitId, conversion: &UnitConversion) -> CalibrationResult<()> {
    let mapped: Vec<f64> = PROBE_POINTS
        .iter()
        .map(|&x| conversion.from_hardware(x))
        .collect();
    if mapped.iter().any(|v| !v.is_finite()) {
        return Err(invalid(format!(
            "conversion for '{unit}' is not finite over the probe points"
        )));
    }
    let increasing = mapped.windows(2).all(|w| w[1] > w[0]);
    let decreasing = mapped.windows(2).all(|w| w[1] < w[0]);
    if !(increasing || decreasing) {
        return Err(invalid(format!(
            "conversion for '{unit}' is not strictly monotonic"
        )));
    }
    Ok(())
}

fn invalid(what: String) -> ConfigurationError {
    ConfigurationError::InvalidTable { what }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn milli() -> ConversionTable {
        ConversionTable::builder("V")
            .unit("mV", UnitConversion::scale(1e3))
            .build()
            .unwrap()
    }

    #[test]
    fn converts_declared_units() {
        let table = milli();
        let mv = UnitId::from("mV");
        assert_eq!(table.from_hardware(&mv, 1.5).unwrap(), 1500.0);
        assert_eq!(table.to_hardware(&mv, 250.0).unwrap(), 0.25);
        assert_eq!(table.selectable_units(), vec![UnitId::from("V"), mv]);
    }

    #[test]
    fn rejects_undeclared_unit() {
        let table = milli();
        let err = table.to_hardware(&UnitId::from("kV"), 1.0).unwrap_err();
        assert_eq!(err.unit, UnitId::from("kV"));
        assert_eq!(err.hardware_unit, UnitId::from("V"));
        // The hardware unit is not a human unit either.
        assert!(table.from_hardware(&UnitId::from("V"), 1.0).is_err());
    }

    #[test]
    fn rejects_duplicate_and_hardware_units() {
        let dup = ConversionTable::builder("V")
            .unit("mV", UnitConversion::scale(1e3))
            .unit("mV", UnitConversion::scale(1e3))
            .build();
        assert!(matches!(dup, Err(ConfigurationError::InvalidTable { .. })));

        let shadow = ConversionTable::builder("V")
            .unit("V", UnitConversion::scale(1.0))
            .build();
        assert!(matches!(shadow, Err(ConfigurationError::InvalidTable { .. })));

        let empty = ConversionTable::builder("V").build();
        assert!(matches!(empty, Err(ConfigurationError::InvalidTable { .. })));
    }

    #[test]
    fn rejects_non_monotonic_conversion() {
        let flat = ConversionTable::builder("V")
            .unit("x", UnitConversion::scale(0.0))
            .build();
        assert!(matches!(flat, Err(ConfigurationError::InvalidTable { .. })));

        let folded = ConversionTable::builder("V")
            .unit("sq", UnitConversion::new(f64::sqrt, |x| x * x))
            .build();
        assert!(matches!(folded, Err(ConfigurationError::InvalidTable { .. })));
    }

    #[test]
    fn negative_slope_is_monotonic() {
        let table = ConversionTable::builder("V")
            .unit("inv", UnitConversion::affine(-2.0, 1.0))
            .build()
            .unwrap();
        let inv = UnitId::from("inv");
        assert_eq!(table.from_hardware(&inv, 3.0).unwrap(), -5.0);
        assert_eq!(table.to_hardware(&inv, -5.0).unwrap(), 3.0);
    }
}
