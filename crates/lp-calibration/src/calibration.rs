//! The conversion capability channels depend on.

use std::fmt;

use lp_core::UnitId;

use crate::error::ConversionDomainError;

/// Conversion between a hardware unit and a set of human units.
///
/// Implementations must satisfy two laws for every `unit` in
/// [`human_units`](Calibration::human_units):
///
/// - round trip: `to_hardware(unit, from_hardware(unit, x)) ≈ x`
/// - monotonicity: both conversions are strictly monotonic in the value
///   (the slope may be negative)
///
/// Calibrations are shared read-only between channels, so they must be
/// `Send + Sync`.
pub trait Calibration: Send + Sync + fmt::Debug {
    /// Unit the channel's canonical value is stored and driven in.
    fn hardware_unit(&self) -> &UnitId;

    /// Units an operator may select, in selector order.
    fn human_units(&self) -> &[UnitId];

    /// Convert `value` expressed in `unit` to the hardware unit.
    fn to_hardware(&self, unit: &UnitId, value: f64) -> Result<f64, ConversionDomainError>;

    /// Convert a hardware-unit `value` to `unit`.
    fn from_hardware(&self, unit: &UnitId, value: f64) -> Result<f64, ConversionDomainError>;

    /// Whether `unit` is one of the human units.
    fn is_human_unit(&self, unit: &UnitId) -> bool {
        self.human_units().contains(unit)
    }

    /// Units offered by a selector: the hardware unit first, then the human units.
    fn selectable_units(&self) -> Vec<UnitId> {
        std::iter::once(self.hardware_unit().clone())
            .chain(self.human_units().iter().cloned())
            .collect()
    }
}
