//! Shared numeric value model behind every value control of an analog channel.

use lp_core::{LpError, LpResult, ensure_finite};

/// Page increment used at construction, in multiples of the step.
const PAGE_STEPS: f64 = 10.0;

/// Value, bounds and increments of an analog channel in its current display unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Adjustment {
    value: f64,
    lower: f64,
    upper: f64,
    step: f64,
    page_step: f64,
}

impl Adjustment {
    /// Model for hardware limits `[min, max]` with increment `step`.
    ///
    /// The value starts at 0, clamped into the limits, and the page increment
    /// at ten steps.
    ///
    /// # Errors
    ///
    /// Returns error if any limit is not finite, `min > max`, or `step` is not
    /// positive.
    pub fn from_limits(min: f64, max: f64, step: f64) -> LpResult<Self> {
        let lower = ensure_finite(min, "lower limit")?;
        let upper = ensure_finite(max, "upper limit")?;
        let step = ensure_finite(step, "step")?;
        if lower > upper {
            return Err(LpError::InvalidArg {
                what: "lower limit must not exceed upper limit",
            });
        }
        if step <= 0.0 {
            return Err(LpError::InvalidArg {
                what: "step must be positive",
            });
        }
        Ok(Self {
            value: 0.0_f64.clamp(lower, upper),
            lower,
            upper,
            step,
            page_step: PAGE_STEPS * step,
        })
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn page_step(&self) -> f64 {
        self.page_step
    }

    /// `[value, lower, upper, step, page_step]`.
    pub fn to_array(&self) -> [f64; 5] {
        [self.value, self.lower, self.upper, self.step, self.page_step]
    }

    /// Clamp `value` into `[lower, upper]`.
    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.lower).min(self.upper)
    }

    /// Replace every field from `[value, lower, upper, step, page_step]`.
    pub(crate) fn configure(&mut self, params: [f64; 5]) {
        let [value, lower, upper, step, page_step] = params;
        *self = Self {
            value,
            lower,
            upper,
            step,
            page_step,
        };
    }

    /// Set the value, clamped into the bounds. Returns whether it changed.
    pub(crate) fn set_value(&mut self, value: f64) -> bool {
        let clamped = self.clamp(value);
        if clamped == self.value {
            return false;
        }
        self.value = clamped;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_limits_defaults() {
        let adj = Adjustment::from_limits(-5.0, 5.0, 0.1).unwrap();
        assert_eq!(adj.value(), 0.0);
        assert_eq!(adj.lower(), -5.0);
        assert_eq!(adj.upper(), 5.0);
        assert_eq!(adj.step(), 0.1);
        assert_eq!(adj.page_step(), 1.0);
    }

    #[test]
    fn initial_value_is_clamped_into_limits() {
        let above = Adjustment::from_limits(1.0, 10.0, 0.5).unwrap();
        assert_eq!(above.value(), 1.0);
        let below = Adjustment::from_limits(-10.0, -2.0, 0.5).unwrap();
        assert_eq!(below.value(), -2.0);
    }

    #[test]
    fn rejects_bad_limits() {
        assert!(Adjustment::from_limits(1.0, 0.0, 0.1).is_err());
        assert!(Adjustment::from_limits(0.0, 1.0, 0.0).is_err());
        assert!(Adjustment::from_limits(f64::NAN, 1.0, 0.1).is_err());
    }

    #[test]
    fn set_value_clamps_and_reports_change() {
        let mut adj = Adjustment::from_limits(0.0, 10.0, 1.0).unwrap();
        assert!(adj.set_value(4.0));
        assert!(!adj.set_value(4.0));
        assert!(adj.set_value(25.0));
        assert_eq!(adj.value(), 10.0);
        assert!(!adj.set_value(11.0));
    }

    #[test]
    fn configure_round_trips_array() {
        let mut adj = Adjustment::from_limits(0.0, 10.0, 1.0).unwrap();
        adj.configure([1.0, -2.0, 2.0, 0.5, 0.0]);
        assert_eq!(adj.to_array(), [1.0, -2.0, 2.0, 0.5, 0.0]);
    }
}
