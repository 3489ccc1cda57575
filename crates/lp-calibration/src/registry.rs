//! Calibration registry: kind key -> factory.
//!
//! Channels never look calibrations up by name at conversion time; the
//! registry resolves the kind once, when the channel is created, and hands
//! back a shared instance.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use lp_core::UnitId;
use tracing::debug;

use crate::builtin;
use crate::calibration::Calibration;
use crate::error::{CalibrationResult, ConfigurationError};
use crate::params::CalibrationParams;

/// Builds a calibration from its parameter mapping.
pub type CalibrationFactory = fn(&CalibrationParams) -> CalibrationResult<Arc<dyn Calibration>>;

/// Registry of calibration factories with a cache of built instances.
///
/// Two channels configured with the same kind and parameters share one
/// calibration instance.
#[derive(Debug, Default)]
pub struct CalibrationRegistry {
    factories: BTreeMap<String, CalibrationFactory>,
    cache: HashMap<(String, String), Arc<dyn Calibration>>,
}

impl CalibrationRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in `linear` and `si_prefix` kinds.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry
            .factories
            .insert(builtin::LINEAR.to_string(), builtin::linear);
        registry
            .factories
            .insert(builtin::SI_PREFIX.to_string(), builtin::si_prefix);
        registry
    }

    /// Register a factory under `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::DuplicateKind`] if `kind` is taken.
    pub fn register(
        &mut self,
        kind: impl Into<String>,
        factory: CalibrationFactory,
    ) -> CalibrationResult<()> {
        let kind = kind.into();
        if self.factories.contains_key(&kind) {
            return Err(ConfigurationError::DuplicateKind { kind });
        }
        self.factories.insert(kind, factory);
        Ok(())
    }

    /// Registered kinds in sorted order.
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }

    /// Build (or reuse) the calibration for a channel whose hardware is
    /// driven in `default_unit`.
    ///
    /// # Errors
    ///
    /// - [`ConfigurationError::UnknownKind`] if no factory is registered
    /// - whatever the factory reports for malformed parameters
    /// - [`ConfigurationError::HardwareUnitMismatch`] if the calibration's
    ///   hardware unit is not `default_unit`
    pub fn build(
        &mut self,
        kind: &str,
        params: &CalibrationParams,
        default_unit: &UnitId,
    ) -> CalibrationResult<Arc<dyn Calibration>> {
        let factory = *self
            .factories
            .get(kind)
            .ok_or_else(|| ConfigurationError::UnknownKind {
                kind: kind.to_string(),
            })?;

        let key = (kind.to_string(), cache_key(kind, params)?);
        let calibration = match self.cache.get(&key) {
            Some(cached) => {
                debug!(kind, "reusing cached calibration");
                Arc::clone(cached)
            }
            None => {
                let built = factory(params)?;
                debug!(
                    kind,
                    hardware_unit = %built.hardware_unit(),
                    human_units = built.human_units().len(),
                    "built calibration"
                );
                self.cache.insert(key, Arc::clone(&built));
                built
            }
        };

        if calibration.hardware_unit() != default_unit {
            return Err(ConfigurationError::HardwareUnitMismatch {
                kind: kind.to_string(),
                expected: default_unit.clone(),
                found: calibration.hardware_unit().clone(),
            });
        }
        Ok(calibration)
    }

    /// Number of distinct calibrations built so far.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}

fn cache_key(kind: &str, params: &CalibrationParams) -> CalibrationResult<String> {
    serde_json::to_string(params).map_err(|e| ConfigurationError::MalformedParameter {
        kind: kind.to_string(),
        key: "<all>".to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn volts() -> UnitId {
        UnitId::from("V")
    }

    fn mv_params() -> CalibrationParams {
        CalibrationParams::new()
            .with("quantity", "voltage")
            .with("units", vec!["mV"])
    }

    #[test]
    fn builtins_registered() {
        let registry = CalibrationRegistry::with_builtins();
        let kinds: Vec<&str> = registry.kinds().collect();
        assert_eq!(kinds, vec!["linear", "si_prefix"]);
    }

    #[test]
    fn unknown_kind() {
        let mut registry = CalibrationRegistry::with_builtins();
        let err = registry
            .build("thermocouple", &CalibrationParams::new(), &volts())
            .unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::UnknownKind {
                kind: "thermocouple".to_string()
            }
        );
    }

    #[test]
    fn hardware_unit_mismatch() {
        let mut registry = CalibrationRegistry::with_builtins();
        let err = registry
            .build("si_prefix", &mv_params(), &UnitId::from("A"))
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::HardwareUnitMismatch { .. }));
    }

    #[test]
    fn identical_configurations_share_instance() {
        let mut registry = CalibrationRegistry::with_builtins();
        let a = registry.build("si_prefix", &mv_params(), &volts()).unwrap();
        let b = registry.build("si_prefix", &mv_params(), &volts()).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(registry.cached(), 1);

        let other = CalibrationParams::new().with("quantity", "voltage");
        let c = registry.build("si_prefix", &other, &volts()).unwrap();
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(registry.cached(), 2);
    }

    #[test]
    fn duplicate_registration_rejected() {
        let mut registry = CalibrationRegistry::with_builtins();
        let err = registry.register("linear", builtin::linear).unwrap_err();
        assert!(matches!(err, ConfigurationError::DuplicateKind { .. }));
        registry.register("linear_v2", builtin::linear).unwrap();
        assert!(registry.contains("linear_v2"));
    }
}
