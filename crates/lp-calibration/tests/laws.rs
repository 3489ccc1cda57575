//! Round-trip and monotonicity laws for the built-in calibrations.

use std::sync::Arc;

use lp_calibration::{Calibration, CalibrationParams, CalibrationRegistry};
use lp_core::{Tolerances, UnitId, nearly_equal};
use proptest::prelude::*;

const LAW_TOL: Tolerances = Tolerances {
    abs: 1e-9,
    rel: 1e-9,
};

fn linear(slope: f64, offset: f64) -> Arc<dyn Calibration> {
    let params = CalibrationParams::new()
        .with("hardware_unit", "V")
        .with("unit", "u")
        .with("slope", slope)
        .with("offset", offset);
    CalibrationRegistry::with_builtins()
        .build("linear", &params, &UnitId::from("V"))
        .unwrap()
}

fn all_si_prefix() -> Vec<Arc<dyn Calibration>> {
    let mut registry = CalibrationRegistry::with_builtins();
    [("voltage", "V"), ("current", "A"), ("frequency", "Hz"), ("power", "W")]
        .into_iter()
        .map(|(quantity, unit)| {
            registry
                .build(
                    "si_prefix",
                    &CalibrationParams::new().with("quantity", quantity),
                    &UnitId::from(unit),
                )
                .unwrap()
        })
        .collect()
}

fn assert_round_trip(cal: &dyn Calibration, x: f64) {
    for unit in cal.human_units() {
        let human = cal.from_hardware(unit, x).unwrap();
        let back = cal.to_hardware(unit, human).unwrap();
        assert!(
            nearly_equal(back, x, LAW_TOL),
            "{unit}: {x} -> {human} -> {back}"
        );
    }
}

#[test]
fn si_prefix_round_trip_representative_values() {
    for cal in all_si_prefix() {
        for x in [-10.0, -1.5, 0.0, 1e-6, 0.25, 3.3, 1e3, 80e6] {
            assert_round_trip(cal.as_ref(), x);
        }
    }
}

#[test]
fn conversions_reject_undeclared_units() {
    let cal = linear(2.0, 1.0);
    assert!(cal.to_hardware(&UnitId::from("mA"), 1.0).is_err());
    assert!(cal.from_hardware(&UnitId::from("V"), 1.0).is_err());
}

proptest! {
    #[test]
    fn linear_round_trip(
        slope in prop_oneof![-100.0_f64..-0.01, 0.01_f64..100.0],
        offset in -100.0_f64..100.0,
        x in -1e3_f64..1e3,
    ) {
        let cal = linear(slope, offset);
        let unit = UnitId::from("u");
        let back = cal.to_hardware(&unit, cal.from_hardware(&unit, x).unwrap()).unwrap();
        prop_assert!(nearly_equal(back, x, LAW_TOL), "{} != {}", back, x);
    }

    #[test]
    fn linear_is_monotonic(
        slope in prop_oneof![-100.0_f64..-0.01, 0.01_f64..100.0],
        offset in -100.0_f64..100.0,
        a in -1e3_f64..1e3,
        b in -1e3_f64..1e3,
    ) {
        prop_assume!(a < b);
        let cal = linear(slope, offset);
        let unit = UnitId::from("u");
        let fa = cal.from_hardware(&unit, a).unwrap();
        let fb = cal.from_hardware(&unit, b).unwrap();
        if slope > 0.0 {
            prop_assert!(fa <= fb);
        } else {
            prop_assert!(fa >= fb);
        }
    }

    #[test]
    fn si_prefix_round_trip(x in -1e9_f64..1e9) {
        for cal in all_si_prefix() {
            for unit in cal.human_units() {
                let back = cal
                    .to_hardware(unit, cal.from_hardware(unit, x).unwrap())
                    .unwrap();
                prop_assert!(nearly_equal(back, x, LAW_TOL), "{}: {} != {}", unit, back, x);
            }
        }
    }
}
