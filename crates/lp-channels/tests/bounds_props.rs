//! Property tests for unit switching with monotonic calibrations.

use lp_calibration::{CalibrationParams, CalibrationRegistry};
use lp_channels::*;
use lp_core::{Tolerances, UnitId, nearly_equal};
use proptest::prelude::*;

const TOL: Tolerances = Tolerances {
    abs: 1e-6,
    rel: 1e-6,
};

fn channel(min: f64, max: f64, slope: f64, offset: f64) -> AnalogChannel {
    let config = AnalogChannelConfig::new("ao", "ao/0", "V", Limits { min, max, step: 0.1 })
        .with_calibration(
            "linear",
            CalibrationParams::new()
                .with("hardware_unit", "V")
                .with("unit", "u")
                .with("slope", slope)
                .with("offset", offset),
        );
    let mut registry = CalibrationRegistry::with_builtins();
    AnalogChannel::new(config, HeadlessAnalogView::new(), &mut registry, |_| {}).unwrap()
}

proptest! {
    #[test]
    fn bounds_stay_ordered_across_unit_switches(
        min in -100.0..100.0f64,
        span in 0.1..100.0f64,
        slope in prop_oneof![-50.0..-0.01f64, 0.01..50.0f64],
        offset in -10.0..10.0f64,
        frac in 0.0..=1.0f64,
    ) {
        let max = min + span;
        let mut channel = channel(min, max, slope, offset);
        let id = channel.view_ids()[0];
        let start = *channel.adjustment();
        prop_assert!(start.lower() <= start.value() && start.value() <= start.upper());
        channel.set_value(min + frac * span, UpdateKind::Target).unwrap();
        let hardware = channel.value().unwrap();

        prop_assert!(channel.on_unit_changed(id, &UnitId::from("u")).unwrap());
        let adj = *channel.adjustment();
        prop_assert!(adj.lower() <= adj.upper());
        prop_assert!(adj.lower() <= adj.value() && adj.value() <= adj.upper());
        prop_assert_eq!(adj.page_step(), 0.0);
        prop_assert!(nearly_equal(channel.value().unwrap(), hardware, TOL));

        prop_assert!(channel.on_unit_changed(id, &UnitId::from("V")).unwrap());
        let adj = *channel.adjustment();
        prop_assert!(nearly_equal(adj.lower(), min, TOL));
        prop_assert!(nearly_equal(adj.upper(), max, TOL));
        prop_assert!(nearly_equal(adj.value(), hardware, TOL));
    }
}

#[test]
fn negative_slope_swaps_bounds() {
    let mut channel = channel(0.0, 10.0, -2.0, 5.0);
    let id = channel.view_ids()[0];

    channel.on_unit_changed(id, &UnitId::from("u")).unwrap();
    let adj = channel.adjustment();
    assert_eq!(adj.lower(), -15.0);
    assert_eq!(adj.upper(), 5.0);
    assert_eq!(adj.value(), 5.0);
    // the step is converted like every other element
    assert_eq!(adj.step(), 5.0 - 0.2);
    assert_eq!(channel.hardware_range().unwrap(), (0.0, 10.0));
}
