//! Panel assembly and unit queries against the bundled panel files.

use std::path::PathBuf;

use lp_app::{AppError, OutputKind, build_panel, convert, list_outputs, load_panel, unit_choices};
use lp_calibration::CalibrationRegistry;
use lp_channels::{OutputUpdate, UpdateKind};
use lp_core::{ChannelId, UnitId};

fn panel_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.pop(); // crates
    path.pop(); // repo root
    path.push("panels");
    path.push(name);
    path
}

#[test]
fn bench_panel_assembles_cleanly() {
    let def = load_panel(&panel_path("bench.yaml")).unwrap();
    let outputs = list_outputs(&def);
    assert_eq!(outputs.len(), 6);
    assert_eq!(outputs[0].calibration.as_deref(), Some("linear"));
    assert_eq!(outputs[5].kind, OutputKind::Rf);

    let mut registry = CalibrationRegistry::with_builtins();
    let (panel, report) = build_panel(&def, &mut registry).unwrap();
    assert!(report.is_clean(), "{report:?}");
    assert_eq!(
        (report.analog_count, report.digital_count, report.rf_count),
        (3, 2, 1)
    );
    assert_eq!(registry.cached(), 2);

    let aom = panel.rf("rf/0").unwrap();
    assert_eq!(aom.gate(), &ChannelId::from("do/0"));
    assert_eq!(aom.rf().frequency, 80e6);

    let piezo = panel.analog("ao/1").unwrap();
    assert_eq!(
        piezo.view.units(),
        [UnitId::from("V"), UnitId::from("mV"), UnitId::from("uV")]
    );
}

#[test]
fn fallbacks_are_reported() {
    let def = load_panel(&panel_path("fallback.json")).unwrap();
    let mut registry = CalibrationRegistry::with_builtins();
    let (panel, report) = build_panel(&def, &mut registry).unwrap();

    let kinds: Vec<_> = report.fallbacks.iter().map(|f| f.kind.as_str()).collect();
    assert_eq!(kinds, ["thermistor", "linear"]);
    assert_eq!(report.fallbacks[0].channel, ChannelId::from("ao/7"));

    let choices = unit_choices(&panel, "ao/8").unwrap();
    assert_eq!(choices.units, [UnitId::from("V")]);
    assert!(choices.fallback.is_some());
}

#[test]
fn convert_reports_display_values() {
    let def = load_panel(&panel_path("bench.yaml")).unwrap();
    let mut registry = CalibrationRegistry::with_builtins();
    let (mut panel, _report) = build_panel(&def, &mut registry).unwrap();

    let conversion = convert(&mut panel, "ao/0", 2.5, &UnitId::from("mA")).unwrap();
    assert_eq!(conversion.display_value, 50.0);
    assert_eq!(conversion.display_range, (0.0, 200.0));
    assert!(!conversion.clamped);

    // readbacks are never forwarded
    assert!(panel.drain_updates().is_empty());

    let clamped = convert(&mut panel, "ao/2", 3.0, &UnitId::from("V")).unwrap();
    assert!(clamped.clamped);
    assert_eq!(clamped.hardware_value, 1.0);

    assert!(matches!(
        convert(&mut panel, "ao/9", 1.0, &UnitId::from("V")),
        Err(AppError::ChannelNotFound(_))
    ));
    assert!(matches!(
        convert(&mut panel, "ao/2", 1.0, &UnitId::from("mA")),
        Err(AppError::Channel(_))
    ));
}

#[test]
fn target_changes_are_collected() {
    let def = load_panel(&panel_path("bench.yaml")).unwrap();
    let mut registry = CalibrationRegistry::with_builtins();
    let (mut panel, _report) = build_panel(&def, &mut registry).unwrap();

    panel
        .digital_mut("do/1")
        .unwrap()
        .channel
        .set_state(1, UpdateKind::Target)
        .unwrap();
    panel
        .analog_mut("ao/2")
        .unwrap()
        .channel
        .set_value(0.5, UpdateKind::Target)
        .unwrap();

    let updates = panel.drain_updates();
    assert_eq!(updates.len(), 2);
    assert!(matches!(&updates[0], OutputUpdate::Digital { state: true, .. }));
    assert_eq!(updates[1].channel(), &ChannelId::from("ao/2"));
    assert!(panel.drain_updates().is_empty());
}
