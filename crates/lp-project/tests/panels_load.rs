use std::path::{Path, PathBuf};

use lp_calibration::ParamValue;

fn panels_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../panels")
}

#[test]
fn panels_load_and_validate() {
    let panels = ["bench.yaml", "legacy_v1.yaml", "fallback.json"];

    for name in panels {
        let path = panels_dir().join(name);
        let panel =
            lp_project::load(&path).unwrap_or_else(|e| panic!("Failed to load {}: {}", name, e));
        assert_eq!(panel.version, lp_project::LATEST_VERSION, "{name}");
        lp_project::validate_panel(&panel)
            .unwrap_or_else(|e| panic!("Failed to validate {}: {}", name, e));
    }
}

#[test]
fn bench_panel_contents() {
    let panel = lp_project::load_yaml(&panels_dir().join("bench.yaml")).unwrap();

    assert_eq!(panel.name, "Optics bench");
    assert_eq!(panel.analog_outputs.len(), 3);
    assert_eq!(panel.digital_outputs.len(), 2);
    assert_eq!(panel.rf_outputs[0].gate, "do/0");

    let coil = panel.analog("ao/0").unwrap();
    assert_eq!(coil.step, Some(0.05));
    let calibration = coil.calibration.as_ref().unwrap();
    assert_eq!(calibration.kind, "linear");
    assert_eq!(calibration.params.get("slope"), Some(&ParamValue::Number(20.0)));
    assert_eq!(calibration.params.get("unit"), Some(&ParamValue::Text("mA".to_string())));

    let piezo = panel.analog("ao/1").unwrap();
    assert_eq!(
        piezo.calibration.as_ref().unwrap().params.get("units"),
        Some(&ParamValue::List(vec!["mV".to_string(), "uV".to_string()]))
    );

    assert!(panel.analog("ao/2").unwrap().calibration.is_none());
    assert_eq!(panel.digital("do/1").map(|d| d.name.as_str()), Some("Trigger"));
}

#[test]
fn legacy_panel_is_migrated() {
    let panel = lp_project::load_yaml(&panels_dir().join("legacy_v1.yaml")).unwrap();
    let step = panel.analog("ao/0").unwrap().step.unwrap();
    assert!((step - 0.005).abs() < 1e-12);
    assert!(panel.rf_outputs.is_empty());
}

#[test]
fn unknown_extension_is_rejected() {
    let err = lp_project::load(Path::new("panel.toml")).unwrap_err();
    assert!(matches!(err, lp_project::ProjectError::UnsupportedFormat { .. }));
}
