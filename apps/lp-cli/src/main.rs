use clap::{Parser, Subcommand};
use lp_app::{AppResult, OutputKind, PanelReport, build_panel, convert, list_outputs, load_panel, unit_choices};
use lp_calibration::CalibrationRegistry;
use lp_core::UnitId;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Parser)]
#[command(name = "lp-cli")]
#[command(about = "labpanel CLI - Inspect instrument output panels and their unit calibrations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a panel file and build every channel in it
    Validate {
        /// Path to the panel file (YAML or JSON)
        panel_path: PathBuf,
    },
    /// List the outputs of a panel
    Outputs {
        /// Path to the panel file (YAML or JSON)
        panel_path: PathBuf,
    },
    /// Show the units an analog channel can be displayed in
    Units {
        /// Path to the panel file (YAML or JSON)
        panel_path: PathBuf,
        /// Channel ID (e.g. ao/0)
        channel: String,
    },
    /// Show a hardware value of an analog channel in another unit
    Convert {
        /// Path to the panel file (YAML or JSON)
        panel_path: PathBuf,
        /// Channel ID (e.g. ao/0)
        channel: String,
        /// Value in the channel's hardware unit
        #[arg(allow_negative_numbers = true)]
        value: f64,
        /// Unit to display the value in
        #[arg(short, long)]
        unit: String,
    },
}

fn main() -> AppResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { panel_path } => cmd_validate(&panel_path),
        Commands::Outputs { panel_path } => cmd_outputs(&panel_path),
        Commands::Units {
            panel_path,
            channel,
        } => cmd_units(&panel_path, &channel),
        Commands::Convert {
            panel_path,
            channel,
            value,
            unit,
        } => cmd_convert(&panel_path, &channel, value, &unit),
    }
}

fn cmd_validate(panel_path: &Path) -> AppResult<()> {
    println!("Validating panel: {}", panel_path.display());
    let def = load_panel(panel_path)?;
    let mut registry = CalibrationRegistry::with_builtins();
    let (_panel, report) = build_panel(&def, &mut registry)?;
    print_report(&def.name, &report);
    if report.is_clean() {
        println!("✓ Panel is valid");
    } else {
        println!("✓ Panel is valid ({} calibration(s) fell back)", report.fallbacks.len());
    }
    Ok(())
}

fn cmd_outputs(panel_path: &Path) -> AppResult<()> {
    let def = load_panel(panel_path)?;
    let outputs = list_outputs(&def);

    if outputs.is_empty() {
        println!("No outputs found in panel");
        return Ok(());
    }
    println!("Outputs in panel '{}':", def.name);
    for output in outputs {
        let kind = match output.kind {
            OutputKind::Analog => "analog",
            OutputKind::Digital => "digital",
            OutputKind::Rf => "rf",
        };
        match output.calibration {
            Some(calibration) => println!(
                "  {:<8} {:<8} {} [{}]",
                output.channel, kind, output.name, calibration
            ),
            None => println!("  {:<8} {:<8} {}", output.channel, kind, output.name),
        }
    }
    Ok(())
}

fn cmd_units(panel_path: &Path, channel: &str) -> AppResult<()> {
    let def = load_panel(panel_path)?;
    let mut registry = CalibrationRegistry::with_builtins();
    let (panel, _report) = build_panel(&def, &mut registry)?;

    let choices = unit_choices(&panel, channel)?;
    println!("Units for {} (hardware unit {}):", channel, choices.hardware_unit);
    for unit in &choices.units {
        println!("  {}", unit);
    }
    if let Some(reason) = choices.fallback {
        println!("⚠ Calibration not applied: {}", reason);
    }
    Ok(())
}

fn cmd_convert(panel_path: &Path, channel: &str, value: f64, unit: &str) -> AppResult<()> {
    let def = load_panel(panel_path)?;
    let mut registry = CalibrationRegistry::with_builtins();
    let (mut panel, _report) = build_panel(&def, &mut registry)?;

    let unit = UnitId::from(unit);
    let conversion = convert(&mut panel, channel, value, &unit)?;
    debug!(?conversion, "conversion done");

    if conversion.clamped {
        println!(
            "⚠ {} is outside the channel limits, using {}",
            value, conversion.hardware_value
        );
    }
    let (lower, upper) = conversion.display_range;
    println!(
        "{} = {} {} (range {} .. {} {})",
        channel, conversion.display_value, unit, lower, upper, unit
    );
    Ok(())
}

fn print_report(name: &str, report: &PanelReport) {
    println!(
        "Panel '{}': {} analog, {} digital, {} rf output(s)",
        name, report.analog_count, report.digital_count, report.rf_count
    );
    for fallback in &report.fallbacks {
        println!(
            "  ⚠ {}: calibration '{}' not applied: {}",
            fallback.channel, fallback.kind, fallback.reason
        );
    }
}
