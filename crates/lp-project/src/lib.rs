//! lp-project: panel description files and their validation.

pub mod migrate;
pub mod schema;
pub mod validate;

use std::path::Path;

pub use migrate::{LATEST_VERSION, migrate_to_latest};
pub use schema::*;
pub use validate::{ValidationError, validate_panel};

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Migration error: {what}")]
    Migration { what: String },

    #[error("Unsupported file type: {path}")]
    UnsupportedFormat { path: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn load_yaml(path: &Path) -> ProjectResult<PanelDef> {
    let content = std::fs::read_to_string(path)?;
    from_yaml_str(&content)
}

pub fn load_json(path: &Path) -> ProjectResult<PanelDef> {
    let content = std::fs::read_to_string(path)?;
    from_json_str(&content)
}

/// Load a panel file, choosing the format from the extension.
pub fn load(path: &Path) -> ProjectResult<PanelDef> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("yaml" | "yml") => load_yaml(path),
        Some("json") => load_json(path),
        _ => Err(ProjectError::UnsupportedFormat {
            path: path.display().to_string(),
        }),
    }
}

pub fn from_yaml_str(content: &str) -> ProjectResult<PanelDef> {
    finish(serde_yaml::from_str(content)?)
}

pub fn from_json_str(content: &str) -> ProjectResult<PanelDef> {
    finish(serde_json::from_str(content)?)
}

fn finish(panel: PanelDef) -> ProjectResult<PanelDef> {
    let panel = migrate_to_latest(panel)?;
    validate_panel(&panel)?;
    Ok(panel)
}
