// src/config/loader.rs

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::config::model::PlanFile;
use crate::config::validate::validate_plan;

/// Load a plan file from disk without validating it.
pub fn load_from_path(path: &Path) -> Result<PlanFile> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading plan file '{}'", path.display()))?;

    let plan: PlanFile = toml::from_str(&raw)
        .with_context(|| format!("parsing plan file '{}'", path.display()))?;

    Ok(plan)
}

/// Load a plan file and run semantic validation.
pub fn load_and_validate(path: &Path) -> Result<PlanFile> {
    let plan = load_from_path(path)?;
    validate_plan(&plan)
        .with_context(|| format!("validating plan file '{}'", path.display()))?;
    Ok(plan)
}
