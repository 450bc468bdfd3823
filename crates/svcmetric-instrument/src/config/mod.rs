//! Interceptor settings loader (strict parsing).

pub mod schema;

use std::fs;

use svcmetric_core::error::SettingsError;

pub use schema::{InterceptorSection, InterceptorSettings, TraceFailurePolicy};

pub fn load_from_file(path: &str) -> Result<InterceptorSettings, SettingsError> {
    let s = fs::read_to_string(path)
        .map_err(|e| SettingsError::Read(format!("{path}: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<InterceptorSettings, SettingsError> {
    let cfg: InterceptorSettings =
        serde_yaml::from_str(s).map_err(|e| SettingsError::InvalidYaml(e.to_string()))?;
    cfg.validate()?;
    Ok(cfg)
}
