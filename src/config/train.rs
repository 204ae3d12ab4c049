//! Loading configuration files and resolving them into typed specs

use super::overrides::apply_overrides;
use super::schema::TrainSpec;
use super::validate::validate_config;
use super::value::ConfigValue;
use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

/// Load an untyped configuration tree from a YAML file
pub fn load_config<P: AsRef<Path>>(config_path: P) -> Result<ConfigValue> {
    let yaml_content = fs::read_to_string(config_path.as_ref()).map_err(|e| {
        Error::ConfigError(format!(
            "Failed to read config file {}: {}",
            config_path.as_ref().display(),
            e
        ))
    })?;

    let config = ConfigValue::from_yaml_str(&yaml_content)?;
    if !config.is_map() {
        return Err(Error::ConfigError(format!(
            "Config file {} must contain a mapping at the top level",
            config_path.as_ref().display()
        )));
    }

    Ok(config)
}

/// Load a config file and apply `path value` overrides to it
pub fn resolve_config<P, S>(config_path: P, opts: &[S]) -> Result<ConfigValue>
where
    P: AsRef<Path>,
    S: AsRef<str>,
{
    let base = load_config(config_path)?;
    apply_overrides(&base, opts)
}

/// Load, override, type and validate a training spec
///
/// # Example
///
/// ```no_run
/// use metatrain::config::load_spec;
///
/// let spec = load_spec("configs/protonet.yaml", &["optimizer.lr", "0.01"])?;
/// println!("{} epochs", spec.training.max_epoch);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn load_spec<P, S>(config_path: P, opts: &[S]) -> Result<TrainSpec>
where
    P: AsRef<Path>,
    S: AsRef<str>,
{
    let config = resolve_config(config_path, opts)?;
    spec_from_value(&config)
}

/// Type and validate an already-resolved configuration tree
pub fn spec_from_value(config: &ConfigValue) -> Result<TrainSpec> {
    let spec: TrainSpec = config.into_typed()?;
    validate_config(&spec).map_err(|e| Error::ConfigError(format!("Invalid config: {}", e)))?;
    Ok(spec)
}
