//! Built-in configuration defaults.

use crate::error::Result;
use crate::value::Table;

const DEFAULTS_YAML: &str = include_str!("../data/defaults.yaml");

/// The built-in `{global, domains}` document user configurations are
/// layered onto.
pub fn defaults() -> Result<Table> {
    Ok(serde_yaml::from_str(DEFAULTS_YAML)?)
}
