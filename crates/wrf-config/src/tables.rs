//! Namelist section layouts.
//!
//! The tag lists for every WPS and WRF section live in an embedded YAML
//! file so the layout can be read and changed without touching code.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::{ConfigError, Result};
use crate::tags::FieldTag;

const SECTIONS_YAML: &str = include_str!("../data/sections.yaml");

/// Ordered tag lists keyed by section name.
pub type SectionMap = IndexMap<String, Vec<FieldTag>>;

/// Which program's namelist is being generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Wps,
    Wrf,
}

impl Target {
    pub fn as_str(&self) -> &'static str {
        match self {
            Target::Wps => "WPS",
            Target::Wrf => "WRF",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Target {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "WPS" => Ok(Target::Wps),
            "WRF" => Ok(Target::Wrf),
            _ => Err(ConfigError::invalid_value("target", format!("'{}' is not WPS or WRF", s))),
        }
    }
}

/// Section tag tables for both targets plus the projection subsets of
/// the `geogrid` section.
#[derive(Debug, Clone, Deserialize)]
pub struct SectionTables {
    wps: SectionMap,
    wrf: SectionMap,
    #[serde(default)]
    projections: SectionMap,
}

impl SectionTables {
    /// Tables shipped with the crate.
    pub fn builtin() -> Result<Self> {
        Self::from_yaml(SECTIONS_YAML)
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Sections of `target`, in output order.
    pub fn sections(&self, target: Target) -> &SectionMap {
        match target {
            Target::Wps => &self.wps,
            Target::Wrf => &self.wrf,
        }
    }

    /// Tags of a section of either target.
    pub fn section(&self, name: &str) -> Option<&[FieldTag]> {
        self.wps
            .get(name)
            .or_else(|| self.wrf.get(name))
            .map(Vec::as_slice)
    }

    /// Extra `geogrid` tags for a map projection.
    pub fn projection(&self, name: &str) -> Option<&[FieldTag]> {
        self.projections.get(name).map(Vec::as_slice)
    }
}
