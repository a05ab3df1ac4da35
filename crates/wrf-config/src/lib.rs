//! Hierarchical WRF/WPS configuration and namelist generation.
//!
//! A run is described by a `{global, domains}` document. Global settings
//! apply everywhere; each domain holds its own overrides and falls back to
//! its parent for anything it does not set. The [`Configurator`] resolves
//! this tree, the [`NamelistGenerator`] flattens it into Fortran namelist
//! sections and the [`ConfigurationChecker`] verifies that nested grids
//! line up before anything is written.
//!
//! # Example
//!
//! ```ignore
//! use wrf_config::{Configurator, NamelistGenerator, Target};
//!
//! let doc = wrf_config::parse_document(&text, wrf_config::DocumentFormat::Yaml)?;
//! let mut conf = Configurator::make(doc)?;
//! conf.update([("@dom1.geometry.e_we", 121.into())])?;
//! let namelist = NamelistGenerator::new(&conf)?.generate_target(Target::Wps)?;
//! ```

pub mod aliases;
pub mod checker;
pub mod configurator;
pub mod defaults;
pub mod document;
pub mod domain;
pub mod error;
pub mod merge;
pub mod namelist;
pub mod overrides;
pub mod summary;
pub mod tables;
pub mod tags;
pub mod tree;
pub mod value;
mod virtual_fields;

// Re-exports
pub use checker::ConfigurationChecker;
pub use configurator::{Configurator, MissingKeys, ROOT_DOMAIN};
pub use defaults::defaults;
pub use document::{parse_document, DocumentFormat};
pub use domain::{Domain, DomainRef};
pub use error::{ConfigError, Result};
pub use merge::{merge_configs, merge_tables};
pub use namelist::{format_value, generate_section, header, NamelistGenerator};
pub use overrides::{collect_overrides, parse_override, parse_scalar};
pub use summary::{DomainSummary, Summarizer};
pub use tables::{SectionTables, Target};
pub use tags::FieldTag;
pub use tree::ConfigTree;
pub use value::{Table, Value};
pub use virtual_fields::{TimeStep, WRF_DATE_FORMAT};
