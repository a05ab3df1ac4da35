//! Model domains and their inheritance rules.
//!
//! Domains are stored in an arena owned by the [`crate::Configurator`];
//! a domain refers to its parent by index. [`DomainRef`] pairs a domain with
//! the arena so lookups can fall back through the parent chain.

use crate::error::{ConfigError, Result};
use crate::tree::ConfigTree;
use crate::value::Value;

/// Keys synthesized as `1` on the root domain.
const ROOT_UNIT_KEYS: &[&str] = &[
    "running.parent_time_step_ratio",
    "geometry.parent_grid_ratio",
    "geometry.i_parent_start",
    "geometry.j_parent_start",
];

const PARENT_ID_KEYS: &[&str] = &["parent_id", "geometry.parent_id"];

/// A named WRF domain.
#[derive(Debug, Clone)]
pub struct Domain {
    name: String,
    id: usize,
    parent: Option<usize>,
    config: ConfigTree,
}

impl Domain {
    pub(crate) fn new(name: impl Into<String>, id: usize, config: ConfigTree) -> Self {
        Self {
            name: name.into(),
            id,
            parent: None,
            config,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 1-based domain number, as used by WRF (`d01`, `d02`, ...).
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn parent_index(&self) -> Option<usize> {
        self.parent
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Values stored on this domain only, without inheritance.
    pub fn config(&self) -> &ConfigTree {
        &self.config
    }

    pub(crate) fn config_mut(&mut self) -> &mut ConfigTree {
        &mut self.config
    }

    pub(crate) fn set_parent(&mut self, parent: usize) {
        self.parent = Some(parent);
    }
}

/// Borrowed view of a domain that resolves keys through its parents.
#[derive(Debug, Clone, Copy)]
pub struct DomainRef<'a> {
    domains: &'a [Domain],
    index: usize,
}

impl<'a> DomainRef<'a> {
    pub(crate) fn new(domains: &'a [Domain], index: usize) -> Self {
        Self { domains, index }
    }

    pub fn domain(&self) -> &'a Domain {
        &self.domains[self.index]
    }

    pub fn name(&self) -> &'a str {
        self.domain().name()
    }

    pub fn id(&self) -> usize {
        self.domain().id()
    }

    pub fn is_root(&self) -> bool {
        self.domain().is_root()
    }

    pub fn parent(&self) -> Option<DomainRef<'a>> {
        self.domain()
            .parent_index()
            .map(|index| DomainRef::new(self.domains, index))
    }

    /// Resolve `path` on this domain.
    ///
    /// Order: stored value, virtual field, synthesized key, then the parent.
    /// Nested domains derive `geometry.dx`/`geometry.dy` from the parent's
    /// spacing divided by their own `geometry.parent_grid_ratio`.
    pub fn get(&self, path: &str) -> Result<Value> {
        if let Some(v) = self.domain().config().lookup(path)? {
            return Ok(v);
        }
        if path == "geometry.grid_id" {
            return Ok(Value::from(self.id()));
        }

        let Some(parent) = self.parent() else {
            if PARENT_ID_KEYS.iter().any(|k| *k == path) {
                return Ok(Value::from(self.id()));
            }
            if ROOT_UNIT_KEYS.iter().any(|k| *k == path) {
                return Ok(Value::Int(1));
            }
            return Err(ConfigError::KeyNotFound(format!("@{}.{}", self.name(), path)));
        };

        if PARENT_ID_KEYS.iter().any(|k| *k == path) {
            return Ok(Value::from(parent.id()));
        }
        if path == "geometry.dx" || path == "geometry.dy" {
            let spacing = parent.get_f64(path)?;
            let ratio = self.get_f64("geometry.parent_grid_ratio")?;
            if ratio == 0.0 {
                return Err(ConfigError::invalid_value(
                    format!("@{}.geometry.parent_grid_ratio", self.name()),
                    "grid ratio must not be zero",
                ));
            }
            return Ok(Value::Float(spacing / ratio));
        }
        parent.get(path)
    }

    /// Resolve `path` as a number.
    pub fn get_f64(&self, path: &str) -> Result<f64> {
        let value = self.get(path)?;
        value.as_f64().ok_or_else(|| {
            ConfigError::invalid_value(
                format!("@{}.{}", self.name(), path),
                format!("expected a number, got {}", value.kind()),
            )
        })
    }

    /// Resolve `path` as an integer.
    pub fn get_i64(&self, path: &str) -> Result<i64> {
        let value = self.get(path)?;
        value.as_i64().ok_or_else(|| {
            ConfigError::invalid_value(
                format!("@{}.{}", self.name(), path),
                format!("expected an integer, got {}", value),
            )
        })
    }

    /// Offset in metres of this domain's south-west corner from the base
    /// domain's south-west corner.
    ///
    /// Parent start indices are Fortran (1-based) grid indices.
    pub fn offset_wrt_base(&self) -> Result<(f64, f64)> {
        let (mut ox, mut oy) = (0.0, 0.0);
        let mut current = *self;
        while let Some(parent) = current.parent() {
            let i_offset = current.get_f64("geometry.i_parent_start")? - 1.0;
            let j_offset = current.get_f64("geometry.j_parent_start")? - 1.0;
            ox += i_offset * parent.get_f64("geometry.dx")?;
            oy += j_offset * parent.get_f64("geometry.dy")?;
            current = parent;
        }
        Ok((ox, oy))
    }

    /// Extent in metres covered by this domain's cells.
    pub fn extension(&self) -> Result<(f64, f64)> {
        Ok((
            (self.get_f64("geometry.e_we")? - 1.0) * self.get_f64("geometry.dx")?,
            (self.get_f64("geometry.e_sn")? - 1.0) * self.get_f64("geometry.dy")?,
        ))
    }
}
