//! Dotted-path addressing over a [`Table`].
//!
//! `ConfigTree` is the one get/set helper shared by the global configuration
//! and by every domain. A path such as `running.history.interval` walks
//! nested tables; setting a path creates the missing intermediate tables.
//! When the last segment is not stored, the virtual field rules of
//! [`crate::virtual_fields`] are consulted on the containing table.

use crate::error::{ConfigError, Result};
use crate::value::{Table, Value};
use crate::virtual_fields;

/// Nested, ordered configuration addressed by dotted paths.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigTree {
    root: Table,
}

impl ConfigTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_table(root: Table) -> Self {
        Self { root }
    }

    pub fn as_table(&self) -> &Table {
        &self.root
    }

    pub fn into_table(self) -> Table {
        self.root
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Resolve `path`, failing with `KeyNotFound` when nothing is there.
    pub fn get(&self, path: &str) -> Result<Value> {
        self.lookup(path)?
            .ok_or_else(|| ConfigError::KeyNotFound(path.to_string()))
    }

    /// Resolve `path` to a stored or virtual value.
    ///
    /// Returns `Ok(None)` when the path does not resolve. Errors are only
    /// returned for malformed paths or when a virtual field's sources hold
    /// unusable values.
    pub fn lookup(&self, path: &str) -> Result<Option<Value>> {
        let (parents, leaf) = split_path(path)?;
        let Some(node) = self.node(&parents) else {
            return Ok(None);
        };
        if let Some(v) = node.get(leaf) {
            return Ok(Some(v.clone()));
        }
        virtual_fields::resolve(node, leaf, path)
    }

    /// True when a value is literally stored at `path`.
    pub fn contains(&self, path: &str) -> bool {
        match split_path(path) {
            Ok((parents, leaf)) => self
                .node(&parents)
                .map(|node| node.contains_key(leaf))
                .unwrap_or(false),
            Err(_) => false,
        }
    }

    /// Store `value` at `path`, creating intermediate tables as needed.
    pub fn set(&mut self, path: &str, value: impl Into<Value>) -> Result<()> {
        let (parents, leaf) = split_path(path)?;
        let mut node = &mut self.root;
        for (i, segment) in parents.iter().enumerate() {
            let slot = node
                .entry(segment.to_string())
                .or_insert_with(|| Value::Table(Table::new()));
            node = match slot {
                Value::Table(t) => t,
                _ => return Err(ConfigError::NotATable(parents[..=i].join("."))),
            };
        }
        node.insert(leaf.to_string(), value.into());
        Ok(())
    }

    /// Remove and return the value stored at `path`, keeping sibling order.
    pub fn remove(&mut self, path: &str) -> Option<Value> {
        let (parents, leaf) = split_path(path).ok()?;
        let mut node = &mut self.root;
        for segment in parents {
            node = node.get_mut(segment)?.as_table_mut()?;
        }
        node.shift_remove(leaf)
    }

    fn node(&self, parents: &[&str]) -> Option<&Table> {
        let mut node = &self.root;
        for segment in parents {
            node = node.get(*segment)?.as_table()?;
        }
        Some(node)
    }
}

impl From<Table> for ConfigTree {
    fn from(root: Table) -> Self {
        Self::from_table(root)
    }
}

/// Split a dotted path into its parent segments and final key.
pub(crate) fn split_path(path: &str) -> Result<(Vec<&str>, &str)> {
    let mut segments: Vec<&str> = path.split('.').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(ConfigError::InvalidPath(path.to_string()));
    }
    // split always yields at least one segment
    let leaf = segments.pop().unwrap_or_default();
    Ok((segments, leaf))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(yaml: &str) -> ConfigTree {
        ConfigTree::from_table(serde_yaml::from_str(yaml).unwrap())
    }

    #[test]
    fn test_get_nested() {
        let t = tree("running:\n  history:\n    interval: 180\n");
        assert_eq!(t.get("running.history.interval").unwrap(), Value::Int(180));
        assert!(t.get("running.history").unwrap().is_table());
    }

    #[test]
    fn test_get_missing_is_key_not_found() {
        let t = tree("a: 1\n");
        assert!(matches!(t.get("b"), Err(ConfigError::KeyNotFound(k)) if k == "b"));
        // Walking through a scalar is simply not found
        assert!(t.get("a.b").unwrap_err().is_missing_key());
    }

    #[test]
    fn test_set_creates_intermediate_nodes() {
        let mut t = ConfigTree::new();
        t.set("foobar.foo.bar", "this is a string").unwrap();
        assert_eq!(
            t.get("foobar.foo.bar").unwrap(),
            Value::Str("this is a string".into())
        );
        assert!(t.as_table()["foobar"].is_table());
    }

    #[test]
    fn test_set_overwrites_and_keeps_position() {
        let mut t = tree("a: 1\nb: 2\n");
        t.set("a", 10).unwrap();
        let keys: Vec<&str> = t.as_table().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(t.get("a").unwrap(), Value::Int(10));
    }

    #[test]
    fn test_set_below_scalar_fails() {
        let mut t = tree("a: 1\n");
        let err = t.set("a.b.c", 2).unwrap_err();
        assert!(matches!(err, ConfigError::NotATable(p) if p == "a"));
    }

    #[test]
    fn test_invalid_paths() {
        let t = ConfigTree::new();
        assert!(matches!(t.get(""), Err(ConfigError::InvalidPath(_))));
        assert!(matches!(t.get("a..b"), Err(ConfigError::InvalidPath(_))));
        assert!(matches!(t.get(".a"), Err(ConfigError::InvalidPath(_))));
    }

    #[test]
    fn test_remove() {
        let mut t = tree("parent: base\ngeometry:\n  e_we: 10\n  e_sn: 20\n");
        assert_eq!(t.remove("parent"), Some(Value::Str("base".into())));
        assert_eq!(t.remove("geometry.e_we"), Some(Value::Int(10)));
        assert_eq!(t.remove("geometry.missing"), None);
        assert!(!t.contains("parent"));
        assert!(t.contains("geometry.e_sn"));
    }

    #[test]
    fn test_virtual_field_tracks_source() {
        let mut t = tree("running:\n  time_step: 44.1902\n");
        assert_eq!(t.get("running.time_step_seconds").unwrap(), Value::Int(44));
        t.set("running.time_step", 90).unwrap();
        assert_eq!(t.get("running.time_step_seconds").unwrap(), Value::Int(90));
        assert!(!t.contains("running.time_step_seconds"));
    }
}
