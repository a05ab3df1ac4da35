//! Legacy key aliases.
//!
//! Older configuration files used `geogrid.io_form_geogrid` instead of
//! `geogrid.io_form`, and `timespans` instead of `timespan` inside domains.
//! Both spellings are accepted; everything is rewritten to the canonical
//! key before it reaches a tree.

use std::borrow::Cow;

use crate::error::Result;
use crate::merge::merge_configs;
use crate::tree::ConfigTree;
use crate::value::{Table, Value};

/// Which tree a path addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Global,
    Domain,
}

const GLOBAL_ALIASES: &[(&str, &str)] = &[("geogrid.io_form_geogrid", "geogrid.io_form")];

const DOMAIN_ALIASES: &[(&str, &str)] = &[("timespans", "timespan")];

fn aliases(scope: Scope) -> &'static [(&'static str, &'static str)] {
    match scope {
        Scope::Global => GLOBAL_ALIASES,
        Scope::Domain => DOMAIN_ALIASES,
    }
}

/// Rewrite a legacy path prefix to its canonical spelling.
pub fn canonical_path(scope: Scope, path: &str) -> Cow<'_, str> {
    for (legacy, canonical) in aliases(scope) {
        if path == *legacy {
            return Cow::Owned(canonical.to_string());
        }
        if let Some(rest) = path.strip_prefix(legacy).and_then(|r| r.strip_prefix('.')) {
            return Cow::Owned(format!("{}.{}", canonical, rest));
        }
    }
    Cow::Borrowed(path)
}

/// Move legacy keys of a tree under their canonical names.
///
/// When both spellings are present the canonical one wins on conflicts.
pub fn normalize_tree(scope: Scope, tree: &mut ConfigTree) -> Result<()> {
    for (legacy, canonical) in aliases(scope) {
        let Some(old) = tree.remove(legacy) else {
            continue;
        };
        tracing::debug!(legacy = %legacy, canonical = %canonical, "Rewriting legacy configuration key");
        let value = if tree.contains(canonical) {
            merge_configs(&old, &tree.get(canonical)?)?
        } else {
            old
        };
        tree.set(canonical, value)?;
    }
    Ok(())
}

/// Normalize a whole `{global, domains}` document in place.
pub fn normalize_document(doc: &mut Table) -> Result<()> {
    if let Some(Value::Table(global)) = doc.get_mut("global") {
        normalize_table(Scope::Global, global)?;
    }
    if let Some(Value::Table(domains)) = doc.get_mut("domains") {
        for domain in domains.values_mut() {
            if let Value::Table(t) = domain {
                normalize_table(Scope::Domain, t)?;
            }
        }
    }
    Ok(())
}

fn normalize_table(scope: Scope, table: &mut Table) -> Result<()> {
    let mut tree = ConfigTree::from_table(std::mem::take(table));
    let result = normalize_tree(scope, &mut tree);
    *table = tree.into_table();
    result
}
