//! The configurator: global settings plus the domain tree.
//!
//! Paths starting with `@name.` address a domain, everything else addresses
//! the global tree. Domains are kept in creation order, which is also their
//! WRF numbering (`base` is `d01`).

use std::collections::HashMap;

use crate::aliases::{canonical_path, normalize_document, normalize_tree, Scope};
use crate::defaults::defaults;
use crate::domain::{Domain, DomainRef};
use crate::error::{ConfigError, Result};
use crate::merge::merge_tables;
use crate::tags::FieldTag;
use crate::tree::ConfigTree;
use crate::value::{Table, Value};

/// Name of the outermost domain. New domains are nested inside it.
pub const ROOT_DOMAIN: &str = "base";

const PARENT_KEY: &str = "parent";

/// What [`Configurator::gather_data`] does with tags that do not resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingKeys {
    /// Leave the entry out of the result.
    #[default]
    Skip,
    /// Return the `KeyNotFound` error, unless the tag itself is optional.
    Fail,
}

/// Resolved configuration for a WRF/WPS run.
#[derive(Debug, Clone)]
pub struct Configurator {
    global: ConfigTree,
    domains: Vec<Domain>,
    by_name: HashMap<String, usize>,
}

impl Configurator {
    /// Layer a user document over the built-in defaults and build from it.
    pub fn make(mut overrides: Table) -> Result<Self> {
        normalize_document(&mut overrides)?;
        let merged = merge_tables(&defaults()?, &overrides)?;
        Self::new(merged)
    }

    /// A configurator holding only the built-in defaults.
    pub fn make_default() -> Result<Self> {
        Self::make(Table::new())
    }

    /// Build from a complete `{global, domains}` document.
    ///
    /// Domains are numbered in document order. Each may name its parent
    /// with a `parent` key, which is consumed here.
    pub fn new(mut conf: Table) -> Result<Self> {
        let global = match conf.shift_remove("global") {
            None => Table::new(),
            Some(Value::Table(t)) => t,
            Some(other) => {
                return Err(ConfigError::invalid_value(
                    "global",
                    format!("expected a table, got {}", other.kind()),
                ))
            }
        };
        let domain_docs = match conf.shift_remove("domains") {
            None => Table::new(),
            Some(Value::Table(t)) => t,
            Some(other) => {
                return Err(ConfigError::invalid_value(
                    "domains",
                    format!("expected a table, got {}", other.kind()),
                ))
            }
        };

        let mut global = ConfigTree::from_table(global);
        normalize_tree(Scope::Global, &mut global)?;

        let mut domains = Vec::with_capacity(domain_docs.len());
        let mut parents = Vec::with_capacity(domain_docs.len());
        for (i, (name, doc)) in domain_docs.into_iter().enumerate() {
            let mut table = match doc {
                Value::Table(t) => t,
                other => {
                    return Err(ConfigError::invalid_value(
                        format!("domains.{}", name),
                        format!("expected a table, got {}", other.kind()),
                    ))
                }
            };
            let parent = match table.shift_remove(PARENT_KEY) {
                None => None,
                Some(Value::Str(p)) => Some(p),
                Some(other) => {
                    return Err(ConfigError::invalid_value(
                        format!("domains.{}.{}", name, PARENT_KEY),
                        format!("expected a domain name, got {}", other),
                    ))
                }
            };
            let mut tree = ConfigTree::from_table(table);
            normalize_tree(Scope::Domain, &mut tree)?;
            parents.push(parent);
            domains.push(Domain::new(name, i + 1, tree));
        }

        let by_name: HashMap<String, usize> = domains
            .iter()
            .enumerate()
            .map(|(i, d)| (d.name().to_string(), i))
            .collect();

        for (i, parent) in parents.into_iter().enumerate() {
            let Some(parent) = parent else { continue };
            let Some(&p) = by_name.get(&parent) else {
                return Err(ConfigError::UnknownParent {
                    domain: domains[i].name().to_string(),
                    parent,
                });
            };
            domains[i].set_parent(p);
        }

        check_acyclic(&domains)?;

        tracing::debug!(
            domains = domains.len(),
            global_keys = global.as_table().len(),
            "Built configurator"
        );

        Ok(Self {
            global,
            domains,
            by_name,
        })
    }

    pub fn global(&self) -> &ConfigTree {
        &self.global
    }

    pub fn domain(&self, name: &str) -> Option<DomainRef<'_>> {
        self.by_name
            .get(name)
            .map(|&index| DomainRef::new(&self.domains, index))
    }

    /// Domains in id order.
    pub fn domains(&self) -> impl Iterator<Item = DomainRef<'_>> + '_ {
        (0..self.domains.len()).map(move |index| DomainRef::new(&self.domains, index))
    }

    /// Domain names in id order; entry `i` has id `i + 1`.
    pub fn domains_sequence(&self) -> Vec<&str> {
        self.domains.iter().map(Domain::name).collect()
    }

    pub fn domain_count(&self) -> usize {
        self.domains.len()
    }

    /// Resolve a global path or an `@domain.path`.
    pub fn get(&self, path: &str) -> Result<Value> {
        match split_domain_path(path)? {
            Some((name, rest)) => {
                let domain = self
                    .domain(name)
                    .ok_or_else(|| ConfigError::KeyNotFound(path.to_string()))?;
                domain.get(&canonical_path(Scope::Domain, rest))
            }
            None => self.global.get(&canonical_path(Scope::Global, path)),
        }
    }

    /// Store a value at a global path or an `@domain.path`.
    ///
    /// An unknown domain is created on the fly, nested in [`ROOT_DOMAIN`].
    pub fn set(&mut self, path: &str, value: impl Into<Value>) -> Result<()> {
        match split_domain_path(path)? {
            Some((name, rest)) => {
                let index = self.ensure_domain(name)?;
                let rest = canonical_path(Scope::Domain, rest);
                self.domains[index].config_mut().set(&rest, value)
            }
            None => self
                .global
                .set(&canonical_path(Scope::Global, path), value),
        }
    }

    /// Apply `(path, value)` pairs in order.
    ///
    /// Not transactional: pairs applied before a failing one stay applied.
    pub fn update<I, K>(&mut self, pairs: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        for (key, value) in pairs {
            let key = key.as_ref();
            tracing::debug!(key = %key, value = %value, "Applying override");
            self.set(key, value)?;
        }
        Ok(())
    }

    /// Resolve a list of tags into an ordered `name -> value` table.
    ///
    /// `domains.<path>` tags produce one value per domain in id order,
    /// `<domain>.<path>` and `@<domain>.<path>` read a single domain, and
    /// anything else reads the global tree. A later tag with the same output
    /// name replaces the earlier value in place.
    pub fn gather_data(&self, tags: &[FieldTag], missing: MissingKeys) -> Result<Table> {
        let mut fields = Table::with_capacity(tags.len());
        for tag in tags {
            match self.resolve_tag(tag.path()) {
                Ok(value) => {
                    fields.insert(tag.name().to_string(), value);
                }
                Err(e) if e.is_missing_key() && (tag.is_optional() || missing == MissingKeys::Skip) => {
                    tracing::trace!(tag = %tag.path(), error = %e, "Skipping unresolved tag");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(fields)
    }

    fn resolve_tag(&self, path: &str) -> Result<Value> {
        match path {
            "domains.max_dom" => return Ok(Value::from(self.domains.len())),
            "domains.geometry.boundary.specified" => {
                return Ok(self.per_domain_flag(|d| d.name() == ROOT_DOMAIN))
            }
            "domains.geometry.boundary.nested" => {
                return Ok(self.per_domain_flag(|d| d.name() != ROOT_DOMAIN))
            }
            _ => {}
        }

        let Some((head, rest)) = path.split_once('.') else {
            return self.get(path);
        };
        if head == "domains" {
            let rest = canonical_path(Scope::Domain, rest);
            return self
                .domains()
                .map(|d| d.get(&rest))
                .collect::<Result<Vec<_>>>()
                .map(Value::List);
        }
        if let Some(domain) = self.domain(head) {
            return domain.get(&canonical_path(Scope::Domain, rest));
        }
        self.get(path)
    }

    fn per_domain_flag(&self, f: impl Fn(&Domain) -> bool) -> Value {
        Value::List(self.domains.iter().map(|d| Value::Bool(f(d))).collect())
    }

    fn ensure_domain(&mut self, name: &str) -> Result<usize> {
        if let Some(&index) = self.by_name.get(name) {
            return Ok(index);
        }
        let Some(&root) = self.by_name.get(ROOT_DOMAIN) else {
            return Err(ConfigError::UnknownParent {
                domain: name.to_string(),
                parent: ROOT_DOMAIN.to_string(),
            });
        };

        let index = self.domains.len();
        let mut domain = Domain::new(name, index + 1, ConfigTree::new());
        domain.set_parent(root);
        tracing::info!(domain = %name, id = index + 1, parent = ROOT_DOMAIN, "Creating domain");

        self.domains.push(domain);
        self.by_name.insert(name.to_string(), index);
        Ok(index)
    }
}

/// Split `@name.rest` into `(name, rest)`; plain paths give `None`.
fn split_domain_path(path: &str) -> Result<Option<(&str, &str)>> {
    let Some(scoped) = path.strip_prefix('@') else {
        return Ok(None);
    };
    match scoped.split_once('.') {
        Some((name, rest)) if !name.is_empty() && !rest.is_empty() => Ok(Some((name, rest))),
        _ => Err(ConfigError::InvalidPath(path.to_string())),
    }
}

fn check_acyclic(domains: &[Domain]) -> Result<()> {
    for (start, domain) in domains.iter().enumerate() {
        let mut current = start;
        let mut steps = 0;
        while let Some(parent) = domains[current].parent_index() {
            steps += 1;
            if steps > domains.len() {
                return Err(ConfigError::ParentCycle(domain.name().to_string()));
            }
            current = parent;
        }
    }
    Ok(())
}
