//! Deep merge of configuration documents.
//!
//! Used to layer a user document over the built-in defaults. Tables merge
//! key by key; any other value in `update` replaces the base value.

use crate::error::{ConfigError, Result};
use crate::value::{Table, Value};

/// Merge `update` onto `base`.
///
/// Both values must be tables, or both non-tables. Integers and floats are
/// interchangeable leaves, any other kind change is a `TypeMismatch`.
pub fn merge_configs(base: &Value, update: &Value) -> Result<Value> {
    merge_at(base, update, "")
}

/// Merge two tables. Base keys keep their order, keys only present in
/// `update` are appended in update order.
pub fn merge_tables(base: &Table, update: &Table) -> Result<Table> {
    merge_tables_at(base, update, "")
}

fn merge_at(base: &Value, update: &Value, path: &str) -> Result<Value> {
    match (base, update) {
        (Value::Table(b), Value::Table(u)) => merge_tables_at(b, u, path).map(Value::Table),
        (b, u) if compatible(b, u) => Ok(u.clone()),
        (b, u) => Err(ConfigError::TypeMismatch {
            path: path.to_string(),
            base: b.kind(),
            update: u.kind(),
        }),
    }
}

fn merge_tables_at(base: &Table, update: &Table, path: &str) -> Result<Table> {
    let mut merged = Table::with_capacity(base.len() + update.len());
    for (key, b) in base {
        let value = match update.get(key) {
            Some(u) => merge_at(b, u, &join(path, key))?,
            None => b.clone(),
        };
        merged.insert(key.clone(), value);
    }
    for (key, u) in update {
        if !base.contains_key(key) {
            merged.insert(key.clone(), u.clone());
        }
    }
    Ok(merged)
}

fn compatible(base: &Value, update: &Value) -> bool {
    matches!(
        (base, update),
        (Value::Bool(_), Value::Bool(_))
            | (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_))
            | (Value::Str(_), Value::Str(_))
            | (Value::List(_), Value::List(_))
    )
}

fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", path, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(yaml: &str) -> Table {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_merge_with_empty_is_identity() {
        let base = table("a: 1\nb:\n  c: true\n  d: [1, 2]\n");
        assert_eq!(merge_tables(&base, &Table::new()).unwrap(), base);
    }

    #[test]
    fn test_update_wins_on_shared_leaves() {
        let base = table("a: 1\nb:\n  c: x\n  d: 2\n");
        let update = table("b:\n  c: y\n");
        let merged = merge_tables(&base, &update).unwrap();
        assert_eq!(merged, table("a: 1\nb:\n  c: y\n  d: 2\n"));
    }

    #[test]
    fn test_update_only_keys_are_appended() {
        let base = table("a: 1\nb: 2\n");
        let update = table("z: 26\nb: 3\n");
        let merged = merge_tables(&base, &update).unwrap();
        let keys: Vec<&str> = merged.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["a", "b", "z"]);
        assert_eq!(merged["b"], Value::Int(3));
    }

    #[test]
    fn test_numbers_are_interchangeable() {
        let merged = merge_tables(&table("spec_exp: 0.33\n"), &table("spec_exp: 1\n")).unwrap();
        assert_eq!(merged["spec_exp"], Value::Int(1));
    }

    #[test]
    fn test_table_against_scalar_is_type_mismatch() {
        let err = merge_tables(&table("a:\n  b: 1\n"), &table("a: 3\n")).unwrap_err();
        match err {
            ConfigError::TypeMismatch { path, base, update } => {
                assert_eq!(path, "a");
                assert_eq!(base, "table");
                assert_eq!(update, "int");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_nested_mismatch_reports_full_path() {
        let err = merge_tables(&table("a:\n  b:\n    c: true\n"), &table("a:\n  b:\n    c: yes please\n"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::TypeMismatch { path, .. } if path == "a.b.c"));
    }

    #[test]
    fn test_scalar_merge() {
        let merged = merge_configs(&Value::from("a"), &Value::from("b")).unwrap();
        assert_eq!(merged, Value::from("b"));
    }
}
