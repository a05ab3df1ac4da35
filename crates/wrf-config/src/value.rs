//! Configuration values.
//!
//! A configuration document is a tree of [`Value`]s. Leaves are scalars or
//! lists, inner nodes are ordered [`Table`]s. Insertion order is preserved
//! because namelist generation and domain numbering both depend on it.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered string-keyed table of values.
pub type Table = IndexMap<String, Value>;

/// 2^63: floats in `[-2^63, 2^63)` convert to `i64` exactly.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// A single configuration value.
///
/// Deserializes from any YAML or JSON document whose keys are strings.
/// Integers are tried before floats so `12000` stays an integer while
/// `0.33` becomes a float.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Table(Table),
}

impl Value {
    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Table(_) => "table",
        }
    }

    pub fn is_table(&self) -> bool {
        matches!(self, Value::Table(_))
    }

    /// Integer view. Floats with no fractional part are accepted as long as
    /// they fit in an `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Float(f) if f.fract() == 0.0 && (-I64_BOUND..I64_BOUND).contains(f) => {
                Some(*f as i64)
            }
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Value::Table(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_table_mut(&mut self) -> Option<&mut Table> {
        match self {
            Value::Table(t) => Some(t),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Value::Int(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::List(v)
    }
}

impl From<Table> for Value {
    fn from(v: Table) -> Self {
        Value::Table(v)
    }
}

/// Plain rendering used when printing resolved values.
///
/// Tables are rendered as YAML.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{:?}", x),
            Value::Str(s) => f.write_str(s),
            Value::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
            Value::Table(t) => {
                let text = serde_yaml::to_string(t).map_err(|_| fmt::Error)?;
                f.write_str(text.trim_end())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_scalars_keep_their_kind() {
        let t: Table = serde_yaml::from_str("a: 12000\nb: 0.33\nc: true\nd: lambert\ne: [1, 2]").unwrap();
        assert_eq!(t["a"], Value::Int(12000));
        assert_eq!(t["b"], Value::Float(0.33));
        assert_eq!(t["c"], Value::Bool(true));
        assert_eq!(t["d"], Value::Str("lambert".to_string()));
        assert_eq!(t["e"], Value::List(vec![Value::Int(1), Value::Int(2)]));
    }

    #[test]
    fn test_yaml_preserves_key_order() {
        let t: Table = serde_yaml::from_str("zeta: 1\nalpha: 2\nmid: 3").unwrap();
        let keys: Vec<&str> = t.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_json_nested_tables() {
        let v: Value = serde_json::from_str(r#"{"geometry": {"dx": 12000.5}}"#).unwrap();
        let dx = v.as_table().unwrap()["geometry"].as_table().unwrap()["dx"].as_f64();
        assert_eq!(dx, Some(12000.5));
    }

    #[test]
    fn test_integral_float_as_i64() {
        assert_eq!(Value::Float(4000.0).as_i64(), Some(4000));
        assert_eq!(Value::Float(4000.5).as_i64(), None);
        assert_eq!(Value::Str("3".into()).as_i64(), None);
    }

    #[test]
    fn test_out_of_range_float_is_not_an_integer() {
        assert_eq!(Value::Float(-1.0e300).as_i64(), None);
        assert_eq!(Value::Float(9.3e18).as_i64(), None);
        assert_eq!(Value::Float(f64::INFINITY).as_i64(), None);
        assert_eq!(Value::Float(-9_223_372_036_854_775_808.0).as_i64(), Some(i64::MIN));
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Float(4000.0).to_string(), "4000.0");
        assert_eq!(Value::from(vec![Value::Int(1), Value::Bool(false)]).to_string(), "1, false");
        assert_eq!(Value::from("ARW").to_string(), "ARW");
    }
}
