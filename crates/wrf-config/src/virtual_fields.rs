//! Computed fields.
//!
//! Some namelist entries are never written by users but derived from other
//! fields of the same table: `start_date`/`end_date` from the `start`/`end`
//! date components, and the three `time_step_*` entries from a decimal
//! `time_step`. They are recomputed on every lookup and never stored.

use chrono::{Datelike, NaiveDate, Utc};

use crate::error::{ConfigError, Result};
use crate::value::{Table, Value};

/// WRF date format, e.g. `2018-05-02_00:00:00`.
pub const WRF_DATE_FORMAT: &str = "%Y-%m-%d_%H:%M:%S";

struct VirtualField {
    name: &'static str,
    source: &'static str,
    compute: fn(&Value, &str) -> Result<Value>,
}

const VIRTUAL_FIELDS: &[VirtualField] = &[
    VirtualField {
        name: "start_date",
        source: "start",
        compute: wrf_date,
    },
    VirtualField {
        name: "end_date",
        source: "end",
        compute: wrf_date,
    },
    VirtualField {
        name: "time_step_seconds",
        source: "time_step",
        compute: time_step_seconds,
    },
    VirtualField {
        name: "time_step_fract_num",
        source: "time_step",
        compute: time_step_fract_num,
    },
    VirtualField {
        name: "time_step_fract_den",
        source: "time_step",
        compute: time_step_fract_den,
    },
];

/// Compute `key` from its source sibling in `node`, if a rule applies.
pub(crate) fn resolve(node: &Table, key: &str, path: &str) -> Result<Option<Value>> {
    for field in VIRTUAL_FIELDS.iter().filter(|f| f.name == key) {
        if let Some(source) = node.get(field.source) {
            return (field.compute)(source, path).map(Some);
        }
    }
    Ok(None)
}

fn wrf_date(source: &Value, path: &str) -> Result<Value> {
    let parts = source
        .as_table()
        .ok_or_else(|| ConfigError::invalid_value(path, "date source is not a table"))?;
    let now = Utc::now();

    let component = |name: &str, default: i64| -> Result<i64> {
        match parts.get(name) {
            None => Ok(default),
            Some(v) => v.as_i64().ok_or_else(|| {
                ConfigError::invalid_value(path, format!("'{}' is not an integer: {}", name, v))
            }),
        }
    };

    let year = component("year", now.year() as i64)?;
    let month = component("month", now.month() as i64)?;
    let day = component("day", now.day() as i64)?;
    let hour = component("hour", 0)?;
    let minute = component("minute", 0)?;
    let second = component("second", 0)?;

    let to_u32 = |v: i64| u32::try_from(v).ok();
    let date = i32::try_from(year)
        .ok()
        .zip(to_u32(month))
        .zip(to_u32(day))
        .and_then(|((y, m), d)| NaiveDate::from_ymd_opt(y, m, d))
        .and_then(|date| {
            date.and_hms_opt(to_u32(hour)?, to_u32(minute)?, to_u32(second)?)
        })
        .ok_or_else(|| ConfigError::InvalidDate(path.to_string()))?;

    Ok(Value::Str(date.format(WRF_DATE_FORMAT).to_string()))
}

/// A time step split the way WRF wants it: whole seconds plus a reduced
/// fraction of a second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeStep {
    pub seconds: i64,
    pub fract_num: i64,
    pub fract_den: i64,
}

impl TimeStep {
    /// Decompose a time step value.
    ///
    /// Floats are converted through their shortest decimal representation,
    /// so `44.1902` is read as the decimal `44.1902` and not as the nearest
    /// binary double.
    pub fn from_value(value: &Value, key: &str) -> Result<Self> {
        match value {
            Value::Int(i) if *i >= 0 => Ok(Self {
                seconds: *i,
                fract_num: 0,
                fract_den: 1,
            }),
            Value::Float(f) if f.is_finite() => Self::parse_decimal(&f.to_string(), key),
            Value::Str(s) => Self::parse_decimal(s, key),
            other => Err(ConfigError::invalid_value(
                key,
                format!("time step must be a non-negative number, got {}", other),
            )),
        }
    }

    /// Exact conversion of a plain decimal literal such as `"44.1902"`.
    pub fn parse_decimal(text: &str, key: &str) -> Result<Self> {
        let invalid = || {
            ConfigError::invalid_value(key, format!("'{}' is not a non-negative decimal", text))
        };
        let text = text.trim();
        let (whole, fract) = text.split_once('.').unwrap_or((text, ""));

        if whole.is_empty() && fract.is_empty() {
            return Err(invalid());
        }
        if !whole.chars().all(|c| c.is_ascii_digit()) || !fract.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let seconds = if whole.is_empty() {
            0
        } else {
            whole.parse::<i64>().map_err(|_| invalid())?
        };

        let fract = fract.trim_end_matches('0');
        if fract.is_empty() {
            return Ok(Self {
                seconds,
                fract_num: 0,
                fract_den: 1,
            });
        }
        // 10^18 is the largest power of ten an i64 holds
        if fract.len() > 18 {
            return Err(invalid());
        }
        let num = fract.parse::<i64>().map_err(|_| invalid())?;
        let den = 10_i64.pow(fract.len() as u32);
        let g = gcd(num, den);

        Ok(Self {
            seconds,
            fract_num: num / g,
            fract_den: den / g,
        })
    }
}

fn gcd(mut a: i64, mut b: i64) -> i64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a.abs().max(1)
}

fn time_step_seconds(source: &Value, path: &str) -> Result<Value> {
    TimeStep::from_value(source, path).map(|ts| Value::Int(ts.seconds))
}

fn time_step_fract_num(source: &Value, path: &str) -> Result<Value> {
    TimeStep::from_value(source, path).map(|ts| Value::Int(ts.fract_num))
}

fn time_step_fract_den(source: &Value, path: &str) -> Result<Value> {
    TimeStep::from_value(source, path).map(|ts| Value::Int(ts.fract_den))
}
