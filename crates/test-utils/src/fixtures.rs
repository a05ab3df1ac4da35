//! Common test fixtures for wrf-configurator tests.
//!
//! This module provides pre-defined configuration documents that represent
//! common nesting layouts, plus helpers that put them on disk.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

/// Configuration documents, as users would write them.
pub mod config {
    /// Three nested domains `base -> dom1 -> dom2` on a Lambert grid.
    ///
    /// - base: 101x201 points at 12 km
    /// - dom1: 91x181 points, ratio 3 (4 km), starting at (25, 51)
    /// - dom2: 61x61 points, ratio 3 (1.333 km), starting at (30, 60)
    ///
    /// Every nest tiles its parent exactly and fits inside it.
    pub const THREE_DOMAINS: &str = r#"
global:
  geometry:
    map_proj: lambert
    ref_lat: 40.0
    ref_lon: 9.0
    truelat1: 30.0
    truelat2: 60.0
    stand_lon: 9.0
    geog_data_path: /geog
  running:
    time_step: 60
    input:
      interval_seconds: 21600
  real:
    num_metgrid_levels: 32
    num_metgrid_soil_levels: 4
domains:
  base:
    geometry:
      e_we: 101
      e_sn: 201
      e_vert: 30
      dx: 12000
      dy: 12000
      geog_data_res: default
    timespan:
      start:
        year: 2018
        month: 5
        day: 2
      end:
        year: 2018
        month: 5
        day: 3
        hour: 12
    running:
      history:
        interval: 180
  dom1:
    parent: base
    geometry:
      parent_grid_ratio: 3
      i_parent_start: 25
      j_parent_start: 51
      e_we: 91
      e_sn: 181
    running:
      parent_time_step_ratio: 3
  dom2:
    parent: dom1
    geometry:
      parent_grid_ratio: 3
      i_parent_start: 30
      j_parent_start: 60
      e_we: 61
      e_sn: 61
"#;

    /// A single domain, relying on the defaults for everything else.
    pub const SINGLE_DOMAIN: &str = r#"
global:
  geometry:
    ref_lat: 45.0
    ref_lon: 10.0
    truelat1: 30.0
    truelat2: 60.0
    stand_lon: 10.0
domains:
  base:
    geometry:
      e_we: 61
      e_sn: 41
      dx: 10000
      dy: 10000
"#;

    /// A document using the legacy `io_form_geogrid` and `timespans` keys.
    pub const LEGACY_KEYS: &str = r#"
global:
  geogrid:
    io_form_geogrid: 102
domains:
  base:
    timespans:
      start: {year: 2019, month: 1, day: 15}
      end: {year: 2019, month: 1, day: 16}
"#;

    /// JSON rendition of a minimal document.
    pub const MINIMAL_JSON: &str = r#"{
  "global": {"running": {"time_step": 44.1902}},
  "domains": {"base": {"geometry": {"e_we": 11, "e_sn": 11, "dx": 1000, "dy": 1000}}}
}"#;
}

/// Write `contents` to a temporary file whose name ends in `suffix`
/// (e.g. `".yaml"`), so loaders that dispatch on the extension accept it.
pub fn config_file(contents: &str, suffix: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("wrf-config-")
        .suffix(suffix)
        .tempfile()
        .expect("create temp config file");
    file.write_all(contents.as_bytes())
        .expect("write temp config file");
    file
}

/// Create empty files named `names` inside `dir` and return their paths.
pub fn touch_files(dir: &Path, names: &[&str]) -> Vec<PathBuf> {
    names
        .iter()
        .map(|name| {
            let path = dir.join(name);
            std::fs::write(&path, b"").expect("create fixture file");
            path
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_file_keeps_suffix() {
        let file = config_file(config::MINIMAL_JSON, ".json");
        assert!(file.path().to_string_lossy().ends_with(".json"));
        let text = std::fs::read_to_string(file.path()).unwrap();
        assert!(text.contains("44.1902"));
    }

    #[test]
    fn test_touch_files() {
        let dir = tempfile::tempdir().unwrap();
        let paths = touch_files(dir.path(), &["a.grb", "b.grb"]);
        assert_eq!(paths.len(), 2);
        assert!(paths.iter().all(|p| p.exists()));
    }
}
