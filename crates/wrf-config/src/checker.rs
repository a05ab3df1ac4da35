//! Structural validation of nested grids.
//!
//! Faults are collected as messages rather than returned as errors so that
//! every problem in a configuration is reported in one pass.

use crate::configurator::Configurator;
use crate::domain::DomainRef;

/// Checks that every nest tiles and fits inside its parent grid.
pub struct ConfigurationChecker<'a> {
    configuration: &'a Configurator,
    faults: Vec<String>,
}

impl<'a> ConfigurationChecker<'a> {
    pub fn new(configuration: &'a Configurator) -> Self {
        Self {
            configuration,
            faults: Vec::new(),
        }
    }

    /// Run all checks; true when no fault was found.
    ///
    /// Faults from a previous run are discarded.
    pub fn check(&mut self) -> bool {
        self.faults = self
            .configuration
            .domains()
            .filter(|d| !d.is_root())
            .flat_map(check_nest)
            .collect();

        for fault in &self.faults {
            tracing::warn!(fault = %fault, "Configuration fault");
        }
        self.faults.is_empty()
    }

    pub fn faults(&self) -> &[String] {
        &self.faults
    }
}

fn check_nest(domain: DomainRef<'_>) -> Vec<String> {
    let name = domain.name();
    let mut faults = Vec::new();

    let mut int_field = |path: &str| match domain.get_i64(path) {
        Ok(v) => Some(v),
        Err(e) => {
            faults.push(format!("Domain {} has no usable {}: {}", name, path, e));
            None
        }
    };
    let (Some(e_we), Some(e_sn), Some(ratio), Some(i_start), Some(j_start)) = (
        int_field("geometry.e_we"),
        int_field("geometry.e_sn"),
        int_field("geometry.parent_grid_ratio"),
        int_field("geometry.i_parent_start"),
        int_field("geometry.j_parent_start"),
    ) else {
        return faults;
    };

    if ratio <= 0 {
        faults.push(format!(
            "Domain {} has a non-positive parent_grid_ratio ({})",
            name, ratio
        ));
        return faults;
    }

    let (Some(cells_we), Some(cells_sn), Some(i_offset), Some(j_offset)) = (
        e_we.checked_sub(1),
        e_sn.checked_sub(1),
        i_start.checked_sub(1),
        j_start.checked_sub(1),
    ) else {
        faults.push(format!("Domain {} has grid dimensions out of range", name));
        return faults;
    };

    if cells_we % ratio != 0 {
        faults.push(format!("Domain {} grid does not fit in its parent grid", name));
    }
    if cells_sn % ratio != 0 {
        faults.push(format!(
            "Domain {} grid does not fit in its parent grid along the south-north axis",
            name
        ));
    }

    let Some(parent) = domain.parent() else {
        return faults;
    };
    let parent_extent = (
        parent.get_i64("geometry.e_we"),
        parent.get_i64("geometry.e_sn"),
    );
    if let (Ok(p_we), Ok(p_sn)) = parent_extent {
        let ratio = ratio as f64;
        let east = i_offset as f64 + cells_we as f64 / ratio;
        let north = j_offset as f64 + cells_sn as f64 / ratio;
        if i_start < 1 || east > (p_we as f64 - 1.0) {
            faults.push(format!(
                "Domain {} extends past the west-east edge of {}",
                name,
                parent.name()
            ));
        }
        if j_start < 1 || north > (p_sn as f64 - 1.0) {
            faults.push(format!(
                "Domain {} extends past the south-north edge of {}",
                name,
                parent.name()
            ));
        }
    }
    faults
}
