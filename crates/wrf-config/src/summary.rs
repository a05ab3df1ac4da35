//! Human-readable description of the configured domains.

use std::fmt;

use projection::LambertConformal;

use crate::configurator::{Configurator, ROOT_DOMAIN};
use crate::domain::DomainRef;
use crate::error::{ConfigError, Result};

/// Geographic footprint and timing of one domain.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainSummary {
    pub name: String,
    pub parent: Option<String>,
    /// (lon, lat) in degrees
    pub sw_corner: (f64, f64),
    /// (lon, lat) in degrees
    pub ne_corner: (f64, f64),
    /// Cells along west-east and south-north
    pub cells: (i64, i64),
    pub dx: f64,
    pub dy: f64,
    pub start: String,
    pub end: String,
}

impl fmt::Display for DomainSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.parent {
            Some(parent) => writeln!(f, "Domain {} nested on {}", self.name, parent)?,
            None => writeln!(f, "Domain {}", self.name)?,
        }
        writeln!(
            f,
            "    South west corner: ({:.4}, {:.4})",
            self.sw_corner.0, self.sw_corner.1
        )?;
        writeln!(
            f,
            "    North east corner: ({:.4}, {:.4})",
            self.ne_corner.0, self.ne_corner.1
        )?;
        writeln!(f, "    Cells horizontal, dx: {}, {:?}", self.cells.0, self.dx)?;
        writeln!(f, "    Cells vertical,   dy: {}, {:?}", self.cells.1, self.dy)?;
        writeln!(f, "    Will run from {} to {}", self.start, self.end)
    }
}

/// Projects domain corners to geographic coordinates.
///
/// Only ARW runs on a Lambert grid are supported. ARW grids are centred on
/// the reference point, so the base domain's south-west corner sits half
/// its extent away from it.
pub struct Summarizer<'a> {
    configurator: &'a Configurator,
    projection: LambertConformal,
    base_offset: (f64, f64),
}

impl<'a> Summarizer<'a> {
    pub fn new(configurator: &'a Configurator) -> Result<Self> {
        let core = configurator.get("dynamics.wrf_core")?;
        if core.as_str() != Some("ARW") {
            return Err(ConfigError::invalid_value(
                "dynamics.wrf_core",
                format!("unknown wrf_core {}", core),
            ));
        }

        let map_proj = configurator.get("geometry.map_proj")?;
        if map_proj.as_str() != Some("lambert") {
            return Err(ConfigError::UnsupportedProjection(map_proj.to_string()));
        }

        let number = |path: &str| -> Result<f64> {
            let value = configurator.get(path)?;
            value
                .as_f64()
                .ok_or_else(|| ConfigError::invalid_value(path, format!("expected a number, got {}", value)))
        };
        let projection = LambertConformal::new(
            number("geometry.truelat1")?,
            number("geometry.truelat2")?,
            number("geometry.stand_lon")?,
            number("geometry.ref_lat")?,
            number("geometry.ref_lon")?,
        )
        .map_err(|e| ConfigError::invalid_value("geometry", e.to_string()))?;

        let base = configurator
            .domain(ROOT_DOMAIN)
            .ok_or_else(|| ConfigError::KeyNotFound(format!("@{}", ROOT_DOMAIN)))?;
        let (width, height) = base.extension()?;

        Ok(Self {
            configurator,
            projection,
            base_offset: (-0.5 * width, -0.5 * height),
        })
    }

    /// (lon, lat) of a point given in metres from the base domain's
    /// south-west corner.
    pub fn lonlat_of_offset(&self, p: (f64, f64)) -> (f64, f64) {
        let (lat, lon) = self
            .projection
            .unproject(p.0 + self.base_offset.0, p.1 + self.base_offset.1);
        (lon, lat)
    }

    pub fn describe(&self, domain: DomainRef<'_>) -> Result<DomainSummary> {
        let offset = domain.offset_wrt_base()?;
        let delta = domain.extension()?;
        let date = |path: &str| -> Result<String> { Ok(domain.get(path)?.to_string()) };

        Ok(DomainSummary {
            name: domain.name().to_string(),
            parent: domain.parent().map(|p| p.name().to_string()),
            sw_corner: self.lonlat_of_offset(offset),
            ne_corner: self.lonlat_of_offset((offset.0 + delta.0, offset.1 + delta.1)),
            cells: (cells(domain, "geometry.e_we")?, cells(domain, "geometry.e_sn")?),
            dx: domain.get_f64("geometry.dx")?,
            dy: domain.get_f64("geometry.dy")?,
            start: date("timespan.start_date")?,
            end: date("timespan.end_date")?,
        })
    }

    pub fn domain_summaries(&self) -> Result<Vec<DomainSummary>> {
        self.configurator.domains().map(|d| self.describe(d)).collect()
    }

    /// Full report: projection parameters followed by every domain.
    pub fn summarize(&self) -> Result<String> {
        let geometry = |key: &str| -> Result<String> {
            Ok(self.configurator.get(&format!("geometry.{}", key))?.to_string())
        };
        let mut out = format!(
            "The map projection system used is:\n\
             Lambert projection\n    \
             Reference position ({}, {})\n    \
             True latitudes: [{}, {}]\n    \
             Standard longitude: {}\n",
            geometry("ref_lon")?,
            geometry("ref_lat")?,
            geometry("truelat1")?,
            geometry("truelat2")?,
            geometry("stand_lon")?,
        );
        for summary in self.domain_summaries()? {
            out.push('\n');
            out.push_str(&summary.to_string());
        }
        Ok(out)
    }
}

/// Cells along an axis: one fewer than the staggered point count.
fn cells(domain: DomainRef<'_>, path: &str) -> Result<i64> {
    let points = domain.get_i64(path)?;
    points.checked_sub(1).ok_or_else(|| {
        ConfigError::invalid_value(
            format!("@{}.{}", domain.name(), path),
            format!("{} is out of range", points),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;
    use test_utils::{assert_approx_eq, assert_coords_approx_eq, config};

    fn three_domains() -> Configurator {
        Configurator::make(serde_yaml::from_str(config::THREE_DOMAINS).unwrap()).unwrap()
    }

    #[test]
    fn test_base_is_centred_on_reference_point() {
        let conf = three_domains();
        let summarizer = Summarizer::new(&conf).unwrap();
        let base = summarizer.describe(conf.domain("base").unwrap()).unwrap();

        let (w, s) = base.sw_corner;
        let (e, n) = base.ne_corner;
        assert!(w < 9.0 && e > 9.0, "lon span {}..{} should contain 9", w, e);
        assert!(s < 40.0 && n > 40.0, "lat span {}..{} should contain 40", s, n);

        // centre of the grid maps back to the reference point
        assert_coords_approx_eq!(summarizer.lonlat_of_offset((600_000.0, 1_200_000.0)), (9.0, 40.0), 1e-9);
        assert_eq!(base.cells, (100, 200));
        assert_eq!(base.parent, None);
    }

    #[test]
    fn test_nests_lie_inside_their_parents() {
        let conf = three_domains();
        let summaries = Summarizer::new(&conf).unwrap().domain_summaries().unwrap();
        assert_eq!(summaries.len(), 3);
        for pair in summaries.windows(2) {
            let (outer, inner) = (&pair[0], &pair[1]);
            assert!(inner.sw_corner.1 > outer.sw_corner.1);
            assert!(inner.ne_corner.1 < outer.ne_corner.1);
            assert_eq!(inner.parent.as_deref(), Some(outer.name.as_str()));
        }
        assert_approx_eq!(summaries[1].dx, 4000.0, 1e-9);
        assert_eq!(summaries[1].start, "2018-05-02_00:00:00");
        assert_eq!(summaries[1].end, "2018-05-03_12:00:00");
    }

    #[test]
    fn test_summary_text() {
        let conf = three_domains();
        let text = Summarizer::new(&conf).unwrap().summarize().unwrap();
        assert!(text.starts_with("The map projection system used is:\nLambert projection\n"));
        assert!(text.contains("Reference position (9.0, 40.0)"));
        assert!(text.contains("Domain dom2 nested on dom1\n"));
        assert!(text.contains("Cells horizontal, dx: 90, 4000.0\n"));
        assert!(text.contains("Cells vertical,   dy: 180, 4000.0\n"));
        assert!(text.contains("Cells horizontal, dx: 100, 12000.0\n"));
    }

    #[test]
    fn test_out_of_range_dimension_is_an_error() {
        let mut conf = three_domains();
        conf.set("@dom2.geometry.e_we", Value::Int(i64::MIN)).unwrap();
        let summarizer = Summarizer::new(&conf).unwrap();
        let err = summarizer.describe(conf.domain("dom2").unwrap()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "@dom2.geometry.e_we"));
    }

    #[test]
    fn test_only_lambert_is_supported() {
        let mut conf = three_domains();
        conf.set("geometry.map_proj", "mercator").unwrap();
        assert!(matches!(Summarizer::new(&conf), Err(ConfigError::UnsupportedProjection(_))));
    }

    #[test]
    fn test_only_arw_is_supported() {
        let mut conf = three_domains();
        conf.set("dynamics.wrf_core", "NMM").unwrap();
        assert!(matches!(Summarizer::new(&conf), Err(ConfigError::InvalidValue { .. })));
    }
}
