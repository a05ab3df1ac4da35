//! Fortran namelist rendering.

use chrono::{DateTime, Utc};

use crate::configurator::{Configurator, MissingKeys};
use crate::error::{ConfigError, Result};
use crate::tables::{SectionTables, Target};
use crate::tags::FieldTag;
use crate::value::{Table, Value};

/// Format a value as a namelist right-hand side.
///
/// Lists are comma separated, booleans become `.true.`/`.false.`, floats
/// always carry a fractional part and strings are single quoted.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Bool(true) => ".true.".to_string(),
        Value::Bool(false) => ".false.".to_string(),
        Value::Int(i) => i.to_string(),
        Value::Float(x) => format!("{:?}", x),
        Value::Str(s) => format!("'{}'", s.replace('\'', "''")),
        Value::List(items) => items.iter().map(format_value).collect::<Vec<_>>().join(", "),
        // Not representable in a namelist; rendered as a quoted string so
        // the problem is visible in the output.
        Value::Table(_) => format!("'{}'", value),
    }
}

/// Render one `&name ... /` block.
pub fn generate_section(name: &str, fields: &Table) -> String {
    let body = fields
        .iter()
        .map(|(key, value)| format!("{} = {}", key, format_value(value)))
        .collect::<Vec<_>>()
        .join(",\n ");
    format!("&{}\n {}\n/\n", name, body)
}

/// Comment block written above a generated namelist.
pub fn header(target: Target, version: &str, now: DateTime<Utc>) -> String {
    format!(
        "\n# WRF CONFIGURATOR V{} {}\n# {}\n",
        version,
        target,
        now.format("%Y-%m-%d_%H:%M:%Sz")
    )
}

/// Renders the sections of a configurator.
pub struct NamelistGenerator<'a> {
    configurator: &'a Configurator,
    tables: SectionTables,
    missing: MissingKeys,
}

impl<'a> NamelistGenerator<'a> {
    /// Generator using the built-in section tables.
    pub fn new(configurator: &'a Configurator) -> Result<Self> {
        Ok(Self::with_tables(configurator, SectionTables::builtin()?))
    }

    pub fn with_tables(configurator: &'a Configurator, tables: SectionTables) -> Self {
        Self {
            configurator,
            tables,
            missing: MissingKeys::Skip,
        }
    }

    /// Fail on unresolved tags instead of leaving them out.
    pub fn strict(mut self) -> Self {
        self.missing = MissingKeys::Fail;
        self
    }

    /// Tags making up section `name`.
    ///
    /// `geogrid` gets `map_proj` and the projection's parameters appended.
    pub fn section_fields(&self, name: &str) -> Result<Vec<FieldTag>> {
        let mut tags = self
            .tables
            .section(name)
            .ok_or_else(|| ConfigError::UnknownSection(name.to_string()))?
            .to_vec();

        if name == "geogrid" {
            let projection = self.configurator.get("geometry.map_proj")?;
            let projection = projection.as_str().ok_or_else(|| {
                ConfigError::invalid_value("geometry.map_proj", format!("expected a name, got {}", projection))
            })?;
            let extra = self
                .tables
                .projection(projection)
                .ok_or_else(|| ConfigError::UnsupportedProjection(projection.to_string()))?;
            tags.push(FieldTag::new("geometry.map_proj"));
            tags.extend_from_slice(extra);
        }
        Ok(tags)
    }

    /// Render section `name`.
    pub fn generate(&self, name: &str) -> Result<String> {
        let tags = self.section_fields(name)?;
        let fields = self.configurator.gather_data(&tags, self.missing)?;
        tracing::debug!(section = %name, fields = fields.len(), "Generated namelist section");
        Ok(generate_section(name, &fields))
    }

    /// Render every section of `target`, in order.
    pub fn generate_target(&self, target: Target) -> Result<String> {
        let mut out = String::new();
        for name in self.tables.sections(target).keys() {
            out.push_str(&self.generate(name)?);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use test_utils::config;

    fn three_domains() -> Configurator {
        Configurator::make(serde_yaml::from_str(config::THREE_DOMAINS).unwrap()).unwrap()
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(&Value::Bool(true)), ".true.");
        assert_eq!(format_value(&Value::Bool(false)), ".false.");
        assert_eq!(format_value(&Value::Int(12000)), "12000");
        assert_eq!(format_value(&Value::Float(4000.0)), "4000.0");
        assert_eq!(format_value(&Value::Float(0.33)), "0.33");
        assert_eq!(format_value(&Value::from("ARW")), "'ARW'");
        assert_eq!(format_value(&Value::from("it's")), "'it''s'");
        let list = Value::List(vec![Value::Int(1), Value::Bool(false), Value::from("x")]);
        assert_eq!(format_value(&list), "1, .false., 'x'");
    }

    #[test]
    fn test_generate_section_layout() {
        let mut fields = Table::new();
        fields.insert("max_dom".into(), Value::Int(2));
        fields.insert("wrf_core".into(), Value::from("ARW"));
        assert_eq!(
            generate_section("share", &fields),
            "&share\n max_dom = 2,\n wrf_core = 'ARW'\n/\n"
        );
    }

    #[test]
    fn test_empty_section() {
        assert_eq!(generate_section("fdda", &Table::new()), "&fdda\n \n/\n");
    }

    #[test]
    fn test_header() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 6, 5, 4).unwrap();
        assert_eq!(
            header(Target::Wps, "0.1.0", now),
            "\n# WRF CONFIGURATOR V0.1.0 WPS\n# 2024-03-01_06:05:04z\n"
        );
    }

    #[test]
    fn test_share_section() {
        let conf = three_domains();
        let text = NamelistGenerator::new(&conf).unwrap().generate("share").unwrap();
        assert_eq!(
            text,
            "&share\n wrf_core = 'ARW',\n max_dom = 3,\n \
             start_date = '2018-05-02_00:00:00', '2018-05-02_00:00:00', '2018-05-02_00:00:00',\n \
             end_date = '2018-05-03_12:00:00', '2018-05-03_12:00:00', '2018-05-03_12:00:00',\n \
             interval_seconds = 21600,\n io_form_geogrid = 2\n/\n"
        );
    }

    #[test]
    fn test_geogrid_appends_projection() {
        let conf = three_domains();
        let generator = NamelistGenerator::new(&conf).unwrap();
        let names: Vec<String> = generator
            .section_fields("geogrid")
            .unwrap()
            .iter()
            .map(|t| t.name().to_string())
            .collect();
        let tail = &names[names.len() - 6..];
        assert_eq!(tail, ["map_proj", "ref_lat", "ref_lon", "truelat1", "truelat2", "stand_lon"]);

        let text = generator.generate("geogrid").unwrap();
        assert!(text.contains(" parent_grid_ratio = 1, 3, 3,\n"));
        assert!(text.contains(" dx = 12000,\n"));
        assert!(text.contains(" map_proj = 'lambert',\n"));
        assert!(text.ends_with(" stand_lon = 9.0\n/\n"));
    }

    #[test]
    fn test_unsupported_projection() {
        let mut conf = three_domains();
        conf.set("geometry.map_proj", "rotated_ll").unwrap();
        let err = NamelistGenerator::new(&conf).unwrap().generate("geogrid").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedProjection(p) if p == "rotated_ll"));
    }

    #[test]
    fn test_unknown_section() {
        let conf = three_domains();
        let err = NamelistGenerator::new(&conf).unwrap().generate("share2").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownSection(_)));
    }

    #[test]
    fn test_section_follows_gathered_order() {
        let conf = three_domains();
        let generator = NamelistGenerator::new(&conf).unwrap();
        let tags = generator.section_fields("domains").unwrap();
        let fields = conf.gather_data(&tags, MissingKeys::Skip).unwrap();
        let text = generator.generate("domains").unwrap();
        assert_eq!(text, generate_section("domains", &fields));

        let names: Vec<&str> = fields.keys().map(String::as_str).collect();
        assert_eq!(&names[..4], ["time_step", "time_step_fract_num", "time_step_fract_den", "feedback"]);
        // eta_levels is not configured and is skipped
        assert!(!fields.contains_key("eta_levels"));
    }

    #[test]
    fn test_strict_generation_reports_missing_keys() {
        let conf = three_domains();
        let err = NamelistGenerator::new(&conf).unwrap().strict().generate("domains").unwrap_err();
        assert!(err.is_missing_key());
    }

    #[test]
    fn test_generate_target_concatenates_sections() {
        let conf = three_domains();
        let text = NamelistGenerator::new(&conf).unwrap().generate_target(Target::Wrf).unwrap();
        let starts: Vec<&str> = text.lines().filter(|l| l.starts_with('&')).collect();
        assert_eq!(
            starts,
            vec!["&time_control", "&domains", "&physics", "&fdda", "&dynamics", "&bdy_control", "&grib2", "&namelist_quilt"]
        );
        assert!(text.contains(" specified = .true., .false., .false.,\n"));
    }
}
