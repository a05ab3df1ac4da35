//! Field tags: which configuration path feeds which namelist entry.

use serde::Deserialize;

/// A path to gather plus the name it is emitted under.
///
/// In the section tables a tag is written either as a plain path
/// (`domains.geometry.e_we`, emitted as `e_we`), as a `[path, name]` pair,
/// or as a map with `path`, optional `name` and `optional` keys.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "TagSpec")]
pub struct FieldTag {
    path: String,
    name: String,
    optional: bool,
}

impl FieldTag {
    /// Tag emitted under the last component of `path`.
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        let name = last_component(&path).to_string();
        Self {
            path,
            name,
            optional: false,
        }
    }

    /// Tag emitted under an explicit name.
    pub fn renamed(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            optional: false,
        }
    }

    /// Mark the tag as skippable when its path does not resolve.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }
}

impl From<&str> for FieldTag {
    fn from(path: &str) -> Self {
        FieldTag::new(path)
    }
}

impl From<(&str, &str)> for FieldTag {
    fn from((path, name): (&str, &str)) -> Self {
        FieldTag::renamed(path, name)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TagSpec {
    Plain(String),
    Renamed(String, String),
    Detailed {
        path: String,
        name: Option<String>,
        #[serde(default)]
        optional: bool,
    },
}

impl From<TagSpec> for FieldTag {
    fn from(spec: TagSpec) -> Self {
        match spec {
            TagSpec::Plain(path) => FieldTag::new(path),
            TagSpec::Renamed(path, name) => FieldTag::renamed(path, name),
            TagSpec::Detailed { path, name, optional } => {
                let tag = match name {
                    Some(name) => FieldTag::renamed(path, name),
                    None => FieldTag::new(path),
                };
                FieldTag { optional, ..tag }
            }
        }
    }
}

fn last_component(path: &str) -> &str {
    path.rsplit('.').next().unwrap_or(path)
}
