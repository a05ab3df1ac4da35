//! Configuration document loader.
//!
//! Reads a `{global, domains}` document from YAML or JSON (picked by file
//! extension) after substituting environment variables with `${VAR}` or
//! `${VAR:-default}` syntax.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::info;

use wrf_config::{parse_document, DocumentFormat, Table};

/// Load and parse a configuration document with environment variable
/// substitution.
pub fn load_document<P: AsRef<Path>>(path: P) -> Result<Table> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration from {:?}", path))?;

    let expanded = expand_env_vars(&content)?;
    let format = DocumentFormat::from_path(path);

    let document = parse_document(&expanded, format)
        .with_context(|| format!("Failed to parse configuration from {:?}", path))?;

    validate_document(&document)?;

    let domain_count = document
        .get("domains")
        .and_then(|v| v.as_table())
        .map_or(0, |d| d.len());
    info!(
        path = %path.display(),
        format = ?format,
        domains = domain_count,
        "Loaded configuration document"
    );

    Ok(document)
}

// ============================================================================
// Environment Variable Substitution
// ============================================================================

/// Expand environment variables in the format ${VAR} or ${VAR:-default}
fn expand_env_vars(content: &str) -> Result<String> {
    let mut result = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && chars.peek() == Some(&'{') {
            chars.next(); // consume '{'

            let mut var_expr = String::new();
            let mut brace_count = 1;

            while brace_count > 0 {
                match chars.next() {
                    Some('{') => {
                        brace_count += 1;
                        var_expr.push('{');
                    }
                    Some('}') => {
                        brace_count -= 1;
                        if brace_count > 0 {
                            var_expr.push('}');
                        }
                    }
                    Some(c) => var_expr.push(c),
                    None => anyhow::bail!("Unclosed variable substitution: ${{{}", var_expr),
                }
            }

            let value = resolve_var_expr(&var_expr)?;
            result.push_str(&value);
        } else {
            result.push(ch);
        }
    }

    Ok(result)
}

/// Resolve variable expression (supports VAR and VAR:-default syntax)
fn resolve_var_expr(expr: &str) -> Result<String> {
    if let Some((var_name, default)) = expr.split_once(":-") {
        match std::env::var(var_name.trim()) {
            Ok(val) if !val.is_empty() => Ok(val),
            _ => Ok(default.to_string()),
        }
    } else {
        std::env::var(expr.trim())
            .with_context(|| format!("Environment variable {} not set", expr))
    }
}

// ============================================================================
// Validation
// ============================================================================

/// Only `global` and `domains` are meaningful at the top level, and both
/// must be mappings when present.
fn validate_document(document: &Table) -> Result<()> {
    for (key, value) in document {
        anyhow::ensure!(
            key == "global" || key == "domains",
            "Unknown top-level section '{}' (expected 'global' or 'domains')",
            key
        );
        anyhow::ensure!(
            value.is_table(),
            "Top-level section '{}' must be a mapping, got {}",
            key,
            value.kind()
        );
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::{config, config_file};
    use wrf_config::Value;

    #[test]
    fn test_expand_env_vars_simple() {
        std::env::set_var("WRF_TEST_GEOG", "/data/geog");
        let result = expand_env_vars("geog_data_path: ${WRF_TEST_GEOG}/v4").unwrap();
        assert_eq!(result, "geog_data_path: /data/geog/v4");
    }

    #[test]
    fn test_expand_env_vars_with_default() {
        std::env::remove_var("WRF_TEST_NONEXISTENT");
        let result = expand_env_vars("e_we: ${WRF_TEST_NONEXISTENT:-101}").unwrap();
        assert_eq!(result, "e_we: 101");
    }

    #[test]
    fn test_expand_env_vars_missing_required() {
        std::env::remove_var("WRF_TEST_REQUIRED");
        assert!(expand_env_vars("${WRF_TEST_REQUIRED}").is_err());
    }

    #[test]
    fn test_expand_env_vars_unclosed() {
        assert!(expand_env_vars("path: ${HOME").is_err());
    }

    #[test]
    fn test_plain_dollar_is_kept() {
        assert_eq!(expand_env_vars("cost: $5").unwrap(), "cost: $5");
    }

    #[test]
    fn test_resolve_var_expr_override_default() {
        std::env::set_var("WRF_TEST_SET", "custom");
        assert_eq!(resolve_var_expr("WRF_TEST_SET:-default").unwrap(), "custom");
    }

    #[test]
    fn test_load_yaml_document() {
        let file = config_file(config::THREE_DOMAINS, ".yaml");
        let doc = load_document(file.path()).unwrap();
        let domains = doc["domains"].as_table().unwrap();
        assert_eq!(domains.len(), 3);
    }

    #[test]
    fn test_load_json_document() {
        let file = config_file(config::MINIMAL_JSON, ".json");
        let doc = load_document(file.path()).unwrap();
        assert!(doc["global"].is_table());
    }

    #[test]
    fn test_load_substitutes_before_parsing() {
        std::env::set_var("WRF_TEST_E_WE", "77");
        let file = config_file("domains:\n  base:\n    geometry:\n      e_we: ${WRF_TEST_E_WE}\n", ".yml");
        let doc = load_document(file.path()).unwrap();
        let base = doc["domains"].as_table().unwrap()["base"].as_table().unwrap();
        assert_eq!(base["geometry"].as_table().unwrap()["e_we"], Value::Int(77));
    }

    #[test]
    fn test_unknown_top_level_section() {
        let file = config_file("globals:\n  a: 1\n", ".yaml");
        let err = load_document(file.path()).unwrap_err();
        assert!(err.to_string().contains("Unknown top-level section 'globals'"));
    }

    #[test]
    fn test_missing_file() {
        let err = load_document("/nonexistent/run.yaml").unwrap_err();
        assert!(err.to_string().contains("Failed to read configuration"));
    }
}
