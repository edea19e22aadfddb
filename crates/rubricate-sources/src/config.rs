//! Configuration and source factory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use rubricate_core::criteria::CriteriaSet;
use rubricate_core::error::CriteriaError;
use rubricate_core::traits::DatasetSource;

use crate::http::HttpSource;
use crate::local::LocalFileSource;

/// Top-level rubricate configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RubricateConfig {
    /// Criteria variant: `question`, `list`, or a name under `[variants]`.
    #[serde(default = "default_variant")]
    pub variant: String,
    /// Dataset path or http(s) URL.
    #[serde(default)]
    pub dataset: Option<String>,
    /// Optional rubric document shown by `rubricate criteria`.
    #[serde(default)]
    pub criteria_doc: Option<String>,
    /// Where the session store lives.
    #[serde(default = "default_state_dir")]
    pub state_dir: PathBuf,
    /// Where exports are written.
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,
    /// Custom criteria sets keyed by variant name.
    #[serde(default)]
    pub variants: HashMap<String, CriteriaSet>,
}

fn default_variant() -> String {
    "question".to_string()
}
fn default_state_dir() -> PathBuf {
    PathBuf::from("./.rubricate")
}
fn default_export_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for RubricateConfig {
    fn default() -> Self {
        Self {
            variant: default_variant(),
            dataset: None,
            criteria_doc: None,
            state_dir: default_state_dir(),
            export_dir: default_export_dir(),
            variants: HashMap::new(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        let Some(end) = result[start..].find('}') else {
            break;
        };
        let var_name = &result[start + 2..start + end];
        let value = std::env::var(var_name).unwrap_or_default();
        result = format!("{}{}{}", &result[..start], value, &result[start + end + 1..]);
    }
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(s) => PathBuf::from(resolve_env_vars(s)),
        None => path.to_path_buf(),
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `rubricate.toml` in the current directory
/// 2. `~/.config/rubricate/config.toml`
///
/// Environment variable overrides: `RUBRICATE_DATASET`, `RUBRICATE_STATE_DIR`.
pub fn load_config() -> Result<RubricateConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<RubricateConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("rubricate.toml");
            if local.exists() {
                Some(local)
            } else {
                dirs_path()
                    .map(|dir| dir.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!("using config {}", path.display());
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<RubricateConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => RubricateConfig::default(),
    };

    if let Ok(dataset) = std::env::var("RUBRICATE_DATASET") {
        config.dataset = Some(dataset);
    }
    if let Ok(dir) = std::env::var("RUBRICATE_STATE_DIR") {
        config.state_dir = PathBuf::from(dir);
    }

    config.dataset = config.dataset.as_deref().map(resolve_env_vars);
    config.criteria_doc = config.criteria_doc.as_deref().map(resolve_env_vars);
    config.state_dir = resolve_path(&config.state_dir);
    config.export_dir = resolve_path(&config.export_dir);

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("rubricate"))
}

/// Pick a source for a path or URL.
pub fn create_source(location: &str) -> Result<Box<dyn DatasetSource>> {
    let lower = location.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        let source = HttpSource::new(location)
            .with_context(|| format!("invalid dataset URL: {location}"))?;
        Ok(Box::new(source))
    } else {
        Ok(Box::new(LocalFileSource::new(location)))
    }
}

/// The criteria set for `variant`: a built-in, or a `[variants.<name>]`
/// table from the config. Custom sets are validated.
pub fn resolve_criteria(config: &RubricateConfig, variant: &str) -> Result<CriteriaSet> {
    if let Some(builtin) = CriteriaSet::builtin(variant) {
        if config.variants.contains_key(variant) {
            anyhow::bail!("custom variant {variant:?} would shadow the built-in variant");
        }
        return Ok(builtin);
    }

    let mut set = config
        .variants
        .get(variant)
        .cloned()
        .ok_or_else(|| CriteriaError::UnknownVariant(variant.to_string()))?;
    set.variant = variant.to_string();
    set.validate()
        .with_context(|| format!("invalid criteria for variant {variant:?}"))?;
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rubricate_core::criteria::{Applicability, RecordLayout};

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_RUBRICATE_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_RUBRICATE_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("data/${_RUBRICATE_TEST_VAR}.json"),
            "data/hello.json"
        );
        assert_eq!(resolve_env_vars("${unterminated"), "${unterminated");
        std::env::remove_var("_RUBRICATE_TEST_VAR");
    }

    #[test]
    fn default_config() {
        let config = RubricateConfig::default();
        assert_eq!(config.variant, "question");
        assert_eq!(config.state_dir, PathBuf::from("./.rubricate"));
        assert!(config.dataset.is_none());
    }

    #[test]
    fn explicit_missing_path_fails() {
        let err = load_config_from(Some(Path::new("/no/such/rubricate.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn parse_config_with_custom_variant() {
        let toml_str = r#"
variant = "short"
dataset = "data/questions.csv"
state_dir = "/tmp/rubricate-state"

[variants.short]
max_score = 3
layout = "per_item"
id_column = "item"

[[variants.short.gates]]
key = "accuracy"
label = "Accuracy"

[[variants.short.quality]]
key = "clarity"
label = "Clarity"

[[variants.short.quality]]
key = "distractors"
label = "Distractors"
max = 1
applies_to = "mcq"
"#;
        let config: RubricateConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.dataset.as_deref(), Some("data/questions.csv"));

        let set = resolve_criteria(&config, "short").unwrap();
        assert_eq!(set.variant, "short");
        assert_eq!(set.layout, RecordLayout::PerItem);
        assert_eq!(set.id_column, "item");
        assert_eq!(set.quality[1].applies_to, Applicability::Mcq);
    }

    #[test]
    fn builtins_and_unknown_variants() {
        let config = RubricateConfig::default();
        assert_eq!(resolve_criteria(&config, "list").unwrap().max_score, 17);
        let err = resolve_criteria(&config, "essay").unwrap_err();
        assert!(err.to_string().contains("unknown criteria variant"));
    }

    #[test]
    fn custom_variant_cannot_shadow_builtin() {
        let mut config = RubricateConfig::default();
        config
            .variants
            .insert("question".into(), CriteriaSet::list());
        assert!(resolve_criteria(&config, "question").is_err());
    }

    #[test]
    fn invalid_custom_variant_is_rejected() {
        let mut config = RubricateConfig::default();
        let mut set = CriteriaSet::question();
        set.max_score = 2;
        config.variants.insert("tight".into(), set);
        let err = resolve_criteria(&config, "tight").unwrap_err();
        assert!(format!("{err:#}").contains("max_score 2"));
    }

    #[test]
    fn source_factory_picks_by_scheme() {
        let http = create_source("https://example.org/data.json").unwrap();
        assert_eq!(http.location(), "https://example.org/data.json");
        let local = create_source("data/questions.csv").unwrap();
        assert_eq!(local.location(), "data/questions.csv");
    }
}
