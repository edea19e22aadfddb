//! Subcommand implementations and the shared loading path.

pub mod back;
pub mod criteria;
pub mod export;
pub mod init;
pub mod nav;
pub mod progress;
pub mod reset;
pub mod save;
pub mod score;
pub mod show;
pub mod start;
pub mod subjects;
pub mod validate;

use std::sync::Arc;

use anyhow::{Context, Result};

use rubricate_core::adapter::{load_dataset, Adapted};
use rubricate_core::criteria::CriteriaSet;
use rubricate_core::model::Dataset;
use rubricate_core::scoring::Scorecard;
use rubricate_core::session::Session;
use rubricate_core::store::FileStore;
use rubricate_sources::config::{create_source, load_config_from, resolve_criteria};
use rubricate_sources::RubricateConfig;

use crate::GlobalArgs;

/// Config and criteria resolved from flags, environment and config file.
pub struct AppContext {
    pub config: RubricateConfig,
    pub criteria: Arc<CriteriaSet>,
}

impl AppContext {
    pub fn load(args: &GlobalArgs) -> Result<Self> {
        let mut config = load_config_from(args.config.as_deref())?;
        if let Some(dataset) = &args.dataset {
            config.dataset = Some(dataset.clone());
        }
        if let Some(dir) = &args.state_dir {
            config.state_dir = dir.clone();
        }
        if let Some(variant) = &args.variant {
            config.variant = variant.clone();
        }
        let criteria = resolve_criteria(&config, &config.variant)?;
        Ok(Self {
            config,
            criteria: Arc::new(criteria),
        })
    }

    pub fn dataset_location(&self) -> Result<&str> {
        self.config.dataset.as_deref().context(
            "no dataset configured; pass --dataset or set `dataset` in rubricate.toml",
        )
    }

    /// Fetch and adapt the dataset, reporting adapter warnings in the log.
    pub async fn load_dataset(&self) -> Result<Adapted> {
        let location = self.dataset_location()?;
        let source = create_source(location)?;
        let adapted = load_dataset(source.as_ref())
            .await
            .with_context(|| format!("failed to load dataset {location}"))?;
        for warning in &adapted.warnings {
            tracing::warn!("{}", warning.message);
        }
        Ok(adapted)
    }

    /// Like [`Self::load_dataset`], but an empty result is an error.
    pub async fn load_usable_dataset(&self) -> Result<Dataset> {
        let adapted = self.load_dataset().await?;
        if adapted.is_empty() {
            anyhow::bail!(
                "dataset {} contains no usable items",
                self.dataset_location()?
            );
        }
        Ok(adapted.dataset)
    }

    pub fn open_store(&self) -> Result<FileStore> {
        FileStore::open(&self.config.state_dir).with_context(|| {
            format!(
                "failed to open state directory {}",
                self.config.state_dir.display()
            )
        })
    }

    /// Load the dataset and rehydrate the session for the configured variant.
    pub async fn open_session(&self) -> Result<(Session<FileStore>, Dataset)> {
        let dataset = self.load_usable_dataset().await?;
        let store = self.open_store()?;
        let session = Session::open(store, Arc::clone(&self.criteria), &dataset);
        Ok((session, dataset))
    }
}

/// Like [`AppContext::open_session`], but the session must be past the
/// selection step.
pub async fn open_active_session(args: &GlobalArgs) -> Result<(Session<FileStore>, Dataset)> {
    let ctx = AppContext::load(args)?;
    let (session, dataset) = ctx.open_session().await?;
    if !session.is_active() {
        anyhow::bail!("no active selection; run `rubricate start` first");
    }
    Ok((session, dataset))
}

/// Parse a `KEY=VALUE` argument.
pub fn parse_assignment(s: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got {s:?}"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing criterion name in {s:?}"));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

/// Apply `--set` assignments and then `--keys` digits to a scorecard.
pub fn apply_inputs(
    card: &mut Scorecard,
    assignments: &[(String, String)],
    keys: Option<&str>,
) -> Result<()> {
    for (key, value) in assignments {
        card.set(key, value)?;
    }
    for ch in keys.unwrap_or_default().chars() {
        if ch.is_whitespace() {
            continue;
        }
        let digit = ch
            .to_digit(10)
            .with_context(|| format!("quick-entry keys must be digits, got {ch:?}"))?;
        // digits a criterion cannot take are skipped
        let _ = card.fill_next(digit as u8);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rubricate_core::model::QuestionType;
    use rubricate_core::scoring::ScoreStatus;

    #[test]
    fn assignment_parsing() {
        assert_eq!(
            parse_assignment("prompt_quality=2").unwrap(),
            ("prompt_quality".to_string(), "2".to_string())
        );
        assert_eq!(
            parse_assignment(" completeness = pass ").unwrap(),
            ("completeness".to_string(), "pass".to_string())
        );
        assert_eq!(
            parse_assignment("completeness=").unwrap().1,
            String::new()
        );
        assert!(parse_assignment("completeness").is_err());
        assert!(parse_assignment("=2").is_err());
    }

    #[test]
    fn quick_keys_then_assignments() {
        let mut card = Scorecard::new(
            Arc::new(CriteriaSet::question()),
            Some(QuestionType::Mcq),
        );
        apply_inputs(
            &mut card,
            &[("prompt_quality".into(), "2".into())],
            Some("11 12"),
        )
        .unwrap();
        assert_eq!(card.status(), ScoreStatus::Complete);
        assert_eq!(card.total_score(), 5);
    }

    #[test]
    fn non_digit_keys_fail() {
        let mut card = Scorecard::new(Arc::new(CriteriaSet::question()), None);
        assert!(apply_inputs(&mut card, &[], Some("1x")).is_err());
    }
}
