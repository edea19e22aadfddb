//! rubricate-report: exporting saved evaluations.
//!
//! Records are always written in natural subject-id order. CSV suits the
//! per-question tool, YAML the per-list tool; either works for any variant.

pub mod csv_export;
pub mod error;
pub mod markup;
pub mod yaml;

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::NaiveDate;

use rubricate_core::criteria::{CriteriaSet, RecordLayout};
use rubricate_core::record::{compare_subject_ids, EvaluationRecord};

pub use csv_export::generate_csv;
pub use error::ExportError;
pub use markup::convert_math_tags;
pub use yaml::generate_yaml;

/// Export file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Yaml,
}

impl ExportFormat {
    /// CSV for variants storing one map of records, YAML for per-item ones.
    pub fn default_for(criteria: &CriteriaSet) -> Self {
        match criteria.layout {
            RecordLayout::Map => ExportFormat::Csv,
            RecordLayout::PerItem => ExportFormat::Yaml,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Yaml => "yaml",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "yaml" | "yml" => Ok(ExportFormat::Yaml),
            other => Err(format!("unknown export format {other:?} (expected csv or yaml)")),
        }
    }
}

/// Records in natural subject-id order. Fails when there are none.
pub fn sorted_records(
    records: &BTreeMap<String, EvaluationRecord>,
) -> Result<Vec<&EvaluationRecord>, ExportError> {
    if records.is_empty() {
        return Err(ExportError::NothingToExport);
    }
    let mut sorted: Vec<&EvaluationRecord> = records.values().collect();
    sorted.sort_by(|a, b| compare_subject_ids(&a.subject_id, &b.subject_id));
    Ok(sorted)
}

/// `<variant>_evaluations[_<evaluator>]_<YYYY-MM-DD>.<ext>`
pub fn export_filename(
    variant: &str,
    evaluator: Option<&str>,
    date: NaiveDate,
    format: ExportFormat,
) -> String {
    let name = evaluator.map(sanitize).filter(|n| !n.is_empty());
    match name {
        Some(name) => format!(
            "{variant}_evaluations_{name}_{}.{}",
            date.format("%Y-%m-%d"),
            format.extension()
        ),
        None => format!(
            "{variant}_evaluations_{}.{}",
            date.format("%Y-%m-%d"),
            format.extension()
        ),
    }
}

fn sanitize(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}

/// Render `records` in `format`.
pub fn render(
    records: &BTreeMap<String, EvaluationRecord>,
    criteria: &CriteriaSet,
    format: ExportFormat,
) -> Result<String, ExportError> {
    match format {
        ExportFormat::Csv => generate_csv(records, criteria),
        ExportFormat::Yaml => generate_yaml(records, criteria, chrono::Utc::now()),
    }
}

/// Write an export into `dir` and return its path.
pub fn write_export(
    records: &BTreeMap<String, EvaluationRecord>,
    criteria: &CriteriaSet,
    format: ExportFormat,
    dir: &Path,
    evaluator: Option<&str>,
    date: NaiveDate,
) -> Result<PathBuf, ExportError> {
    let content = render(records, criteria, format)?;
    std::fs::create_dir_all(dir)?;
    let path = dir.join(export_filename(&criteria.variant, evaluator, date, format));
    std::fs::write(&path, content)?;
    tracing::info!(
        records = records.len(),
        "exported evaluations to {}",
        path.display()
    );
    Ok(path)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_embeds_evaluator_and_date() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        assert_eq!(
            export_filename("question", Some("Ana Souza"), date, ExportFormat::Csv),
            "question_evaluations_Ana_Souza_2026-03-14.csv"
        );
        assert_eq!(
            export_filename("list", Some(" ../x "), date, ExportFormat::Yaml),
            "list_evaluations_x_2026-03-14.yaml"
        );
        assert_eq!(
            export_filename("list", None, date, ExportFormat::Yaml),
            "list_evaluations_2026-03-14.yaml"
        );
    }

    #[test]
    fn format_defaults_follow_layout() {
        assert_eq!(
            ExportFormat::default_for(&CriteriaSet::question()),
            ExportFormat::Csv
        );
        assert_eq!(
            ExportFormat::default_for(&CriteriaSet::list()),
            ExportFormat::Yaml
        );
        assert_eq!("YML".parse::<ExportFormat>().unwrap(), ExportFormat::Yaml);
        assert!("xlsx".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn empty_export_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let err = write_export(
            &BTreeMap::new(),
            &CriteriaSet::question(),
            ExportFormat::Csv,
            dir.path(),
            None,
            NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
        )
        .unwrap_err();
        assert!(matches!(err, ExportError::NothingToExport));
        assert_eq!(err.to_string(), "No evaluations to export.");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn write_export_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_export(
            &fixtures::records(),
            &CriteriaSet::question(),
            ExportFormat::Csv,
            &dir.path().join("out"),
            Some("Ana Souza"),
            NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
        )
        .unwrap();
        assert!(path.ends_with("question_evaluations_Ana_Souza_2026-03-14.csv"));
        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.starts_with("question_id,"));
    }

    #[test]
    fn natural_order() {
        let records = fixtures::records();
        let ids: Vec<_> = sorted_records(&records)
            .unwrap()
            .into_iter()
            .map(|r| r.subject_id.as_str())
            .collect();
        assert_eq!(ids, vec!["q_1", "q_2", "q_10"]);
    }
}
