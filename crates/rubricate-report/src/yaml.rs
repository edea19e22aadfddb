//! Nested YAML export: records keyed by subject id under `evaluations`.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde_yaml::{Mapping, Value};

use rubricate_core::criteria::CriteriaSet;
use rubricate_core::record::EvaluationRecord;
use rubricate_core::scoring::CriterionValue;

use crate::error::ExportError;
use crate::sorted_records;

fn text(s: &str) -> Value {
    Value::String(s.to_string())
}

fn criterion_value(value: &CriterionValue) -> Value {
    match value {
        CriterionValue::Verdict(v) => Value::String(v.to_string()),
        CriterionValue::Score(s) => Value::Number(u64::from(*s).into()),
    }
}

fn record_mapping(record: &EvaluationRecord, criteria: &CriteriaSet) -> Mapping {
    let mut m = Mapping::new();
    if let Some(name) = &record.evaluator_name {
        m.insert(text("evaluator_name"), text(name));
    }
    m.insert(text("discipline"), text(&record.discipline));
    m.insert(text("locale"), text(&record.locale));
    m.insert(text("grade"), text(&record.grade));
    m.insert(text("difficulty"), text(&record.difficulty));
    if let Some(item_type) = record.item_type {
        m.insert(text("type"), Value::String(item_type.to_string()));
    }

    // Criteria in form order first, then anything stored under a key the
    // current criteria set no longer declares.
    let mut scores = Mapping::new();
    for criterion in criteria.form_order() {
        if let Some(value) = record.values.get(criterion.key()) {
            scores.insert(text(criterion.key()), criterion_value(value));
        }
    }
    for (key, value) in &record.values {
        if criteria.criterion(key).is_none() {
            scores.insert(text(key), criterion_value(value));
        }
    }
    m.insert(text("criteria"), Value::Mapping(scores));

    m.insert(
        text("total_score"),
        Value::Number(u64::from(record.total_score).into()),
    );
    m.insert(
        text("max_possible_score"),
        Value::Number(u64::from(record.max_possible_score).into()),
    );
    let percentage = (record.percentage() * 10.0).round() / 10.0;
    m.insert(text("percentage"), Value::Number(percentage.into()));
    m.insert(
        text(&criteria.notes_label),
        text(record.reasoning.as_deref().unwrap_or_default()),
    );
    m.insert(text("evaluated_at"), text(&record.evaluated_at.to_rfc3339()));
    m
}

/// Render every record as a block-style YAML document.
pub fn generate_yaml(
    records: &BTreeMap<String, EvaluationRecord>,
    criteria: &CriteriaSet,
    exported_at: DateTime<Utc>,
) -> Result<String, ExportError> {
    let sorted = sorted_records(records)?;

    let mut evaluations = Mapping::new();
    for record in sorted {
        evaluations.insert(
            text(&record.subject_id),
            Value::Mapping(record_mapping(record, criteria)),
        );
    }

    let mut root = Mapping::new();
    root.insert(text("variant"), text(&criteria.variant));
    root.insert(text("exported_at"), text(&exported_at.to_rfc3339()));
    root.insert(text("evaluations"), Value::Mapping(evaluations));
    Ok(serde_yaml::to_string(&Value::Mapping(root))?)
}
