//! Scoring engine.
//!
//! Two phases, both driven by a [`CriteriaSet`]:
//!
//! 1. Gate phase: any FAIL forces the total to 0. Quality values stay
//!    stored for audit but do not count.
//! 2. Quality phase: the total is the sum of the quality criteria that
//!    apply to the item's type. Inapplicable criteria contribute nothing.
//!
//! [`Scorecard`] is the explicit criterion-value map a front end reads and
//! writes by field name; totals and status are always derived from it.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::criteria::{CriteriaSet, Criterion};
use crate::error::{ScoringError, ValidationError};
use crate::model::QuestionType;

/// Outcome of a gate criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Pass,
    Fail,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Pass => write!(f, "PASS"),
            Verdict::Fail => write!(f, "FAIL"),
        }
    }
}

impl FromStr for Verdict {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pass" | "p" | "yes" | "y" | "true" | "1" => Ok(Verdict::Pass),
            "fail" | "f" | "no" | "n" | "false" | "0" => Ok(Verdict::Fail),
            other => Err(format!("expected PASS or FAIL, got {other:?}")),
        }
    }
}

/// A stored criterion value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CriterionValue {
    Verdict(Verdict),
    Score(u8),
}

impl CriterionValue {
    pub fn as_score(&self) -> Option<u8> {
        match self {
            CriterionValue::Score(s) => Some(*s),
            CriterionValue::Verdict(_) => None,
        }
    }

    pub fn as_verdict(&self) -> Option<Verdict> {
        match self {
            CriterionValue::Verdict(v) => Some(*v),
            CriterionValue::Score(_) => None,
        }
    }
}

impl fmt::Display for CriterionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CriterionValue::Verdict(v) => write!(f, "{v}"),
            CriterionValue::Score(s) => write!(f, "{s}"),
        }
    }
}

/// Criterion values keyed by criterion key.
pub type CriterionValues = BTreeMap<String, CriterionValue>;

/// Derived state of an item's scorecard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreStatus {
    /// A gate is unset, or a required quality criterion is unset.
    Incomplete,
    /// Gates pass and every applicable quality criterion is set.
    Complete,
    /// A gate failed. Total is 0; deliberately neither complete nor
    /// incomplete.
    GateFailed,
}

impl ScoreStatus {
    /// Text shown next to the total. Gate failures show nothing.
    pub fn message(&self) -> &'static str {
        match self {
            ScoreStatus::Incomplete => "Incomplete",
            ScoreStatus::Complete => "Evaluation complete",
            ScoreStatus::GateFailed => "",
        }
    }
}

impl fmt::Display for ScoreStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreStatus::Incomplete => write!(f, "incomplete"),
            ScoreStatus::Complete => write!(f, "complete"),
            ScoreStatus::GateFailed => write!(f, "gate_failed"),
        }
    }
}

/// Total score as a pure function of the stored values.
pub fn compute_total(
    criteria: &CriteriaSet,
    item_type: Option<QuestionType>,
    values: &CriterionValues,
) -> u32 {
    let gate_failed = criteria.gates.iter().any(|g| {
        values.get(&g.key).and_then(CriterionValue::as_verdict) == Some(Verdict::Fail)
    });
    if gate_failed {
        return 0;
    }
    criteria
        .applicable_quality(item_type)
        .filter_map(|q| values.get(&q.key).and_then(CriterionValue::as_score))
        .map(u32::from)
        .sum()
}

/// Status as a pure function of the stored values.
pub fn derive_status(
    criteria: &CriteriaSet,
    item_type: Option<QuestionType>,
    values: &CriterionValues,
) -> ScoreStatus {
    let verdicts: Vec<Option<Verdict>> = criteria
        .gates
        .iter()
        .map(|g| values.get(&g.key).and_then(CriterionValue::as_verdict))
        .collect();

    if verdicts.contains(&Some(Verdict::Fail)) {
        return ScoreStatus::GateFailed;
    }
    if verdicts.contains(&None) {
        return ScoreStatus::Incomplete;
    }
    let quality_done = criteria
        .applicable_quality(item_type)
        .all(|q| values.get(&q.key).and_then(CriterionValue::as_score).is_some());
    if quality_done {
        ScoreStatus::Complete
    } else {
        ScoreStatus::Incomplete
    }
}

/// Labels of required criteria that are unset, in form order. Grouped
/// criteria are reported once.
pub fn missing_criteria(
    criteria: &CriteriaSet,
    item_type: Option<QuestionType>,
    values: &CriterionValues,
) -> Vec<String> {
    let mut missing: Vec<String> = Vec::new();
    for gate in &criteria.gates {
        if values.get(&gate.key).and_then(CriterionValue::as_verdict).is_none() {
            missing.push(gate.label.clone());
        }
    }
    for q in criteria.applicable_quality(item_type) {
        if values.get(&q.key).and_then(CriterionValue::as_score).is_none() {
            let label = q.missing_label();
            if !missing.iter().any(|m| m == label) {
                missing.push(label.to_string());
            }
        }
    }
    missing
}

/// Working criterion values for one item.
#[derive(Debug, Clone)]
pub struct Scorecard {
    criteria: Arc<CriteriaSet>,
    item_type: Option<QuestionType>,
    values: CriterionValues,
}

impl Scorecard {
    pub fn new(criteria: Arc<CriteriaSet>, item_type: Option<QuestionType>) -> Self {
        Self {
            criteria,
            item_type,
            values: CriterionValues::new(),
        }
    }

    /// Start from previously stored values. Keys unknown to the criteria set
    /// are dropped.
    pub fn with_values(
        criteria: Arc<CriteriaSet>,
        item_type: Option<QuestionType>,
        values: &CriterionValues,
    ) -> Self {
        let mut card = Self::new(criteria, item_type);
        for (key, value) in values {
            if card.set_value(key, *value).is_err() {
                tracing::warn!("ignoring stored value {value} for {key}");
            }
        }
        card
    }

    pub fn criteria(&self) -> &CriteriaSet {
        &self.criteria
    }

    pub fn item_type(&self) -> Option<QuestionType> {
        self.item_type
    }

    pub fn values(&self) -> &CriterionValues {
        &self.values
    }

    pub fn into_values(self) -> CriterionValues {
        self.values
    }

    pub fn get(&self, key: &str) -> Option<CriterionValue> {
        self.values.get(key).copied()
    }

    /// Set a criterion from raw text. An empty string or `-` clears it.
    pub fn set(&mut self, key: &str, raw: &str) -> Result<(), ScoringError> {
        let raw = raw.trim();
        let criterion = self
            .criteria
            .criterion(key)
            .ok_or_else(|| ScoringError::UnknownCriterion(key.to_string()))?;

        if raw.is_empty() || raw == "-" {
            self.values.remove(key);
            return Ok(());
        }

        let value = match criterion {
            Criterion::Gate(_) => raw
                .parse::<Verdict>()
                .map(CriterionValue::Verdict)
                .map_err(|_| ScoringError::InvalidValue {
                    key: key.to_string(),
                    value: raw.to_string(),
                    expected: "PASS or FAIL".into(),
                })?,
            Criterion::Quality(q) => raw
                .parse::<u8>()
                .map(CriterionValue::Score)
                .map_err(|_| ScoringError::InvalidValue {
                    key: key.to_string(),
                    value: raw.to_string(),
                    expected: format!("an integer {}–{}", q.min, q.max),
                })?,
        };
        self.set_value(key, value)
    }

    /// Set a typed value, checking kind and bounds.
    pub fn set_value(&mut self, key: &str, value: CriterionValue) -> Result<(), ScoringError> {
        let criterion = self
            .criteria
            .criterion(key)
            .ok_or_else(|| ScoringError::UnknownCriterion(key.to_string()))?;

        let valid = match (criterion, value) {
            (Criterion::Gate(_), CriterionValue::Verdict(_)) => true,
            (Criterion::Quality(q), CriterionValue::Score(s)) => (q.min..=q.max).contains(&s),
            _ => false,
        };
        if !valid {
            let expected = match criterion {
                Criterion::Gate(_) => "PASS or FAIL".to_string(),
                Criterion::Quality(q) => format!("an integer {}–{}", q.min, q.max),
            };
            return Err(ScoringError::InvalidValue {
                key: key.to_string(),
                value: value.to_string(),
                expected,
            });
        }

        self.values.insert(key.to_string(), value);
        Ok(())
    }

    pub fn clear(&mut self, key: &str) {
        self.values.remove(key);
    }

    /// Quick entry: put `digit` into the first unset criterion in form order.
    ///
    /// For gates `0` means FAIL and `1` PASS. A digit the target criterion
    /// cannot take is ignored. Returns the key that was set.
    pub fn fill_next(&mut self, digit: u8) -> Option<String> {
        let (key, value) = {
            let target = self.criteria.form_order().find(|c| match c {
                Criterion::Gate(g) => !self.values.contains_key(&g.key),
                Criterion::Quality(q) => {
                    q.applies_to.applies_to(self.item_type) && !self.values.contains_key(&q.key)
                }
            })?;
            let value = match target {
                Criterion::Gate(_) => match digit {
                    0 => CriterionValue::Verdict(Verdict::Fail),
                    1 => CriterionValue::Verdict(Verdict::Pass),
                    _ => return None,
                },
                Criterion::Quality(q) if (q.min..=q.max).contains(&digit) => {
                    CriterionValue::Score(digit)
                }
                Criterion::Quality(_) => return None,
            };
            (target.key().to_string(), value)
        };
        self.values.insert(key.clone(), value);
        Some(key)
    }

    pub fn total_score(&self) -> u32 {
        compute_total(&self.criteria, self.item_type, &self.values)
    }

    pub fn max_score(&self) -> u32 {
        self.criteria.max_score
    }

    /// Total as a percentage of the variant's maximum.
    pub fn percentage(&self) -> f64 {
        percentage(self.total_score(), self.criteria.max_score)
    }

    pub fn status(&self) -> ScoreStatus {
        derive_status(&self.criteria, self.item_type, &self.values)
    }

    pub fn missing(&self) -> Vec<String> {
        missing_criteria(&self.criteria, self.item_type, &self.values)
    }

    /// Gate criteria are always required; quality criteria when they apply
    /// to the item's type.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let missing = self.missing();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { missing })
        }
    }
}

pub fn percentage(total: u32, max: u32) -> f64 {
    if max == 0 {
        return 0.0;
    }
    f64::from(total) / f64::from(max) * 100.0
}
