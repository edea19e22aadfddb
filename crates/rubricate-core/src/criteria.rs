//! Declarative criteria-set descriptors.
//!
//! A [`CriteriaSet`] names every criterion of one tool variant: the
//! pass/fail gate criteria, the bounded-integer quality criteria with their
//! per-type applicability, and the maximum total. The scoring engine is
//! driven entirely by this descriptor.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::CriteriaError;
use crate::model::QuestionType;

/// Which items a quality criterion applies to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Applicability {
    #[default]
    All,
    Mcq,
    OpenEnded,
}

impl Applicability {
    /// Type-specific criteria only apply to questions of that type; items
    /// without a type (lists) only get the shared criteria.
    pub fn applies_to(self, item_type: Option<QuestionType>) -> bool {
        match self {
            Applicability::All => true,
            Applicability::Mcq => item_type == Some(QuestionType::Mcq),
            Applicability::OpenEnded => item_type == Some(QuestionType::OpenEnded),
        }
    }
}

/// How evaluation records are laid out in the key/value store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordLayout {
    /// One key holding the whole subject-id → record map.
    #[default]
    Map,
    /// One key per subject id.
    PerItem,
}

/// A pass/fail criterion. Any FAIL zeroes the item's total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateCriterion {
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub description: String,
}

/// A bounded-integer criterion summed into the total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityCriterion {
    pub key: String,
    pub label: String,
    /// Several criteria sharing a group are reported as one missing item.
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub min: u8,
    #[serde(default = "default_max")]
    pub max: u8,
    #[serde(default)]
    pub applies_to: Applicability,
    #[serde(default)]
    pub description: String,
    /// Rubric text per score, indexed from `min`.
    #[serde(default)]
    pub levels: Vec<String>,
}

fn default_max() -> u8 {
    2
}

impl QualityCriterion {
    /// Label used in "missing criteria" messages.
    pub fn missing_label(&self) -> &str {
        self.group.as_deref().unwrap_or(&self.label)
    }
}

/// A criterion looked up by key.
#[derive(Debug, Clone, Copy)]
pub enum Criterion<'a> {
    Gate(&'a GateCriterion),
    Quality(&'a QualityCriterion),
}

impl<'a> Criterion<'a> {
    pub fn key(&self) -> &'a str {
        match self {
            Criterion::Gate(g) => &g.key,
            Criterion::Quality(q) => &q.key,
        }
    }

    pub fn label(&self) -> &'a str {
        match self {
            Criterion::Gate(g) => &g.label,
            Criterion::Quality(q) => &q.label,
        }
    }
}

/// Full rubric of one tool variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriteriaSet {
    /// Variant name; also the storage namespace. Filled in from the table
    /// name when declared under `[variants.<name>]`.
    #[serde(default)]
    pub variant: String,
    pub max_score: u32,
    #[serde(default)]
    pub gates: Vec<GateCriterion>,
    #[serde(default)]
    pub quality: Vec<QualityCriterion>,
    #[serde(default)]
    pub layout: RecordLayout,
    /// Name of the subject-id column in exports.
    #[serde(default = "default_id_column")]
    pub id_column: String,
    /// Name of the free-text field ("reasoning", "summary", ...).
    #[serde(default = "default_notes_label")]
    pub notes_label: String,
}

fn default_id_column() -> String {
    "subject_id".to_string()
}

fn default_notes_label() -> String {
    "reasoning".to_string()
}

impl CriteriaSet {
    /// Look up a built-in variant by name.
    pub fn builtin(name: &str) -> Option<Self> {
        match name {
            "question" => Some(Self::question()),
            "list" => Some(Self::list()),
            _ => None,
        }
    }

    pub fn builtin_names() -> &'static [&'static str] {
        &["question", "list"]
    }

    /// Single-question rubric: two gates, then prompt quality, one
    /// type-specific quality criterion and cognitive demand (max 6).
    pub fn question() -> Self {
        Self {
            variant: "question".into(),
            max_score: 6,
            gates: vec![
                gate(
                    "completeness",
                    "Completeness Check",
                    "All parts of the question (statement, answer, solution) are present and usable.",
                ),
                gate(
                    "factual_correctness",
                    "Factual Correctness Check",
                    "The content, answer and solution are factually correct.",
                ),
            ],
            quality: vec![
                quality(
                    "prompt_quality",
                    "Prompt Quality",
                    Applicability::All,
                    "Is the prompt clear, specific and unambiguous about the expected response?",
                    &[
                        "Vague, ambiguous or missing critical context.",
                        "Generally clear, some ambiguity about depth or scope remains.",
                        "Clear, specific, with well-defined depth and scope.",
                    ],
                ),
                quality(
                    "mcq_quality",
                    "MCQ Quality",
                    Applicability::Mcq,
                    "Are the distractors plausible and is exactly one option correct?",
                    &[
                        "Distractors are implausible or more than one option is defensible.",
                        "Some distractors are weak or give the answer away.",
                        "All distractors are plausible and diagnostic; one unambiguous key.",
                    ],
                ),
                quality(
                    "open_ended_quality",
                    "Open-ended Quality",
                    Applicability::OpenEnded,
                    "Does the question invite a substantive response with a usable model answer?",
                    &[
                        "Answerable in a word or the model answer is unusable.",
                        "Invites a response but the expected answer is loosely defined.",
                        "Invites reasoning and the model answer sets clear expectations.",
                    ],
                ),
                quality(
                    "cognitive_demand",
                    "Cognitive Demand",
                    Applicability::All,
                    "Does the question require thinking appropriate to the grade level?",
                    &[
                        "Pure recall where more is expected, or far off grade level.",
                        "Some reasoning, partly aligned with grade expectations.",
                        "Demand well matched to grade level and learning goal.",
                    ],
                ),
            ],
            layout: RecordLayout::Map,
            id_column: "question_id".into(),
            notes_label: "reasoning".into(),
        }
    }

    /// Whole-list rubric: three 0–1 compliance checks plus seven 0–2
    /// criteria (max 17). No gates.
    pub fn list() -> Self {
        let compliance = |key: &str, label: &str, description: &str| QualityCriterion {
            key: key.into(),
            label: label.into(),
            group: Some("Teacher Input Compliance".into()),
            min: 0,
            max: 1,
            applies_to: Applicability::All,
            description: description.into(),
            levels: vec!["No".into(), "Yes".into()],
        };

        Self {
            variant: "list".into(),
            max_score: 17,
            gates: Vec::new(),
            quality: vec![
                compliance(
                    "teacher_input_compliance_language",
                    "Correct language",
                    "Questions are in the language the teacher specified.",
                ),
                compliance(
                    "teacher_input_compliance_count",
                    "Correct total number of questions",
                    "The number of questions matches the request.",
                ),
                compliance(
                    "teacher_input_compliance_type",
                    "Correct question type distribution",
                    "Question types match the requested MCQ/open-ended mix.",
                ),
                quality(
                    "topic_materials_alignment",
                    "Topic & Materials Alignment",
                    Applicability::All,
                    "Does the list address the requested topic and use any uploaded materials?",
                    &[
                        "Substantially different topic, or materials ignored.",
                        "General topic area but drifts, or materials partly reflected.",
                        "Focused on the topic and incorporates all materials where relevant.",
                    ],
                ),
                quality(
                    "grade_level_difficulty",
                    "Grade-Level & Difficulty Alignment",
                    Applicability::All,
                    "Is the list consistently appropriate for the grade and difficulty?",
                    &[
                        "Multiple questions are off-level.",
                        "Mostly on level with some issues.",
                        "Uniformly appropriate throughout.",
                    ],
                ),
                quality(
                    "uniqueness",
                    "Uniqueness & Diversity",
                    Applicability::All,
                    "Does the list avoid redundancy and vary how skills are assessed?",
                    &[
                        "Clear duplication or near-identical questions.",
                        "No duplication but limited variation.",
                        "Meaningful variation without unintended redundancy.",
                    ],
                ),
                quality(
                    "topic_coverage",
                    "Topic Coverage",
                    Applicability::All,
                    "Does the list cover the content domain within the requested scope?",
                    &[
                        "Major coverage gaps.",
                        "Main area covered with noticeable gaps.",
                        "All major subtopics covered.",
                    ],
                ),
                quality(
                    "cognitive_diversity",
                    "Cognitive Level Diversity",
                    Applicability::All,
                    "Does the list span an appropriate range of thinking levels?",
                    &[
                        "Limited to a single low level.",
                        "Some variation, loosely aligned with purpose.",
                        "Purposeful range aligned with grade and purpose.",
                    ],
                ),
                quality(
                    "difficulty_progression",
                    "Difficulty Progression",
                    Applicability::All,
                    "Is the list ordered without unnecessary difficulty spikes?",
                    &[
                        "No clear progression, abrupt jumps.",
                        "Some progression with occasional jumps.",
                        "Clear, intentional progression.",
                    ],
                ),
                quality(
                    "answer_leakage",
                    "Answer Leakage Prevention",
                    Applicability::All,
                    "Do questions avoid revealing answers to other questions?",
                    &[
                        "Clear answer leakage exists.",
                        "Minor hints across questions.",
                        "Each question can be answered independently.",
                    ],
                ),
            ],
            layout: RecordLayout::PerItem,
            id_column: "list_id".into(),
            notes_label: "summary".into(),
        }
    }

    /// Look up a criterion by key.
    pub fn criterion(&self, key: &str) -> Option<Criterion<'_>> {
        self.gates
            .iter()
            .find(|g| g.key == key)
            .map(Criterion::Gate)
            .or_else(|| {
                self.quality
                    .iter()
                    .find(|q| q.key == key)
                    .map(Criterion::Quality)
            })
    }

    /// All criteria in form order: gates first, then quality criteria.
    pub fn form_order(&self) -> impl Iterator<Item = Criterion<'_>> {
        self.gates
            .iter()
            .map(Criterion::Gate)
            .chain(self.quality.iter().map(Criterion::Quality))
    }

    /// Quality criteria that count for an item of the given type.
    pub fn applicable_quality(
        &self,
        item_type: Option<QuestionType>,
    ) -> impl Iterator<Item = &QualityCriterion> {
        self.quality
            .iter()
            .filter(move |q| q.applies_to.applies_to(item_type))
    }

    /// Highest total reachable for an item of the given type.
    pub fn achievable_max(&self, item_type: Option<QuestionType>) -> u32 {
        self.applicable_quality(item_type)
            .map(|q| u32::from(q.max))
            .sum()
    }

    /// Check keys are unique and non-empty, bounds are sane and the
    /// configured maximum covers every item type.
    pub fn validate(&self) -> Result<(), CriteriaError> {
        let mut seen = HashSet::new();
        for criterion in self.form_order() {
            let key = criterion.key();
            if key.trim().is_empty() {
                return Err(CriteriaError::EmptyKey(self.variant.clone()));
            }
            if !seen.insert(key) {
                return Err(CriteriaError::DuplicateKey(key.to_string()));
            }
        }
        for q in &self.quality {
            if q.min > q.max {
                return Err(CriteriaError::InvalidBounds {
                    key: q.key.clone(),
                    min: q.min,
                    max: q.max,
                });
            }
        }
        let achievable = [
            Some(QuestionType::Mcq),
            Some(QuestionType::OpenEnded),
            None,
        ]
        .into_iter()
        .map(|t| self.achievable_max(t))
        .max()
        .unwrap_or(0);
        if self.max_score < achievable {
            return Err(CriteriaError::MaxScoreTooLow {
                configured: self.max_score,
                achievable,
            });
        }
        Ok(())
    }
}

fn gate(key: &str, label: &str, description: &str) -> GateCriterion {
    GateCriterion {
        key: key.into(),
        label: label.into(),
        description: description.into(),
    }
}

fn quality(
    key: &str,
    label: &str,
    applies_to: Applicability,
    description: &str,
    levels: &[&str],
) -> QualityCriterion {
    QualityCriterion {
        key: key.into(),
        label: label.into(),
        group: None,
        min: 0,
        max: 2,
        applies_to,
        description: description.into(),
        levels: levels.iter().map(|l| l.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_are_valid() {
        for name in CriteriaSet::builtin_names() {
            let set = CriteriaSet::builtin(name).unwrap();
            set.validate().unwrap();
            assert_eq!(set.variant, *name);
        }
        assert!(CriteriaSet::builtin("essay").is_none());
    }

    #[test]
    fn question_variant_shape() {
        let set = CriteriaSet::question();
        assert_eq!(set.max_score, 6);
        assert_eq!(set.achievable_max(Some(QuestionType::Mcq)), 6);
        assert_eq!(set.achievable_max(Some(QuestionType::OpenEnded)), 6);
        let mcq: Vec<_> = set
            .applicable_quality(Some(QuestionType::Mcq))
            .map(|q| q.key.as_str())
            .collect();
        assert_eq!(mcq, vec!["prompt_quality", "mcq_quality", "cognitive_demand"]);
    }

    #[test]
    fn list_variant_shape() {
        let set = CriteriaSet::list();
        assert_eq!(set.max_score, 17);
        assert_eq!(set.achievable_max(None), 17);
        assert!(set.gates.is_empty());
        assert_eq!(set.layout, RecordLayout::PerItem);
    }

    #[test]
    fn lookup_and_form_order() {
        let set = CriteriaSet::question();
        assert!(matches!(
            set.criterion("completeness"),
            Some(Criterion::Gate(_))
        ));
        assert!(matches!(
            set.criterion("cognitive_demand"),
            Some(Criterion::Quality(_))
        ));
        assert!(set.criterion("nope").is_none());
        let order: Vec<_> = set.form_order().map(|c| c.key().to_string()).collect();
        assert_eq!(order[0], "completeness");
        assert_eq!(order.last().unwrap(), "cognitive_demand");
    }

    #[test]
    fn validation_failures() {
        let mut set = CriteriaSet::question();
        set.quality[0].key = "completeness".into();
        assert_eq!(
            set.validate(),
            Err(CriteriaError::DuplicateKey("completeness".into()))
        );

        let mut set = CriteriaSet::question();
        set.max_score = 5;
        assert!(matches!(
            set.validate(),
            Err(CriteriaError::MaxScoreTooLow { achievable: 6, .. })
        ));

        let mut set = CriteriaSet::list();
        set.quality[0].min = 3;
        assert!(matches!(
            set.validate(),
            Err(CriteriaError::InvalidBounds { .. })
        ));
    }

    #[test]
    fn custom_variant_from_toml() {
        let toml_str = r#"
variant = "short"
max_score = 4
layout = "per_item"

[[gates]]
key = "accuracy"
label = "Accuracy"

[[quality]]
key = "clarity"
label = "Clarity"

[[quality]]
key = "distractors"
label = "Distractors"
applies_to = "mcq"
"#;
        let set: CriteriaSet = toml::from_str(toml_str).unwrap();
        set.validate().unwrap();
        assert_eq!(set.id_column, "subject_id");
        assert_eq!(set.quality[1].applies_to, Applicability::Mcq);
        assert_eq!(set.quality[0].max, 2);
    }
}
