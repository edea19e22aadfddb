//! Evaluation records: one reviewer judgment on one item.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::criteria::CriteriaSet;
use crate::model::{EvalItem, QuestionType};
use crate::scoring::{self, CriterionValues, Scorecard};

/// A saved judgment. `total_score` is derived from `values` and kept
/// alongside them so exports need no recomputation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub subject_id: String,
    #[serde(default)]
    pub evaluator_name: Option<String>,
    /// Question type of the subject; `None` for lists.
    #[serde(default)]
    pub item_type: Option<QuestionType>,
    #[serde(default)]
    pub values: CriterionValues,
    pub total_score: u32,
    pub max_possible_score: u32,
    /// Free-text reasoning (questions) or summary (lists).
    #[serde(default)]
    pub reasoning: Option<String>,
    #[serde(default)]
    pub discipline: String,
    #[serde(default)]
    pub locale: String,
    #[serde(default)]
    pub grade: String,
    #[serde(default)]
    pub difficulty: String,
    pub evaluated_at: DateTime<Utc>,
}

impl EvaluationRecord {
    /// Build a record from a validated scorecard.
    pub fn new(
        item: &EvalItem,
        card: &Scorecard,
        evaluator_name: Option<String>,
        reasoning: Option<String>,
    ) -> Self {
        let reasoning = reasoning
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());
        Self {
            subject_id: item.id().to_string(),
            evaluator_name: evaluator_name.filter(|n| !n.trim().is_empty()),
            item_type: item.question_type(),
            values: card.values().clone(),
            total_score: card.total_score(),
            max_possible_score: card.max_score(),
            reasoning,
            discipline: item.discipline().to_string(),
            locale: item.locale().to_string(),
            grade: item.grade().to_string(),
            difficulty: item.difficulty().to_string(),
            evaluated_at: Utc::now(),
        }
    }

    pub fn percentage(&self) -> f64 {
        scoring::percentage(self.total_score, self.max_possible_score)
    }

    pub fn recomputed_total(&self, criteria: &CriteriaSet) -> u32 {
        scoring::compute_total(criteria, self.item_type, &self.values)
    }

    pub fn is_consistent(&self, criteria: &CriteriaSet) -> bool {
        self.total_score == self.recomputed_total(criteria)
    }

    /// Recompute the stored total. Returns `true` when it changed.
    pub fn repair(&mut self, criteria: &CriteriaSet) -> bool {
        let total = self.recomputed_total(criteria);
        if total == self.total_score && self.max_possible_score == criteria.max_score {
            return false;
        }
        self.total_score = total;
        self.max_possible_score = criteria.max_score;
        true
    }
}

/// Numeric-then-lexicographic ordering: runs of digits compare by value,
/// everything else by text. `q_2` sorts before `q_10`.
pub fn compare_subject_ids(a: &str, b: &str) -> Ordering {
    let mut left = Chunks::new(a);
    let mut right = Chunks::new(b);
    loop {
        match (left.next(), right.next()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                let ord = match (x, y) {
                    (Chunk::Number(m), Chunk::Number(n)) => {
                        let (m, n) = (m.trim_start_matches('0'), n.trim_start_matches('0'));
                        m.len().cmp(&n.len()).then_with(|| m.cmp(n))
                    }
                    (Chunk::Number(_), Chunk::Text(_)) => Ordering::Less,
                    (Chunk::Text(_), Chunk::Number(_)) => Ordering::Greater,
                    (Chunk::Text(s), Chunk::Text(t)) => s.cmp(t),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

enum Chunk<'a> {
    Number(&'a str),
    Text(&'a str),
}

struct Chunks<'a> {
    rest: &'a str,
}

impl<'a> Chunks<'a> {
    fn new(s: &'a str) -> Self {
        Self { rest: s }
    }
}

impl<'a> Iterator for Chunks<'a> {
    type Item = Chunk<'a>;

    fn next(&mut self) -> Option<Chunk<'a>> {
        let first = self.rest.chars().next()?;
        let digit = first.is_ascii_digit();
        let end = self
            .rest
            .find(|c: char| c.is_ascii_digit() != digit)
            .unwrap_or(self.rest.len());
        let (head, tail) = self.rest.split_at(end);
        self.rest = tail;
        Some(if digit {
            Chunk::Number(head)
        } else {
            Chunk::Text(head)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Question, ALTERNATIVE_SLOTS};
    use crate::scoring::CriterionValue;
    use std::sync::Arc;

    fn question() -> EvalItem {
        EvalItem::Question(Question {
            id: "q_3".into(),
            statement: "What is 2 + 2?".into(),
            solution: "4".into(),
            discipline: "Mathematics".into(),
            discipline_original: "Matemática".into(),
            category: "Arithmetic".into(),
            grade: "20".into(),
            difficulty: "150".into(),
            question_type: QuestionType::Mcq,
            locale: "pt_BR".into(),
            language: None,
            correct_answer: "4".into(),
            incorrect_alternatives: std::array::from_fn::<_, ALTERNATIVE_SLOTS, _>(|i| {
                (i + 1).to_string()
            }),
        })
    }

    fn scored_card(item: &EvalItem) -> Scorecard {
        let mut card = Scorecard::new(Arc::new(CriteriaSet::question()), item.question_type());
        for (k, v) in [
            ("completeness", "PASS"),
            ("factual_correctness", "PASS"),
            ("prompt_quality", "2"),
            ("mcq_quality", "1"),
            ("cognitive_demand", "2"),
        ] {
            card.set(k, v).unwrap();
        }
        card
    }

    #[test]
    fn record_copies_item_metadata() {
        let item = question();
        let record = EvaluationRecord::new(
            &item,
            &scored_card(&item),
            Some("Ana".into()),
            Some("  fine  ".into()),
        );
        assert_eq!(record.subject_id, "q_3");
        assert_eq!(record.total_score, 5);
        assert_eq!(record.max_possible_score, 6);
        assert_eq!(record.reasoning.as_deref(), Some("fine"));
        assert_eq!(record.discipline, "Mathematics");
        assert_eq!(record.item_type, Some(QuestionType::Mcq));
        assert!(record.is_consistent(&CriteriaSet::question()));
    }

    #[test]
    fn blank_reasoning_and_evaluator_are_dropped() {
        let item = question();
        let record =
            EvaluationRecord::new(&item, &scored_card(&item), Some(" ".into()), Some("".into()));
        assert_eq!(record.evaluator_name, None);
        assert_eq!(record.reasoning, None);
    }

    #[test]
    fn repair_fixes_tampered_total() {
        let item = question();
        let criteria = CriteriaSet::question();
        let mut record = EvaluationRecord::new(&item, &scored_card(&item), None, None);
        record
            .values
            .insert("completeness".into(), CriterionValue::Verdict(crate::scoring::Verdict::Fail));
        assert!(!record.is_consistent(&criteria));
        assert!(record.repair(&criteria));
        assert_eq!(record.total_score, 0);
        assert!(!record.repair(&criteria));
    }

    #[test]
    fn record_json_roundtrip() {
        let item = question();
        let record = EvaluationRecord::new(&item, &scored_card(&item), None, None);
        let json = serde_json::to_string(&record).unwrap();
        let back: EvaluationRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn natural_id_ordering() {
        let mut ids = vec!["q_10", "q_2", "q_1", "list_b", "list_a", "q_02x", "7", "10"];
        ids.sort_by(|a, b| compare_subject_ids(a, b));
        assert_eq!(
            ids,
            vec!["7", "10", "list_a", "list_b", "q_1", "q_2", "q_02x", "q_10"]
        );
    }
}
