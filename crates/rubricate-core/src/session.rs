//! Evaluation session: the single owner of "where am I" and "what have I
//! scored".
//!
//! Every mutation is written through to a [`KeyValueStore`] under a
//! namespace named after the criteria variant. Storage failures never
//! abort an action; they are logged and the session is flagged as not
//! durable for that action.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::criteria::{CriteriaSet, RecordLayout};
use crate::error::{SessionError, StoreError};
use crate::model::{Dataset, EvalItem};
use crate::record::EvaluationRecord;
use crate::scoring::Scorecard;
use crate::selection::{select, LocaleFilter, SubjectFilter};
use crate::traits::KeyValueStore;

/// Persisted reviewer position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    pub subject: SubjectFilter,
    pub locale: LocaleFilter,
    pub current_index: usize,
    #[serde(default)]
    pub evaluator: Option<String>,
}

/// Storage keys of one namespace.
#[derive(Debug, Clone)]
pub struct StoreKeys {
    namespace: String,
}

impl StoreKeys {
    pub fn new(namespace: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
        }
    }

    pub fn prefix(&self) -> String {
        format!("{}.", self.namespace)
    }

    pub fn evaluations(&self) -> String {
        format!("{}.evaluations", self.namespace)
    }

    pub fn evaluation_prefix(&self) -> String {
        format!("{}.evaluation.", self.namespace)
    }

    pub fn evaluation(&self, subject_id: &str) -> String {
        format!("{}{subject_id}", self.evaluation_prefix())
    }

    pub fn selection(&self) -> String {
        format!("{}.selection", self.namespace)
    }

    pub fn evaluator(&self) -> String {
        format!("{}.evaluator", self.namespace)
    }
}

/// Result of a successful save.
#[derive(Debug, Clone)]
pub struct SaveOutcome {
    pub record: EvaluationRecord,
    /// Whether the session moved on to the next item.
    pub advanced: bool,
}

/// Items with a record out of the active items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub evaluated: usize,
    pub total: usize,
}

impl Progress {
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.evaluated as f64 / self.total as f64 * 100.0
        }
    }
}

/// A reviewer session over one dataset and one criteria variant.
pub struct Session<S: KeyValueStore> {
    store: S,
    criteria: Arc<CriteriaSet>,
    keys: StoreKeys,
    selection: Option<SelectionState>,
    active: Vec<EvalItem>,
    records: BTreeMap<String, EvaluationRecord>,
    durable: bool,
}

impl<S: KeyValueStore> Session<S> {
    /// Rehydrate records and selection from `store`.
    ///
    /// Absent, malformed or no-longer-matching state falls back to the
    /// selection step; nothing here fails.
    pub fn open(store: S, criteria: Arc<CriteriaSet>, dataset: &Dataset) -> Self {
        let keys = StoreKeys::new(&criteria.variant);
        let records = match load_records(&store, &criteria) {
            Ok(records) => records,
            Err(e) => {
                warn!("could not restore evaluations, starting empty: {e}");
                BTreeMap::new()
            }
        };

        let mut session = Self {
            store,
            criteria,
            keys,
            selection: None,
            active: Vec::new(),
            records,
            durable: true,
        };
        session.restore_selection(dataset);
        session
    }

    fn restore_selection(&mut self, dataset: &Dataset) {
        let raw = match self.store.get(&self.keys.selection()) {
            Ok(Some(raw)) => raw,
            Ok(None) => return,
            Err(e) => {
                warn!("could not read saved selection: {e}");
                return;
            }
        };
        let mut state: SelectionState = match serde_json::from_str(&raw) {
            Ok(state) => state,
            Err(e) => {
                warn!("ignoring malformed saved selection: {e}");
                return;
            }
        };
        let active = select(&dataset.items, &state.subject, &state.locale);
        if active.is_empty() {
            warn!(
                subject = %state.subject,
                locale = %state.locale,
                "saved selection matches no items, returning to selection"
            );
            return;
        }
        if state.current_index >= active.len() {
            warn!(
                index = state.current_index,
                len = active.len(),
                "saved position out of range, resetting to first item"
            );
            state.current_index = 0;
        }
        debug!(
            subject = %state.subject,
            locale = %state.locale,
            index = state.current_index,
            "restored selection"
        );
        self.active = active;
        self.selection = Some(state);
    }

    pub fn criteria(&self) -> &CriteriaSet {
        &self.criteria
    }

    pub fn criteria_arc(&self) -> Arc<CriteriaSet> {
        Arc::clone(&self.criteria)
    }

    /// Whether every write of the last action reached durable storage.
    pub fn is_durable(&self) -> bool {
        self.durable
    }

    pub fn selection(&self) -> Option<&SelectionState> {
        self.selection.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.selection.is_some()
    }

    /// The active (filtered) items.
    pub fn items(&self) -> &[EvalItem] {
        &self.active
    }

    pub fn current_index(&self) -> Option<usize> {
        self.selection.as_ref().map(|s| s.current_index)
    }

    pub fn current(&self) -> Option<&EvalItem> {
        let index = self.current_index()?;
        self.active.get(index)
    }

    pub fn records(&self) -> &BTreeMap<String, EvaluationRecord> {
        &self.records
    }

    pub fn record(&self, subject_id: &str) -> Option<&EvaluationRecord> {
        self.records.get(subject_id)
    }

    /// Evaluator name remembered from an earlier session, if any.
    pub fn remembered_evaluator(&self) -> Option<String> {
        match self.store.get(&self.keys.evaluator()) {
            Ok(name) => name.filter(|n| !n.trim().is_empty()),
            Err(e) => {
                warn!("could not read remembered evaluator: {e}");
                None
            }
        }
    }

    /// Leave the selection step. Returns the number of active items.
    pub fn start(
        &mut self,
        dataset: &Dataset,
        subject: SubjectFilter,
        locale: LocaleFilter,
        evaluator: Option<String>,
    ) -> Result<usize, SessionError> {
        self.durable = true;
        let active = select(&dataset.items, &subject, &locale);
        if active.is_empty() {
            return Err(SessionError::EmptySelection {
                subject: subject.to_string(),
                locale: locale.to_string(),
            });
        }

        let evaluator = evaluator
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .or_else(|| self.remembered_evaluator());
        if let Some(name) = &evaluator {
            let result = self.store.set(&self.keys.evaluator(), name);
            self.note_write(result, "evaluator");
        }

        info!(
            subject = %subject,
            locale = %locale,
            items = active.len(),
            "starting evaluation"
        );
        let count = active.len();
        self.active = active;
        self.selection = Some(SelectionState {
            subject,
            locale,
            current_index: 0,
            evaluator,
        });
        self.persist_selection();
        Ok(count)
    }

    /// Return to the selection step. Records are kept.
    pub fn back_to_selection(&mut self) {
        self.durable = true;
        self.selection = None;
        self.active.clear();
        let result = self.store.remove(&self.keys.selection());
        self.note_write(result, "selection");
    }

    /// Move by `delta`. Moving outside the active items does nothing and
    /// returns `false`.
    pub fn navigate(&mut self, delta: isize) -> Result<bool, SessionError> {
        self.durable = true;
        self.move_by(delta)
    }

    fn move_by(&mut self, delta: isize) -> Result<bool, SessionError> {
        let len = self.active.len();
        let state = self
            .selection
            .as_mut()
            .ok_or(SessionError::NoActiveSelection)?;
        let target = state
            .current_index
            .checked_add_signed(delta)
            .filter(|&t| t < len);
        let Some(target) = target else {
            debug!(index = state.current_index, delta, "navigation out of bounds");
            return Ok(false);
        };
        if target == state.current_index {
            return Ok(false);
        }
        state.current_index = target;
        debug!(index = target, "navigated");
        self.persist_selection();
        Ok(true)
    }

    pub fn next(&mut self) -> Result<bool, SessionError> {
        self.navigate(1)
    }

    pub fn prev(&mut self) -> Result<bool, SessionError> {
        self.navigate(-1)
    }

    /// Jump to a 1-based position.
    pub fn jump_to(&mut self, position: usize) -> Result<(), SessionError> {
        self.durable = true;
        let len = self.active.len();
        let state = self
            .selection
            .as_mut()
            .ok_or(SessionError::NoActiveSelection)?;
        if position == 0 || position > len {
            return Err(SessionError::OutOfRange { position, len });
        }
        state.current_index = position - 1;
        debug!(index = state.current_index, "jumped");
        self.persist_selection();
        Ok(())
    }

    /// Scorecard for the current item, prefilled from its saved record.
    pub fn scorecard(&self) -> Result<Scorecard, SessionError> {
        let item = self.current().ok_or(SessionError::NoActiveSelection)?;
        Ok(match self.records.get(item.id()) {
            Some(record) => {
                Scorecard::with_values(self.criteria_arc(), item.question_type(), &record.values)
            }
            None => Scorecard::new(self.criteria_arc(), item.question_type()),
        })
    }

    /// Validate and store the current item's judgment, then move to the
    /// next item unless this was the last one. A validation failure leaves
    /// the session untouched.
    pub fn save(
        &mut self,
        card: &Scorecard,
        reasoning: Option<String>,
    ) -> Result<SaveOutcome, SessionError> {
        let item = self.current().ok_or(SessionError::NoActiveSelection)?;
        // rebuild against this session's criteria and the item's own type
        let card = Scorecard::with_values(self.criteria_arc(), item.question_type(), card.values());
        card.validate()?;

        let evaluator = self.selection.as_ref().and_then(|s| s.evaluator.clone());
        let record = EvaluationRecord::new(item, &card, evaluator, reasoning);
        self.durable = true;
        info!(
            subject_id = %record.subject_id,
            total = record.total_score,
            max = record.max_possible_score,
            "saved evaluation"
        );
        self.records
            .insert(record.subject_id.clone(), record.clone());
        self.persist_record(&record);

        let advanced = self.move_by(1)?;
        if !advanced {
            self.persist_selection();
        }
        Ok(SaveOutcome { record, advanced })
    }

    /// Evaluated items among the active ones.
    pub fn progress(&self) -> Progress {
        let evaluated = self
            .active
            .iter()
            .filter(|item| self.records.contains_key(item.id()))
            .count();
        Progress {
            evaluated,
            total: self.active.len(),
        }
    }

    /// Forget everything stored under this variant's namespace.
    pub fn reset(&mut self) {
        self.durable = true;
        self.records.clear();
        self.selection = None;
        self.active.clear();
        let result = clear_namespace(&mut self.store, &self.criteria.variant).map(|removed| {
            info!(removed, "cleared stored session");
        });
        self.note_write(result, "reset");
    }

    pub fn into_store(self) -> S {
        self.store
    }

    fn persist_selection(&mut self) {
        let result = match &self.selection {
            Some(state) => serde_json::to_string(state)
                .map_err(StoreError::from)
                .and_then(|json| self.store.set(&self.keys.selection(), &json)),
            None => self.store.remove(&self.keys.selection()),
        };
        self.note_write(result, "selection");
    }

    fn persist_record(&mut self, record: &EvaluationRecord) {
        let result = match self.criteria.layout {
            RecordLayout::Map => serde_json::to_string(&self.records)
                .map_err(StoreError::from)
                .and_then(|json| self.store.set(&self.keys.evaluations(), &json)),
            RecordLayout::PerItem => serde_json::to_string(record)
                .map_err(StoreError::from)
                .and_then(|json| {
                    self.store
                        .set(&self.keys.evaluation(&record.subject_id), &json)
                }),
        };
        self.note_write(result, "evaluation");
    }

    fn note_write(&mut self, result: Result<(), StoreError>, what: &str) {
        if let Err(e) = result {
            warn!("{what} not saved to durable storage: {e}");
            self.durable = false;
        }
    }
}

/// Every record stored under the criteria's namespace, in either layout.
/// Stored totals that disagree with the values are recomputed.
pub fn load_records<S: KeyValueStore + ?Sized>(
    store: &S,
    criteria: &CriteriaSet,
) -> Result<BTreeMap<String, EvaluationRecord>, StoreError> {
    let keys = StoreKeys::new(&criteria.variant);
    let mut records: BTreeMap<String, EvaluationRecord> = match store.get(&keys.evaluations())? {
        Some(raw) => serde_json::from_str(&raw)
            .map_err(|e| StoreError::Corrupt(format!("{}: {e}", keys.evaluations())))?,
        None => BTreeMap::new(),
    };

    let per_item = keys.evaluation_prefix();
    for key in store.keys()? {
        if !key.starts_with(&per_item) {
            continue;
        }
        let Some(raw) = store.get(&key)? else {
            continue;
        };
        match serde_json::from_str::<EvaluationRecord>(&raw) {
            Ok(record) => {
                records.insert(record.subject_id.clone(), record);
            }
            Err(e) => warn!("skipping malformed record {key}: {e}"),
        }
    }

    for record in records.values_mut() {
        if record.repair(criteria) {
            warn!(
                subject_id = %record.subject_id,
                total = record.total_score,
                "stored total disagreed with criterion values, recomputed"
            );
        }
    }
    Ok(records)
}

/// Remove every key of a namespace. Returns how many were removed.
pub fn clear_namespace<S: KeyValueStore + ?Sized>(
    store: &mut S,
    namespace: &str,
) -> Result<usize, StoreError> {
    let prefix = StoreKeys::new(namespace).prefix();
    let doomed: Vec<String> = store
        .keys()?
        .into_iter()
        .filter(|k| k.starts_with(&prefix))
        .collect();
    for key in &doomed {
        store.remove(key)?;
    }
    Ok(doomed.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DatasetShape, Question, QuestionList, QuestionType, RequestContext};
    use crate::store::{FileStore, MemoryStore};

    fn question(id: &str, discipline: &str, locale: &str, kind: QuestionType) -> EvalItem {
        EvalItem::Question(Question {
            id: id.into(),
            statement: format!("Statement {id}"),
            solution: String::new(),
            discipline: discipline.into(),
            discipline_original: discipline.into(),
            category: String::new(),
            grade: "70".into(),
            difficulty: "200".into(),
            question_type: kind,
            locale: locale.into(),
            language: None,
            correct_answer: "a".into(),
            incorrect_alternatives: Default::default(),
        })
    }

    fn dataset() -> Dataset {
        Dataset {
            shape: DatasetShape::NestedRecords,
            items: vec![
                question("q_1", "Mathematics", "en_US", QuestionType::Mcq),
                question("q_2", "Mathematics", "en_US", QuestionType::OpenEnded),
                question("q_3", "Physics", "en_US", QuestionType::Mcq),
                question("q_4", "Mathematics", "pt_BR", QuestionType::Mcq),
            ],
        }
    }

    fn math() -> SubjectFilter {
        SubjectFilter::Exact("Mathematics".into())
    }

    fn open(store: MemoryStore) -> Session<MemoryStore> {
        Session::open(store, Arc::new(CriteriaSet::question()), &dataset())
    }

    fn complete_card(session: &Session<MemoryStore>) -> Scorecard {
        let mut card = session.scorecard().unwrap();
        card.set("completeness", "PASS").unwrap();
        card.set("factual_correctness", "PASS").unwrap();
        card.set("prompt_quality", "2").unwrap();
        card.set("mcq_quality", "1").unwrap();
        card.set("open_ended_quality", "1").unwrap();
        card.set("cognitive_demand", "2").unwrap();
        card
    }

    #[test]
    fn fresh_session_is_on_selection_step() {
        let session = open(MemoryStore::new());
        assert!(!session.is_active());
        assert!(session.current().is_none());
        assert!(matches!(
            session.scorecard(),
            Err(SessionError::NoActiveSelection)
        ));
    }

    #[test]
    fn empty_selection_is_an_error() {
        let mut session = open(MemoryStore::new());
        let err = session
            .start(
                &dataset(),
                SubjectFilter::Exact("Chemistry".into()),
                LocaleFilter::Both,
                None,
            )
            .unwrap_err();
        assert_eq!(err.to_string(), "No items found for Chemistry in BOTH.");
        assert!(!session.is_active());
    }

    #[test]
    fn navigation_bounds_are_noops() {
        let mut session = open(MemoryStore::new());
        let n = session
            .start(&dataset(), math(), LocaleFilter::Both, None)
            .unwrap();
        assert_eq!(n, 3);
        assert!(!session.prev().unwrap());
        assert_eq!(session.current_index(), Some(0));
        assert!(session.next().unwrap());
        assert!(session.next().unwrap());
        assert!(!session.next().unwrap());
        assert_eq!(session.current_index(), Some(2));
        assert_eq!(session.current().unwrap().id(), "q_4");
    }

    #[test]
    fn jump_validates_position() {
        let mut session = open(MemoryStore::new());
        session
            .start(&dataset(), math(), LocaleFilter::Both, None)
            .unwrap();
        session.jump_to(3).unwrap();
        assert_eq!(session.current_index(), Some(2));
        assert!(matches!(
            session.jump_to(4),
            Err(SessionError::OutOfRange { position: 4, len: 3 })
        ));
        assert!(session.jump_to(0).is_err());
        assert_eq!(session.current_index(), Some(2));
    }

    #[test]
    fn invalid_save_changes_nothing() {
        let mut session = open(MemoryStore::new());
        session
            .start(&dataset(), math(), LocaleFilter::Both, None)
            .unwrap();
        let mut card = session.scorecard().unwrap();
        card.set("completeness", "PASS").unwrap();
        let err = session.save(&card, None).unwrap_err();
        assert!(matches!(err, SessionError::Validation(_)));
        assert!(session.records().is_empty());
        assert_eq!(session.current_index(), Some(0));
    }

    #[test]
    fn save_records_and_advances() {
        let mut session = open(MemoryStore::new());
        session
            .start(&dataset(), math(), LocaleFilter::Both, Some("Ana".into()))
            .unwrap();
        let card = complete_card(&session);
        let outcome = session.save(&card, Some("clear".into())).unwrap();
        assert!(outcome.advanced);
        assert_eq!(outcome.record.subject_id, "q_1");
        assert_eq!(outcome.record.total_score, 5);
        assert_eq!(outcome.record.evaluator_name.as_deref(), Some("Ana"));
        assert_eq!(session.current_index(), Some(1));

        // open-ended item: mcq_quality excluded, open_ended_quality counted
        let outcome = session.save(&complete_card(&session), None).unwrap();
        assert_eq!(outcome.record.total_score, 5);
        assert_eq!(
            session.progress(),
            Progress {
                evaluated: 2,
                total: 3
            }
        );
    }

    #[test]
    fn save_on_last_item_stays() {
        let mut session = open(MemoryStore::new());
        session
            .start(&dataset(), math(), LocaleFilter::Both, None)
            .unwrap();
        session.jump_to(3).unwrap();
        let outcome = session.save(&complete_card(&session), None).unwrap();
        assert!(!outcome.advanced);
        assert_eq!(session.current_index(), Some(2));
    }

    #[test]
    fn gate_failure_persists_quality_values() {
        let mut session = open(MemoryStore::new());
        session
            .start(&dataset(), math(), LocaleFilter::Both, None)
            .unwrap();
        let mut card = complete_card(&session);
        card.set("completeness", "FAIL").unwrap();
        let outcome = session.save(&card, None).unwrap();
        assert_eq!(outcome.record.total_score, 0);
        assert_eq!(outcome.record.values.len(), 6);

        let store = session.into_store();
        let records = load_records(&store, &CriteriaSet::question()).unwrap();
        assert_eq!(records["q_1"].total_score, 0);
        assert!(records["q_1"].values.contains_key("prompt_quality"));
    }

    #[test]
    fn rehydration_roundtrip() {
        let mut session = open(MemoryStore::new());
        session
            .start(&dataset(), math(), LocaleFilter::Both, Some("Ana".into()))
            .unwrap();
        session.save(&complete_card(&session), None).unwrap();
        session.next().unwrap();
        let index = session.current_index();
        let records = session.records().clone();

        let restored = open(session.into_store());
        assert!(restored.is_active());
        assert_eq!(restored.current_index(), index);
        assert_eq!(restored.records(), &records);
        assert_eq!(
            restored.selection().unwrap().evaluator.as_deref(),
            Some("Ana")
        );
    }

    #[test]
    fn scorecard_prefills_from_record() {
        let mut session = open(MemoryStore::new());
        session
            .start(&dataset(), math(), LocaleFilter::Both, None)
            .unwrap();
        session.save(&complete_card(&session), None).unwrap();
        session.prev().unwrap();
        let card = session.scorecard().unwrap();
        assert_eq!(card.total_score(), 5);
        assert_eq!(card.status(), crate::scoring::ScoreStatus::Complete);
    }

    #[test]
    fn per_item_layout_roundtrip() {
        let list = EvalItem::List(QuestionList {
            id: "list_a".into(),
            context: RequestContext {
                discipline: "Mathematics".into(),
                locale: "en_US".into(),
                ..RequestContext::default()
            },
            questions: vec![],
        });
        let data = Dataset {
            shape: DatasetShape::GroupedLists,
            items: vec![list],
        };
        let criteria = Arc::new(CriteriaSet::list());
        let mut session = Session::open(MemoryStore::new(), Arc::clone(&criteria), &data);
        session
            .start(&data, SubjectFilter::All, LocaleFilter::Both, None)
            .unwrap();
        let mut card = session.scorecard().unwrap();
        while card.fill_next(1).is_some() {}
        let outcome = session.save(&card, Some("solid list".into())).unwrap();
        assert_eq!(outcome.record.total_score, 10);

        let store = session.into_store();
        assert!(store.get("list.evaluation.list_a").unwrap().is_some());
        assert!(store.get("list.evaluations").unwrap().is_none());
        let restored = Session::open(store, criteria, &data);
        assert_eq!(restored.records()["list_a"].reasoning.as_deref(), Some("solid list"));
    }

    #[test]
    fn malformed_state_falls_back() {
        let mut store = MemoryStore::new();
        store.set("question.selection", "{not json").unwrap();
        store.set("question.evaluations", "[]").unwrap();
        let session = open(store);
        assert!(!session.is_active());
        assert!(session.records().is_empty());
    }

    #[test]
    fn stale_selection_falls_back() {
        let mut store = MemoryStore::new();
        let state = SelectionState {
            subject: SubjectFilter::Exact("History".into()),
            locale: LocaleFilter::Both,
            current_index: 0,
            evaluator: None,
        };
        store
            .set("question.selection", &serde_json::to_string(&state).unwrap())
            .unwrap();
        assert!(!open(store).is_active());
    }

    #[test]
    fn out_of_range_index_resets() {
        let mut store = MemoryStore::new();
        let state = SelectionState {
            subject: math(),
            locale: LocaleFilter::Both,
            current_index: 99,
            evaluator: None,
        };
        store
            .set("question.selection", &serde_json::to_string(&state).unwrap())
            .unwrap();
        assert_eq!(open(store).current_index(), Some(0));
    }

    #[test]
    fn storage_failure_is_not_fatal() {
        let mut session = open(MemoryStore::disabled());
        session
            .start(&dataset(), math(), LocaleFilter::Both, None)
            .unwrap();
        assert!(!session.is_durable());
        let outcome = session.save(&complete_card(&session), None).unwrap();
        assert_eq!(outcome.record.total_score, 5);
        assert_eq!(session.records().len(), 1);
    }

    #[test]
    fn quota_exceeded_marks_non_durable() {
        let mut session = open(MemoryStore::new().with_quota(200));
        session
            .start(&dataset(), math(), LocaleFilter::Both, None)
            .unwrap();
        assert!(session.is_durable());
        session.save(&complete_card(&session), None).unwrap();
        assert!(!session.is_durable());
    }

    #[test]
    fn back_keeps_records_reset_clears_them() {
        let mut session = open(MemoryStore::new());
        session
            .start(&dataset(), math(), LocaleFilter::Both, Some("Ana".into()))
            .unwrap();
        session.save(&complete_card(&session), None).unwrap();
        session.back_to_selection();
        assert!(!session.is_active());
        assert_eq!(session.records().len(), 1);
        assert_eq!(session.remembered_evaluator().as_deref(), Some("Ana"));

        session.reset();
        assert!(session.records().is_empty());
        let store = session.into_store();
        assert!(store.keys().unwrap().is_empty());
    }

    #[test]
    fn reset_leaves_other_namespaces() {
        let mut store = MemoryStore::new();
        store.set("list.evaluation.x", "{}").unwrap();
        store.set("question.selection", "{}").unwrap();
        assert_eq!(clear_namespace(&mut store, "question").unwrap(), 1);
        assert_eq!(store.keys().unwrap(), vec!["list.evaluation.x"]);
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let criteria = Arc::new(CriteriaSet::question());
        {
            let store = FileStore::open(dir.path()).unwrap();
            let mut session = Session::open(store, Arc::clone(&criteria), &dataset());
            session
                .start(&dataset(), SubjectFilter::All, LocaleFilter::Both, None)
                .unwrap();
            session.jump_to(3).unwrap();
        }
        let store = FileStore::open(dir.path()).unwrap();
        let session = Session::open(store, criteria, &dataset());
        assert_eq!(session.current().unwrap().id(), "q_3");
    }
}
