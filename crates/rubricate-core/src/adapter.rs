//! Source adapter.
//!
//! Converts the three supported dataset shapes into the canonical model:
//!
//! - flat CSV rows, one question per row;
//! - JSON question records with a nested `request_context`;
//! - JSON question lists, each with its own `request_context`.
//!
//! The same normalization rules apply to every shape. Records that cannot
//! become a usable item are dropped with an [`AdapterWarning`] rather than
//! failing the whole load.

use std::collections::HashSet;

use serde::Deserialize;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::discipline::normalize_discipline;
use crate::error::LoadError;
use crate::model::{
    Dataset, DatasetShape, EvalItem, Language, Question, QuestionList, QuestionType,
    RequestContext, ALTERNATIVE_SLOTS,
};
use crate::traits::{DatasetSource, RawDocument};

/// Namespace for list ids derived from list content.
const LIST_ID_NAMESPACE: Uuid = Uuid::from_u128(0x5f1c_2a4e_8d3b_4c07_9e61_0b7a_d2f4_1c93);

/// Discipline used for lists whose request names none.
const UNKNOWN_DISCIPLINE: &str = "Unknown";

/// A non-fatal problem found while adapting a dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterWarning {
    /// The affected item, when it has an id.
    pub subject_id: Option<String>,
    pub message: String,
}

/// Result of adapting a document.
#[derive(Debug, Clone)]
pub struct Adapted {
    pub dataset: Dataset,
    pub warnings: Vec<AdapterWarning>,
}

impl Adapted {
    /// True when nothing usable survived; the caller decides how to tell
    /// the reviewer.
    pub fn is_empty(&self) -> bool {
        self.dataset.is_empty()
    }
}

/// Input format of a raw document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Json,
}

impl SourceFormat {
    /// Guess the format from the document name, then from its first
    /// non-blank character.
    pub fn detect(name: &str, content: &str) -> Self {
        let lower = name.to_lowercase();
        let path = lower.split(['?', '#']).next().unwrap_or_default();
        if path.ends_with(".csv") {
            return SourceFormat::Csv;
        }
        if path.ends_with(".json") {
            return SourceFormat::Json;
        }
        match content.trim_start().chars().next() {
            Some('{') | Some('[') => SourceFormat::Json,
            _ => SourceFormat::Csv,
        }
    }
}

/// Fetch a document from `source` and adapt it.
pub async fn load_dataset(source: &dyn DatasetSource) -> Result<Adapted, LoadError> {
    let document = source.fetch().await?;
    let adapted = adapt_document(&document)?;
    tracing::info!(
        "loaded {} item(s) from {} ({}, {} warning(s))",
        adapted.dataset.len(),
        document.name,
        adapted.dataset.shape,
        adapted.warnings.len()
    );
    Ok(adapted)
}

/// Adapt a raw document of either format.
pub fn adapt_document(document: &RawDocument) -> Result<Adapted, LoadError> {
    match SourceFormat::detect(&document.name, &document.content) {
        SourceFormat::Csv => adapt_csv(&document.content),
        SourceFormat::Json => adapt_json(&document.content),
    }
}

/// Parse a JSON document and adapt it.
pub fn adapt_json(content: &str) -> Result<Adapted, LoadError> {
    let value: Value = serde_json::from_str(content).map_err(|e| LoadError::Parse {
        format: "JSON",
        message: e.to_string(),
    })?;
    adapt_value(&value)
}

/// Adapt an already-parsed JSON value (nested records or grouped lists).
pub fn adapt_value(value: &Value) -> Result<Adapted, LoadError> {
    let empty = Map::new();
    match value {
        Value::Array(records) => Ok(adapt_records(records, &empty)),
        Value::Object(root) => {
            if let Some(lists) = root.get("question_lists") {
                let lists = lists.as_array().ok_or_else(|| {
                    LoadError::UnsupportedShape("`question_lists` is not an array".into())
                })?;
                Ok(adapt_lists(lists))
            } else if let Some(records) = root.get("questions") {
                let records = records.as_array().ok_or_else(|| {
                    LoadError::UnsupportedShape("`questions` is not an array".into())
                })?;
                let shared = root
                    .get("request_context")
                    .and_then(Value::as_object)
                    .unwrap_or(&empty);
                Ok(adapt_records(records, shared))
            } else {
                Err(LoadError::UnsupportedShape(
                    "expected a `questions` or `question_lists` array".into(),
                ))
            }
        }
        other => Err(LoadError::UnsupportedShape(format!(
            "top-level JSON {} is neither an object nor an array",
            json_kind(other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ---------------------------------------------------------------------------
// Flat rows
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CsvRow {
    #[serde(alias = "id")]
    question_id: Option<String>,
    #[serde(alias = "statement")]
    question_statement: Option<String>,
    #[serde(alias = "solution")]
    question_solution: Option<String>,
    #[serde(alias = "disciplineName")]
    discipline: Option<String>,
    #[serde(alias = "categoryName")]
    category: Option<String>,
    grade: Option<String>,
    #[serde(alias = "difficulty_level")]
    difficulty: Option<String>,
    #[serde(rename = "type")]
    question_type: Option<String>,
    locale: Option<String>,
    #[serde(alias = "answer")]
    correct_answer: Option<String>,
    incorrect_alternative_1: Option<String>,
    incorrect_alternative_2: Option<String>,
    incorrect_alternative_3: Option<String>,
    incorrect_alternative_4: Option<String>,
}

/// Adapt flat CSV rows. Rows without an id are dropped.
pub fn adapt_csv(content: &str) -> Result<Adapted, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(content.as_bytes());

    let mut builder = Builder::new(DatasetShape::FlatRows);
    for (line, row) in reader.deserialize::<CsvRow>().enumerate() {
        let row = row.map_err(|e| LoadError::Parse {
            format: "CSV",
            message: e.to_string(),
        })?;

        let Some(id) = non_empty(row.question_id.as_deref()) else {
            builder.warn(None, format!("row {} has no question id; dropped", line + 2));
            continue;
        };

        let question = canonical_question(RawQuestion {
            id: id.to_string(),
            statement: row.question_statement.unwrap_or_default(),
            solution: row.question_solution.unwrap_or_default(),
            discipline: row.discipline.unwrap_or_default(),
            category: row.category.unwrap_or_default(),
            grade: row.grade.unwrap_or_default(),
            difficulty: row.difficulty.unwrap_or_default(),
            type_tag: row.question_type.unwrap_or_default(),
            locale: row.locale.unwrap_or_default(),
            correct_answer: row.correct_answer.unwrap_or_default(),
            alternatives: [
                row.incorrect_alternative_1,
                row.incorrect_alternative_2,
                row.incorrect_alternative_3,
                row.incorrect_alternative_4,
            ]
            .into_iter()
            .map(Option::unwrap_or_default)
            .collect(),
        });
        builder.push_question(question);
    }

    Ok(builder.finish())
}

// ---------------------------------------------------------------------------
// Nested records
// ---------------------------------------------------------------------------

fn adapt_records(records: &[Value], shared: &Map<String, Value>) -> Adapted {
    let mut builder = Builder::new(DatasetShape::NestedRecords);
    let empty = Map::new();

    for (index, record) in records.iter().enumerate() {
        let Some(record) = record.as_object() else {
            builder.warn(None, format!("record {} is not an object; dropped", index + 1));
            continue;
        };
        let context = record
            .get("request_context")
            .and_then(Value::as_object)
            .unwrap_or(&empty);
        let fallback_id = format!("q_{}", index + 1);
        let question = question_from_record(record, &[context, shared], fallback_id);
        builder.push_question(question);
    }

    builder.finish()
}

/// Build a question from a JSON record. Record fields win over context
/// layers, which are consulted in order.
fn question_from_record(
    record: &Map<String, Value>,
    contexts: &[&Map<String, Value>],
    fallback_id: String,
) -> Question {
    let own = |keys: &[&str]| first_text(record, keys);
    let layered = |record_keys: &[&str], context_key: &str| {
        own(record_keys).or_else(|| {
            contexts
                .iter()
                .find_map(|ctx| first_text(ctx, &[context_key]))
        })
    };

    let alternatives = record
        .get("incorrect_alternatives")
        .and_then(Value::as_array)
        .map(|alts| {
            alts.iter()
                .map(|alt| scalar_text(alt).unwrap_or_default())
                .collect()
        })
        .unwrap_or_default();

    canonical_question(RawQuestion {
        id: own(&["question_id", "id"]).unwrap_or(fallback_id),
        statement: own(&["question_statement", "statement"]).unwrap_or_default(),
        solution: own(&["question_solution", "solution"]).unwrap_or_default(),
        discipline: layered(&["disciplineName", "discipline"], "discipline").unwrap_or_default(),
        category: layered(&["categoryName", "category"], "category").unwrap_or_default(),
        grade: layered(&["grade"], "grade").unwrap_or_default(),
        difficulty: layered(&["difficulty", "difficulty_level"], "difficulty").unwrap_or_default(),
        type_tag: own(&["type"]).unwrap_or_default(),
        locale: layered(&["locale"], "locale").unwrap_or_default(),
        correct_answer: own(&["answer", "correct_answer"]).unwrap_or_default(),
        alternatives,
    })
}

// ---------------------------------------------------------------------------
// Grouped lists
// ---------------------------------------------------------------------------

fn adapt_lists(lists: &[Value]) -> Adapted {
    let mut builder = Builder::new(DatasetShape::GroupedLists);
    let empty = Map::new();

    for (index, raw) in lists.iter().enumerate() {
        let Some(object) = raw.as_object() else {
            builder.warn(None, format!("list {} is not an object; dropped", index + 1));
            continue;
        };
        let rc = object
            .get("request_context")
            .and_then(Value::as_object)
            .unwrap_or(&empty);
        let list_id = derive_list_id(object, raw);
        let context = request_context(rc);

        let mut questions = Vec::new();
        for (position, record) in object
            .get("questions")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .enumerate()
        {
            let Some(record) = record.as_object() else {
                continue;
            };
            let fallback_id = format!("{list_id}_q{}", position + 1);
            let question = question_from_record(record, &[rc], fallback_id);
            if question.statement.trim().is_empty() {
                builder.warn(
                    Some(question.id.clone()),
                    format!("question {} of {list_id} has an empty statement; dropped", position + 1),
                );
                continue;
            }
            questions.push(question);
        }

        if questions.is_empty() {
            builder.warn(Some(list_id), "list has no usable questions; dropped".into());
            continue;
        }

        builder.push_item(EvalItem::List(QuestionList {
            id: list_id,
            context,
            questions,
        }));
    }

    builder.finish()
}

/// `list_<list_id>` when the source names one, otherwise a name-based UUID
/// over the list's canonical JSON so the id survives reloads.
fn derive_list_id(object: &Map<String, Value>, raw: &Value) -> String {
    if let Some(id) = object.get("list_id").and_then(scalar_text) {
        return format!("list_{id}");
    }
    let canonical = serde_json::to_vec(raw).unwrap_or_default();
    let uuid = Uuid::new_v5(&LIST_ID_NAMESPACE, &canonical);
    format!("list_{}", uuid.simple())
}

fn request_context(rc: &Map<String, Value>) -> RequestContext {
    let discipline_original = first_text(rc, &["discipline"]).unwrap_or_default();
    let discipline = match discipline_original.trim() {
        "" => UNKNOWN_DISCIPLINE.to_string(),
        trimmed => normalize_discipline(trimmed).to_string(),
    };

    let uploaded_files = match rc.get("uploaded_files") {
        Some(Value::String(files)) => files
            .split(',')
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(String::from)
            .collect(),
        Some(Value::Array(files)) => files.iter().filter_map(scalar_text).collect(),
        _ => Vec::new(),
    };

    RequestContext {
        grade: first_text(rc, &["grade"]).unwrap_or_default(),
        locale: first_text(rc, &["locale"])
            .map(|l| l.trim().to_string())
            .unwrap_or_default(),
        discipline,
        discipline_original,
        category: first_text(rc, &["category"]).unwrap_or_default(),
        difficulty: first_text(rc, &["difficulty"]).unwrap_or_default(),
        num_mcq_requested: first_count(rc, &["num_mcq_requested"]),
        num_open_ended_requested: first_count(
            rc,
            &["num_discursive_requested", "num_open_ended_requested"],
        ),
        teacher_input: first_text(rc, &["teacher_input"]),
        uploaded_files,
    }
}

// ---------------------------------------------------------------------------
// Shared normalization
// ---------------------------------------------------------------------------

/// Source-independent question fields before normalization.
struct RawQuestion {
    id: String,
    statement: String,
    solution: String,
    discipline: String,
    category: String,
    grade: String,
    difficulty: String,
    type_tag: String,
    locale: String,
    correct_answer: String,
    alternatives: Vec<String>,
}

fn canonical_question(raw: RawQuestion) -> Question {
    let question_type = QuestionType::from_tag(&raw.type_tag);
    let locale = raw.locale.trim().to_string();
    let language = Language::from_locale(&locale);

    let mut incorrect_alternatives: [String; ALTERNATIVE_SLOTS] = Default::default();
    if question_type == QuestionType::Mcq {
        for (slot, alt) in incorrect_alternatives.iter_mut().zip(raw.alternatives) {
            *slot = alt;
        }
    }

    Question {
        id: raw.id.trim().to_string(),
        statement: raw.statement,
        solution: raw.solution,
        discipline: normalize_discipline(&raw.discipline).trim().to_string(),
        discipline_original: raw.discipline,
        category: raw.category,
        grade: raw.grade.trim().to_string(),
        difficulty: raw.difficulty.trim().to_string(),
        question_type,
        locale,
        language,
        correct_answer: raw.correct_answer,
        incorrect_alternatives,
    }
}

/// Collects items, enforcing non-empty statements and unique ids.
struct Builder {
    shape: DatasetShape,
    items: Vec<EvalItem>,
    seen: HashSet<String>,
    warnings: Vec<AdapterWarning>,
}

impl Builder {
    fn new(shape: DatasetShape) -> Self {
        Self {
            shape,
            items: Vec::new(),
            seen: HashSet::new(),
            warnings: Vec::new(),
        }
    }

    fn warn(&mut self, subject_id: Option<String>, message: String) {
        tracing::debug!("adapter: {message}");
        self.warnings.push(AdapterWarning {
            subject_id,
            message,
        });
    }

    fn push_question(&mut self, question: Question) {
        if question.statement.trim().is_empty() {
            self.warn(
                Some(question.id.clone()),
                "question statement is empty; dropped".into(),
            );
            return;
        }
        self.push_item(EvalItem::Question(question));
    }

    fn push_item(&mut self, item: EvalItem) {
        if !self.seen.insert(item.id().to_string()) {
            let id = item.id().to_string();
            self.warn(Some(id.clone()), format!("duplicate id {id}; later copy dropped"));
            return;
        }
        self.items.push(item);
    }

    fn finish(self) -> Adapted {
        Adapted {
            dataset: Dataset {
                shape: self.shape,
                items: self.items,
            },
            warnings: self.warnings,
        }
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

/// Text form of a JSON scalar. Empty strings and nulls are absent.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn first_text(map: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| map.get(*key).and_then(scalar_text))
}

fn first_count(map: &Map<String, Value>, keys: &[&str]) -> u32 {
    keys.iter()
        .find_map(|key| match map.get(*key)? {
            Value::Number(n) => n.as_u64().map(|n| n as u32),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn questions(adapted: &Adapted) -> Vec<&Question> {
        adapted
            .dataset
            .items
            .iter()
            .filter_map(|item| match item {
                EvalItem::Question(q) => Some(q),
                EvalItem::List(_) => None,
            })
            .collect()
    }

    #[test]
    fn nested_records_with_context() {
        let doc = json!({
            "questions": [
                {
                    "question_statement": "Quanto é {{MATH}}2+2{{/MATH}}?",
                    "question_solution": "4",
                    "type": "multiple_choice",
                    "answer": "4",
                    "incorrect_alternatives": ["3", "5"],
                    "difficulty_level": 200,
                    "request_context": {
                        "discipline": "Matemática",
                        "category": "Aritmética",
                        "grade": 20,
                        "locale": "pt_BR"
                    }
                },
                {
                    "question_statement": "Explain photosynthesis.",
                    "type": "discursive",
                    "disciplineName": "Biology",
                    "incorrect_alternatives": ["ignored"],
                    "request_context": { "discipline": "Ciências", "locale": "en_US", "grade": "70" }
                }
            ]
        });

        let adapted = adapt_value(&doc).unwrap();
        assert_eq!(adapted.dataset.shape, DatasetShape::NestedRecords);
        let qs = questions(&adapted);
        assert_eq!(qs.len(), 2);

        assert_eq!(qs[0].id, "q_1");
        assert_eq!(qs[0].discipline, "Mathematics");
        assert_eq!(qs[0].discipline_original, "Matemática");
        assert_eq!(qs[0].grade, "20");
        assert_eq!(qs[0].difficulty, "200");
        assert_eq!(qs[0].question_type, QuestionType::Mcq);
        assert_eq!(qs[0].language, Some(Language::Portuguese));
        assert_eq!(qs[0].incorrect_alternatives, ["3", "5", "", ""]);

        // record-level discipline overrides the context
        assert_eq!(qs[1].discipline, "Biology");
        assert_eq!(qs[1].question_type, QuestionType::OpenEnded);
        assert!(qs[1].incorrect_alternatives.iter().all(String::is_empty));
    }

    #[test]
    fn empty_statements_are_dropped_but_ids_stay_positional() {
        let doc = json!({
            "questions": [
                { "question_statement": "   " },
                { "question_statement": "Second" }
            ]
        });
        let adapted = adapt_value(&doc).unwrap();
        let qs = questions(&adapted);
        assert_eq!(qs.len(), 1);
        assert_eq!(qs[0].id, "q_2");
        assert_eq!(adapted.warnings.len(), 1);
    }

    #[test]
    fn unknown_locale_is_preserved_without_language() {
        let doc = json!([{ "question_statement": "Hola", "request_context": { "locale": "es_ES" } }]);
        let adapted = adapt_value(&doc).unwrap();
        let qs = questions(&adapted);
        assert_eq!(qs[0].locale, "es_ES");
        assert_eq!(qs[0].language, None);
    }

    #[test]
    fn document_level_context_is_a_fallback_layer() {
        let doc = json!({
            "request_context": { "locale": "en_US", "discipline": "History" },
            "questions": [
                { "question_statement": "When?", "request_context": { "discipline": "Geografia" } }
            ]
        });
        let adapted = adapt_value(&doc).unwrap();
        let qs = questions(&adapted);
        assert_eq!(qs[0].discipline, "Geography");
        assert_eq!(qs[0].locale, "en_US");
    }

    #[test]
    fn grouped_lists() {
        let doc = json!({
            "question_lists": [
                {
                    "list_id": 7,
                    "request_context": {
                        "discipline": "Física",
                        "locale": "pt_BR",
                        "grade": 90,
                        "num_mcq_requested": 1,
                        "num_discursive_requested": "1",
                        "uploaded_files": "notes.pdf, slides.pptx",
                        "teacher_input": "Leis de Newton"
                    },
                    "questions": [
                        { "question_statement": "F = ?", "type": "MCQ", "answer": "ma" },
                        { "question_statement": "Explique a inércia.", "type": "discursive" }
                    ]
                },
                { "list_id": 8, "request_context": {}, "questions": [] }
            ]
        });

        let adapted = adapt_value(&doc).unwrap();
        assert_eq!(adapted.dataset.shape, DatasetShape::GroupedLists);
        assert_eq!(adapted.dataset.len(), 1);
        let EvalItem::List(list) = &adapted.dataset.items[0] else {
            panic!("expected a list");
        };
        assert_eq!(list.id, "list_7");
        assert_eq!(list.context.discipline, "Physics");
        assert_eq!(list.context.num_open_ended_requested, 1);
        assert_eq!(list.context.uploaded_files, vec!["notes.pdf", "slides.pptx"]);
        assert_eq!(list.questions[0].id, "list_7_q1");
        assert_eq!(list.questions[0].locale, "pt_BR");
        assert_eq!(list.mcq_count(), 1);
        assert_eq!(list.open_ended_count(), 1);
        assert!(adapted
            .warnings
            .iter()
            .any(|w| w.subject_id.as_deref() == Some("list_8")));
    }

    #[test]
    fn derived_list_ids_are_stable() {
        let doc = json!({
            "question_lists": [
                { "request_context": { "discipline": "" }, "questions": [{ "question_statement": "A" }] }
            ]
        });
        let first = adapt_value(&doc).unwrap();
        let second = adapt_value(&doc).unwrap();
        let id = first.dataset.items[0].id().to_string();
        assert!(id.starts_with("list_"));
        assert_eq!(id, second.dataset.items[0].id());
        assert_eq!(first.dataset.items[0].discipline(), "Unknown");
    }

    #[test]
    fn flat_rows() {
        let csv = "\
question_id,question_statement,discipline,grade,type,locale,correct_answer,incorrect_alternative_1,incorrect_alternative_2
1,\"What is 2+2, exactly?\",Matemática,10,multiple_choice,en_US,4,3,5
,No id here,Mathematics,10,MCQ,en_US,,,
2,Describe a cell.,Biology,70,open_ended,pt_BR,,,
";
        let adapted = adapt_csv(csv).unwrap();
        assert_eq!(adapted.dataset.shape, DatasetShape::FlatRows);
        let qs = questions(&adapted);
        assert_eq!(qs.len(), 2);
        assert_eq!(qs[0].statement, "What is 2+2, exactly?");
        assert_eq!(qs[0].discipline, "Mathematics");
        assert_eq!(qs[0].incorrect_alternatives, ["3", "5", "", ""]);
        assert_eq!(qs[1].question_type, QuestionType::OpenEnded);
        assert_eq!(adapted.warnings.len(), 1);
    }

    #[test]
    fn duplicate_ids_keep_first() {
        let csv = "id,statement\n1,first\n1,second\n";
        let adapted = adapt_csv(csv).unwrap();
        let qs = questions(&adapted);
        assert_eq!(qs.len(), 1);
        assert_eq!(qs[0].statement, "first");
        assert!(adapted.warnings[0].message.contains("duplicate"));
    }

    #[test]
    fn empty_result_is_not_an_error() {
        let adapted = adapt_value(&json!({ "questions": [] })).unwrap();
        assert!(adapted.is_empty());
    }

    #[test]
    fn malformed_documents() {
        assert!(matches!(
            adapt_json("{ not json"),
            Err(LoadError::Parse { format: "JSON", .. })
        ));
        assert!(matches!(
            adapt_value(&json!({ "items": [] })),
            Err(LoadError::UnsupportedShape(_))
        ));
        assert!(matches!(
            adapt_value(&json!("text")),
            Err(LoadError::UnsupportedShape(_))
        ));
    }

    #[test]
    fn format_detection() {
        assert_eq!(SourceFormat::detect("data.csv", "{"), SourceFormat::Csv);
        assert_eq!(
            SourceFormat::detect("http://host/data.json?v=2", ""),
            SourceFormat::Json
        );
        assert_eq!(SourceFormat::detect("stdin", "  [1]"), SourceFormat::Json);
        assert_eq!(SourceFormat::detect("stdin", "id,statement"), SourceFormat::Csv);
    }
}
