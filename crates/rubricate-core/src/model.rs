//! Canonical data model.
//!
//! Every source shape is converted into these types by the adapter. They are
//! built once at load time and never mutated afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of incorrect-alternative slots carried by every question.
pub const ALTERNATIVE_SLOTS: usize = 4;

/// The two question formats the rubric distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestionType {
    #[serde(rename = "MCQ")]
    Mcq,
    #[serde(rename = "OPEN_ENDED")]
    OpenEnded,
}

impl QuestionType {
    /// Collapse a raw type tag. Anything multiple-choice-like is MCQ,
    /// everything else (including missing tags) is open-ended.
    pub fn from_tag(tag: &str) -> Self {
        let folded: String = tag
            .trim()
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .flat_map(char::to_lowercase)
            .collect();
        match folded.as_str() {
            "multiplechoice" | "mcq" => QuestionType::Mcq,
            _ => QuestionType::OpenEnded,
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionType::Mcq => write!(f, "MCQ"),
            QuestionType::OpenEnded => write!(f, "OPEN_ENDED"),
        }
    }
}

impl FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "MCQ" => Ok(QuestionType::Mcq),
            "OPEN_ENDED" => Ok(QuestionType::OpenEnded),
            other => Err(format!("unknown question type: {other}")),
        }
    }
}

/// Human-readable language derived from a known locale code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    English,
    Portuguese,
}

impl Language {
    /// Only `en_US` and `pt_BR` map to a language; anything else is unset.
    pub fn from_locale(locale: &str) -> Option<Self> {
        match locale.trim() {
            "en_US" => Some(Language::English),
            "pt_BR" => Some(Language::Portuguese),
            _ => None,
        }
    }

    pub fn locale(&self) -> &'static str {
        match self {
            Language::English => "en_US",
            Language::Portuguese => "pt_BR",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::English => write!(f, "English"),
            Language::Portuguese => write!(f, "Portuguese"),
        }
    }
}

/// One assessable item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub statement: String,
    #[serde(default)]
    pub solution: String,
    /// Canonical (English) discipline.
    #[serde(default)]
    pub discipline: String,
    /// Discipline exactly as it appeared in the source.
    #[serde(default)]
    pub discipline_original: String,
    #[serde(default)]
    pub category: String,
    /// Raw grade code (e.g. "70"); see [`crate::present::format_grade`].
    #[serde(default)]
    pub grade: String,
    /// Raw difficulty code or label.
    #[serde(default)]
    pub difficulty: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    /// Locale code preserved verbatim for filtering.
    #[serde(default)]
    pub locale: String,
    #[serde(default)]
    pub language: Option<Language>,
    #[serde(default)]
    pub correct_answer: String,
    /// Right-padded to four slots; an empty string means "absent".
    #[serde(default)]
    pub incorrect_alternatives: [String; ALTERNATIVE_SLOTS],
}

impl Question {
    pub fn is_mcq(&self) -> bool {
        self.question_type == QuestionType::Mcq
    }

    /// Incorrect alternatives that are actually present.
    pub fn alternatives(&self) -> impl Iterator<Item = &str> {
        self.incorrect_alternatives
            .iter()
            .map(String::as_str)
            .filter(|alt| !alt.trim().is_empty())
    }
}

/// Shared metadata of a question-list generation request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestContext {
    #[serde(default)]
    pub grade: String,
    #[serde(default)]
    pub locale: String,
    /// Canonical discipline.
    #[serde(default)]
    pub discipline: String,
    #[serde(default)]
    pub discipline_original: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub num_mcq_requested: u32,
    #[serde(default)]
    pub num_open_ended_requested: u32,
    #[serde(default)]
    pub teacher_input: Option<String>,
    #[serde(default)]
    pub uploaded_files: Vec<String>,
}

impl RequestContext {
    pub fn requested_total(&self) -> u32 {
        self.num_mcq_requested + self.num_open_ended_requested
    }
}

/// An ordered collection of questions produced by one generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionList {
    /// Stable id derived from the source (never regenerated per load).
    pub id: String,
    pub context: RequestContext,
    pub questions: Vec<Question>,
}

impl QuestionList {
    pub fn mcq_count(&self) -> usize {
        self.questions.iter().filter(|q| q.is_mcq()).count()
    }

    pub fn open_ended_count(&self) -> usize {
        self.questions.len() - self.mcq_count()
    }
}

/// One unit of review: a single question or a whole list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EvalItem {
    Question(Question),
    List(QuestionList),
}

impl EvalItem {
    pub fn id(&self) -> &str {
        match self {
            EvalItem::Question(q) => &q.id,
            EvalItem::List(l) => &l.id,
        }
    }

    pub fn discipline(&self) -> &str {
        match self {
            EvalItem::Question(q) => &q.discipline,
            EvalItem::List(l) => &l.context.discipline,
        }
    }

    pub fn locale(&self) -> &str {
        match self {
            EvalItem::Question(q) => &q.locale,
            EvalItem::List(l) => &l.context.locale,
        }
    }

    pub fn grade(&self) -> &str {
        match self {
            EvalItem::Question(q) => &q.grade,
            EvalItem::List(l) => &l.context.grade,
        }
    }

    pub fn difficulty(&self) -> &str {
        match self {
            EvalItem::Question(q) => &q.difficulty,
            EvalItem::List(l) => &l.context.difficulty,
        }
    }

    /// Question type for type-dependent criteria. Lists have none.
    pub fn question_type(&self) -> Option<QuestionType> {
        match self {
            EvalItem::Question(q) => Some(q.question_type),
            EvalItem::List(_) => None,
        }
    }
}

/// Which input shape a dataset came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetShape {
    /// Flat tabular rows, one question per row.
    FlatRows,
    /// Question records each carrying a `request_context`.
    NestedRecords,
    /// Pre-grouped question lists.
    GroupedLists,
}

impl fmt::Display for DatasetShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetShape::FlatRows => write!(f, "flat rows"),
            DatasetShape::NestedRecords => write!(f, "nested records"),
            DatasetShape::GroupedLists => write!(f, "grouped lists"),
        }
    }
}

/// The canonical, immutable working set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub shape: DatasetShape,
    pub items: Vec<EvalItem>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&EvalItem> {
        self.items.iter().find(|item| item.id() == id)
    }
}
