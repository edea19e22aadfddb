//! Subject and locale filtering.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::{EvalItem, Question, QuestionList};

const ALL_SUBJECTS: &str = "ALL";
const BOTH_LOCALES: &str = "BOTH";

/// Either every discipline or one canonical discipline.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SubjectFilter {
    All,
    Exact(String),
}

impl SubjectFilter {
    pub fn matches(&self, discipline: &str) -> bool {
        match self {
            SubjectFilter::All => true,
            SubjectFilter::Exact(want) => discipline.trim() == want,
        }
    }
}

impl FromStr for SubjectFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s {
            "" => Err("subject filter cannot be empty".into()),
            ALL_SUBJECTS => Ok(SubjectFilter::All),
            other => Ok(SubjectFilter::Exact(other.to_string())),
        }
    }
}

impl TryFrom<String> for SubjectFilter {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SubjectFilter> for String {
    fn from(filter: SubjectFilter) -> Self {
        filter.to_string()
    }
}

impl fmt::Display for SubjectFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubjectFilter::All => write!(f, "{ALL_SUBJECTS}"),
            SubjectFilter::Exact(s) => write!(f, "{s}"),
        }
    }
}

/// Either both locales or one locale code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LocaleFilter {
    Both,
    Exact(String),
}

impl LocaleFilter {
    /// Compares the raw locale code only; language labels are never used.
    pub fn matches(&self, locale: &str) -> bool {
        match self {
            LocaleFilter::Both => true,
            LocaleFilter::Exact(want) => locale.trim() == want,
        }
    }
}

impl FromStr for LocaleFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" => Err("locale filter cannot be empty".into()),
            BOTH_LOCALES => Ok(LocaleFilter::Both),
            "English" => Ok(LocaleFilter::Exact("en_US".into())),
            "Portuguese" => Ok(LocaleFilter::Exact("pt_BR".into())),
            other => Ok(LocaleFilter::Exact(other.to_string())),
        }
    }
}

impl TryFrom<String> for LocaleFilter {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LocaleFilter> for String {
    fn from(filter: LocaleFilter) -> Self {
        filter.to_string()
    }
}

impl fmt::Display for LocaleFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocaleFilter::Both => write!(f, "{BOTH_LOCALES}"),
            LocaleFilter::Exact(s) => write!(f, "{s}"),
        }
    }
}

/// Anything carrying a discipline and a locale.
pub trait Selectable {
    fn discipline(&self) -> &str;
    fn locale(&self) -> &str;
}

impl Selectable for Question {
    fn discipline(&self) -> &str {
        &self.discipline
    }

    fn locale(&self) -> &str {
        &self.locale
    }
}

impl Selectable for QuestionList {
    fn discipline(&self) -> &str {
        &self.context.discipline
    }

    fn locale(&self) -> &str {
        &self.context.locale
    }
}

impl Selectable for EvalItem {
    fn discipline(&self) -> &str {
        EvalItem::discipline(self)
    }

    fn locale(&self) -> &str {
        EvalItem::locale(self)
    }
}

/// Narrow `items` to those matching both filters, preserving order.
/// No match yields an empty vector.
pub fn select<T: Selectable + Clone>(
    items: &[T],
    subject: &SubjectFilter,
    locale: &LocaleFilter,
) -> Vec<T> {
    items
        .iter()
        .filter(|item| subject.matches(item.discipline()) && locale.matches(item.locale()))
        .cloned()
        .collect()
}

/// Distinct non-empty disciplines, sorted.
pub fn subjects<T: Selectable>(items: &[T]) -> Vec<String> {
    items
        .iter()
        .map(|item| item.discipline().trim())
        .filter(|d| !d.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
