//! Terminal rendering of items and scorecards.

use rubricate_core::criteria::Criterion;
use rubricate_core::model::{EvalItem, Question, QuestionList};
use rubricate_core::present::{difficulty_label, format_grade, format_locale, requested_types};
use rubricate_core::record::EvaluationRecord;
use rubricate_core::scoring::{ScoreStatus, Scorecard};
use rubricate_report::convert_math_tags;

const ALTERNATIVE_LETTERS: [char; 5] = ['a', 'b', 'c', 'd', 'e'];

/// Print the item at 0-based `index` of `len`.
pub fn print_item(item: &EvalItem, index: usize, len: usize, record: Option<&EvaluationRecord>) {
    let saved = match record {
        Some(r) => format!("  [saved {}/{}]", r.total_score, r.max_possible_score),
        None => String::new(),
    };
    println!("Item {}/{}: {}{saved}", index + 1, len, item.id());
    println!(
        "{} | {} | {} | {}",
        item.discipline(),
        format_grade(item.grade()),
        difficulty_label(item.difficulty()),
        format_locale(item.locale()),
    );
    match item {
        EvalItem::Question(q) => print_question(q, None),
        EvalItem::List(list) => print_list(list),
    }
}

fn print_question(q: &Question, number: Option<usize>) {
    let label = match number {
        Some(n) => format!("Q{n} ({})", q.question_type),
        None => format!("Type: {}", q.question_type),
    };
    println!("\n{label}");
    if !q.category.trim().is_empty() {
        println!("Category: {}", q.category);
    }
    println!("{}", convert_math_tags(&q.statement));

    if q.is_mcq() {
        let mut options: Vec<(&str, bool)> = vec![(q.correct_answer.as_str(), true)];
        options.extend(q.alternatives().map(|alt| (alt, false)));
        for (letter, (text, correct)) in ALTERNATIVE_LETTERS.iter().zip(options) {
            let marker = if correct { "*" } else { " " };
            println!("  {marker}{letter}) {}", convert_math_tags(text));
        }
    } else if !q.correct_answer.trim().is_empty() {
        println!("Answer: {}", convert_math_tags(&q.correct_answer));
    }

    if !q.solution.trim().is_empty() {
        println!("Solution: {}", convert_math_tags(&q.solution));
    }
}

fn print_list(list: &QuestionList) {
    let ctx = &list.context;
    println!(
        "Requested: {} | Generated: {} MCQ, {} open-ended",
        requested_types(ctx),
        list.mcq_count(),
        list.open_ended_count()
    );
    if let Some(input) = ctx.teacher_input.as_deref().filter(|s| !s.trim().is_empty()) {
        println!("Teacher input: {input}");
    }
    if !ctx.uploaded_files.is_empty() {
        println!("Uploaded files: {}", ctx.uploaded_files.join(", "));
    }
    for (i, q) in list.questions.iter().enumerate() {
        print_question(q, Some(i + 1));
    }
}

/// Print every criterion with its current value, then total and status.
pub fn print_scorecard(card: &Scorecard) {
    println!("\nCriteria:");
    for criterion in card.criteria().form_order() {
        let key = criterion.key();
        let value = card
            .get(key)
            .map(|v| v.to_string())
            .unwrap_or_else(|| "-".to_string());
        let (range, applies) = match criterion {
            Criterion::Gate(_) => ("PASS/FAIL".to_string(), true),
            Criterion::Quality(q) => (
                format!("{}-{}", q.min, q.max),
                q.applies_to.applies_to(card.item_type()),
            ),
        };
        let note = if applies { "" } else { "  (not counted for this item)" };
        println!(
            "  {key:<36} {value:>4}  [{range}] {}{note}",
            criterion.label()
        );
    }
    print_total(card);
}

pub fn print_total(card: &Scorecard) {
    let status = card.status();
    let mut line = format!(
        "\nTotal: {}/{} ({:.1}%)",
        card.total_score(),
        card.max_score(),
        card.percentage()
    );
    if !status.message().is_empty() {
        line.push_str(&format!("  {}", status.message()));
    }
    println!("{line}");
    if status == ScoreStatus::Incomplete {
        let missing = card.missing();
        if !missing.is_empty() {
            println!("Missing: {}", missing.join(", "));
        }
    }
}
