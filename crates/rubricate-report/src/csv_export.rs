//! Flat CSV export.
//!
//! One row per record. Fields are quoted only when they contain a comma,
//! a quote or a line break; embedded quotes are doubled.

use std::collections::BTreeMap;

use rubricate_core::criteria::CriteriaSet;
use rubricate_core::record::EvaluationRecord;

use crate::error::ExportError;
use crate::sorted_records;

/// Column names: metadata, one column per criterion in form order, then
/// totals and the free-text field.
pub fn csv_header(criteria: &CriteriaSet) -> Vec<String> {
    let mut header = vec![
        criteria.id_column.clone(),
        "evaluator_name".to_string(),
        "discipline".to_string(),
        "locale".to_string(),
        "grade".to_string(),
        "difficulty".to_string(),
        "type".to_string(),
    ];
    header.extend(criteria.form_order().map(|c| c.key().to_string()));
    header.extend([
        "total_score".to_string(),
        "max_possible_score".to_string(),
        "percentage".to_string(),
        criteria.notes_label.clone(),
        "evaluated_at".to_string(),
    ]);
    header
}

fn csv_row(record: &EvaluationRecord, criteria: &CriteriaSet) -> Vec<String> {
    let mut row = vec![
        record.subject_id.clone(),
        record.evaluator_name.clone().unwrap_or_default(),
        record.discipline.clone(),
        record.locale.clone(),
        record.grade.clone(),
        record.difficulty.clone(),
        record
            .item_type
            .map(|t| t.to_string())
            .unwrap_or_default(),
    ];
    row.extend(criteria.form_order().map(|c| {
        record
            .values
            .get(c.key())
            .map(ToString::to_string)
            .unwrap_or_default()
    }));
    row.extend([
        record.total_score.to_string(),
        record.max_possible_score.to_string(),
        format!("{:.1}", record.percentage()),
        record.reasoning.clone().unwrap_or_default(),
        record.evaluated_at.to_rfc3339(),
    ]);
    row
}

/// Render every record as CSV.
pub fn generate_csv(
    records: &BTreeMap<String, EvaluationRecord>,
    criteria: &CriteriaSet,
) -> Result<String, ExportError> {
    let sorted = sorted_records(records)?;
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(Vec::new());

    writer.write_record(csv_header(criteria))?;
    for record in sorted {
        writer.write_record(csv_row(record, criteria))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
