//! Localized header → canonical field name translation.

use crate::ingest::parser::RawRow;
use common::model::record_type::RecordType;
use serde_json::{Map, Value};

const STUDENT_COLUMNS: &[(&str, &str)] = &[
    ("이름", "name"),
    ("학년", "grade"),
    ("반", "class"),
    ("연락처", "phone"),
    ("부모연락처", "parentPhone"),
    ("주소", "address"),
];

const GRADE_COLUMNS: &[(&str, &str)] = &[
    ("학생명", "studentName"),
    ("과목", "subject"),
    ("학기", "semester"),
    ("시험종류", "examType"),
    ("점수", "score"),
    ("시험일자", "examDate"),
];

const GOAL_COLUMNS: &[(&str, &str)] = &[
    ("학생명", "studentName"),
    ("목표제목", "title"),
    ("현재점수", "currentScore"),
    ("목표점수", "targetScore"),
    ("마감일", "deadline"),
];

/// A row keyed by canonical field names, still carrying its spreadsheet row number.
#[derive(Debug, Clone, PartialEq)]
pub struct MappedRow {
    pub row: u32,
    pub fields: Map<String, Value>,
}

/// `(localized header, canonical field)` pairs in template column order.
pub fn columns(record_type: RecordType) -> &'static [(&'static str, &'static str)] {
    match record_type {
        RecordType::Students => STUDENT_COLUMNS,
        RecordType::Grades => GRADE_COLUMNS,
        RecordType::Goals => GOAL_COLUMNS,
    }
}

pub fn localized_headers(record_type: RecordType) -> Vec<&'static str> {
    columns(record_type).iter().map(|(header, _)| *header).collect()
}

/// Renames known headers and drops everything else. A header missing from
/// the row leaves its canonical field absent; an explicit null stays null.
pub fn map_row(row: &RawRow, record_type: RecordType) -> MappedRow {
    let mut fields = Map::new();
    for (localized, canonical) in columns(record_type) {
        if let Some(value) = row.cells.get(*localized) {
            fields.insert(canonical.to_string(), value.clone());
        }
    }
    MappedRow {
        row: row.row,
        fields,
    }
}

pub fn map_rows(rows: &[RawRow], record_type: RecordType) -> Vec<MappedRow> {
    rows.iter().map(|row| map_row(row, record_type)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(row: u32, value: Value) -> RawRow {
        match value {
            Value::Object(cells) => RawRow { row, cells },
            _ => panic!("row fixture must be an object"),
        }
    }

    #[test]
    fn renames_known_headers_and_drops_extras() {
        let row = raw(2, json!({"이름": "김철수", "학년": 3, "비고": "memo", "주소": null}));
        let mapped = map_row(&row, RecordType::Students);
        assert_eq!(mapped.row, 2);
        assert_eq!(
            Value::Object(mapped.fields),
            json!({"name": "김철수", "grade": 3, "address": null})
        );
    }

    #[test]
    fn absent_headers_stay_absent() {
        let row = raw(5, json!({"학생명": "이영희"}));
        let mapped = map_row(&row, RecordType::Grades);
        assert_eq!(mapped.fields.len(), 1);
        assert!(!mapped.fields.contains_key("score"));
    }

    #[test]
    fn canonical_keys_are_not_recognised_as_input() {
        let row = raw(2, json!({"name": "김철수", "grade": 3}));
        assert!(map_row(&row, RecordType::Students).fields.is_empty());
    }

    #[test]
    fn same_header_maps_per_record_type() {
        let row = raw(2, json!({"학생명": "김철수", "목표제목": "수학", "과목": "영어"}));
        let goal = map_row(&row, RecordType::Goals);
        assert_eq!(goal.fields.get("title"), Some(&json!("수학")));
        assert!(!goal.fields.contains_key("subject"));
    }

    #[test]
    fn header_order_follows_template_columns() {
        assert_eq!(
            localized_headers(RecordType::Goals),
            vec!["학생명", "목표제목", "현재점수", "목표점수", "마감일"]
        );
    }
}
