//! Reads an uploaded spreadsheet into header-keyed rows and runs the
//! per-type shape checks.
//!
//! Workbooks (`.xlsx`, `.xlsm`, `.xls`, `.ods`) go through `calamine`, only the
//! first sheet is read. `.csv` files go through `csv`. The first non-blank row
//! is the header; entirely blank rows are skipped. Every surviving row keeps
//! its physical spreadsheet row number.

use crate::ingest::error::UploadError;
use calamine::{open_workbook_auto_from_rs, Data, DataType, Reader};
use common::model::record_type::RecordType;
use common::model::upload::ParseError;
use serde_json::{Map, Number, Value};
use std::io::Cursor;

/// Largest integer an f64 holds exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        UploadedFile {
            file_name: file_name.into(),
            bytes,
        }
    }

    fn is_csv(&self) -> bool {
        self.file_name.to_lowercase().ends_with(".csv")
    }
}

/// One data row keyed by the header cell text of its column.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub row: u32,
    pub cells: Map<String, Value>,
}

#[derive(Debug, Clone, Default)]
pub struct ParsedSheet {
    /// Rows that passed the shape checks.
    pub rows: Vec<RawRow>,
    pub errors: Vec<ParseError>,
    /// Non-blank data rows in the sheet, passing or not.
    pub total_rows: usize,
}

fn number_value(f: f64) -> Value {
    if f.fract() == 0.0 && f.abs() <= MAX_SAFE_INTEGER {
        Value::from(f as i64)
    } else {
        Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null)
    }
}

fn cell_value(cell: &Data) -> Value {
    match cell {
        Data::Empty | Data::Error(_) => Value::Null,
        Data::String(s) => Value::String(s.clone()),
        Data::Int(i) => Value::from(*i),
        Data::Float(f) => number_value(*f),
        Data::Bool(b) => Value::Bool(*b),
        Data::DateTime(_) => cell
            .as_datetime()
            .map(|dt| Value::String(dt.format("%Y-%m-%d").to_string()))
            .unwrap_or(Value::Null),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Value::String(s.clone()),
    }
}

fn csv_value(raw: &str) -> Value {
    if raw.is_empty() {
        return Value::Null;
    }
    let trimmed = raw.trim();
    if let Ok(i) = trimmed.parse::<i64>() {
        return Value::from(i);
    }
    match trimmed.parse::<f64>() {
        Ok(f) if f.is_finite() => number_value(f),
        _ => Value::String(raw.to_string()),
    }
}

fn read_workbook(bytes: &[u8]) -> Result<Vec<(u32, Vec<Value>)>, UploadError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| UploadError::Structural(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| UploadError::Structural("workbook has no sheets".to_string()))?
        .map_err(|e| UploadError::Structural(e.to_string()))?;

    let first_row = range.start().map(|(row, _)| row).unwrap_or(0);
    Ok(range
        .rows()
        .enumerate()
        .map(|(idx, cells)| {
            (
                first_row + idx as u32 + 1,
                cells.iter().map(cell_value).collect(),
            )
        })
        .collect())
}

fn read_csv(bytes: &[u8]) -> Result<Vec<(u32, Vec<Value>)>, UploadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    // `csv` skips empty lines without counting them, and a record's position
    // is taken before the skipped lines. Lines are counted from the byte
    // offset of the record's first non-terminator byte instead.
    let mut rows = Vec::new();
    let mut counted_to = 0;
    let mut line = 1u32;
    for record in reader.records() {
        let record = record.map_err(|e| UploadError::Structural(e.to_string()))?;
        let mut start = record
            .position()
            .map(|p| p.byte() as usize)
            .unwrap_or(counted_to)
            .clamp(counted_to, bytes.len());
        while matches!(bytes.get(start), Some(b'\r' | b'\n')) {
            start += 1;
        }
        line += newlines(&bytes[counted_to..start]);
        counted_to = start;
        rows.push((line, record.iter().map(csv_value).collect()));
    }
    Ok(rows)
}

fn newlines(bytes: &[u8]) -> u32 {
    bytes.iter().filter(|b| **b == b'\n').count() as u32
}

fn is_blank(cells: &[Value]) -> bool {
    cells.iter().all(|cell| match cell {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    })
}

fn header_text(cell: &Value) -> Option<String> {
    match cell {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Decodes the file into header-keyed rows. Fails only when the file is not a
/// readable spreadsheet.
pub fn read_rows(file: &UploadedFile) -> Result<Vec<RawRow>, UploadError> {
    let grid = if file.is_csv() {
        read_csv(&file.bytes)?
    } else {
        read_workbook(&file.bytes)?
    };

    let mut rows = grid.into_iter().filter(|(_, cells)| !is_blank(cells));
    let headers: Vec<Option<String>> = match rows.next() {
        Some((_, cells)) => cells.iter().map(header_text).collect(),
        None => return Ok(Vec::new()),
    };

    Ok(rows
        .map(|(row, cells)| {
            let mut map = Map::new();
            for (idx, header) in headers.iter().enumerate() {
                if let Some(header) = header {
                    map.insert(header.clone(), cells.get(idx).cloned().unwrap_or(Value::Null));
                }
            }
            RawRow { row, cells: map }
        })
        .collect())
}

fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

fn score_in_range(value: Option<&Value>) -> bool {
    value
        .and_then(Value::as_f64)
        .map(|score| (0.0..=100.0).contains(&score))
        .unwrap_or(false)
}

struct RowChecker<'a> {
    row: &'a RawRow,
    errors: Vec<ParseError>,
}

impl<'a> RowChecker<'a> {
    fn new(row: &'a RawRow) -> Self {
        RowChecker {
            row,
            errors: Vec::new(),
        }
    }

    fn check(&mut self, field: &str, ok: impl Fn(Option<&Value>) -> bool, message: &str) {
        let value = self.row.cells.get(field);
        if !ok(value) {
            self.errors.push(ParseError {
                row: self.row.row,
                field: Some(field.to_string()),
                message: message.to_string(),
                value: value.cloned(),
            });
        }
    }

    fn present(&mut self, field: &str, message: &str) {
        self.check(field, truthy, message);
    }
}

/// Presence and shape checks that run before field mapping.
pub fn check_row(row: &RawRow, record_type: RecordType) -> Vec<ParseError> {
    let mut checker = RowChecker::new(row);
    match record_type {
        RecordType::Students => {
            checker.check(
                "이름",
                |v| truthy(v) && matches!(v, Some(Value::String(_))),
                "이름은 필수 항목입니다",
            );
            checker.check(
                "학년",
                |v| truthy(v) && matches!(v, Some(Value::Number(_))),
                "학년은 숫자로 입력해야 합니다",
            );
        }
        RecordType::Grades => {
            checker.present("학생명", "학생명은 필수 항목입니다");
            checker.present("과목", "과목은 필수 항목입니다");
            checker.check("점수", score_in_range, "점수는 0~100 사이의 숫자여야 합니다");
        }
        RecordType::Goals => {
            checker.present("학생명", "학생명은 필수 항목입니다");
            checker.present("목표제목", "목표제목은 필수 항목입니다");
            checker.check(
                "목표점수",
                score_in_range,
                "목표점수는 0~100 사이의 숫자여야 합니다",
            );
        }
    }
    checker.errors
}

pub fn check_rows(rows: Vec<RawRow>, record_type: RecordType) -> ParsedSheet {
    let total_rows = rows.len();
    let mut parsed = ParsedSheet {
        total_rows,
        ..ParsedSheet::default()
    };
    for row in rows {
        let errors = check_row(&row, record_type);
        if errors.is_empty() {
            parsed.rows.push(row);
        } else {
            parsed.errors.extend(errors);
        }
    }
    parsed
}

pub fn parse_upload(file: &UploadedFile, record_type: RecordType) -> Result<ParsedSheet, UploadError> {
    let rows = read_rows(file)?;
    Ok(check_rows(rows, record_type))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};
    use serde_json::json;

    fn xlsx(rows: &[&[Value]], skip_rows: u32) -> Vec<u8> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                let (r, c) = (r as u32 + skip_rows, c as u16);
                match cell {
                    Value::String(s) => {
                        sheet.write_string(r, c, s.as_str()).unwrap();
                    }
                    Value::Number(n) => {
                        sheet.write_number(r, c, n.as_f64().unwrap()).unwrap();
                    }
                    _ => {}
                }
            }
        }
        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn workbook_rows_are_keyed_by_header_and_numbered_physically() {
        let bytes = xlsx(
            &[
                &[json!("이름"), json!("학년"), json!("반")],
                &[json!("김철수"), json!(3)],
                &[],
                &[json!("이영희"), json!(2), json!(1)],
            ],
            0,
        );
        let rows = read_rows(&UploadedFile::new("students.xlsx", bytes)).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].row, 2);
        assert_eq!(
            Value::Object(rows[0].cells.clone()),
            json!({"이름": "김철수", "학년": 3, "반": null})
        );
        assert_eq!(rows[1].row, 4);
        assert_eq!(rows[1].cells.get("반"), Some(&json!(1)));
    }

    #[test]
    fn date_cells_become_iso_dates() {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        let date_format = Format::new().set_num_format("yyyy-mm-dd");
        sheet.write_string(0, 0, "학생명").unwrap();
        sheet.write_string(0, 1, "시험일자").unwrap();
        sheet.write_string(1, 0, "김철수").unwrap();
        let exam_date = ExcelDateTime::from_ymd(2025, 6, 30).unwrap();
        sheet
            .write_datetime_with_format(1, 1, &exam_date, &date_format)
            .unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let rows = read_rows(&UploadedFile::new("grades.xlsx", bytes)).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].cells.get("시험일자"), Some(&json!("2025-06-30")));
    }

    #[test]
    fn header_may_start_below_row_one() {
        let bytes = xlsx(&[&[json!("학생명")], &[json!("김철수")]], 2);
        let rows = read_rows(&UploadedFile::new("grades.xlsx", bytes)).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].row, 4);
    }

    #[test]
    fn csv_cells_are_typed_and_blank_lines_skipped() {
        let csv = "이름,학년,연락처\n김철수,3,010-1234-5678\n\n이영희,,\n";
        let rows = read_rows(&UploadedFile::new("students.CSV", csv.as_bytes().to_vec())).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].row, 2);
        assert_eq!(rows[0].cells.get("학년"), Some(&json!(3)));
        assert_eq!(rows[0].cells.get("연락처"), Some(&json!("010-1234-5678")));
        assert_eq!(rows[1].row, 4);
        assert_eq!(rows[1].cells.get("학년"), Some(&Value::Null));
    }

    #[test]
    fn garbage_is_a_structural_failure() {
        let file = UploadedFile::new("students.xlsx", b"definitely not a workbook".to_vec());
        assert!(matches!(read_rows(&file), Err(UploadError::Structural(_))));
    }

    #[test]
    fn empty_sheet_has_no_rows() {
        let rows = read_rows(&UploadedFile::new("empty.csv", Vec::new())).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn student_shape_checks() {
        let rows = vec![
            RawRow {
                row: 2,
                cells: json!({"이름": "김철수", "학년": 3}).as_object().unwrap().clone(),
            },
            RawRow {
                row: 3,
                cells: json!({"이름": "", "학년": "삼"}).as_object().unwrap().clone(),
            },
        ];
        let parsed = check_rows(rows, RecordType::Students);
        assert_eq!(parsed.total_rows, 2);
        assert_eq!(parsed.rows.len(), 1);
        assert_eq!(parsed.errors.len(), 2);
        assert!(parsed.errors.iter().all(|e| e.row == 3));
        assert_eq!(parsed.errors[0].field.as_deref(), Some("이름"));
        assert_eq!(parsed.errors[1].value, Some(json!("삼")));
    }

    #[test]
    fn grade_score_out_of_range_is_rejected() {
        let row = RawRow {
            row: 7,
            cells: json!({"학생명": "김철수", "과목": "수학", "점수": 150})
                .as_object()
                .unwrap()
                .clone(),
        };
        let errors = check_row(&row, RecordType::Grades);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].row, 7);
        assert_eq!(errors[0].message, "점수는 0~100 사이의 숫자여야 합니다");
    }

    #[test]
    fn goal_checks_report_absent_fields_without_value() {
        let row = RawRow {
            row: 2,
            cells: json!({"목표점수": 90}).as_object().unwrap().clone(),
        };
        let errors = check_row(&row, RecordType::Goals);
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| e.value.is_none()));
    }
}
