//! # Template Generator
//!
//! Pure spreadsheet construction: no I/O beyond the returned byte buffer.
//! The header row reuses the mapper's localized column labels so a template
//! always maps back onto the record it describes.

use crate::ingest::mapper;
use common::model::record_type::RecordType;
use common::model::template::TemplateInfo;
use rust_xlsxwriter::{Workbook, XlsxError};
use thiserror::Error;

/// Narrowest column width, in characters.
const MIN_COLUMN_WIDTH: usize = 10;

const SHEET_NAME: &str = "Sheet1";

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("failed to build spreadsheet: {0}")]
    Xlsx(#[from] XlsxError),
}

#[derive(Debug, Clone, Copy)]
enum Cell {
    Text(&'static str),
    Number(f64),
}

impl Cell {
    fn char_len(&self) -> usize {
        match self {
            Cell::Text(s) => s.chars().count(),
            Cell::Number(n) => n.to_string().chars().count(),
        }
    }
}

use Cell::{Number as N, Text as T};

const STUDENT_ROWS: &[&[Cell]] = &[
    &[T("김철수"), N(3.0), N(1.0), T("010-1234-5678"), T("010-9876-5432"), T("서울시 강남구 테헤란로 123")],
    &[T("이영희"), N(2.0), N(2.0), T("010-2345-6789"), T("010-8765-4321"), T("서울시 서초구 서초대로 456")],
    &[T("박민수"), N(1.0), N(1.0), T("010-3456-7890"), T("010-7654-3210"), T("경기도 성남시 분당구 판교역로 789")],
];

const GRADE_ROWS: &[&[Cell]] = &[
    &[T("김철수"), T("수학"), T("2025-1학기"), T("중간고사"), N(85.0), T("2025-05-15")],
    &[T("김철수"), T("영어"), T("2025-1학기"), T("중간고사"), N(90.0), T("2025-05-15")],
    &[T("김철수"), T("국어"), T("2025-1학기"), T("중간고사"), N(88.0), T("2025-05-15")],
    &[T("이영희"), T("수학"), T("2025-1학기"), T("중간고사"), N(92.0), T("2025-05-15")],
    &[T("이영희"), T("영어"), T("2025-1학기"), T("중간고사"), N(87.0), T("2025-05-15")],
    &[T("박민수"), T("과학"), T("2025-1학기"), T("중간고사"), N(78.0), T("2025-05-15")],
];

const GOAL_ROWS: &[&[Cell]] = &[
    &[T("김철수"), T("수학 성적 90점 달성"), N(75.0), N(90.0), T("2025-06-30")],
    &[T("이영희"), T("영어 성적 95점 이상 유지"), N(87.0), N(95.0), T("2025-07-15")],
    &[T("박민수"), T("과학 성적 80점 이상"), N(65.0), N(80.0), T("2025-08-31")],
];

fn example_rows(record_type: RecordType) -> &'static [&'static [Cell]] {
    match record_type {
        RecordType::Students => STUDENT_ROWS,
        RecordType::Grades => GRADE_ROWS,
        RecordType::Goals => GOAL_ROWS,
    }
}

pub fn file_name(record_type: RecordType) -> &'static str {
    match record_type {
        RecordType::Students => "학생정보_템플릿.xlsx",
        RecordType::Grades => "성적정보_템플릿.xlsx",
        RecordType::Goals => "목표정보_템플릿.xlsx",
    }
}

fn display_name(record_type: RecordType) -> &'static str {
    match record_type {
        RecordType::Students => "학생 정보",
        RecordType::Grades => "성적 정보",
        RecordType::Goals => "목표 정보",
    }
}

fn description(record_type: RecordType) -> &'static str {
    match record_type {
        RecordType::Students => {
            "학생의 기본 정보를 입력하는 템플릿입니다. 이름과 학년은 필수 항목입니다."
        }
        RecordType::Grades => {
            "학생의 성적 정보를 입력하는 템플릿입니다. 학생명, 과목, 점수는 필수 항목입니다."
        }
        RecordType::Goals => {
            "학생의 학습 목표를 입력하는 템플릿입니다. 학생명, 목표제목, 목표점수는 필수 항목입니다."
        }
    }
}

pub fn template_info(record_type: RecordType) -> TemplateInfo {
    TemplateInfo {
        record_type,
        name: display_name(record_type).to_string(),
        description: description(record_type).to_string(),
        file_name: file_name(record_type).to_string(),
    }
}

pub fn all_template_info() -> Vec<TemplateInfo> {
    RecordType::ALL.iter().copied().map(template_info).collect()
}

/// `max(longest cell + 2, 10)` characters per column, header included.
fn column_widths(headers: &[&str], rows: &[&[Cell]]) -> Vec<usize> {
    headers
        .iter()
        .enumerate()
        .map(|(col, header)| {
            let longest = rows
                .iter()
                .filter_map(|row| row.get(col))
                .map(Cell::char_len)
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0);
            (longest + 2).max(MIN_COLUMN_WIDTH)
        })
        .collect()
}

/// Builds the `.xlsx` template for `record_type`.
pub fn build_template(record_type: RecordType) -> Result<Vec<u8>, TemplateError> {
    let headers = mapper::localized_headers(record_type);
    let rows = example_rows(record_type);

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, header) in headers.iter().enumerate() {
        sheet.write_string(0, col as u16, *header)?;
    }
    for (idx, row) in rows.iter().enumerate() {
        let row_num = idx as u32 + 1;
        for (col, cell) in row.iter().enumerate() {
            match cell {
                Cell::Text(text) => sheet.write_string(row_num, col as u16, *text)?,
                Cell::Number(number) => sheet.write_number(row_num, col as u16, *number)?,
            };
        }
    }
    for (col, width) in column_widths(&headers, rows).into_iter().enumerate() {
        sheet.set_column_width(col as u16, width as f64)?;
    }

    Ok(workbook.save_to_buffer()?)
}
