//! Strict per-record schemas.
//!
//! Validation never coerces or repairs a value. Each row is checked against
//! every rule of its schema and all violations are reported together.

use crate::ingest::mapper::MappedRow;
use common::model::goal::GoalRecord;
use common::model::grade::{ExamType, GradeRecord};
use common::model::student::StudentRecord;
use common::model::upload::{InvalidRow, ValidationOutcome};
use lazy_regex::regex_is_match;
use serde_json::{Map, Value};

const PHONE_FORMAT_MESSAGE: &str = "올바른 전화번호 형식이 아닙니다 (예: 010-1234-5678)";
const EXAM_TYPE_MESSAGE: &str =
    "시험종류는 중간고사, 기말고사, 모의고사, 수행평가 중 하나여야 합니다";

/// A record type that can be built from one mapped row.
pub trait RecordSchema: Sized {
    fn from_fields(fields: &Map<String, Value>) -> Result<Self, Vec<String>>;
}

/// Appends the Korean topic particle (은/는) that fits `label`.
fn topic(label: &str) -> String {
    let particle = match label.chars().last() {
        Some(c) if ('가'..='힣').contains(&c) && (c as u32 - '가' as u32) % 28 == 0 => "는",
        Some(c) if ('가'..='힣').contains(&c) => "은",
        _ => "는",
    };
    format!("{label}{particle}")
}

struct Bounds {
    min: i64,
    max: i64,
    integer: bool,
}

struct RowCheck<'a> {
    fields: &'a Map<String, Value>,
    errors: Vec<String>,
}

impl<'a> RowCheck<'a> {
    fn new(fields: &'a Map<String, Value>) -> Self {
        RowCheck {
            fields,
            errors: Vec::new(),
        }
    }

    fn fail(&mut self, message: String) {
        self.errors.push(message);
    }

    /// Absent and null are treated alike.
    fn value(&self, key: &str) -> Option<&'a Value> {
        self.fields.get(key).filter(|v| !v.is_null())
    }

    fn required_text(&mut self, key: &str, label: &str, max_chars: Option<usize>) -> Option<&'a str> {
        match self.value(key) {
            None => {
                self.fail(format!("{} 필수입니다", topic(label)));
                None
            }
            Some(Value::String(s)) => {
                if s.is_empty() {
                    self.fail(format!("{} 필수입니다", topic(label)));
                }
                self.max_chars(s, label, max_chars);
                Some(s.as_str())
            }
            Some(_) => {
                self.fail(format!("{} 문자열이어야 합니다", topic(label)));
                None
            }
        }
    }

    fn optional_text(&mut self, key: &str, label: &str, max_chars: Option<usize>) -> Option<&'a str> {
        match self.value(key) {
            None => None,
            Some(Value::String(s)) => {
                self.max_chars(s, label, max_chars);
                Some(s.as_str())
            }
            Some(_) => {
                self.fail(format!("{} 문자열이어야 합니다", topic(label)));
                None
            }
        }
    }

    fn max_chars(&mut self, s: &str, label: &str, max_chars: Option<usize>) {
        if let Some(max) = max_chars {
            if s.chars().count() > max {
                self.fail(format!("{} {}자 이하여야 합니다", topic(label), max));
            }
        }
    }

    fn optional_phone(&mut self, key: &str, label: &str) -> Option<&'a str> {
        let phone = self.optional_text(key, label, None)?;
        if !regex_is_match!(r"^010-\d{4}-\d{4}$", phone) {
            self.fail(PHONE_FORMAT_MESSAGE.to_string());
        }
        Some(phone)
    }

    fn number(&mut self, value: &Value, label: &str, bounds: &Bounds) -> Option<f64> {
        let Some(n) = value.as_f64() else {
            self.fail(format!("{} 숫자여야 합니다", topic(label)));
            return None;
        };
        if bounds.integer && n.fract() != 0.0 {
            self.fail(format!("{} 정수여야 합니다", topic(label)));
        }
        if n < bounds.min as f64 {
            self.fail(format!("{} {} 이상이어야 합니다", topic(label), bounds.min));
        }
        if n > bounds.max as f64 {
            self.fail(format!("{} {} 이하여야 합니다", topic(label), bounds.max));
        }
        Some(n)
    }

    fn required_number(&mut self, key: &str, label: &str, bounds: Bounds) -> Option<f64> {
        match self.value(key) {
            None => {
                self.fail(format!("{} 필수입니다", topic(label)));
                None
            }
            Some(value) => self.number(value, label, &bounds),
        }
    }

    fn optional_number(&mut self, key: &str, label: &str, bounds: Bounds) -> Option<f64> {
        let value = self.value(key)?;
        self.number(value, label, &bounds)
    }

    fn exam_type(&mut self, key: &str) -> Option<ExamType> {
        let parsed = self.value(key).and_then(Value::as_str).and_then(ExamType::from_label);
        if parsed.is_none() {
            self.fail(EXAM_TYPE_MESSAGE.to_string());
        }
        parsed
    }

    fn finish<T>(self, record: Option<T>) -> Result<T, Vec<String>> {
        match record {
            Some(record) if self.errors.is_empty() => Ok(record),
            _ => Err(self.errors),
        }
    }
}

const fn score_bounds() -> Bounds {
    Bounds {
        min: 0,
        max: 100,
        integer: false,
    }
}

impl RecordSchema for StudentRecord {
    fn from_fields(fields: &Map<String, Value>) -> Result<Self, Vec<String>> {
        let mut check = RowCheck::new(fields);
        let name = check.required_text("name", "이름", Some(50));
        let grade = check.required_number(
            "grade",
            "학년",
            Bounds {
                min: 1,
                max: 12,
                integer: true,
            },
        );
        let class = check.optional_number(
            "class",
            "반",
            Bounds {
                min: 1,
                max: 20,
                integer: true,
            },
        );
        let phone = check.optional_phone("phone", "연락처");
        let parent_phone = check.optional_phone("parentPhone", "부모연락처");
        let address = check.optional_text("address", "주소", Some(200));

        let record = match (name, grade) {
            (Some(name), Some(grade)) => Some(StudentRecord {
                name: name.to_string(),
                grade: grade as i64,
                class: class.map(|c| c as i64),
                phone: phone.map(str::to_string),
                parent_phone: parent_phone.map(str::to_string),
                address: address.map(str::to_string),
            }),
            _ => None,
        };
        check.finish(record)
    }
}

impl RecordSchema for GradeRecord {
    fn from_fields(fields: &Map<String, Value>) -> Result<Self, Vec<String>> {
        let mut check = RowCheck::new(fields);
        let student_name = check.required_text("studentName", "학생명", None);
        let subject = check.required_text("subject", "과목명", Some(50));
        let semester = check.required_text("semester", "학기", None);
        let exam_type = check.exam_type("examType");
        let score = check.required_number("score", "점수", score_bounds());
        let exam_date = check.required_text("examDate", "시험일자", None);

        let record = match (student_name, subject, semester, exam_type, score, exam_date) {
            (Some(student_name), Some(subject), Some(semester), Some(exam_type), Some(score), Some(exam_date)) => {
                Some(GradeRecord {
                    student_name: student_name.to_string(),
                    subject: subject.to_string(),
                    semester: semester.to_string(),
                    exam_type,
                    score,
                    exam_date: exam_date.to_string(),
                })
            }
            _ => None,
        };
        check.finish(record)
    }
}

impl RecordSchema for GoalRecord {
    fn from_fields(fields: &Map<String, Value>) -> Result<Self, Vec<String>> {
        let mut check = RowCheck::new(fields);
        let student_name = check.required_text("studentName", "학생명", None);
        let title = check.required_text("title", "목표제목", Some(100));
        let current_score = check.required_number("currentScore", "현재점수", score_bounds());
        let target_score = check.required_number("targetScore", "목표점수", score_bounds());
        let deadline = check.required_text("deadline", "마감일", None);

        let record = match (student_name, title, current_score, target_score, deadline) {
            (Some(student_name), Some(title), Some(current_score), Some(target_score), Some(deadline)) => {
                Some(GoalRecord {
                    student_name: student_name.to_string(),
                    title: title.to_string(),
                    current_score,
                    target_score,
                    deadline: deadline.to_string(),
                })
            }
            _ => None,
        };
        check.finish(record)
    }
}

/// Splits `rows` into valid records and invalid rows. Every input row lands in
/// exactly one of the two lists.
pub fn validate_rows<T: RecordSchema>(rows: &[MappedRow]) -> ValidationOutcome<T> {
    let mut outcome = ValidationOutcome::default();
    for row in rows {
        match T::from_fields(&row.fields) {
            Ok(record) => outcome.valid.push(record),
            Err(errors) => outcome.invalid.push(InvalidRow {
                row: row.row,
                data: row.fields.clone(),
                errors,
            }),
        }
    }
    outcome
}
