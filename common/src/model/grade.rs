use crate::model::student::StudentSummary;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExamType {
    #[serde(rename = "중간고사")]
    Midterm,
    #[serde(rename = "기말고사")]
    Final,
    #[serde(rename = "모의고사")]
    Mock,
    #[serde(rename = "수행평가")]
    Performance,
}

impl ExamType {
    pub const ALL: [ExamType; 4] = [
        ExamType::Midterm,
        ExamType::Final,
        ExamType::Mock,
        ExamType::Performance,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ExamType::Midterm => "중간고사",
            ExamType::Final => "기말고사",
            ExamType::Mock => "모의고사",
            ExamType::Performance => "수행평가",
        }
    }

    pub fn from_label(label: &str) -> Option<ExamType> {
        ExamType::ALL.into_iter().find(|t| t.label() == label)
    }
}

impl fmt::Display for ExamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A validated exam result row. `student_name` is resolved to an id before insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeRecord {
    pub student_name: String,
    pub subject: String,
    pub semester: String,
    pub exam_type: ExamType,
    pub score: f64,
    pub exam_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grade {
    pub id: String,
    pub student_id: String,
    pub subject: String,
    pub semester: String,
    pub exam_type: ExamType,
    pub score: f64,
    pub exam_date: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeListItem {
    #[serde(flatten)]
    pub grade: Grade,
    pub student: StudentSummary,
}
