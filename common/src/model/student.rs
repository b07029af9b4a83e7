use crate::model::goal::Goal;
use crate::model::grade::Grade;
use serde::{Deserialize, Serialize};

/// A validated student row from an upload, not yet persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    pub name: String,
    pub grade: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// A student as stored for an academy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub academy_id: String,
    pub name: String,
    pub grade: i64,
    pub class: Option<i64>,
    pub phone: Option<String>,
    pub parent_phone: Option<String>,
    pub address: Option<String>,
    pub created_at: String,
}

/// Identifier/name pair returned by name lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentRef {
    pub id: String,
    pub name: String,
}

/// Compact student view embedded in grade and goal listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentSummary {
    pub id: String,
    pub name: String,
    pub grade: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentListItem {
    #[serde(flatten)]
    pub student: Student,
    pub grade_count: i64,
    pub goal_count: i64,
}

/// A student with all of its grades and goals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentDetail {
    #[serde(flatten)]
    pub student: Student,
    pub grades: Vec<Grade>,
    pub goals: Vec<Goal>,
}
