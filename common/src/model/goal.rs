use crate::model::student::StudentSummary;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GoalStatus {
    InProgress,
    Achieved,
    Failed,
}

impl GoalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalStatus::InProgress => "IN_PROGRESS",
            GoalStatus::Achieved => "ACHIEVED",
            GoalStatus::Failed => "FAILED",
        }
    }

    pub fn parse(value: &str) -> Option<GoalStatus> {
        match value {
            "IN_PROGRESS" => Some(GoalStatus::InProgress),
            "ACHIEVED" => Some(GoalStatus::Achieved),
            "FAILED" => Some(GoalStatus::Failed),
            _ => None,
        }
    }
}

/// A validated learning goal row. `student_name` is resolved to an id before insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalRecord {
    pub student_name: String,
    pub title: String,
    pub current_score: f64,
    pub target_score: f64,
    pub deadline: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub student_id: String,
    pub title: String,
    pub current_score: f64,
    pub target_score: f64,
    pub deadline: String,
    pub status: GoalStatus,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalListItem {
    #[serde(flatten)]
    pub goal: Goal,
    pub student: StudentSummary,
}
