use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub student_count: i64,
    pub grade_count: i64,
    /// Goals still in progress.
    pub goal_count: i64,
    pub average_score: f64,
}

/// Percentages, rounded to whole numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub grade_input_rate: i64,
    pub goal_achievement_rate: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub title: String,
    pub description: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub stats: DashboardStats,
    pub metrics: DashboardMetrics,
    pub activities: Vec<Activity>,
}
