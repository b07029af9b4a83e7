use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopPerformer {
    pub id: String,
    pub name: String,
    pub average_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectPerformance {
    pub subject: String,
    pub average_score: f64,
    pub count: i64,
}

/// Average score of the exams held in one calendar month, e.g. `2025년 5월`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTrend {
    pub month: String,
    pub average_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBand {
    pub range: String,
    pub count: i64,
}

/// Aggregate statistics for one academy.
///
/// Averages are rounded to one decimal. `gradeDistribution` omits empty bands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub total_students: i64,
    pub total_grades: i64,
    pub average_score: f64,
    pub active_goals: i64,
    pub top_performers: Vec<TopPerformer>,
    pub subject_performance: Vec<SubjectPerformance>,
    pub recent_trends: Vec<MonthlyTrend>,
    pub grade_distribution: Vec<ScoreBand>,
}
