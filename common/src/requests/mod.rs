use crate::model::goal::GoalStatus;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use std::fmt::Display;
use std::str::FromStr;

/// Query values arrive as strings; an empty one means "no filter".
fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(D::Error::custom),
    }
}

/// Query string for `GET /api/students`. Absent or empty fields do not filter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentFilter {
    /// Substring match on the student name.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub search: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub grade: Option<i64>,
}

/// Query string for `GET /api/grades`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeFilter {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub student_id: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub subject: Option<String>,
}

/// Query string for `GET /api/goals`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalFilter {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub student_id: Option<String>,
}

/// Body of `PATCH /api/goals/{id}`. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalUpdate {
    pub current_score: Option<f64>,
    pub status: Option<GoalStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_filters_are_absent() {
        let filter: StudentFilter = serde_json::from_value(json!({"search": "", "grade": " "})).unwrap();
        assert_eq!(filter.search, None);
        assert_eq!(filter.grade, None);

        let filter: GradeFilter = serde_json::from_value(json!({"studentId": "", "subject": "수학"})).unwrap();
        assert_eq!(filter.student_id, None);
        assert_eq!(filter.subject.as_deref(), Some("수학"));
    }

    #[test]
    fn grade_filter_is_parsed_from_text() {
        let filter: StudentFilter = serde_json::from_value(json!({"grade": "3"})).unwrap();
        assert_eq!(filter.grade, Some(3));
        assert!(serde_json::from_value::<StudentFilter>(json!({"grade": "three"})).is_err());
    }
}
