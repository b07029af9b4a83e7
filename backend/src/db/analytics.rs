//! Academy-wide score statistics behind `GET /api/analytics`.
//!
//! Grades are fetched once and aggregated in memory, the per-student and
//! per-subject groupings need every score anyway.

use super::queries::round_one_decimal;
use super::{SqliteStore, StoreError};
use chrono::NaiveDate;
use common::model::analytics::{
    AnalyticsSummary, MonthlyTrend, ScoreBand, SubjectPerformance, TopPerformer,
};
use rusqlite::params;
use std::collections::{BTreeMap, HashMap};

const TOP_PERFORMER_LIMIT: usize = 5;

/// Lower bound (inclusive) and label of each score band, highest first.
const SCORE_BANDS: [(f64, &str); 5] = [
    (90.0, "90-100점"),
    (80.0, "80-89점"),
    (70.0, "70-79점"),
    (60.0, "60-69점"),
    (f64::NEG_INFINITY, "60점 미만"),
];

struct ScoreRow {
    student_id: String,
    student_name: String,
    subject: String,
    score: f64,
    exam_date: String,
}

#[derive(Default)]
struct Tally {
    sum: f64,
    count: i64,
}

impl Tally {
    fn add(&mut self, score: f64) {
        self.sum += score;
        self.count += 1;
    }

    fn average(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            round_one_decimal(self.sum / self.count as f64)
        }
    }
}

/// `2025-05-15` → `("2025-05", "2025년 5월")`.
fn month_of(exam_date: &str) -> Option<(String, String)> {
    let date = NaiveDate::parse_from_str(exam_date.get(..10)?, "%Y-%m-%d").ok()?;
    Some((
        date.format("%Y-%m").to_string(),
        date.format("%Y년 %-m월").to_string(),
    ))
}

fn score_band(score: f64) -> usize {
    SCORE_BANDS
        .iter()
        .position(|(floor, _)| score >= *floor)
        .unwrap_or(SCORE_BANDS.len() - 1)
}

fn top_performers(rows: &[ScoreRow]) -> Vec<TopPerformer> {
    let mut by_student: HashMap<&str, (&str, Tally)> = HashMap::new();
    for row in rows {
        by_student
            .entry(row.student_id.as_str())
            .or_insert_with(|| (row.student_name.as_str(), Tally::default()))
            .1
            .add(row.score);
    }
    let mut performers: Vec<TopPerformer> = by_student
        .into_iter()
        .map(|(id, (name, tally))| TopPerformer {
            id: id.to_string(),
            name: name.to_string(),
            average_score: tally.average(),
        })
        .collect();
    performers.sort_by(|a, b| {
        b.average_score
            .total_cmp(&a.average_score)
            .then_with(|| a.name.cmp(&b.name))
    });
    performers.truncate(TOP_PERFORMER_LIMIT);
    performers
}

fn subject_performance(rows: &[ScoreRow]) -> Vec<SubjectPerformance> {
    let mut by_subject: BTreeMap<&str, Tally> = BTreeMap::new();
    for row in rows {
        by_subject.entry(row.subject.as_str()).or_default().add(row.score);
    }
    let mut subjects: Vec<SubjectPerformance> = by_subject
        .into_iter()
        .map(|(subject, tally)| SubjectPerformance {
            subject: subject.to_string(),
            average_score: tally.average(),
            count: tally.count,
        })
        .collect();
    subjects.sort_by(|a, b| b.average_score.total_cmp(&a.average_score));
    subjects
}

fn recent_trends(rows: &[ScoreRow], since: NaiveDate) -> Vec<MonthlyTrend> {
    let since = since.format("%Y-%m-%d").to_string();
    let mut by_month: BTreeMap<String, (String, Tally)> = BTreeMap::new();
    for row in rows.iter().filter(|row| row.exam_date.as_str() >= since.as_str()) {
        if let Some((key, label)) = month_of(&row.exam_date) {
            by_month
                .entry(key)
                .or_insert_with(|| (label, Tally::default()))
                .1
                .add(row.score);
        }
    }
    by_month
        .into_values()
        .map(|(month, tally)| MonthlyTrend {
            month,
            average_score: tally.average(),
        })
        .collect()
}

fn grade_distribution(rows: &[ScoreRow]) -> Vec<ScoreBand> {
    let mut counts = [0i64; SCORE_BANDS.len()];
    for row in rows {
        counts[score_band(row.score)] += 1;
    }
    SCORE_BANDS
        .iter()
        .zip(counts)
        .filter(|(_, count)| *count > 0)
        .map(|((_, range), count)| ScoreBand {
            range: range.to_string(),
            count,
        })
        .collect()
}

impl SqliteStore {
    /// Statistics over every grade of `academy_id`. Monthly trends only
    /// include exams on or after `trends_since`.
    pub fn analytics(
        &self,
        academy_id: &str,
        trends_since: NaiveDate,
    ) -> Result<AnalyticsSummary, StoreError> {
        let (total_students, active_goals, rows) = self.with_conn(|conn| {
            let total_students: i64 = conn.query_row(
                "SELECT COUNT(*) FROM students WHERE academy_id = ?1",
                params![academy_id],
                |row| row.get(0),
            )?;
            let active_goals: i64 = conn.query_row(
                "SELECT COUNT(*) FROM goals o JOIN students s ON s.id = o.student_id \
                 WHERE s.academy_id = ?1 AND o.status = 'IN_PROGRESS'",
                params![academy_id],
                |row| row.get(0),
            )?;
            let rows = conn
                .prepare(
                    "SELECT s.id, s.name, g.subject, g.score, g.exam_date \
                     FROM grades g JOIN students s ON s.id = g.student_id \
                     WHERE s.academy_id = ?1 \
                     ORDER BY g.exam_date ASC, g.rowid ASC",
                )?
                .query_map(params![academy_id], |row| {
                    Ok(ScoreRow {
                        student_id: row.get(0)?,
                        student_name: row.get(1)?,
                        subject: row.get(2)?,
                        score: row.get(3)?,
                        exam_date: row.get(4)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok((total_students, active_goals, rows))
        })?;

        let mut overall = Tally::default();
        rows.iter().for_each(|row| overall.add(row.score));

        Ok(AnalyticsSummary {
            total_students,
            total_grades: overall.count,
            average_score: overall.average(),
            active_goals,
            top_performers: top_performers(&rows),
            subject_performance: subject_performance(&rows),
            recent_trends: recent_trends(&rows, trends_since),
            grade_distribution: grade_distribution(&rows),
        })
    }
}
