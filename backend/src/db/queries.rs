//! Read-side queries behind the listing and dashboard endpoints.

use super::{SqliteStore, StoreError};
use common::model::dashboard::{Activity, DashboardMetrics, DashboardStats, DashboardSummary};
use common::model::goal::{Goal, GoalListItem, GoalStatus};
use common::model::grade::{ExamType, Grade, GradeListItem};
use common::model::student::{Student, StudentDetail, StudentListItem, StudentSummary};
use common::requests::{GoalFilter, GoalUpdate, GradeFilter, StudentFilter};
use rusqlite::types::{Type, Value};
use rusqlite::{params, params_from_iter, OptionalExtension, Row};

const RECENT_ACTIVITY_LIMIT: i64 = 5;

fn conversion_error(idx: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, message.into())
}

fn exam_type_at(row: &Row, idx: usize) -> rusqlite::Result<ExamType> {
    let label: String = row.get(idx)?;
    ExamType::from_label(&label)
        .ok_or_else(|| conversion_error(idx, format!("unknown exam type '{}'", label)))
}

fn goal_status_at(row: &Row, idx: usize) -> rusqlite::Result<GoalStatus> {
    let value: String = row.get(idx)?;
    GoalStatus::parse(&value)
        .ok_or_else(|| conversion_error(idx, format!("unknown goal status '{}'", value)))
}

fn student_summary_at(row: &Row, idx: usize) -> rusqlite::Result<StudentSummary> {
    Ok(StudentSummary {
        id: row.get(idx)?,
        name: row.get(idx + 1)?,
        grade: row.get(idx + 2)?,
    })
}

const STUDENT_COLUMNS: &str =
    "s.id, s.academy_id, s.name, s.grade, s.class, s.phone, s.parent_phone, s.address, s.created_at";
const GRADE_COLUMNS: &str =
    "g.id, g.student_id, g.subject, g.semester, g.exam_type, g.score, g.exam_date, g.created_at";
const GOAL_COLUMNS: &str =
    "o.id, o.student_id, o.title, o.current_score, o.target_score, o.deadline, o.status, o.created_at";

/// Reads [`STUDENT_COLUMNS`] starting at `idx`.
fn student_at(row: &Row, idx: usize) -> rusqlite::Result<Student> {
    Ok(Student {
        id: row.get(idx)?,
        academy_id: row.get(idx + 1)?,
        name: row.get(idx + 2)?,
        grade: row.get(idx + 3)?,
        class: row.get(idx + 4)?,
        phone: row.get(idx + 5)?,
        parent_phone: row.get(idx + 6)?,
        address: row.get(idx + 7)?,
        created_at: row.get(idx + 8)?,
    })
}

/// Reads [`GRADE_COLUMNS`] starting at `idx`.
fn grade_at(row: &Row, idx: usize) -> rusqlite::Result<Grade> {
    Ok(Grade {
        id: row.get(idx)?,
        student_id: row.get(idx + 1)?,
        subject: row.get(idx + 2)?,
        semester: row.get(idx + 3)?,
        exam_type: exam_type_at(row, idx + 4)?,
        score: row.get(idx + 5)?,
        exam_date: row.get(idx + 6)?,
        created_at: row.get(idx + 7)?,
    })
}

/// Reads [`GOAL_COLUMNS`] starting at `idx`.
fn goal_at(row: &Row, idx: usize) -> rusqlite::Result<Goal> {
    Ok(Goal {
        id: row.get(idx)?,
        student_id: row.get(idx + 1)?,
        title: row.get(idx + 2)?,
        current_score: row.get(idx + 3)?,
        target_score: row.get(idx + 4)?,
        deadline: row.get(idx + 5)?,
        status: goal_status_at(row, idx + 6)?,
        created_at: row.get(idx + 7)?,
    })
}

/// Whole-number percentage, 0 when there is nothing to measure.
pub(crate) fn rate(part: i64, whole: i64) -> i64 {
    if whole <= 0 {
        return 0;
    }
    ((part as f64 / whole as f64) * 100.0).round() as i64
}

pub(crate) fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

impl SqliteStore {
    pub fn list_students(
        &self,
        academy_id: &str,
        filter: &StudentFilter,
    ) -> Result<Vec<StudentListItem>, StoreError> {
        let mut sql = format!(
            "SELECT {STUDENT_COLUMNS}, \
                    (SELECT COUNT(*) FROM grades g WHERE g.student_id = s.id), \
                    (SELECT COUNT(*) FROM goals o WHERE o.student_id = s.id) \
             FROM students s WHERE s.academy_id = ?"
        );
        let mut values = vec![Value::Text(academy_id.to_string())];
        if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
            sql.push_str(" AND instr(s.name, ?) > 0");
            values.push(Value::Text(search.to_string()));
        }
        if let Some(grade) = filter.grade {
            sql.push_str(" AND s.grade = ?");
            values.push(Value::Integer(grade));
        }
        sql.push_str(" ORDER BY s.created_at DESC, s.rowid DESC");

        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(params_from_iter(values), |row| {
                    Ok(StudentListItem {
                        student: student_at(row, 0)?,
                        grade_count: row.get(9)?,
                        goal_count: row.get(10)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn list_grades(
        &self,
        academy_id: &str,
        filter: &GradeFilter,
    ) -> Result<Vec<GradeListItem>, StoreError> {
        let mut sql = format!(
            "SELECT {GRADE_COLUMNS}, s.id, s.name, s.grade \
             FROM grades g JOIN students s ON s.id = g.student_id \
             WHERE s.academy_id = ?"
        );
        let mut values = vec![Value::Text(academy_id.to_string())];
        if let Some(student_id) = &filter.student_id {
            sql.push_str(" AND g.student_id = ?");
            values.push(Value::Text(student_id.clone()));
        }
        if let Some(subject) = &filter.subject {
            sql.push_str(" AND g.subject = ?");
            values.push(Value::Text(subject.clone()));
        }
        sql.push_str(" ORDER BY g.exam_date DESC, g.rowid DESC");

        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(params_from_iter(values), |row| {
                    Ok(GradeListItem {
                        grade: grade_at(row, 0)?,
                        student: student_summary_at(row, 8)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn list_goals(
        &self,
        academy_id: &str,
        filter: &GoalFilter,
    ) -> Result<Vec<GoalListItem>, StoreError> {
        let mut sql = format!(
            "SELECT {GOAL_COLUMNS}, s.id, s.name, s.grade \
             FROM goals o JOIN students s ON s.id = o.student_id \
             WHERE s.academy_id = ?"
        );
        let mut values = vec![Value::Text(academy_id.to_string())];
        if let Some(student_id) = &filter.student_id {
            sql.push_str(" AND o.student_id = ?");
            values.push(Value::Text(student_id.clone()));
        }
        sql.push_str(" ORDER BY o.deadline ASC, o.rowid ASC");

        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(params_from_iter(values), |row| {
                    Ok(GoalListItem {
                        goal: goal_at(row, 0)?,
                        student: student_summary_at(row, 8)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// The student `student_id` if it belongs to `academy_id`.
    pub fn student_summary(
        &self,
        academy_id: &str,
        student_id: &str,
    ) -> Result<Option<StudentSummary>, StoreError> {
        self.with_conn(|conn| {
            Ok(conn
                .query_row(
                    "SELECT s.id, s.name, s.grade FROM students s \
                     WHERE s.id = ?1 AND s.academy_id = ?2",
                    params![student_id, academy_id],
                    |row| student_summary_at(row, 0),
                )
                .optional()?)
        })
    }

    /// One student with every grade (latest exam first) and goal (nearest
    /// deadline first).
    pub fn student_detail(
        &self,
        academy_id: &str,
        student_id: &str,
    ) -> Result<Option<StudentDetail>, StoreError> {
        self.with_conn(|conn| {
            let student = conn
                .query_row(
                    &format!(
                        "SELECT {STUDENT_COLUMNS} FROM students s \
                         WHERE s.id = ?1 AND s.academy_id = ?2"
                    ),
                    params![student_id, academy_id],
                    |row| student_at(row, 0),
                )
                .optional()?;
            let Some(student) = student else {
                return Ok(None);
            };

            let grades = conn
                .prepare(&format!(
                    "SELECT {GRADE_COLUMNS} FROM grades g WHERE g.student_id = ?1 \
                     ORDER BY g.exam_date DESC, g.rowid DESC"
                ))?
                .query_map(params![student.id], |row| grade_at(row, 0))?
                .collect::<Result<Vec<_>, _>>()?;
            let goals = conn
                .prepare(&format!(
                    "SELECT {GOAL_COLUMNS} FROM goals o WHERE o.student_id = ?1 \
                     ORDER BY o.deadline ASC, o.rowid ASC"
                ))?
                .query_map(params![student.id], |row| goal_at(row, 0))?
                .collect::<Result<Vec<_>, _>>()?;

            Ok(Some(StudentDetail {
                student,
                grades,
                goals,
            }))
        })
    }

    /// Applies `update` to goal `goal_id` of `academy_id`. `None` when no
    /// such goal exists for the academy.
    pub fn update_goal(
        &self,
        academy_id: &str,
        goal_id: &str,
        update: &GoalUpdate,
    ) -> Result<Option<GoalListItem>, StoreError> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE goals \
                 SET current_score = COALESCE(?1, current_score), status = COALESCE(?2, status) \
                 WHERE id = ?3 \
                   AND student_id IN (SELECT id FROM students WHERE academy_id = ?4)",
                params![
                    update.current_score,
                    update.status.map(|status| status.as_str()),
                    goal_id,
                    academy_id
                ],
            )?;
            if changed == 0 {
                return Ok(None);
            }
            Ok(conn
                .query_row(
                    &format!(
                        "SELECT {GOAL_COLUMNS}, s.id, s.name, s.grade \
                         FROM goals o JOIN students s ON s.id = o.student_id WHERE o.id = ?1"
                    ),
                    params![goal_id],
                    |row| {
                        Ok(GoalListItem {
                            goal: goal_at(row, 0)?,
                            student: student_summary_at(row, 8)?,
                        })
                    },
                )
                .optional()?)
        })
    }

    pub fn dashboard(&self, academy_id: &str) -> Result<DashboardSummary, StoreError> {
        self.with_conn(|conn| {
            let student_count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM students WHERE academy_id = ?1",
                params![academy_id],
                |row| row.get(0),
            )?;

            let (grade_count, average, graded_students): (i64, Option<f64>, i64) = conn
                .query_row(
                    "SELECT COUNT(*), AVG(g.score), COUNT(DISTINCT g.student_id) \
                     FROM grades g JOIN students s ON s.id = g.student_id \
                     WHERE s.academy_id = ?1",
                    params![academy_id],
                    |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
                )?;

            let (total_goals, in_progress, achieved): (i64, Option<i64>, Option<i64>) = conn
                .query_row(
                    "SELECT COUNT(*), \
                            SUM(o.status = 'IN_PROGRESS'), \
                            SUM(o.status = 'ACHIEVED') \
                     FROM goals o JOIN students s ON s.id = o.student_id \
                     WHERE s.academy_id = ?1",
                    params![academy_id],
                    |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
                )?;

            let mut stmt = conn.prepare(
                "SELECT s.name, g.subject, g.exam_type, g.score, g.created_at \
                 FROM grades g JOIN students s ON s.id = g.student_id \
                 WHERE s.academy_id = ?1 \
                 ORDER BY g.created_at DESC, g.rowid DESC LIMIT ?2",
            )?;
            let activities = stmt
                .query_map(params![academy_id, RECENT_ACTIVITY_LIMIT], |row| {
                    let name: String = row.get(0)?;
                    let subject: String = row.get(1)?;
                    let exam_type = exam_type_at(row, 2)?;
                    let score: f64 = row.get(3)?;
                    Ok(Activity {
                        title: format!("{} 학생 성적 입력", name),
                        description: format!("{} - {} {}점", exam_type, subject, score),
                        created_at: row.get(4)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;

            Ok(DashboardSummary {
                stats: DashboardStats {
                    student_count,
                    grade_count,
                    goal_count: in_progress.unwrap_or(0),
                    average_score: average.map(round_one_decimal).unwrap_or(0.0),
                },
                metrics: DashboardMetrics {
                    grade_input_rate: rate(graded_students, student_count),
                    goal_achievement_rate: rate(achieved.unwrap_or(0), total_goals),
                },
                activities,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::AcademyStore;
    use common::model::goal::GoalRecord;
    use common::model::grade::GradeRecord;
    use common::model::student::StudentRecord;

    fn seed(store: &SqliteStore) -> Vec<Student> {
        let records: Vec<StudentRecord> = [("김철수", 3), ("이영희", 2), ("박민수", 3)]
            .iter()
            .map(|(name, grade)| StudentRecord {
                name: name.to_string(),
                grade: *grade,
                class: None,
                phone: None,
                parent_phone: None,
                address: None,
            })
            .collect();
        store.insert_students("a1", &records).unwrap()
    }

    fn grade(subject: &str, score: f64, date: &str) -> GradeRecord {
        GradeRecord {
            student_name: String::new(),
            subject: subject.to_string(),
            semester: "2025-1학기".to_string(),
            exam_type: ExamType::Final,
            score,
            exam_date: date.to_string(),
        }
    }

    #[test]
    fn rates_round_and_guard_zero() {
        assert_eq!(rate(1, 3), 33);
        assert_eq!(rate(2, 3), 67);
        assert_eq!(rate(5, 0), 0);
        assert_eq!(round_one_decimal(86.666), 86.7);
    }

    #[test]
    fn student_filters_are_optional() {
        let store = SqliteStore::open_in_memory().unwrap();
        seed(&store);
        store
            .insert_students(
                "a2",
                &[StudentRecord {
                    name: "김철수".to_string(),
                    grade: 3,
                    class: None,
                    phone: None,
                    parent_phone: None,
                    address: None,
                }],
            )
            .unwrap();

        let all = store.list_students("a1", &StudentFilter::default()).unwrap();
        assert_eq!(all.len(), 3);

        let third = store
            .list_students("a1", &StudentFilter { search: None, grade: Some(3) })
            .unwrap();
        assert_eq!(third.len(), 2);

        let kim = store
            .list_students(
                "a1",
                &StudentFilter {
                    search: Some("철".to_string()),
                    grade: None,
                },
            )
            .unwrap();
        assert_eq!(kim.len(), 1);
        assert_eq!(kim[0].student.name, "김철수");
    }

    #[test]
    fn grade_listing_filters_by_subject_and_orders_by_date() {
        let store = SqliteStore::open_in_memory().unwrap();
        let students = seed(&store);
        let id = students[0].id.clone();
        store
            .insert_grades(&[
                (id.clone(), grade("수학", 80.0, "2025-03-01")),
                (id.clone(), grade("수학", 90.0, "2025-06-01")),
                (id.clone(), grade("영어", 70.0, "2025-04-01")),
            ])
            .unwrap();

        let math = store
            .list_grades(
                "a1",
                &GradeFilter {
                    student_id: Some(id),
                    subject: Some("수학".to_string()),
                },
            )
            .unwrap();
        assert_eq!(math.len(), 2);
        assert_eq!(math[0].grade.exam_date, "2025-06-01");
        assert_eq!(math[0].student.name, "김철수");
        assert!(store.list_grades("a2", &GradeFilter::default()).unwrap().is_empty());
    }

    #[test]
    fn dashboard_aggregates_one_academy() {
        let store = SqliteStore::open_in_memory().unwrap();
        let students = seed(&store);
        store
            .insert_grades(&[
                (students[0].id.clone(), grade("수학", 85.0, "2025-05-15")),
                (students[0].id.clone(), grade("영어", 90.0, "2025-05-15")),
                (students[1].id.clone(), grade("수학", 88.0, "2025-05-15")),
            ])
            .unwrap();
        let goals = store
            .insert_goals(&[
                (
                    students[0].id.clone(),
                    GoalRecord {
                        student_name: String::new(),
                        title: "수학 90점".to_string(),
                        current_score: 75.0,
                        target_score: 90.0,
                        deadline: "2025-06-30".to_string(),
                    },
                ),
                (
                    students[1].id.clone(),
                    GoalRecord {
                        student_name: String::new(),
                        title: "영어 95점".to_string(),
                        current_score: 87.0,
                        target_score: 95.0,
                        deadline: "2025-07-15".to_string(),
                    },
                ),
            ])
            .unwrap();
        store
            .with_conn(|conn| {
                conn.execute(
                    "UPDATE goals SET status = 'ACHIEVED' WHERE id = ?1",
                    params![goals[0].id],
                )?;
                Ok(())
            })
            .unwrap();

        let summary = store.dashboard("a1").unwrap();
        assert_eq!(summary.stats.student_count, 3);
        assert_eq!(summary.stats.grade_count, 3);
        assert_eq!(summary.stats.goal_count, 1);
        assert_eq!(summary.stats.average_score, 87.7);
        assert_eq!(summary.metrics.grade_input_rate, 67);
        assert_eq!(summary.metrics.goal_achievement_rate, 50);
        assert_eq!(summary.activities.len(), 3);
        assert!(summary.activities[0].title.ends_with("학생 성적 입력"));

        let empty = store.dashboard("nobody").unwrap();
        assert_eq!(empty.stats.average_score, 0.0);
        assert_eq!(empty.metrics.grade_input_rate, 0);
        assert!(empty.activities.is_empty());
    }

    fn goal(title: &str, deadline: &str) -> GoalRecord {
        GoalRecord {
            student_name: String::new(),
            title: title.to_string(),
            current_score: 70.0,
            target_score: 90.0,
            deadline: deadline.to_string(),
        }
    }

    #[test]
    fn student_detail_orders_grades_and_goals() {
        let store = SqliteStore::open_in_memory().unwrap();
        let students = seed(&store);
        let id = students[0].id.clone();
        store
            .insert_grades(&[
                (id.clone(), grade("수학", 80.0, "2025-03-01")),
                (id.clone(), grade("영어", 90.0, "2025-06-01")),
                (students[1].id.clone(), grade("수학", 70.0, "2025-06-01")),
            ])
            .unwrap();
        store
            .insert_goals(&[
                (id.clone(), goal("영어 95점", "2025-09-30")),
                (id.clone(), goal("수학 90점", "2025-06-30")),
            ])
            .unwrap();

        let detail = store.student_detail("a1", &id).unwrap().unwrap();
        assert_eq!(detail.student.name, "김철수");
        let dates: Vec<&str> = detail.grades.iter().map(|g| g.exam_date.as_str()).collect();
        assert_eq!(dates, vec!["2025-06-01", "2025-03-01"]);
        let titles: Vec<&str> = detail.goals.iter().map(|g| g.title.as_str()).collect();
        assert_eq!(titles, vec!["수학 90점", "영어 95점"]);

        assert!(store.student_detail("a2", &id).unwrap().is_none());
        assert!(store.student_detail("a1", "missing").unwrap().is_none());
    }

    #[test]
    fn goal_updates_stay_inside_the_academy() {
        let store = SqliteStore::open_in_memory().unwrap();
        let students = seed(&store);
        let goals = store
            .insert_goals(&[(students[0].id.clone(), goal("수학 90점", "2025-06-30"))])
            .unwrap();

        let update = GoalUpdate {
            current_score: Some(92.0),
            status: Some(GoalStatus::Achieved),
        };
        assert!(store.update_goal("a2", &goals[0].id, &update).unwrap().is_none());

        let updated = store.update_goal("a1", &goals[0].id, &update).unwrap().unwrap();
        assert_eq!(updated.goal.current_score, 92.0);
        assert_eq!(updated.goal.status, GoalStatus::Achieved);
        assert_eq!(updated.goal.target_score, 90.0);
        assert_eq!(updated.student.name, "김철수");

        let partial = store
            .update_goal("a1", &goals[0].id, &GoalUpdate { current_score: None, status: Some(GoalStatus::Failed) })
            .unwrap()
            .unwrap();
        assert_eq!(partial.goal.current_score, 92.0);
        assert_eq!(partial.goal.status, GoalStatus::Failed);

        assert_eq!(store.dashboard("a1").unwrap().metrics.goal_achievement_rate, 0);
        assert_eq!(
            store.student_summary("a1", &students[1].id).unwrap().map(|s| s.name),
            Some("이영희".to_string())
        );
        assert!(store.student_summary("a2", &students[1].id).unwrap().is_none());
    }
}
