//! SQLite persistence.
//!
//! [`SqliteStore`] owns a single connection shared behind a mutex; callers run
//! it from blocking tasks. The ingestion pipeline only sees it through the
//! [`AcademyStore`] trait, so every write path goes through one transaction
//! per upload.

mod analytics;
mod queries;
mod schema;

use chrono::{SecondsFormat, Utc};
use common::model::goal::{Goal, GoalRecord, GoalStatus};
use common::model::grade::{Grade, GradeRecord};
use common::model::student::{Student, StudentRecord, StudentRef};
use log::info;
use rusqlite::{params, params_from_iter, Connection};
use std::path::Path;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("database connection lock poisoned")]
    Poisoned,
}

/// Storage operations the ingestion pipeline depends on.
///
/// Each `insert_*` call is atomic: either every row is committed or none.
pub trait AcademyStore {
    /// Every student of `academy_id` whose name is in `names`, oldest first.
    fn find_students_by_names(
        &self,
        academy_id: &str,
        names: &[String],
    ) -> Result<Vec<StudentRef>, StoreError>;

    fn insert_students(
        &self,
        academy_id: &str,
        records: &[StudentRecord],
    ) -> Result<Vec<Student>, StoreError>;

    /// `rows` pairs each record with the id of the student it belongs to.
    fn insert_grades(&self, rows: &[(String, GradeRecord)]) -> Result<Vec<Grade>, StoreError>;

    fn insert_goals(&self, rows: &[(String, GoalRecord)]) -> Result<Vec<Goal>, StoreError>;
}

#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let store = Self::from_connection(Connection::open(path)?)?;
        info!("Database ready at {}", path.display());
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        schema::create_schema(&conn)?;
        Ok(SqliteStore {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub(crate) fn with_conn<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut Connection) -> Result<T, StoreError>,
    {
        let mut guard = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        f(&mut guard)
    }
}

impl AcademyStore for SqliteStore {
    fn find_students_by_names(
        &self,
        academy_id: &str,
        names: &[String],
    ) -> Result<Vec<StudentRef>, StoreError> {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        self.with_conn(|conn| {
            let placeholders = (0..names.len())
                .map(|i| format!("?{}", i + 2))
                .collect::<Vec<_>>()
                .join(", ");
            let sql = format!(
                "SELECT id, name FROM students WHERE academy_id = ?1 AND name IN ({}) \
                 ORDER BY created_at, rowid",
                placeholders
            );

            let mut values = Vec::with_capacity(names.len() + 1);
            values.push(academy_id);
            values.extend(names.iter().map(String::as_str));

            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(params_from_iter(values), |row| {
                    Ok(StudentRef {
                        id: row.get(0)?,
                        name: row.get(1)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    fn insert_students(
        &self,
        academy_id: &str,
        records: &[StudentRecord],
    ) -> Result<Vec<Student>, StoreError> {
        self.with_conn(|conn| {
            let tx = conn.transaction()?;
            let created_at = now();
            let mut created = Vec::with_capacity(records.len());
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO students \
                     (id, academy_id, name, grade, class, phone, parent_phone, address, created_at) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                )?;
                for record in records {
                    let student = Student {
                        id: Uuid::new_v4().to_string(),
                        academy_id: academy_id.to_string(),
                        name: record.name.clone(),
                        grade: record.grade,
                        class: record.class,
                        phone: record.phone.clone(),
                        parent_phone: record.parent_phone.clone(),
                        address: record.address.clone(),
                        created_at: created_at.clone(),
                    };
                    stmt.execute(params![
                        student.id,
                        student.academy_id,
                        student.name,
                        student.grade,
                        student.class,
                        student.phone,
                        student.parent_phone,
                        student.address,
                        student.created_at,
                    ])?;
                    created.push(student);
                }
            }
            tx.commit()?;
            Ok(created)
        })
    }

    fn insert_grades(&self, rows: &[(String, GradeRecord)]) -> Result<Vec<Grade>, StoreError> {
        self.with_conn(|conn| {
            let tx = conn.transaction()?;
            let created_at = now();
            let mut created = Vec::with_capacity(rows.len());
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO grades \
                     (id, student_id, subject, semester, exam_type, score, exam_date, created_at) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                )?;
                for (student_id, record) in rows {
                    let grade = Grade {
                        id: Uuid::new_v4().to_string(),
                        student_id: student_id.clone(),
                        subject: record.subject.clone(),
                        semester: record.semester.clone(),
                        exam_type: record.exam_type,
                        score: record.score,
                        exam_date: record.exam_date.clone(),
                        created_at: created_at.clone(),
                    };
                    stmt.execute(params![
                        grade.id,
                        grade.student_id,
                        grade.subject,
                        grade.semester,
                        grade.exam_type.label(),
                        grade.score,
                        grade.exam_date,
                        grade.created_at,
                    ])?;
                    created.push(grade);
                }
            }
            tx.commit()?;
            Ok(created)
        })
    }

    fn insert_goals(&self, rows: &[(String, GoalRecord)]) -> Result<Vec<Goal>, StoreError> {
        self.with_conn(|conn| {
            let tx = conn.transaction()?;
            let created_at = now();
            let mut created = Vec::with_capacity(rows.len());
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO goals \
                     (id, student_id, title, current_score, target_score, deadline, status, created_at) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                )?;
                for (student_id, record) in rows {
                    let goal = Goal {
                        id: Uuid::new_v4().to_string(),
                        student_id: student_id.clone(),
                        title: record.title.clone(),
                        current_score: record.current_score,
                        target_score: record.target_score,
                        deadline: record.deadline.clone(),
                        status: GoalStatus::InProgress,
                        created_at: created_at.clone(),
                    };
                    stmt.execute(params![
                        goal.id,
                        goal.student_id,
                        goal.title,
                        goal.current_score,
                        goal.target_score,
                        goal.deadline,
                        goal.status.as_str(),
                        goal.created_at,
                    ])?;
                    created.push(goal);
                }
            }
            tx.commit()?;
            Ok(created)
        })
    }
}
