use rusqlite::Connection;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS students (
    id           TEXT PRIMARY KEY,
    academy_id   TEXT NOT NULL,
    name         TEXT NOT NULL,
    grade        INTEGER NOT NULL,
    class        INTEGER,
    phone        TEXT,
    parent_phone TEXT,
    address      TEXT,
    created_at   TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_students_academy_name ON students (academy_id, name);

CREATE TABLE IF NOT EXISTS grades (
    id         TEXT PRIMARY KEY,
    student_id TEXT NOT NULL REFERENCES students (id) ON DELETE CASCADE,
    subject    TEXT NOT NULL,
    semester   TEXT NOT NULL,
    exam_type  TEXT NOT NULL,
    score      REAL NOT NULL CHECK (score >= 0 AND score <= 100),
    exam_date  TEXT NOT NULL,
    created_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_grades_student ON grades (student_id);

CREATE TABLE IF NOT EXISTS goals (
    id            TEXT PRIMARY KEY,
    student_id    TEXT NOT NULL REFERENCES students (id) ON DELETE CASCADE,
    title         TEXT NOT NULL,
    current_score REAL NOT NULL,
    target_score  REAL NOT NULL,
    deadline      TEXT NOT NULL,
    status        TEXT NOT NULL DEFAULT 'IN_PROGRESS',
    created_at    TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_goals_student ON goals (student_id);
";

/// Creates every table the service needs. Safe to run on an existing database.
pub fn create_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA)
}
