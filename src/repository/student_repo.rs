// ==========================================
// 学生积分管理系统 - 学生仓储
// ==========================================
// 对齐: students 表
// 约束: 学生只增不删, 仅允许修改初始分
// ==========================================

use crate::domain::student::Student;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex, MutexGuard};

pub struct StudentRepository {
    conn: Arc<Mutex<Connection>>,
}

impl StudentRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row<'_>) -> SqliteResult<Student> {
        Ok(Student {
            id: Some(row.get(0)?),
            name: row.get(1)?,
            initial_score: row.get::<_, Option<f64>>(2)?.unwrap_or(0.0),
        })
    }

    /// 按名单补齐学生
    pub fn seed<S: AsRef<str>>(&self, names: &[S]) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let inserted = crate::db::seed_students(&conn, names)?;
        Ok(inserted)
    }

    /// 插入一行（导入用, 带 id 时保留原 id）
    pub(crate) fn insert_row(conn: &Connection, student: &Student) -> rusqlite::Result<i64> {
        conn.execute(
            "INSERT INTO students (id, name, initial_score) VALUES (?1, ?2, ?3)",
            params![student.id, student.name, student.initial_score],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 全部学生（按姓名排序）
    pub fn list_all(&self) -> RepositoryResult<Vec<Student>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT id, name, initial_score FROM students ORDER BY name")?;
        let students = stmt
            .query_map([], Self::map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(students)
    }

    pub fn find_by_name(&self, name: &str) -> RepositoryResult<Option<Student>> {
        let conn = self.get_conn()?;
        let student = conn
            .query_row(
                "SELECT id, name, initial_score FROM students WHERE name = ?1",
                params![name],
                Self::map_row,
            )
            .optional()?;
        Ok(student)
    }

    pub fn find_by_id(&self, student_id: i64) -> RepositoryResult<Option<Student>> {
        let conn = self.get_conn()?;
        let student = conn
            .query_row(
                "SELECT id, name, initial_score FROM students WHERE id = ?1",
                params![student_id],
                Self::map_row,
            )
            .optional()?;
        Ok(student)
    }

    /// 更新初始分（不校验正负）
    pub fn update_initial_score(&self, name: &str, initial_score: f64) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            "UPDATE students SET initial_score = ?1 WHERE name = ?2",
            params![initial_score, name],
        )?;
        if rows == 0 {
            return Err(RepositoryError::not_found("Student", name));
        }
        tracing::debug!(student = name, initial_score, "更新初始分");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{init_schema, open_in_memory_connection};

    fn setup() -> StudentRepository {
        let conn = open_in_memory_connection().unwrap();
        init_schema(&conn).unwrap();
        let repo = StudentRepository::new(Arc::new(Mutex::new(conn)));
        repo.seed(&["王五", "张三", "李四"]).unwrap();
        repo
    }

    #[test]
    fn test_list_and_lookup() {
        let repo = setup();
        let students = repo.list_all().unwrap();
        assert_eq!(students.len(), 3);
        assert!(students.iter().all(|s| s.initial_score == 0.0));

        let zhang = repo.find_by_name("张三").unwrap().unwrap();
        let by_id = repo.find_by_id(zhang.id.unwrap()).unwrap().unwrap();
        assert_eq!(by_id.name, "张三");
        assert!(repo.find_by_name("赵六").unwrap().is_none());
        assert!(repo.find_by_id(9999).unwrap().is_none());
    }

    #[test]
    fn test_update_initial_score_allows_negative() {
        let repo = setup();
        repo.update_initial_score("李四", -3.5).unwrap();
        assert_eq!(repo.find_by_name("李四").unwrap().unwrap().initial_score, -3.5);

        let err = repo.update_initial_score("赵六", 1.0).unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound { .. }));
    }
}
