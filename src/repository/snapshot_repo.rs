// ==========================================
// 学生积分管理系统 - 数据快照仓储
// ==========================================
// 职责: 导入时全量替换全部表
// 红线: 单事务, 任一失败整体回滚; 删除顺序遵循外键依赖
// ==========================================

use crate::config::ConfigManager;
use crate::domain::snapshot::{DataSnapshot, ImportSummary};
use crate::repository::addition_repo::AdditionRepository;
use crate::repository::deduction_repo::DeductionRepository;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::group_repo::GroupRepository;
use crate::repository::locked_period_repo::LockedPeriodRepository;
use crate::repository::student_repo::StudentRepository;
use rusqlite::Connection;
use std::sync::{Arc, Mutex, MutexGuard};

/// 清表顺序: 子表在前
const CLEAR_ORDER: [&str; 8] = [
    "compensation_records",
    "deduction_records",
    "addition_records",
    "student_groups",
    "groups",
    "locked_time_periods",
    "config",
    "students",
];

pub struct SnapshotRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SnapshotRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 用快照替换全部数据
    ///
    /// 与已导入记录时间段重叠的加分记录跳过并计数, 其余任何错误都回滚整个导入。
    pub fn replace_all(&self, snapshot: &DataSnapshot) -> RepositoryResult<ImportSummary> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;
        let mut summary = ImportSummary::default();

        for table in CLEAR_ORDER {
            let rows = tx.execute(&format!("DELETE FROM {}", table), [])?;
            tracing::debug!(table, rows, "导入前清表");
        }

        for student in &snapshot.students {
            if student.name.trim().is_empty() {
                return Err(RepositoryError::field("students.name", "学生姓名不能为空"));
            }
            StudentRepository::insert_row(&tx, student)?;
            summary.students += 1;
        }

        for record in &snapshot.deduction_records {
            DeductionRepository::validate(record)?;
            DeductionRepository::insert_row(&tx, record)?;
            summary.deduction_records += 1;
        }

        for record in &snapshot.compensation_records {
            if record.new_points > record.old_points {
                return Err(RepositoryError::CompensationExceedsPoints {
                    record_id: record.deduction_record_id,
                    current: record.old_points,
                    requested: record.new_points,
                });
            }
            DeductionRepository::insert_compensation_row(&tx, record)?;
            summary.compensation_records += 1;
        }

        for record in &snapshot.addition_records {
            match AdditionRepository::insert_checked(&tx, record) {
                Ok(_) => summary.addition_records += 1,
                Err(RepositoryError::AdditionPeriodOverlap {
                    student_name,
                    existing_id,
                    ..
                }) => {
                    tracing::warn!(
                        student = %student_name,
                        existing_id,
                        period = %record.period(),
                        "导入时跳过时间段重叠的加分记录"
                    );
                    summary.skipped_additions += 1;
                }
                Err(e) => return Err(e),
            }
        }

        for group in &snapshot.groups {
            GroupRepository::insert_row(&tx, group)?;
            summary.groups += 1;
        }
        for membership in &snapshot.group_memberships {
            GroupRepository::insert_membership_row(&tx, membership)?;
            summary.group_memberships += 1;
        }

        for period in &snapshot.locked_time_periods {
            LockedPeriodRepository::insert_row(&tx, period)?;
            summary.locked_time_periods += 1;
        }

        for (key, value) in &snapshot.config {
            ConfigManager::upsert_row(&tx, key, value)?;
            summary.config_entries += 1;
        }

        tx.commit()?;
        tracing::info!(?summary, "数据导入完成");
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{init_schema, open_in_memory_connection, seed_students};
    use crate::domain::{AdditionRecord, CompensationRecord, DeductionRecord, Student, ViolationType};
    use chrono::NaiveDate;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, day).unwrap()
    }

    fn setup() -> (Arc<Mutex<Connection>>, SnapshotRepository) {
        let conn = open_in_memory_connection().unwrap();
        init_schema(&conn).unwrap();
        seed_students(&conn, &["旧学生"]).unwrap();
        let conn = Arc::new(Mutex::new(conn));
        (conn.clone(), SnapshotRepository::new(conn))
    }

    fn count(conn: &Arc<Mutex<Connection>>, table: &str) -> i64 {
        conn.lock()
            .unwrap()
            .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| r.get(0))
            .unwrap()
    }

    #[test]
    fn test_replace_all_skips_overlapping_additions() {
        let (conn, repo) = setup();
        let snapshot = DataSnapshot {
            students: vec![Student::new("张三", 1.0)],
            deduction_records: vec![DeductionRecord::violation(
                "张三",
                2.0,
                d(1, 3),
                ViolationType::LateHomework,
            )],
            addition_records: vec![
                AdditionRecord::new("张三", 1.0, d(1, 1), d(1, 10)),
                AdditionRecord::new("张三", 1.0, d(1, 5), d(1, 12)),
            ],
            ..Default::default()
        };

        let summary = repo.replace_all(&snapshot).unwrap();
        assert_eq!(summary.students, 1);
        assert_eq!(summary.addition_records, 1);
        assert_eq!(summary.skipped_additions, 1);
        assert_eq!(count(&conn, "students"), 1);
    }

    #[test]
    fn test_compensation_raising_points_is_rejected() {
        let (conn, repo) = setup();
        let mut deduction = DeductionRecord::violation("张三", 2.0, d(1, 3), ViolationType::LateHomework);
        deduction.id = Some(1);
        let snapshot = DataSnapshot {
            students: vec![Student::new("张三", 0.0)],
            deduction_records: vec![deduction],
            compensation_records: vec![CompensationRecord {
                id: None,
                deduction_record_id: 1,
                old_points: 2.0,
                new_points: 5.0,
                reason: "补录".to_string(),
                date: d(1, 4),
            }],
            ..Default::default()
        };

        let err = repo.replace_all(&snapshot).unwrap_err();
        assert!(matches!(err, RepositoryError::CompensationExceedsPoints { record_id: 1, .. }));
        assert_eq!(count(&conn, "compensation_records"), 0);
        assert_eq!(count(&conn, "deduction_records"), 0);
        assert_eq!(count(&conn, "students"), 1);
    }

    #[test]
    fn test_failed_import_rolls_back() {
        let (conn, repo) = setup();
        let snapshot = DataSnapshot {
            students: vec![Student::new("张三", 0.0)],
            // 学生不存在, 外键失败
            deduction_records: vec![DeductionRecord::non_violation("查无此人", 1.0, d(1, 3), "迟到")],
            ..Default::default()
        };

        let err = repo.replace_all(&snapshot).unwrap_err();
        assert!(matches!(err, RepositoryError::ForeignKeyViolation(_)));
        // 原数据保持不变
        assert_eq!(count(&conn, "students"), 1);
        let name: String = conn
            .lock()
            .unwrap()
            .query_row("SELECT name FROM students", [], |r| r.get(0))
            .unwrap();
        assert_eq!(name, "旧学生");
    }
}
