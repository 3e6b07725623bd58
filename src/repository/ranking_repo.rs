// ==========================================
// 学生积分管理系统 - 排名汇总仓储
// ==========================================
// 职责: 一次查询读出排名所需的分项合计, 排序交给 engine::RankingEngine
// ==========================================

use crate::domain::period::DateRange;
use crate::domain::ranking::{GroupRankingEntry, StudentPointTotals};
use crate::domain::types::DeductionType;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::sql_utils::{day_after, fmt_date};
use rusqlite::{params, Connection, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex, MutexGuard};

pub struct RankingRepository {
    conn: Arc<Mutex<Connection>>,
}

impl RankingRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_group_row(row: &Row<'_>) -> SqliteResult<GroupRankingEntry> {
        Ok(GroupRankingEntry {
            group_id: row.get(0)?,
            group_name: row.get(1)?,
            total_points: row.get(2)?,
        })
    }

    /// 每个学生的初始分/违规扣分/非违规扣分/加分合计（含无记录学生）
    pub fn load_student_totals(&self) -> RepositoryResult<Vec<StudentPointTotals>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT s.id, s.name, s.initial_score,
                   COALESCE((SELECT SUM(d.points) FROM deduction_records d
                             WHERE d.student_name = s.name AND d.deduction_type = ?1), 0.0),
                   COALESCE((SELECT SUM(d.points) FROM deduction_records d
                             WHERE d.student_name = s.name AND d.deduction_type = ?2), 0.0),
                   COALESCE((SELECT SUM(a.points) FROM addition_records a
                             WHERE a.student_name = s.name), 0.0)
            FROM students s
            ORDER BY s.name
            "#,
        )?;
        let totals = stmt
            .query_map(
                params![
                    DeductionType::Violation.code(),
                    DeductionType::NonViolation.code()
                ],
                |row| {
                    Ok(StudentPointTotals {
                        student_id: row.get(0)?,
                        student_name: row.get(1)?,
                        initial_score: row.get(2)?,
                        violation_points: row.get(3)?,
                        non_violation_points: row.get(4)?,
                        addition_points: row.get(5)?,
                    })
                },
            )?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(totals)
    }

    /// 每个小组成员加分合计; 给定窗口时只统计与窗口有交集的记录
    pub fn load_group_totals(&self, window: Option<DateRange>) -> RepositoryResult<Vec<GroupRankingEntry>> {
        let conn = self.get_conn()?;
        let groups = match window {
            Some(range) => {
                let mut stmt = conn.prepare(
                    r#"
                    SELECT g.id, g.name, COALESCE(SUM(a.points), 0.0)
                    FROM groups g
                    LEFT JOIN student_groups sg ON sg.group_id = g.id
                    LEFT JOIN addition_records a ON a.student_name = sg.student_name
                         AND a.start_date < ?1 AND a.end_date >= ?2
                    GROUP BY g.id, g.name
                    "#,
                )?;
                let rows = stmt
                    .query_map(params![day_after(range.end), fmt_date(range.start)], Self::map_group_row)?
                    .collect::<SqliteResult<Vec<_>>>()?;
                rows
            }
            None => {
                let mut stmt = conn.prepare(
                    r#"
                    SELECT g.id, g.name, COALESCE(SUM(a.points), 0.0)
                    FROM groups g
                    LEFT JOIN student_groups sg ON sg.group_id = g.id
                    LEFT JOIN addition_records a ON a.student_name = sg.student_name
                    GROUP BY g.id, g.name
                    "#,
                )?;
                let rows = stmt
                    .query_map([], Self::map_group_row)?
                    .collect::<SqliteResult<Vec<_>>>()?;
                rows
            }
        };
        Ok(groups)
    }
}
