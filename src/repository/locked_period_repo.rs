// ==========================================
// 学生积分管理系统 - 锁定时间段仓储
// ==========================================
// 对齐: locked_time_periods 表
// ==========================================

use crate::domain::period::{DateRange, LockedTimePeriod};
use crate::engine::overlap::overlaps_any;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::sql_utils::{fmt_date, fmt_datetime, row_date, row_datetime};
use chrono::{Local, NaiveDate};
use rusqlite::{params, Connection, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex, MutexGuard};

pub struct LockedPeriodRepository {
    conn: Arc<Mutex<Connection>>,
}

impl LockedPeriodRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row<'_>) -> SqliteResult<LockedTimePeriod> {
        Ok(LockedTimePeriod {
            id: Some(row.get(0)?),
            name: row.get(1)?,
            start_date: row_date(row, 2)?,
            end_date: row_date(row, 3)?,
            created_at: row_datetime(row, 4)?,
        })
    }

    /// 添加锁定时间段
    pub fn add(&self, name: &str, start: NaiveDate, end: NaiveDate) -> RepositoryResult<i64> {
        if name.trim().is_empty() {
            return Err(RepositoryError::field("name", "时间段名称不能为空"));
        }
        if DateRange::new(start, end).is_none() {
            return Err(RepositoryError::field(
                "end_date",
                format!("结束日期早于开始日期: {} > {}", fmt_date(start), fmt_date(end)),
            ));
        }

        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO locked_time_periods (name, start_date, end_date, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                name,
                fmt_date(start),
                fmt_date(end),
                fmt_datetime(Local::now().naive_local())
            ],
        )?;
        let id = conn.last_insert_rowid();
        tracing::info!(id, name, start = %start, end = %end, "添加锁定时间段");
        Ok(id)
    }

    /// 插入一行（导入用, 保留原 id 与创建时间）
    pub(crate) fn insert_row(conn: &Connection, period: &LockedTimePeriod) -> rusqlite::Result<i64> {
        conn.execute(
            r#"
            INSERT INTO locked_time_periods (id, name, start_date, end_date, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                period.id,
                period.name,
                fmt_date(period.start_date),
                fmt_date(period.end_date),
                fmt_datetime(period.created_at)
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 全部锁定时间段（开始日期新到旧）
    pub fn list_all(&self) -> RepositoryResult<Vec<LockedTimePeriod>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, name, start_date, end_date, created_at
            FROM locked_time_periods
            ORDER BY start_date DESC, id DESC
            "#,
        )?;
        let periods = stmt
            .query_map([], Self::map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(periods)
    }

    pub fn delete(&self, period_id: i64) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            "DELETE FROM locked_time_periods WHERE id = ?1",
            params![period_id],
        )?;
        if rows == 0 {
            return Err(RepositoryError::not_found("LockedTimePeriod", period_id));
        }
        tracing::info!(period_id, "删除锁定时间段");
        Ok(())
    }

    /// 全部锁定区间
    pub fn date_ranges(&self) -> RepositoryResult<Vec<DateRange>> {
        Ok(self.list_all()?.iter().map(LockedTimePeriod::range).collect())
    }

    /// 区间是否与任一锁定时间段重叠（闭区间）
    pub fn is_within_any(&self, range: &DateRange) -> RepositoryResult<bool> {
        Ok(overlaps_any(self.date_ranges()?, range))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{init_schema, open_in_memory_connection};

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, day).unwrap()
    }

    fn setup() -> LockedPeriodRepository {
        let conn = open_in_memory_connection().unwrap();
        init_schema(&conn).unwrap();
        LockedPeriodRepository::new(Arc::new(Mutex::new(conn)))
    }

    #[test]
    fn test_add_list_delete() {
        let repo = setup();
        let first = repo.add("第一周", d(9, 1), d(9, 7)).unwrap();
        repo.add("第二周", d(9, 8), d(9, 14)).unwrap();

        let periods = repo.list_all().unwrap();
        assert_eq!(periods.len(), 2);
        assert_eq!(periods[0].name, "第二周");

        repo.delete(first).unwrap();
        assert_eq!(repo.date_ranges().unwrap().len(), 1);
        assert!(matches!(
            repo.delete(first).unwrap_err(),
            RepositoryError::NotFound { .. }
        ));
    }

    #[test]
    fn test_inverted_range_rejected() {
        let repo = setup();
        assert!(repo.add("反向", d(9, 7), d(9, 1)).unwrap_err().is_validation());
        assert!(repo.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_is_within_any() {
        let repo = setup();
        repo.add("九月", d(9, 1), d(9, 30)).unwrap();

        let touching = DateRange::new(d(8, 25), d(9, 1)).unwrap();
        let outside = DateRange::new(d(10, 1), d(10, 7)).unwrap();
        assert!(repo.is_within_any(&touching).unwrap());
        assert!(!repo.is_within_any(&outside).unwrap());
    }
}
