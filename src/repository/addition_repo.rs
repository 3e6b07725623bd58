// ==========================================
// 学生积分管理系统 - 加分记录仓储
// ==========================================
// 对齐: addition_records 表
// 红线: 同一学生的加分时间段不得重叠, 校验与写入在同一事务内
// ==========================================

use crate::domain::addition::{AdditionEntry, AdditionFilter, AdditionPeriod, AdditionRecord};
use crate::domain::period::DateRange;
use crate::engine::overlap::find_overlapping_addition;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::sql_utils::{day_after, fmt_date, row_date, FilterSql};
use rusqlite::{params, Connection, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex, MutexGuard};

const SELECT_ADDITION: &str = r#"
    SELECT id, student_name, points, reason, start_date, end_date
    FROM addition_records
"#;

pub struct AdditionRepository {
    conn: Arc<Mutex<Connection>>,
}

impl AdditionRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row<'_>) -> SqliteResult<AdditionRecord> {
        Ok(AdditionRecord {
            id: Some(row.get(0)?),
            student_name: row.get(1)?,
            points: row.get(2)?,
            reason: row.get(3)?,
            start_date: row_date(row, 4)?,
            end_date: row_date(row, 5)?,
        })
    }

    /// 字段校验（不限制分值正负）
    pub(crate) fn validate(record: &AdditionRecord) -> RepositoryResult<DateRange> {
        if record.student_name.trim().is_empty() {
            return Err(RepositoryError::field("student_name", "学生姓名不能为空"));
        }
        if !record.points.is_finite() {
            return Err(RepositoryError::field(
                "points",
                format!("加分分值无效: {}", record.points),
            ));
        }
        DateRange::new(record.start_date, record.end_date).ok_or_else(|| {
            RepositoryError::field(
                "end_date",
                format!(
                    "结束日期早于开始日期: {} > {}",
                    fmt_date(record.start_date),
                    fmt_date(record.end_date)
                ),
            )
        })
    }

    fn load_student_rows(conn: &Connection, student_name: &str) -> rusqlite::Result<Vec<AdditionRecord>> {
        let sql = format!("{} WHERE student_name = ?1", SELECT_ADDITION);
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![student_name], Self::map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(rows)
    }

    /// 插入一行（可在事务内调用）; 带 id 时保留原 id
    pub(crate) fn insert_row(conn: &Connection, record: &AdditionRecord) -> rusqlite::Result<i64> {
        conn.execute(
            r#"
            INSERT INTO addition_records (id, student_name, points, reason, start_date, end_date)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                record.id,
                record.student_name,
                record.points,
                record.reason,
                fmt_date(record.start_date),
                fmt_date(record.end_date),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 重叠校验后插入（调用方提供连接/事务）
    pub(crate) fn insert_checked(conn: &Connection, record: &AdditionRecord) -> RepositoryResult<i64> {
        let period = Self::validate(record)?;
        let existing = Self::load_student_rows(conn, &record.student_name)?;
        if let Some(hit) = find_overlapping_addition(&existing, &period) {
            return Err(RepositoryError::AdditionPeriodOverlap {
                student_name: record.student_name.clone(),
                existing_id: hit.id.unwrap_or_default(),
                period: hit.period().to_string(),
            });
        }
        Ok(Self::insert_row(conn, record)?)
    }

    // ==========================================
    // 写入操作
    // ==========================================

    /// 添加加分记录
    ///
    /// # 返回
    /// - `Ok(id)`: 新记录ID
    /// - `Err(AdditionPeriodOverlap)`: 与该学生已有记录时间段重叠, 未写入
    pub fn insert(&self, record: &AdditionRecord) -> RepositoryResult<i64> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;
        let id = Self::insert_checked(&tx, record)?;
        tx.commit()?;
        tracing::info!(
            id,
            student = %record.student_name,
            points = record.points,
            period = %record.period(),
            "添加加分记录"
        );
        Ok(id)
    }

    /// 清除全部加分记录
    pub fn clear_all(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let rows = conn.execute("DELETE FROM addition_records", [])?;
        tracing::info!(rows, "清除全部加分记录");
        Ok(rows)
    }

    // ==========================================
    // 查询操作
    // ==========================================

    /// 指定学生的加分记录（按开始日期新到旧）
    pub fn find_by_student(&self, student_name: &str) -> RepositoryResult<Vec<AdditionRecord>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "{} WHERE student_name = ?1 ORDER BY start_date DESC, id DESC",
            SELECT_ADDITION
        );
        let mut stmt = conn.prepare(&sql)?;
        let records = stmt
            .query_map(params![student_name], Self::map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(records)
    }

    /// 全部加分记录（按ID升序, 导出用）
    pub fn list_all(&self) -> RepositoryResult<Vec<AdditionRecord>> {
        let conn = self.get_conn()?;
        let sql = format!("{} ORDER BY id", SELECT_ADDITION);
        let mut stmt = conn.prepare(&sql)?;
        let records = stmt
            .query_map([], Self::map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(records)
    }

    /// 条件搜索; 日期条件匹配与窗口有交集的记录
    pub fn search(&self, filter: &AdditionFilter) -> RepositoryResult<Vec<AdditionRecord>> {
        let mut where_sql = FilterSql::new();
        where_sql
            .push_opt("student_name = ?", filter.student_name.clone())
            .push_opt("end_date >= ?", filter.start_date.map(fmt_date))
            .push_opt("start_date < ?", filter.end_date.map(day_after))
            .push_opt("points >= ?", filter.min_points)
            .push_opt("points <= ?", filter.max_points);

        let sql = where_sql.build(SELECT_ADDITION, "start_date DESC, id DESC");
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&sql)?;
        let records = stmt
            .query_map(where_sql.params().as_slice(), Self::map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(records)
    }

    /// 加分记录中出现过的时间段（按起止日期去重）
    pub fn time_periods(&self) -> RepositoryResult<Vec<AdditionPeriod>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT MIN(id), COALESCE(MIN(reason), '未命名时间段'), start_date, end_date
            FROM addition_records
            GROUP BY start_date, end_date
            ORDER BY start_date DESC
            "#,
        )?;
        let periods = stmt
            .query_map([], |row| {
                Ok(AdditionPeriod {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    start_date: row_date(row, 2)?,
                    end_date: row_date(row, 3)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(periods)
    }

    /// 学生在窗口内（有交集）的加分明细
    pub fn find_entries_for_student(
        &self,
        student_id: i64,
        range: DateRange,
    ) -> RepositoryResult<Vec<AdditionEntry>> {
        self.find_entries(
            "student_name = (SELECT name FROM students WHERE id = ?1)",
            student_id,
            range,
        )
    }

    /// 小组成员在窗口内（有交集）的加分明细
    pub fn find_entries_for_group(
        &self,
        group_id: i64,
        range: DateRange,
    ) -> RepositoryResult<Vec<AdditionEntry>> {
        self.find_entries(
            "student_name IN (SELECT student_name FROM student_groups WHERE group_id = ?1)",
            group_id,
            range,
        )
    }

    fn find_entries(&self, owner_clause: &str, owner_id: i64, range: DateRange) -> RepositoryResult<Vec<AdditionEntry>> {
        let conn = self.get_conn()?;
        let sql = format!(
            r#"
            SELECT id, points, reason, start_date
            FROM addition_records
            WHERE {} AND start_date < ?2 AND end_date >= ?3
            ORDER BY start_date DESC, id DESC
            "#,
            owner_clause
        );
        let mut stmt = conn.prepare(&sql)?;
        let entries = stmt
            .query_map(
                params![owner_id, day_after(range.end), fmt_date(range.start)],
                |row| {
                    Ok(AdditionEntry {
                        id: row.get(0)?,
                        points: row.get(1)?,
                        reason: row.get(2)?,
                        date: row_date(row, 3)?,
                    })
                },
            )?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(entries)
    }
}
