use crate::domain::deduction::DeductionRecord;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::sql_utils::fmt_date;
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// DeductionRepository - 扣分记录仓储
// ==========================================
pub struct DeductionRepository {
    conn: Arc<Mutex<Connection>>,
}

impl DeductionRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    pub(super) fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 写入前的字段校验
    pub(crate) fn validate(record: &DeductionRecord) -> RepositoryResult<()> {
        if record.student_name.trim().is_empty() {
            return Err(RepositoryError::field("student_name", "学生姓名不能为空"));
        }
        if !record.points.is_finite() || record.points < 0.0 {
            return Err(RepositoryError::field(
                "points",
                format!("扣分分值必须为非负数: {}", record.points),
            ));
        }
        Ok(())
    }

    /// 插入一行（可在事务内调用）; 带 id 时保留原 id
    pub(crate) fn insert_row(conn: &Connection, record: &DeductionRecord) -> rusqlite::Result<i64> {
        conn.execute(
            r#"
            INSERT INTO deduction_records (
                id, student_name, points, violation_behavior, treatment_measures,
                date, deduction_type, violation_type, reason, non_violation_type
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                record.id,
                record.student_name,
                record.points,
                record.violation_behavior,
                record.treatment_measures,
                fmt_date(record.date),
                record.deduction_type.code(),
                record.violation_type.map(|t| t.code()),
                record.reason,
                record.non_violation_type,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    // ==========================================
    // 写入操作
    // ==========================================

    /// 插入单条扣分记录
    ///
    /// # 返回
    /// - `Ok(id)`: 新记录ID
    /// - `Err(ForeignKeyViolation)`: 学生不存在
    pub fn insert(&self, record: &DeductionRecord) -> RepositoryResult<i64> {
        Self::validate(record)?;
        let conn = self.get_conn()?;
        let id = Self::insert_row(&conn, record)?;
        tracing::info!(
            id,
            student = %record.student_name,
            points = record.points,
            deduction_type = %record.deduction_type,
            "添加扣分记录"
        );
        Ok(id)
    }

    /// 批量插入扣分记录（单事务, 任一失败全部回滚）
    ///
    /// # 返回
    /// - `Ok(ids)`: 按输入顺序的新记录ID
    pub fn batch_insert(&self, records: &[DeductionRecord]) -> RepositoryResult<Vec<i64>> {
        for record in records {
            Self::validate(record)?;
        }

        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let mut ids = Vec::with_capacity(records.len());
        for (idx, record) in records.iter().enumerate() {
            let id = Self::insert_row(&tx, record).map_err(|e| {
                tracing::warn!(index = idx, student = %record.student_name, error = %e, "批量扣分写入失败, 回滚");
                RepositoryError::from(e)
            })?;
            ids.push(id);
        }

        tx.commit()?;
        tracing::info!(count = ids.len(), "批量添加扣分记录");
        Ok(ids)
    }

    /// 清除全部扣分记录及其补偿记录（单事务）
    ///
    /// # 返回
    /// - `Ok((deductions, compensations))`: 删除的行数
    pub fn clear_all(&self) -> RepositoryResult<(usize, usize)> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;
        // 先删补偿, 避免外键悬挂
        let compensations = tx.execute("DELETE FROM compensation_records", [])?;
        let deductions = tx.execute("DELETE FROM deduction_records", [])?;
        tx.commit()?;
        tracing::info!(deductions, compensations, "清除全部扣分记录");
        Ok((deductions, compensations))
    }
}
