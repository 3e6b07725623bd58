use super::core::DeductionRepository;
use crate::domain::deduction::{Compensation, CompensationRecord};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::sql_utils::{fmt_date, row_date};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};

const SELECT_COMPENSATION: &str = r#"
    SELECT c.id, c.deduction_record_id, c.old_points, c.new_points, c.reason, c.date
    FROM compensation_records c
"#;

impl DeductionRepository {
    // ==========================================
    // 补偿协议
    // ==========================================

    /// 补偿扣分记录
    ///
    /// 在同一事务内: 读取当前扣分 -> 校验 -> 更新扣分与处理措施 -> 追加补偿记录。
    /// `new_treatment` 为 None 时保留原处理措施。
    ///
    /// # 返回
    /// - `Ok(record)`: 已写入的补偿记录
    /// - `Err(CompensationExceedsPoints)`: 新扣分大于当前扣分, 未写入
    /// - `Err(NotFound)`: 扣分记录不存在
    pub fn compensate(
        &self,
        record_id: i64,
        new_points: f64,
        new_treatment: Option<&str>,
        compensation: &Compensation,
    ) -> RepositoryResult<CompensationRecord> {
        if !new_points.is_finite() || new_points < 0.0 {
            return Err(RepositoryError::field(
                "new_points",
                format!("补偿后扣分必须为非负数: {}", new_points),
            ));
        }

        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let current: f64 = tx
            .query_row(
                "SELECT points FROM deduction_records WHERE id = ?1",
                params![record_id],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| RepositoryError::not_found("DeductionRecord", record_id))?;

        if new_points > current {
            // tx 未提交, drop 时回滚
            return Err(RepositoryError::CompensationExceedsPoints {
                record_id,
                current,
                requested: new_points,
            });
        }

        tx.execute(
            r#"
            UPDATE deduction_records
            SET points = ?1, treatment_measures = COALESCE(?2, treatment_measures)
            WHERE id = ?3
            "#,
            params![new_points, new_treatment, record_id],
        )?;

        let mut record = CompensationRecord {
            id: None,
            deduction_record_id: record_id,
            old_points: current,
            new_points,
            reason: compensation.reason.clone(),
            date: compensation.date,
        };
        record.id = Some(Self::insert_compensation_row(&tx, &record)?);

        tx.commit()?;
        tracing::info!(
            record_id,
            old_points = current,
            new_points,
            reason = %record.reason,
            "扣分补偿完成"
        );
        Ok(record)
    }

    /// 原样写入一条补偿记录（导入用, 不修改扣分）
    pub(crate) fn insert_compensation_row(
        conn: &Connection,
        record: &CompensationRecord,
    ) -> rusqlite::Result<i64> {
        conn.execute(
            r#"
            INSERT INTO compensation_records (id, deduction_record_id, old_points, new_points, reason, date)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                record.id,
                record.deduction_record_id,
                record.old_points,
                record.new_points,
                record.reason,
                fmt_date(record.date),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    // ==========================================
    // 补偿记录查询
    // ==========================================

    pub(crate) fn map_compensation_row(row: &Row<'_>) -> SqliteResult<CompensationRecord> {
        Ok(CompensationRecord {
            id: Some(row.get(0)?),
            deduction_record_id: row.get(1)?,
            old_points: row.get(2)?,
            new_points: row.get(3)?,
            reason: row.get(4)?,
            date: row_date(row, 5)?,
        })
    }

    /// 指定扣分记录的补偿历史（新到旧）
    pub fn find_compensations(&self, deduction_record_id: i64) -> RepositoryResult<Vec<CompensationRecord>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "{} WHERE c.deduction_record_id = ?1 ORDER BY c.date DESC, c.id DESC",
            SELECT_COMPENSATION
        );
        let mut stmt = conn.prepare(&sql)?;
        let records = stmt
            .query_map(params![deduction_record_id], Self::map_compensation_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(records)
    }

    /// 指定学生全部扣分记录的补偿历史（新到旧）
    pub fn find_student_compensations(&self, student_name: &str) -> RepositoryResult<Vec<CompensationRecord>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "{} JOIN deduction_records d ON c.deduction_record_id = d.id \
             WHERE d.student_name = ?1 ORDER BY c.date DESC, c.id DESC",
            SELECT_COMPENSATION
        );
        let mut stmt = conn.prepare(&sql)?;
        let records = stmt
            .query_map(params![student_name], Self::map_compensation_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(records)
    }

    /// 全部补偿记录（按ID升序, 导出用）
    pub fn list_all_compensations(&self) -> RepositoryResult<Vec<CompensationRecord>> {
        let conn = self.get_conn()?;
        let sql = format!("{} ORDER BY c.id", SELECT_COMPENSATION);
        let mut stmt = conn.prepare(&sql)?;
        let records = stmt
            .query_map([], Self::map_compensation_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(records)
    }
}
