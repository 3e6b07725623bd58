use super::core::DeductionRepository;
use crate::domain::deduction::{DeductionFilter, DeductionRecord, ViolationCount};
use crate::domain::period::DateRange;
use crate::domain::types::{DeductionType, ViolationType};
use crate::repository::error::RepositoryResult;
use crate::repository::sql_utils::{day_after, fmt_date, row_date, FilterSql};
use rusqlite::types::Type;
use rusqlite::{params, OptionalExtension, Result as SqliteResult, Row};

const SELECT_DEDUCTION: &str = r#"
    SELECT id, student_name, points, violation_behavior, treatment_measures,
           date, deduction_type, violation_type, reason, non_violation_type
    FROM deduction_records
"#;

impl DeductionRepository {
    // ==========================================
    // 查询操作
    // ==========================================

    /// 按ID查询单条扣分记录
    pub fn find_by_id(&self, record_id: i64) -> RepositoryResult<Option<DeductionRecord>> {
        let conn = self.get_conn()?;
        let sql = format!("{} WHERE id = ?1", SELECT_DEDUCTION);
        let record = conn
            .query_row(&sql, params![record_id], Self::map_row)
            .optional()?;
        Ok(record)
    }

    /// 指定学生的扣分记录（按日期新到旧）
    pub fn find_by_student(&self, student_name: &str) -> RepositoryResult<Vec<DeductionRecord>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "{} WHERE student_name = ?1 ORDER BY date DESC, id DESC",
            SELECT_DEDUCTION
        );
        let mut stmt = conn.prepare(&sql)?;
        let records = stmt
            .query_map(params![student_name], Self::map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(records)
    }

    /// 全部扣分记录（按ID升序, 导出用）
    pub fn list_all(&self) -> RepositoryResult<Vec<DeductionRecord>> {
        let conn = self.get_conn()?;
        let sql = format!("{} ORDER BY id", SELECT_DEDUCTION);
        let mut stmt = conn.prepare(&sql)?;
        let records = stmt
            .query_map([], Self::map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(records)
    }

    /// 条件搜索（条件取交集, 按日期新到旧）
    pub fn search(&self, filter: &DeductionFilter) -> RepositoryResult<Vec<DeductionRecord>> {
        let mut where_sql = FilterSql::new();
        where_sql
            .push_opt("student_name = ?", filter.student_name.clone())
            .push_opt("date >= ?", filter.start_date.map(fmt_date))
            .push_opt("date < ?", filter.end_date.map(day_after))
            .push_opt("deduction_type = ?", filter.deduction_type.map(|t| t.code()))
            .push_opt("violation_type = ?", filter.violation_type.map(|t| t.code()))
            .push_opt("non_violation_type = ?", filter.non_violation_type.clone())
            .push_opt("points >= ?", filter.min_points)
            .push_opt("points <= ?", filter.max_points);

        if let Some(category) = filter.violation_category {
            // 代码来自封闭枚举, 可直接内联
            let codes = category
                .types()
                .iter()
                .map(|t| t.code().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            where_sql.push_raw(format!("violation_type IN ({})", codes));
        }

        let sql = where_sql.build(SELECT_DEDUCTION, "date DESC, id DESC");
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&sql)?;
        let records = stmt
            .query_map(where_sql.params().as_slice(), Self::map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(records)
    }

    /// 统计日期范围内（含两端）的违规扣分次数, 按学生分组
    ///
    /// # 参数
    /// - `student_name`: None 表示全部学生
    pub fn count_violations(
        &self,
        student_name: Option<&str>,
        range: DateRange,
    ) -> RepositoryResult<Vec<ViolationCount>> {
        let mut where_sql = FilterSql::new();
        where_sql
            .push("date >= ?", fmt_date(range.start))
            .push("date < ?", day_after(range.end))
            .push("deduction_type = ?", DeductionType::Violation.code())
            .push_opt("student_name = ?", student_name.map(str::to_string));

        let sql = format!(
            "{} GROUP BY student_name ORDER BY student_name",
            where_sql.build(
                "SELECT student_name, COUNT(*) AS violation_count FROM deduction_records",
                ""
            )
        );

        let period = range.to_string();
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&sql)?;
        let counts = stmt
            .query_map(where_sql.params().as_slice(), |row| {
                Ok(ViolationCount {
                    student_name: row.get(0)?,
                    period: period.clone(),
                    count: row.get(1)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(counts)
    }

    /// 已使用过的非违规类型（去重, 排序）
    pub fn non_violation_types(&self) -> RepositoryResult<Vec<String>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT DISTINCT non_violation_type
            FROM deduction_records
            WHERE non_violation_type IS NOT NULL AND non_violation_type != ''
            ORDER BY non_violation_type
            "#,
        )?;
        let types = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(types)
    }

    // ==========================================
    // 行映射
    // ==========================================

    pub(crate) fn map_row(row: &Row<'_>) -> SqliteResult<DeductionRecord> {
        let deduction_code: i64 = row.get(6)?;
        let deduction_type = DeductionType::from_code(deduction_code).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                6,
                Type::Integer,
                format!("未知扣分类型代码: {}", deduction_code).into(),
            )
        })?;

        let violation_type = match row.get::<_, Option<i64>>(7)? {
            Some(code) => Some(ViolationType::from_code(code).ok_or_else(|| {
                rusqlite::Error::FromSqlConversionFailure(
                    7,
                    Type::Integer,
                    format!("未知违规类型代码: {}", code).into(),
                )
            })?),
            None => None,
        };

        Ok(DeductionRecord {
            id: Some(row.get(0)?),
            student_name: row.get(1)?,
            points: row.get(2)?,
            violation_behavior: row.get(3)?,
            treatment_measures: row.get(4)?,
            date: row_date(row, 5)?,
            deduction_type,
            violation_type,
            reason: row.get(8)?,
            non_violation_type: row.get(9)?,
        })
    }
}
