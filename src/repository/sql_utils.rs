// ==========================================
// 学生积分管理系统 - SQL 工具
// ==========================================
// 职责:
// - 日期/时间的统一落库格式 (YYYY-MM-DD / YYYY-MM-DD HH:MM:SS)
// - 兼容旧库中带时间部分的 ISO 日期 ("2024-01-05T00:00:00")
// - 动态 WHERE 条件拼接（全部参数化）
// ==========================================

use crate::domain::serde_compat::parse_date_prefix;
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::types::Type;
use rusqlite::{Row, ToSql};

pub use crate::domain::serde_compat::DATE_FMT;
pub const DATETIME_FMT: &str = "%Y-%m-%d %H:%M:%S";

pub fn fmt_date(date: NaiveDate) -> String {
    date.format(DATE_FMT).to_string()
}

pub fn fmt_datetime(ts: NaiveDateTime) -> String {
    ts.format(DATETIME_FMT).to_string()
}

/// 闭区间上界转为开区间上界（次日）
///
/// 旧库日期可能带时间部分, `col < 次日` 比 `col <= 当日` 更稳妥且仍可走索引
pub fn day_after(date: NaiveDate) -> String {
    match date.succ_opt() {
        Some(next) => fmt_date(next),
        None => "9999-12-32".to_string(),
    }
}

/// 解析日期文本, 只取前 10 位日期部分
pub fn parse_date(raw: &str) -> Result<NaiveDate, chrono::ParseError> {
    parse_date_prefix(raw)
}

/// 解析时间戳文本, 兼容 "T" 分隔与纯日期
pub fn parse_datetime(raw: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    let trimmed = raw.trim();
    NaiveDateTime::parse_from_str(trimmed, DATETIME_FMT)
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f"))
        .or_else(|e| {
            parse_date(trimmed)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .ok_or(e)
        })
}

/// 从行中读取日期列
pub fn row_date(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDate> {
    let raw: String = row.get(idx)?;
    parse_date(&raw).map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// 从行中读取时间戳列
pub fn row_datetime(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDateTime> {
    let raw: String = row.get(idx)?;
    parse_datetime(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

// ==========================================
// FilterSql - 动态条件构建
// ==========================================
// 条件之间取 AND; 参数按 push 顺序绑定
#[derive(Default)]
pub struct FilterSql {
    clauses: Vec<String>,
    params: Vec<Box<dyn ToSql>>,
}

impl FilterSql {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一个带单参数的条件（clause 中使用 `?` 占位）
    pub fn push<T: ToSql + 'static>(&mut self, clause: &str, value: T) -> &mut Self {
        self.clauses.push(clause.to_string());
        self.params.push(Box::new(value));
        self
    }

    /// 追加一个可选条件, None 时跳过
    pub fn push_opt<T: ToSql + 'static>(&mut self, clause: &str, value: Option<T>) -> &mut Self {
        if let Some(v) = value {
            self.push(clause, v);
        }
        self
    }

    /// 追加不带参数的条件
    pub fn push_raw(&mut self, clause: impl Into<String>) -> &mut Self {
        self.clauses.push(clause.into());
        self
    }

    /// 拼接完整 SQL
    pub fn build(&self, base_query: &str, order_by_clause: &str) -> String {
        let mut sql = base_query.to_string();
        if !self.clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.clauses.join(" AND "));
        }
        if !order_by_clause.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(order_by_clause);
        }
        sql
    }

    pub fn params(&self) -> Vec<&dyn ToSql> {
        self.params.iter().map(|p| p.as_ref()).collect()
    }
}
