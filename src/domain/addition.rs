// ==========================================
// 学生积分管理系统 - 加分领域模型
// ==========================================
// 对齐: addition_records 表
// 红线: 同一学生的加分记录时间段不得重叠 (闭区间)
// ==========================================

use crate::domain::period::DateRange;
use crate::domain::serde_compat::lenient_date;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdditionRecord {
    #[serde(default)]
    pub id: Option<i64>,
    pub student_name: String,
    pub points: f64,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(deserialize_with = "lenient_date")]
    pub start_date: NaiveDate,
    #[serde(deserialize_with = "lenient_date")]
    pub end_date: NaiveDate,
}

impl AdditionRecord {
    pub fn new(
        student_name: impl Into<String>,
        points: f64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            id: None,
            student_name: student_name.into(),
            points,
            reason: None,
            start_date,
            end_date,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// 记录覆盖的日期区间（未校验 start <= end）
    pub fn period(&self) -> DateRange {
        DateRange {
            start: self.start_date,
            end: self.end_date,
        }
    }
}

// ==========================================
// AdditionFilter - 加分记录搜索条件
// ==========================================
// 日期条件按“与窗口有交集”匹配
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdditionFilter {
    pub student_name: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub min_points: Option<f64>,
    pub max_points: Option<f64>,
}

impl AdditionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn student(mut self, name: impl Into<String>) -> Self {
        self.student_name = Some(name.into());
        self
    }

    pub fn overlapping(mut self, range: DateRange) -> Self {
        self.start_date = Some(range.start);
        self.end_date = Some(range.end);
        self
    }

    pub fn points_between(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_points = min;
        self.max_points = max;
        self
    }
}

/// 从加分记录中提取的时间段
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdditionPeriod {
    pub id: i64,
    pub name: String, // 加分原因, 缺省为“未命名时间段”
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// 时间窗口内的加分明细（小组/个人统计用）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdditionEntry {
    pub id: i64,
    pub points: f64,
    pub reason: Option<String>,
    pub date: NaiveDate, // 记录开始日期
}
