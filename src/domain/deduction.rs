// ==========================================
// 学生积分管理系统 - 扣分/补偿领域模型
// ==========================================
// 对齐: deduction_records / compensation_records 表
// 状态: 创建 -> [补偿]* -> (批量清除)
// 红线: 补偿只能降低扣分, 每次补偿追加一条审计记录
// ==========================================

use crate::domain::period::DateRange;
use crate::domain::serde_compat::lenient_date;
use crate::domain::types::{DeductionType, ViolationCategory, ViolationType};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// DeductionRecord - 扣分记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeductionRecord {
    #[serde(default)]
    pub id: Option<i64>,
    pub student_name: String,
    pub points: f64, // 扣分分值 (正数)
    #[serde(deserialize_with = "lenient_date")]
    pub date: NaiveDate,
    pub deduction_type: DeductionType,
    #[serde(default)]
    pub violation_behavior: Option<String>, // 违规具体行为
    #[serde(default)]
    pub treatment_measures: Option<String>, // 处理措施
    #[serde(default)]
    pub violation_type: Option<ViolationType>,
    #[serde(default)]
    pub non_violation_type: Option<String>, // 非违规类型 (自由文本)
    #[serde(default)]
    pub reason: Option<String>,
}

impl DeductionRecord {
    /// 违规扣分
    pub fn violation(
        student_name: impl Into<String>,
        points: f64,
        date: NaiveDate,
        violation_type: ViolationType,
    ) -> Self {
        Self {
            id: None,
            student_name: student_name.into(),
            points,
            date,
            deduction_type: DeductionType::Violation,
            violation_behavior: None,
            treatment_measures: None,
            violation_type: Some(violation_type),
            non_violation_type: None,
            reason: None,
        }
    }

    /// 非违规扣分
    pub fn non_violation(
        student_name: impl Into<String>,
        points: f64,
        date: NaiveDate,
        non_violation_type: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            student_name: student_name.into(),
            points,
            date,
            deduction_type: DeductionType::NonViolation,
            violation_behavior: None,
            treatment_measures: None,
            violation_type: None,
            non_violation_type: Some(non_violation_type.into()),
            reason: None,
        }
    }

    pub fn with_behavior(mut self, behavior: impl Into<String>) -> Self {
        self.violation_behavior = Some(behavior.into());
        self
    }

    pub fn with_treatment(mut self, treatment: impl Into<String>) -> Self {
        self.treatment_measures = Some(treatment.into());
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

// ==========================================
// CompensationRecord - 补偿记录 (审计轨迹)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompensationRecord {
    #[serde(default)]
    pub id: Option<i64>,
    pub deduction_record_id: i64,
    pub old_points: f64,
    pub new_points: f64, // <= old_points
    pub reason: String,
    #[serde(deserialize_with = "lenient_date")]
    pub date: NaiveDate,
}

/// 补偿请求（old/new 分值由仓储在事务内补齐）
#[derive(Debug, Clone, PartialEq)]
pub struct Compensation {
    pub reason: String,
    pub date: NaiveDate,
}

impl Compensation {
    pub fn new(reason: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            reason: reason.into(),
            date,
        }
    }
}

// ==========================================
// DeductionFilter - 扣分记录搜索条件
// ==========================================
// 所有条件取交集; None 表示不限制
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeductionFilter {
    pub student_name: Option<String>,
    pub start_date: Option<NaiveDate>, // 含当天
    pub end_date: Option<NaiveDate>,   // 含当天
    pub deduction_type: Option<DeductionType>,
    pub violation_type: Option<ViolationType>,
    pub violation_category: Option<ViolationCategory>,
    pub non_violation_type: Option<String>,
    pub min_points: Option<f64>,
    pub max_points: Option<f64>,
}

impl DeductionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn student(mut self, name: impl Into<String>) -> Self {
        self.student_name = Some(name.into());
        self
    }

    pub fn date_range(mut self, range: DateRange) -> Self {
        self.start_date = Some(range.start);
        self.end_date = Some(range.end);
        self
    }

    pub fn deduction_type(mut self, t: DeductionType) -> Self {
        self.deduction_type = Some(t);
        self
    }

    pub fn violation_type(mut self, t: ViolationType) -> Self {
        self.violation_type = Some(t);
        self
    }

    pub fn violation_category(mut self, c: ViolationCategory) -> Self {
        self.violation_category = Some(c);
        self
    }

    pub fn non_violation_type(mut self, label: impl Into<String>) -> Self {
        self.non_violation_type = Some(label.into());
        self
    }

    pub fn points_between(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_points = min;
        self.max_points = max;
        self
    }
}

/// 违规次数统计行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViolationCount {
    pub student_name: String,
    pub period: String, // "2024-01-01 至 2024-01-31"
    pub count: i64,
}
