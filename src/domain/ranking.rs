// ==========================================
// 学生积分管理系统 - 排名结果模型
// ==========================================
// 排名均为按需计算的只读结果, 不做缓存
// ==========================================

use serde::{Deserialize, Serialize};

/// 扣分排名行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeductionRankingEntry {
    pub student_name: String,
    pub violation_points: f64,
    pub non_violation_points: f64,
    pub total_points: f64,
}

/// 加分排名行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdditionRankingEntry {
    pub student_name: String,
    pub addition_points: f64,
}

/// 总分排名行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalScoreEntry {
    pub student_id: i64,
    pub student_name: String,
    pub initial_score: f64,
    pub addition_points: f64,
    pub deduction_points: f64,
    pub total_score: f64, // initial + addition - deduction
}

/// 小组排名行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupRankingEntry {
    pub group_id: i64,
    pub group_name: String,
    pub total_points: f64,
}

/// 单个学生的分项汇总（排名计算输入）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentPointTotals {
    pub student_id: i64,
    pub student_name: String,
    pub initial_score: f64,
    pub violation_points: f64,
    pub non_violation_points: f64,
    pub addition_points: f64,
}

impl StudentPointTotals {
    pub fn deduction_points(&self) -> f64 {
        self.violation_points + self.non_violation_points
    }
}
