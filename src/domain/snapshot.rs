// ==========================================
// 学生积分管理系统 - 数据快照
// ==========================================
// 用途: JSON 导出/导入的完整数据文档
// 导入语义: 全量替换, 单事务
// ==========================================

use crate::domain::addition::AdditionRecord;
use crate::domain::deduction::{CompensationRecord, DeductionRecord};
use crate::domain::group::{Group, GroupMembership};
use crate::domain::period::LockedTimePeriod;
use crate::domain::student::Student;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<NaiveDateTime>,
    pub students: Vec<Student>,
    pub deduction_records: Vec<DeductionRecord>,
    pub compensation_records: Vec<CompensationRecord>,
    pub addition_records: Vec<AdditionRecord>,
    pub config: BTreeMap<String, String>,
    // 以下字段旧版导出文件中没有
    #[serde(default)]
    pub locked_time_periods: Vec<LockedTimePeriod>,
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub group_memberships: Vec<GroupMembership>,
}

/// 导入结果统计
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub students: usize,
    pub deduction_records: usize,
    pub compensation_records: usize,
    pub addition_records: usize,
    pub skipped_additions: usize, // 时间段重叠被跳过
    pub config_entries: usize,
    pub locked_time_periods: usize,
    pub groups: usize,
    pub group_memberships: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_document_without_optional_sections() {
        let json = r#"{
            "students": [{"name": "张三", "initial_score": 3.0}],
            "deduction_records": [],
            "compensation_records": [],
            "addition_records": [],
            "config": {"class_name": "三班"}
        }"#;
        let snapshot: DataSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.students[0].id, None);
        assert_eq!(snapshot.config.get("class_name").map(String::as_str), Some("三班"));
        assert!(snapshot.groups.is_empty());
        assert!(snapshot.exported_at.is_none());
    }

    #[test]
    fn test_missing_required_section_rejected() {
        let json = r#"{"students": [], "deduction_records": [], "config": {}}"#;
        assert!(serde_json::from_str::<DataSnapshot>(json).is_err());
    }
}
