// ==========================================
// 学生积分管理系统 - 小组领域模型
// ==========================================
// 对齐: groups / student_groups 表
// 红线: 一个学生同一时间最多属于一个小组
// ==========================================

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// 小组成员上限
pub const MAX_GROUP_MEMBERS: usize = 7;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
}

/// 小组成员（含学生ID, 供界面按ID操作）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMember {
    pub student_name: String,
    pub student_id: i64,
    pub join_date: NaiveDate,
}

/// 成员关系原始行（导出/导入用）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMembership {
    pub student_name: String,
    pub group_id: i64,
    pub join_date: NaiveDate,
}
