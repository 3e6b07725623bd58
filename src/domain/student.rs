// ==========================================
// 学生积分管理系统 - 学生领域模型
// ==========================================
// 对齐: students 表
// 生命周期: 由名单初始化写入, 仅允许修改初始分, 不删除
// ==========================================

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    #[serde(default)]
    pub id: Option<i64>, // 数据库ID
    pub name: String,    // 学生姓名 (唯一键)
    #[serde(default)]
    pub initial_score: f64, // 初始分
}

impl Student {
    pub fn new(name: impl Into<String>, initial_score: f64) -> Self {
        Self {
            id: None,
            name: name.into(),
            initial_score,
        }
    }
}
