// ==========================================
// 学生积分管理系统 - 领域类型定义
// ==========================================
// 扣分类型 / 违规类型 / 违规大类 / 排名口径
// 存储: 扣分类型与违规类型以整数代码落库
// ==========================================

use crate::domain::serde_compat::CodeOrName;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

// ==========================================
// 扣分类型 (Deduction Type)
// ==========================================
// 数据库代码: 1 = 违规扣分, 2 = 非违规扣分
// 反序列化同时接受名称与代码 (旧版导出文件写整数)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeductionType {
    Violation,    // 违规扣分
    NonViolation, // 非违规扣分
}

impl DeductionType {
    /// 数据库存储代码
    pub fn code(self) -> i64 {
        match self {
            DeductionType::Violation => 1,
            DeductionType::NonViolation => 2,
        }
    }

    /// 从数据库代码还原
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(DeductionType::Violation),
            2 => Some(DeductionType::NonViolation),
            _ => None,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim() {
            "VIOLATION" => Some(DeductionType::Violation),
            "NON_VIOLATION" => Some(DeductionType::NonViolation),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for DeductionType {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match CodeOrName::deserialize(d)? {
            CodeOrName::Code(code) => Self::from_code(code)
                .ok_or_else(|| serde::de::Error::custom(format!("未知扣分类型代码: {}", code))),
            CodeOrName::Name(name) => Self::from_name(&name)
                .ok_or_else(|| serde::de::Error::custom(format!("未知扣分类型: {}", name))),
        }
    }
}

impl fmt::Display for DeductionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeductionType::Violation => write!(f, "VIOLATION"),
            DeductionType::NonViolation => write!(f, "NON_VIOLATION"),
        }
    }
}

// ==========================================
// 违规大类 (Violation Category)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationCategory {
    Study,      // 学习
    Hygiene,    // 卫生
    Discipline, // 纪律
}

impl ViolationCategory {
    /// 该大类下的全部违规类型
    pub fn types(self) -> &'static [ViolationType] {
        match self {
            ViolationCategory::Study => &[
                ViolationType::MissingHomework,
                ViolationType::LateHomework,
                ViolationType::IncompleteHomework,
            ],
            ViolationCategory::Hygiene => &[ViolationType::HygieneFailure],
            ViolationCategory::Discipline => &[
                ViolationType::ClassroomMisconduct,
                ViolationType::StudyHallMisconduct,
                ViolationType::Plagiarism,
            ],
        }
    }

    /// 中文名称（"学习" / "卫生" / "纪律"）
    pub fn label(self) -> &'static str {
        match self {
            ViolationCategory::Study => "学习",
            ViolationCategory::Hygiene => "卫生",
            ViolationCategory::Discipline => "纪律",
        }
    }

    /// 按中文名称查找大类
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "学习" => Some(ViolationCategory::Study),
            "卫生" => Some(ViolationCategory::Hygiene),
            "纪律" => Some(ViolationCategory::Discipline),
            _ => None,
        }
    }
}

// ==========================================
// 违规类型 (Violation Type)
// ==========================================
// 封闭枚举, 数据库代码 1..=7
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationType {
    MissingHomework,     // 未交作业
    LateHomework,        // 迟交作业
    IncompleteHomework,  // 未完成作业
    HygieneFailure,      // 卫生不合格
    ClassroomMisconduct, // 课堂违纪
    StudyHallMisconduct, // 自习违纪
    Plagiarism,          // 抄袭作业
}

impl ViolationType {
    pub const ALL: [ViolationType; 7] = [
        ViolationType::MissingHomework,
        ViolationType::LateHomework,
        ViolationType::IncompleteHomework,
        ViolationType::HygieneFailure,
        ViolationType::ClassroomMisconduct,
        ViolationType::StudyHallMisconduct,
        ViolationType::Plagiarism,
    ];

    pub fn code(self) -> i64 {
        match self {
            ViolationType::MissingHomework => 1,
            ViolationType::LateHomework => 2,
            ViolationType::IncompleteHomework => 3,
            ViolationType::HygieneFailure => 4,
            ViolationType::ClassroomMisconduct => 5,
            ViolationType::StudyHallMisconduct => 6,
            ViolationType::Plagiarism => 7,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.code() == code)
    }

    /// 按枚举名或中文名称查找
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.name() == name || t.label() == name)
    }

    /// 导出用枚举名
    pub fn name(self) -> &'static str {
        match self {
            ViolationType::MissingHomework => "MISSING_HOMEWORK",
            ViolationType::LateHomework => "LATE_HOMEWORK",
            ViolationType::IncompleteHomework => "INCOMPLETE_HOMEWORK",
            ViolationType::HygieneFailure => "HYGIENE_FAILURE",
            ViolationType::ClassroomMisconduct => "CLASSROOM_MISCONDUCT",
            ViolationType::StudyHallMisconduct => "STUDY_HALL_MISCONDUCT",
            ViolationType::Plagiarism => "PLAGIARISM",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ViolationType::MissingHomework => "未交作业",
            ViolationType::LateHomework => "迟交作业",
            ViolationType::IncompleteHomework => "未完成作业",
            ViolationType::HygieneFailure => "卫生不合格",
            ViolationType::ClassroomMisconduct => "课堂违纪",
            ViolationType::StudyHallMisconduct => "自习违纪",
            ViolationType::Plagiarism => "抄袭作业",
        }
    }

    /// 所属违规大类
    pub fn category(self) -> ViolationCategory {
        match self {
            ViolationType::MissingHomework
            | ViolationType::LateHomework
            | ViolationType::IncompleteHomework => ViolationCategory::Study,
            ViolationType::HygieneFailure => ViolationCategory::Hygiene,
            ViolationType::ClassroomMisconduct
            | ViolationType::StudyHallMisconduct
            | ViolationType::Plagiarism => ViolationCategory::Discipline,
        }
    }
}

impl<'de> Deserialize<'de> for ViolationType {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match CodeOrName::deserialize(d)? {
            CodeOrName::Code(code) => Self::from_code(code)
                .ok_or_else(|| serde::de::Error::custom(format!("未知违规类型代码: {}", code))),
            CodeOrName::Name(name) => Self::from_name(&name)
                .ok_or_else(|| serde::de::Error::custom(format!("未知违规类型: {}", name))),
        }
    }
}

impl fmt::Display for ViolationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ==========================================
// 扣分排名口径 (Ranking Sort Key)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingSortKey {
    #[default]
    Total,        // 总扣分
    Violation,    // 违规扣分
    NonViolation, // 非违规扣分
}

impl RankingSortKey {
    /// 解析排序口径, 未知值回落到 Total
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "violation" => RankingSortKey::Violation,
            "non_violation" => RankingSortKey::NonViolation,
            _ => RankingSortKey::Total,
        }
    }
}
