// ==========================================
// 学生积分管理系统 - 学生名单
// ==========================================
// 职责: 建库时的名单来源（JSON 文件 / 环境变量 / 代码传入）
// 约束: 名单只用于补齐缺失学生, 不覆盖已有数据
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// 名单环境变量（逗号分隔）
pub const ROSTER_ENV: &str = "STUDENT_SCORE_ROSTER";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    pub students: Vec<String>,
}

/// 名单文件支持两种写法: `["张三", ...]` 或 `{"students": [...]}`
#[derive(Deserialize)]
#[serde(untagged)]
enum RosterFile {
    Names(Vec<String>),
    Wrapped { students: Vec<String> },
}

impl Roster {
    /// 空名单（打开已有数据库时使用）
    pub fn empty() -> Self {
        Self::default()
    }

    /// 从姓名列表创建（去除空白与空项, 拒绝重复）
    pub fn from_names<I, S>(names: I) -> ConfigResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut students = Vec::new();
        for name in names {
            let name = name.as_ref().trim();
            if name.is_empty() {
                continue;
            }
            if !seen.insert(name.to_string()) {
                return Err(ConfigError::DuplicateName(name.to_string()));
            }
            students.push(name.to_string());
        }
        Ok(Self { students })
    }

    /// 从 JSON 文件读取名单
    pub fn from_json_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileReadError(format!("{}: {}", path.display(), e)))?;
        let parsed: RosterFile =
            serde_json::from_str(&raw).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        let names = match parsed {
            RosterFile::Names(names) => names,
            RosterFile::Wrapped { students } => students,
        };

        let roster = Self::from_names(names)?;
        if roster.is_empty() {
            return Err(ConfigError::EmptyRoster);
        }
        tracing::info!(path = %path.display(), count = roster.len(), "读取学生名单");
        Ok(roster)
    }

    /// 从环境变量读取名单; 未设置时返回空名单
    pub fn from_env() -> ConfigResult<Self> {
        match std::env::var(ROSTER_ENV) {
            Ok(raw) => Self::from_names(raw.split(',')),
            Err(_) => Ok(Self::empty()),
        }
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.students
    }
}
