// ==========================================
// 学生积分管理系统 - 应用状态
// ==========================================
// 职责: 解析数据库路径与名单, 打开 ScoreStore
// ==========================================

use crate::api::{ApiResult, ScoreStore};
use crate::config::Roster;
use std::path::PathBuf;

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "STUDENT_SCORE_DB_PATH";

/// 应用状态
pub struct AppState {
    /// 数据库路径
    pub db_path: PathBuf,

    /// 积分存储
    pub store: ScoreStore,
}

impl AppState {
    /// 打开数据库并按名单补齐学生
    pub fn new(db_path: PathBuf, roster: &Roster) -> ApiResult<Self> {
        tracing::info!(path = %db_path.display(), "初始化AppState");
        let store = ScoreStore::open(&db_path, roster)?;
        tracing::info!("AppState初始化完成");
        Ok(Self { db_path, store })
    }

    /// 使用默认数据库路径与环境变量名单
    pub fn from_env() -> ApiResult<Self> {
        let roster = Roster::from_env()?;
        Self::new(get_default_db_path(), &roster)
    }
}

/// 获取默认数据库路径
///
/// 优先级: STUDENT_SCORE_DB_PATH > 用户数据目录 > 当前目录
pub fn get_default_db_path() -> PathBuf {
    // 允许通过环境变量显式指定 DB 路径（便于调试/测试）
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }

    let fallback = PathBuf::from("./student_score.db");
    let Some(data_dir) = dirs::data_dir() else {
        return fallback;
    };

    let dir = data_dir.join("student-score");
    // 目录创建失败时退回当前目录
    if std::fs::create_dir_all(&dir).is_err() {
        tracing::warn!(dir = %dir.display(), "无法创建数据目录, 使用当前目录");
        return fallback;
    }
    dir.join("student_score.db")
}
