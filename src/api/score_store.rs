// ==========================================
// 学生积分管理系统 - 积分存储 API
// ==========================================
// 职责: 对调用方暴露的唯一入口, 组合各仓储与排名引擎
// 约束:
// - 单连接, 由各仓储共享 (Arc<Mutex<Connection>>)
// - 排名/汇总每次按需计算, 不缓存
// ==========================================

mod additions;
mod deductions;
mod groups;
mod locked_periods;
mod rankings;
mod students;
mod transfer;

use crate::api::error::ApiResult;
use crate::config::{ConfigManager, Roster};
use crate::db::{init_schema, open_in_memory_connection, open_sqlite_connection, seed_students};
use crate::engine::RankingEngine;
use crate::repository::{
    AdditionRepository, DeductionRepository, GroupRepository, LockedPeriodRepository,
    RankingRepository, SnapshotRepository, StudentRepository,
};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

pub use transfer::backup_path_for;

// ==========================================
// ScoreStore - 积分存储
// ==========================================
pub struct ScoreStore {
    db_path: Option<PathBuf>, // None 表示内存库
    conn: Arc<Mutex<Connection>>,
    student_repo: StudentRepository,
    deduction_repo: DeductionRepository,
    addition_repo: AdditionRepository,
    group_repo: GroupRepository,
    locked_period_repo: LockedPeriodRepository,
    ranking_repo: RankingRepository,
    snapshot_repo: SnapshotRepository,
    config_manager: ConfigManager,
    ranking_engine: RankingEngine,
}

impl ScoreStore {
    /// 打开（或新建）数据库文件
    ///
    /// 建表与旧库补列幂等执行; 名单中缺失的学生会被补齐, 已有学生保持不变。
    pub fn open(db_path: impl AsRef<Path>, roster: &Roster) -> ApiResult<Self> {
        let db_path = db_path.as_ref();
        tracing::info!(path = %db_path.display(), roster = roster.len(), "打开积分数据库");
        let conn = open_sqlite_connection(&db_path.to_string_lossy())?;
        Self::from_connection(conn, Some(db_path.to_path_buf()), roster)
    }

    /// 打开内存库（测试/演示用）
    pub fn open_in_memory(roster: &Roster) -> ApiResult<Self> {
        let conn = open_in_memory_connection()?;
        Self::from_connection(conn, None, roster)
    }

    fn from_connection(conn: Connection, db_path: Option<PathBuf>, roster: &Roster) -> ApiResult<Self> {
        init_schema(&conn)?;
        let seeded = seed_students(&conn, roster.names())?;
        if seeded > 0 {
            tracing::info!(seeded, "按名单补齐学生");
        }

        let conn = Arc::new(Mutex::new(conn));
        Ok(Self {
            db_path,
            student_repo: StudentRepository::new(conn.clone()),
            deduction_repo: DeductionRepository::new(conn.clone()),
            addition_repo: AdditionRepository::new(conn.clone()),
            group_repo: GroupRepository::new(conn.clone()),
            locked_period_repo: LockedPeriodRepository::new(conn.clone()),
            ranking_repo: RankingRepository::new(conn.clone()),
            snapshot_repo: SnapshotRepository::new(conn.clone()),
            config_manager: ConfigManager::from_connection(conn.clone())?,
            ranking_engine: RankingEngine::new(),
            conn,
        })
    }

    /// 数据库文件路径（内存库为 None）
    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    /// 键值配置
    pub fn config(&self) -> &ConfigManager {
        &self.config_manager
    }
}
