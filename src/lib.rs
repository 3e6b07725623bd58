// ==========================================
// 学生积分管理系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 班级学生扣分/加分/补偿记录与排名
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 重叠判定与排名计算
pub mod engine;

// 配置层 - 名单与键值配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 积分存储接口
pub mod api;

// 应用层 - 启动参数
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{DeductionType, RankingSortKey, ViolationCategory, ViolationType};

// 领域实体
pub use domain::{
    AdditionFilter, AdditionRecord, Compensation, CompensationRecord, DataSnapshot, DateRange,
    DeductionFilter, DeductionRecord, Group, GroupMember, ImportSummary, LockedTimePeriod,
    Student,
};

// API
pub use api::{ApiError, ApiResult, ScoreStore};
pub use config::Roster;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "学生积分管理系统";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
