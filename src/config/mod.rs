// ==========================================
// 学生积分管理系统 - 配置层
// ==========================================
// 职责: 学生名单来源, 配置键值读写
// 存储: config 表
// ==========================================

pub mod config_manager;
pub mod error;
pub mod roster;

// 重导出
pub use config_manager::ConfigManager;
pub use error::{ConfigError, ConfigResult};
pub use roster::{Roster, ROSTER_ENV};
