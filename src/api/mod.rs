// ==========================================
// 学生积分管理系统 - API 层
// ==========================================
// 职责: 提供调用方使用的积分存储接口
// ==========================================

pub mod error;
pub mod score_store;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use score_store::{backup_path_for, ScoreStore};
