// ==========================================
// 学生积分管理系统 - 应用层
// ==========================================
// 职责: 进程级启动参数（数据库位置、名单来源）
// ==========================================

pub mod state;

// 重导出
pub use state::{get_default_db_path, AppState, DB_PATH_ENV};
