// ==========================================
// 学生积分管理系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含排名/排序规则, 只负责读写与事务边界
// ==========================================
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod addition_repo;
pub mod deduction_repo;
pub mod error;
pub mod group_repo;
pub mod locked_period_repo;
pub mod ranking_repo;
pub mod snapshot_repo;
pub mod sql_utils;
pub mod student_repo;

// 重导出核心仓储
pub use addition_repo::AdditionRepository;
pub use deduction_repo::DeductionRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use group_repo::GroupRepository;
pub use locked_period_repo::LockedPeriodRepository;
pub use ranking_repo::RankingRepository;
pub use snapshot_repo::SnapshotRepository;
pub use student_repo::StudentRepository;
