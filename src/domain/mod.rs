// ==========================================
// 学生积分管理系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、查询条件
// 红线: 不含数据访问逻辑
// ==========================================

pub mod addition;
pub mod deduction;
pub mod group;
pub mod period;
pub mod ranking;
pub mod serde_compat;
pub mod snapshot;
pub mod student;
pub mod types;

// 重导出核心类型
pub use addition::{AdditionEntry, AdditionFilter, AdditionPeriod, AdditionRecord};
pub use deduction::{
    Compensation, CompensationRecord, DeductionFilter, DeductionRecord, ViolationCount,
};
pub use group::{Group, GroupMember, GroupMembership, MAX_GROUP_MEMBERS};
pub use period::{DateRange, LockedTimePeriod};
pub use ranking::{
    AdditionRankingEntry, DeductionRankingEntry, GroupRankingEntry, StudentPointTotals,
    TotalScoreEntry,
};
pub use snapshot::{DataSnapshot, ImportSummary};
pub use student::Student;
pub use types::{DeductionType, RankingSortKey, ViolationCategory, ViolationType};
