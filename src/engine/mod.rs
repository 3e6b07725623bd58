// ==========================================
// 学生积分管理系统 - 引擎层
// ==========================================
// 职责: 区间重叠判定、排名计算等纯计算规则
// 红线: Engine 不拼 SQL, 输入为仓储读出的快照
// ==========================================

pub mod overlap;
pub mod ranking;

// 重导出核心引擎
pub use overlap::{find_overlapping_addition, overlaps_any};
pub use ranking::RankingEngine;
