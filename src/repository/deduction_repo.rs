// ==========================================
// 学生积分管理系统 - 扣分记录数据仓储
// ==========================================
// 对齐: deduction_records / compensation_records 表
// 红线:
// - 批量写入全部成功或全部回滚
// - 补偿只能降低扣分, 扣分更新与补偿记录在同一事务中写入
// - 不提供单条删除, 只允许批量清除 (扣分与补偿一并清除)
// ==========================================

mod compensation;
mod core;
mod queries;

#[cfg(test)]
mod tests;

pub use self::core::DeductionRepository;
