use super::ScoreStore;
use crate::api::error::{ApiError, ApiResult};
use crate::domain::period::{DateRange, LockedTimePeriod};
use chrono::NaiveDate;

impl ScoreStore {
    // ==========================================
    // 锁定时间段
    // ==========================================

    pub fn add_locked_period(&self, name: &str, start: NaiveDate, end: NaiveDate) -> ApiResult<i64> {
        Ok(self.locked_period_repo.add(name, start, end)?)
    }

    /// 全部锁定时间段（开始日期新到旧）
    pub fn list_locked_periods(&self) -> ApiResult<Vec<LockedTimePeriod>> {
        Ok(self.locked_period_repo.list_all()?)
    }

    pub fn delete_locked_period(&self, period_id: i64) -> ApiResult<()> {
        Ok(self.locked_period_repo.delete(period_id)?)
    }

    pub fn locked_date_ranges(&self) -> ApiResult<Vec<DateRange>> {
        Ok(self.locked_period_repo.date_ranges()?)
    }

    /// [start, end] 是否与任一锁定时间段有交集
    pub fn is_within_any_locked_period(&self, start: NaiveDate, end: NaiveDate) -> ApiResult<bool> {
        let range = DateRange::new(start, end).ok_or_else(|| {
            ApiError::InvalidInput(format!("结束日期早于开始日期: {} > {}", start, end))
        })?;
        Ok(self.locked_period_repo.is_within_any(&range)?)
    }
}
