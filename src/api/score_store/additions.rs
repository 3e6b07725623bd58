use super::ScoreStore;
use crate::api::error::ApiResult;
use crate::domain::addition::{AdditionEntry, AdditionFilter, AdditionPeriod, AdditionRecord};
use crate::domain::period::DateRange;

impl ScoreStore {
    // ==========================================
    // 加分记录
    // ==========================================

    /// 添加加分记录
    ///
    /// 与该学生已有记录时间段重叠（闭区间, 端点相接也算）时拒绝, 不写入
    pub fn add_addition(&self, record: &AdditionRecord) -> ApiResult<i64> {
        Ok(self.addition_repo.insert(record)?)
    }

    /// 指定学生的加分记录（开始日期新到旧）
    pub fn list_additions(&self, student_name: &str) -> ApiResult<Vec<AdditionRecord>> {
        Ok(self.addition_repo.find_by_student(student_name)?)
    }

    /// 条件搜索加分记录; 日期条件匹配与窗口有交集的记录
    pub fn search_additions(&self, filter: &AdditionFilter) -> ApiResult<Vec<AdditionRecord>> {
        Ok(self.addition_repo.search(filter)?)
    }

    /// 加分记录使用过的时间段
    pub fn addition_time_periods(&self) -> ApiResult<Vec<AdditionPeriod>> {
        Ok(self.addition_repo.time_periods()?)
    }

    /// 学生在窗口内的加分明细
    pub fn student_addition_records(
        &self,
        student_id: i64,
        range: DateRange,
    ) -> ApiResult<Vec<AdditionEntry>> {
        Ok(self.addition_repo.find_entries_for_student(student_id, range)?)
    }

    /// 小组成员在窗口内的加分明细
    pub fn group_addition_records(
        &self,
        group_id: i64,
        range: DateRange,
    ) -> ApiResult<Vec<AdditionEntry>> {
        Ok(self.addition_repo.find_entries_for_group(group_id, range)?)
    }

    pub fn clear_all_additions(&self) -> ApiResult<usize> {
        Ok(self.addition_repo.clear_all()?)
    }
}
