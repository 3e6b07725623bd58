use super::ScoreStore;
use crate::api::error::ApiResult;
use crate::domain::deduction::{
    Compensation, CompensationRecord, DeductionFilter, DeductionRecord, ViolationCount,
};
use crate::domain::period::DateRange;
use tracing::instrument;

impl ScoreStore {
    // ==========================================
    // 扣分记录
    // ==========================================

    /// 添加扣分记录
    ///
    /// # 返回
    /// - Ok(i64): 新记录ID
    /// - Err: 校验失败（分值为负/非有限数）或存储失败（含学生不存在的外键失败）
    pub fn add_deduction(&self, record: &DeductionRecord) -> ApiResult<i64> {
        Ok(self.deduction_repo.insert(record)?)
    }

    /// 批量添加扣分记录（全部成功或全部回滚）
    #[instrument(skip(self, records), fields(count = records.len()))]
    pub fn add_deduction_batch(&self, records: &[DeductionRecord]) -> ApiResult<Vec<i64>> {
        Ok(self.deduction_repo.batch_insert(records)?)
    }

    /// 指定学生的扣分记录（日期新到旧）
    pub fn list_deductions(&self, student_name: &str) -> ApiResult<Vec<DeductionRecord>> {
        Ok(self.deduction_repo.find_by_student(student_name)?)
    }

    pub fn get_deduction(&self, record_id: i64) -> ApiResult<Option<DeductionRecord>> {
        Ok(self.deduction_repo.find_by_id(record_id)?)
    }

    /// 补偿扣分记录: 只能降低扣分, 同时追加补偿记录
    ///
    /// `new_treatment` 为 None 时保留原处理措施
    #[instrument(skip(self, compensation), fields(reason = %compensation.reason))]
    pub fn compensate(
        &self,
        record_id: i64,
        new_points: f64,
        new_treatment: Option<&str>,
        compensation: &Compensation,
    ) -> ApiResult<CompensationRecord> {
        Ok(self
            .deduction_repo
            .compensate(record_id, new_points, new_treatment, compensation)?)
    }

    /// 条件搜索扣分记录（条件取交集, 日期新到旧）
    pub fn search_deductions(&self, filter: &DeductionFilter) -> ApiResult<Vec<DeductionRecord>> {
        Ok(self.deduction_repo.search(filter)?)
    }

    /// 窗口内违规次数（按学生分组）
    pub fn count_violations(
        &self,
        student_name: Option<&str>,
        range: DateRange,
    ) -> ApiResult<Vec<ViolationCount>> {
        Ok(self.deduction_repo.count_violations(student_name, range)?)
    }

    /// 已使用过的非违规扣分类型
    pub fn non_violation_types(&self) -> ApiResult<Vec<String>> {
        Ok(self.deduction_repo.non_violation_types()?)
    }

    /// 清除全部扣分与补偿记录
    ///
    /// # 返回
    /// - (删除的扣分记录数, 删除的补偿记录数)
    pub fn clear_all_deductions(&self) -> ApiResult<(usize, usize)> {
        Ok(self.deduction_repo.clear_all()?)
    }

    // ==========================================
    // 补偿记录
    // ==========================================

    /// 扣分记录的补偿历史（新到旧）
    pub fn compensation_records(&self, deduction_record_id: i64) -> ApiResult<Vec<CompensationRecord>> {
        Ok(self.deduction_repo.find_compensations(deduction_record_id)?)
    }

    /// 学生全部扣分记录的补偿历史（新到旧）
    pub fn student_compensation_records(&self, student_name: &str) -> ApiResult<Vec<CompensationRecord>> {
        Ok(self.deduction_repo.find_student_compensations(student_name)?)
    }
}
