use super::ScoreStore;
use crate::api::error::ApiResult;
use crate::domain::period::DateRange;
use crate::domain::ranking::{
    AdditionRankingEntry, DeductionRankingEntry, GroupRankingEntry, TotalScoreEntry,
};
use crate::domain::types::RankingSortKey;

impl ScoreStore {
    // ==========================================
    // 排名（按需计算）
    // ==========================================

    /// 扣分排名: 总扣分为 0 的学生不参与
    pub fn deduction_ranking(&self, sort_key: RankingSortKey) -> ApiResult<Vec<DeductionRankingEntry>> {
        let totals = self.ranking_repo.load_student_totals()?;
        Ok(self.ranking_engine.deduction_ranking(&totals, sort_key))
    }

    /// 加分排名: 加分合计 <= 0 的学生不参与
    pub fn addition_ranking(&self) -> ApiResult<Vec<AdditionRankingEntry>> {
        let totals = self.ranking_repo.load_student_totals()?;
        Ok(self.ranking_engine.addition_ranking(&totals))
    }

    /// 总分排名: 初始分 + 加分 - 扣分, 全部学生
    pub fn total_score_ranking(&self) -> ApiResult<Vec<TotalScoreEntry>> {
        let totals = self.ranking_repo.load_student_totals()?;
        Ok(self.ranking_engine.total_score_ranking(&totals))
    }

    /// 小组排名: 成员加分合计; 给定窗口时只统计与窗口有交集的加分记录
    pub fn group_ranking(&self, window: Option<DateRange>) -> ApiResult<Vec<GroupRankingEntry>> {
        let groups = self.ranking_repo.load_group_totals(window)?;
        Ok(self.ranking_engine.group_ranking(groups))
    }
}
