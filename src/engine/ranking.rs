// ==========================================
// 学生积分管理系统 - 排名计算引擎
// ==========================================
// 职责: 基于分项汇总快照计算各类排名
// 红线: Engine 不拼 SQL, 每次按需计算, 不缓存
// ==========================================
// 排序: 按口径降序, 同分按姓名升序保证结果稳定
// ==========================================

use crate::domain::ranking::{
    AdditionRankingEntry, DeductionRankingEntry, GroupRankingEntry, StudentPointTotals,
    TotalScoreEntry,
};
use crate::domain::types::RankingSortKey;
use std::cmp::Ordering;
use tracing::instrument;

fn desc_then_name(a: f64, b: f64, name_a: &str, name_b: &str) -> Ordering {
    b.total_cmp(&a).then_with(|| name_a.cmp(name_b))
}

// ==========================================
// RankingEngine - 排名计算引擎
// ==========================================
#[derive(Debug, Default)]
pub struct RankingEngine;

impl RankingEngine {
    pub fn new() -> Self {
        Self
    }

    /// 扣分排名: 违规/非违规分项求和, 总扣分为 0 的学生不参与排名
    #[instrument(skip(self, totals), fields(count = totals.len()))]
    pub fn deduction_ranking(
        &self,
        totals: &[StudentPointTotals],
        sort_key: RankingSortKey,
    ) -> Vec<DeductionRankingEntry> {
        let mut ranking: Vec<DeductionRankingEntry> = totals
            .iter()
            .filter(|t| t.deduction_points() > 0.0)
            .map(|t| DeductionRankingEntry {
                student_name: t.student_name.clone(),
                violation_points: t.violation_points,
                non_violation_points: t.non_violation_points,
                total_points: t.deduction_points(),
            })
            .collect();

        let key = |e: &DeductionRankingEntry| match sort_key {
            RankingSortKey::Total => e.total_points,
            RankingSortKey::Violation => e.violation_points,
            RankingSortKey::NonViolation => e.non_violation_points,
        };
        ranking.sort_by(|a, b| desc_then_name(key(a), key(b), &a.student_name, &b.student_name));
        ranking
    }

    /// 加分排名: 加分合计 <= 0 的学生不参与排名
    #[instrument(skip(self, totals), fields(count = totals.len()))]
    pub fn addition_ranking(&self, totals: &[StudentPointTotals]) -> Vec<AdditionRankingEntry> {
        let mut ranking: Vec<AdditionRankingEntry> = totals
            .iter()
            .filter(|t| t.addition_points > 0.0)
            .map(|t| AdditionRankingEntry {
                student_name: t.student_name.clone(),
                addition_points: t.addition_points,
            })
            .collect();
        ranking.sort_by(|a, b| {
            desc_then_name(a.addition_points, b.addition_points, &a.student_name, &b.student_name)
        });
        ranking
    }

    /// 总分排名: 初始分 + 加分 - 扣分, 全部学生参与（含负分）
    #[instrument(skip(self, totals), fields(count = totals.len()))]
    pub fn total_score_ranking(&self, totals: &[StudentPointTotals]) -> Vec<TotalScoreEntry> {
        let mut ranking: Vec<TotalScoreEntry> = totals
            .iter()
            .map(|t| TotalScoreEntry {
                student_id: t.student_id,
                student_name: t.student_name.clone(),
                initial_score: t.initial_score,
                addition_points: t.addition_points,
                deduction_points: t.deduction_points(),
                total_score: t.initial_score + t.addition_points - t.deduction_points(),
            })
            .collect();
        ranking.sort_by(|a, b| {
            desc_then_name(a.total_score, b.total_score, &a.student_name, &b.student_name)
        });
        ranking
    }

    /// 小组排名: 按小组总分降序
    pub fn group_ranking(&self, mut groups: Vec<GroupRankingEntry>) -> Vec<GroupRankingEntry> {
        groups.sort_by(|a, b| {
            desc_then_name(a.total_points, b.total_points, &a.group_name, &b.group_name)
        });
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn totals(name: &str, initial: f64, violation: f64, non_violation: f64, addition: f64) -> StudentPointTotals {
        StudentPointTotals {
            student_id: name.len() as i64,
            student_name: name.to_string(),
            initial_score: initial,
            violation_points: violation,
            non_violation_points: non_violation,
            addition_points: addition,
        }
    }

    fn sample() -> Vec<StudentPointTotals> {
        vec![
            totals("a", 0.0, 5.0, 0.0, 3.0),
            totals("b", 10.0, 1.0, 6.0, 0.0),
            totals("c", 2.0, 0.0, 0.0, -1.0),
            totals("d", 0.0, 0.0, 0.0, 0.0),
        ]
    }

    #[test]
    fn test_deduction_ranking_excludes_zero_totals() {
        let engine = RankingEngine::new();
        let ranking = engine.deduction_ranking(&sample(), RankingSortKey::Total);
        let names: Vec<_> = ranking.iter().map(|e| e.student_name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(ranking[0].total_points, 7.0);

        let by_violation = engine.deduction_ranking(&sample(), RankingSortKey::Violation);
        assert_eq!(by_violation[0].student_name, "a");

        let by_non_violation = engine.deduction_ranking(&sample(), RankingSortKey::NonViolation);
        assert_eq!(by_non_violation[0].student_name, "b");
    }

    #[test]
    fn test_addition_ranking_excludes_non_positive() {
        let engine = RankingEngine::new();
        let ranking = engine.addition_ranking(&sample());
        assert_eq!(ranking.len(), 1);
        assert_eq!(ranking[0].student_name, "a");
        assert!(ranking.iter().all(|e| e.addition_points > 0.0));
    }

    #[test]
    fn test_total_score_ranking_includes_everyone() {
        let engine = RankingEngine::new();
        let ranking = engine.total_score_ranking(&sample());
        assert_eq!(ranking.len(), 4);
        for entry in &ranking {
            assert_eq!(
                entry.total_score,
                entry.initial_score + entry.addition_points - entry.deduction_points
            );
        }
        let names: Vec<_> = ranking.iter().map(|e| e.student_name.as_str()).collect();
        // b: 3, c: 1, d: 0, a: -2
        assert_eq!(names, vec!["b", "c", "d", "a"]);
    }

    #[test]
    fn test_ties_break_by_name() {
        let engine = RankingEngine::new();
        let groups = vec![
            GroupRankingEntry { group_id: 2, group_name: "乙组".to_string(), total_points: 5.0 },
            GroupRankingEntry { group_id: 1, group_name: "丙组".to_string(), total_points: 9.0 },
            GroupRankingEntry { group_id: 3, group_name: "甲组".to_string(), total_points: 5.0 },
        ];
        let ranked = engine.group_ranking(groups);
        assert_eq!(ranked[0].group_id, 1);
        assert!(ranked[1].group_name < ranked[2].group_name);
    }
}
