// ==========================================
// 学生积分管理系统 - 区间重叠判定
// ==========================================
// 判定: A.start <= B.end AND B.start <= A.end (闭区间)
// 输入为已读出的快照, 不访问数据库
// ==========================================

use crate::domain::addition::AdditionRecord;
use crate::domain::period::DateRange;

/// 查找与候选区间重叠的第一条加分记录
pub fn find_overlapping_addition<'a>(
    existing: &'a [AdditionRecord],
    candidate: &DateRange,
) -> Option<&'a AdditionRecord> {
    existing.iter().find(|r| r.period().overlaps(candidate))
}

/// 候选区间是否与任一区间重叠
pub fn overlaps_any<I>(ranges: I, candidate: &DateRange) -> bool
where
    I: IntoIterator<Item = DateRange>,
{
    ranges.into_iter().any(|r| r.overlaps(candidate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, day).unwrap()
    }

    #[test]
    fn test_find_overlapping_addition() {
        let mut existing = AdditionRecord::new("张三", 2.0, d(1, 1), d(1, 10));
        existing.id = Some(7);
        let records = vec![existing];

        let hit = find_overlapping_addition(&records, &DateRange::new(d(1, 5), d(1, 15)).unwrap());
        assert_eq!(hit.and_then(|r| r.id), Some(7));

        let miss = find_overlapping_addition(&records, &DateRange::new(d(1, 11), d(1, 20)).unwrap());
        assert!(miss.is_none());
    }

    #[test]
    fn test_overlaps_any() {
        let periods = vec![
            DateRange::new(d(2, 1), d(2, 28)).unwrap(),
            DateRange::new(d(4, 1), d(4, 30)).unwrap(),
        ];
        assert!(overlaps_any(periods.clone(), &DateRange::new(d(2, 28), d(3, 5)).unwrap()));
        assert!(!overlaps_any(periods.clone(), &DateRange::new(d(3, 1), d(3, 31)).unwrap()));
        assert!(!overlaps_any(Vec::new(), &DateRange::new(d(3, 1), d(3, 31)).unwrap()));
    }
}
