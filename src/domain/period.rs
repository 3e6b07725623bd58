// ==========================================
// 学生积分管理系统 - 日期区间与锁定时间段
// ==========================================
// 区间语义: [start, end] 双端闭区间
// 重叠判定: A.start <= B.end AND B.start <= A.end
// ==========================================

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// DateRange - 闭区间日期范围
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// 创建日期范围, start > end 时返回 None
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        if start > end {
            return None;
        }
        Some(Self { start, end })
    }

    /// 两个闭区间是否有交集（端点相接也算重叠）
    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} 至 {}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

// ==========================================
// LockedTimePeriod - 锁定时间段
// ==========================================
// 对齐: locked_time_periods 表
// 用途: 排名查询的标准统计窗口
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockedTimePeriod {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: NaiveDateTime,
}

impl LockedTimePeriod {
    pub fn range(&self) -> DateRange {
        DateRange {
            start: self.start_date,
            end: self.end_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_rejects_inverted_range() {
        assert!(DateRange::new(d(2024, 1, 10), d(2024, 1, 1)).is_none());
        assert!(DateRange::new(d(2024, 1, 1), d(2024, 1, 1)).is_some());
    }

    #[test]
    fn test_overlap_is_inclusive_at_endpoints() {
        let a = DateRange::new(d(2024, 1, 1), d(2024, 1, 10)).unwrap();
        let touching = DateRange::new(d(2024, 1, 10), d(2024, 1, 12)).unwrap();
        let after = DateRange::new(d(2024, 1, 11), d(2024, 1, 20)).unwrap();
        let inside = DateRange::new(d(2024, 1, 3), d(2024, 1, 4)).unwrap();
        let around = DateRange::new(d(2023, 12, 1), d(2024, 2, 1)).unwrap();

        assert!(a.overlaps(&touching));
        assert!(touching.overlaps(&a));
        assert!(!a.overlaps(&after));
        assert!(!after.overlaps(&a));
        assert!(a.overlaps(&inside));
        assert!(a.overlaps(&around));
    }

    #[test]
    fn test_display_uses_chinese_separator() {
        let r = DateRange::new(d(2024, 3, 1), d(2024, 3, 31)).unwrap();
        assert_eq!(r.to_string(), "2024-03-01 至 2024-03-31");
        assert!(r.contains(d(2024, 3, 31)));
        assert!(!r.contains(d(2024, 4, 1)));
    }
}
