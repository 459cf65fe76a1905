//! 日期區間與回溯窗口

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// 閉區間日期範圍 `[from, to]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    /// 起始日期（含）
    pub from: NaiveDate,

    /// 結束日期（含）
    pub to: NaiveDate,
}

impl DateRange {
    /// 創建日期範圍，起訖顛倒時自動交換
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        if from <= to {
            Self { from, to }
        } else {
            Self { from: to, to: from }
        }
    }

    /// 以基準日為終點、回溯 `lookback_days` 天的窗口 `[as_of - L, as_of]`
    ///
    /// `lookback_days = 0` 時窗口只包含基準日當天。
    /// 回溯超出日期下限時截斷於 `NaiveDate::MIN`。
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use invmetrics_core::DateRange;
    ///
    /// let as_of = NaiveDate::from_ymd_opt(2025, 11, 30).unwrap();
    /// let window = DateRange::lookback(as_of, 30);
    /// assert_eq!(window.from, NaiveDate::from_ymd_opt(2025, 10, 31).unwrap());
    /// assert_eq!(window.to, as_of);
    /// ```
    pub fn lookback(as_of: NaiveDate, lookback_days: u32) -> Self {
        let from = as_of
            .checked_sub_days(Days::new(u64::from(lookback_days)))
            .unwrap_or(NaiveDate::MIN);
        Self { from, to: as_of }
    }

    /// 單日窗口
    pub fn single_day(date: NaiveDate) -> Self {
        Self {
            from: date,
            to: date,
        }
    }

    /// 檢查日期是否落在區間內
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }

    /// 區間包含的天數
    pub fn num_days(&self) -> i64 {
        (self.to - self.from).num_days() + 1
    }
}

/// 基準日之後的連續 `horizon_days` 天（不含基準日）
///
/// 超出日期上限的部分直接略過。
pub fn days_after(as_of: NaiveDate, horizon_days: u32) -> Vec<NaiveDate> {
    (1..=u64::from(horizon_days))
        .map_while(|offset| as_of.checked_add_days(Days::new(offset)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case(0, date(2025, 11, 30), 1)]
    #[case(30, date(2025, 10, 31), 31)]
    #[case(365, date(2024, 11, 30), 366)]
    fn test_lookback_window(
        #[case] lookback: u32,
        #[case] expected_from: NaiveDate,
        #[case] expected_days: i64,
    ) {
        let as_of = date(2025, 11, 30);
        let window = DateRange::lookback(as_of, lookback);

        assert_eq!(window.from, expected_from);
        assert_eq!(window.to, as_of);
        assert_eq!(window.num_days(), expected_days);
    }

    #[test]
    fn test_lookback_clamps_at_min_date() {
        let window = DateRange::lookback(NaiveDate::MIN, 30);
        assert_eq!(window.from, NaiveDate::MIN);
        assert_eq!(window.num_days(), 1);
    }

    #[test]
    fn test_contains_is_inclusive() {
        let window = DateRange::new(date(2025, 11, 10), date(2025, 11, 1));

        assert_eq!(window.from, date(2025, 11, 1));
        assert!(window.contains(date(2025, 11, 1)));
        assert!(window.contains(date(2025, 11, 10)));
        assert!(!window.contains(date(2025, 11, 11)));
        assert!(!window.contains(date(2025, 10, 31)));
    }

    #[test]
    fn test_days_after() {
        let dates = days_after(date(2025, 12, 30), 3);
        assert_eq!(
            dates,
            vec![date(2025, 12, 31), date(2026, 1, 1), date(2026, 1, 2)]
        );

        // 日期上限
        assert!(days_after(NaiveDate::MAX, 5).is_empty());
    }
}
