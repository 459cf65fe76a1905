//! 需求預測（星期季節性）

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Weekday};
use invmetrics_core::calendar::days_after;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::aggregate::{weekday_key, Aggregator, Field, GroupStats};
use crate::window::Window;

/// 單日預測值
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub weekday: Weekday,

    /// 歷史同星期的平均日銷量；該星期無歷史資料時未定義
    pub forecast_sales: Option<Decimal>,
}

/// 星期平均銷量
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekdayProfile {
    pub weekday: Weekday,
    pub observations: u64,
    pub avg_sales: Option<Decimal>,
}

/// 需求預測器
pub struct DemandForecaster;

impl DemandForecaster {
    /// 預測基準日之後 `horizon_days` 天的銷量
    ///
    /// 每個未來日期取歷史窗口內同星期所有觀測的平均銷量。
    pub fn forecast(history: &Window, horizon_days: u32) -> Vec<ForecastPoint> {
        let by_weekday = Aggregator::by_weekday(history);

        days_after(history.as_of, horizon_days)
            .into_iter()
            .map(|date| {
                let weekday = date.weekday();
                ForecastPoint {
                    date,
                    weekday,
                    forecast_sales: by_weekday
                        .get(&weekday_key(weekday))
                        .and_then(|stats| stats.avg(Field::UnitsSold)),
                }
            })
            .collect()
    }

    /// 歷史窗口的星期銷量輪廓（週日起算）
    pub fn weekday_profile(history: &Window) -> Vec<WeekdayProfile> {
        let by_weekday: BTreeMap<u32, GroupStats> = Aggregator::by_weekday(history);

        [
            Weekday::Sun,
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
        ]
        .into_iter()
        .map(|weekday| {
            let stats = by_weekday
                .get(&weekday_key(weekday))
                .copied()
                .unwrap_or_default();
            WeekdayProfile {
                weekday,
                observations: stats.count(),
                avg_sales: stats.avg(Field::UnitsSold),
            }
        })
        .collect()
    }
}
