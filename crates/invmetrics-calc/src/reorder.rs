//! 再訂購點

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::aggregate::{Aggregator, Field, GroupStats};
use crate::window::Window;

/// 再訂購點
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderPoint {
    pub store_id: String,
    pub sku: String,

    /// 窗口內平均日銷量
    pub avg_daily_sales: Option<Decimal>,

    /// `ceil(平均日銷量 × 涵蓋天數)`
    pub reorder_point: Option<i64>,
}

/// 再訂購點計算器
pub struct ReorderPointCalculator;

impl ReorderPointCalculator {
    /// 計算各 (門市, 商品) 的再訂購點
    ///
    /// `demand_window` 通常為 30 天回溯窗口。
    pub fn calculate(demand_window: &Window, coverage_days: u32) -> Vec<ReorderPoint> {
        Aggregator::by_store_product(demand_window)
            .into_iter()
            .map(|((store_id, sku), stats)| ReorderPoint {
                store_id,
                sku,
                avg_daily_sales: stats.avg(Field::UnitsSold),
                reorder_point: Self::reorder_point(&stats, coverage_days),
            })
            .collect()
    }

    /// `ceil(sold / count × coverage)`，以整數運算避免平均值的捨入誤差
    ///
    /// 空組回傳 `None`。
    pub fn reorder_point(stats: &GroupStats, coverage_days: u32) -> Option<i64> {
        let count = u128::from(stats.count());
        if count == 0 {
            return None;
        }

        let demand = u128::from(stats.sum(Field::UnitsSold)) * u128::from(coverage_days);
        i64::try_from(demand.div_ceil(count)).ok()
    }
}
