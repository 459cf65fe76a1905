//! 庫存周轉率與庫存天數（DIO）

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::aggregate::{guarded_div, round_half_up, Aggregator, Field};
use crate::window::Window;

/// 庫存周轉率
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turnover {
    pub store_id: String,
    pub sku: String,
    pub total_sold: u64,
    pub avg_inventory: Option<Decimal>,

    /// `round(total_sold / avg_inventory, 2)`
    pub turnover_ratio: Option<Decimal>,
}

/// 庫存天數（Days of Inventory Outstanding）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaysOfInventory {
    pub store_id: String,
    pub sku: String,
    pub avg_inventory: Option<Decimal>,
    pub avg_daily_sales: Option<Decimal>,

    /// `round(avg_inventory / avg_daily_sales, 1)`
    pub days_of_inventory: Option<Decimal>,
}

/// 周轉率計算器
pub struct TurnoverCalculator;

impl TurnoverCalculator {
    /// 年度窗口內的周轉率；平均庫存為 0 時未定義
    pub fn calculate(annual_window: &Window) -> Vec<Turnover> {
        Aggregator::by_store_product(annual_window)
            .into_iter()
            .map(|((store_id, sku), stats)| {
                let total_sold = stats.sum(Field::UnitsSold);
                let avg_inventory = stats.avg(Field::InventoryLevel);

                // total_sold / (inventory_sum / count) = total_sold × count / inventory_sum
                let turnover_ratio = Decimal::from(total_sold)
                    .checked_mul(Decimal::from(stats.count()))
                    .and_then(|scaled| {
                        guarded_div(scaled, Some(Decimal::from(stats.sum(Field::InventoryLevel))))
                    })
                    .map(|ratio| round_half_up(ratio, 2));

                Turnover {
                    store_id,
                    sku,
                    total_sold,
                    avg_inventory,
                    turnover_ratio,
                }
            })
            .collect()
    }
}

/// 庫存天數計算器
pub struct DioCalculator;

impl DioCalculator {
    /// 需求窗口內的庫存天數
    ///
    /// 平均庫存或平均日銷量為 0 時未定義。
    pub fn calculate(demand_window: &Window) -> Vec<DaysOfInventory> {
        Aggregator::by_store_product(demand_window)
            .into_iter()
            .map(|((store_id, sku), stats)| {
                let inventory_sum = stats.sum(Field::InventoryLevel);

                // 兩個平均值的分母相同，直接以總和相除
                let days_of_inventory = (inventory_sum > 0)
                    .then(|| {
                        guarded_div(
                            Decimal::from(inventory_sum),
                            Some(Decimal::from(stats.sum(Field::UnitsSold))),
                        )
                    })
                    .flatten()
                    .map(|days| round_half_up(days, 1));

                DaysOfInventory {
                    store_id,
                    sku,
                    avg_inventory: stats.avg(Field::InventoryLevel),
                    avg_daily_sales: stats.avg(Field::UnitsSold),
                    days_of_inventory,
                }
            })
            .collect()
    }
}
