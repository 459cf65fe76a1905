//! 缺貨率

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::aggregate::{guarded_div, round_half_up, Aggregator};
use crate::window::Window;

/// 缺貨率
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockOutRate {
    pub store_id: String,
    pub sku: String,
    pub observed_days: u64,
    pub stock_out_days: u64,

    /// `round(100 × 缺貨天數 / 觀測天數, 1)`
    pub stockout_pct: Option<Decimal>,
}

/// 缺貨率計算器
pub struct StockOutCalculator;

impl StockOutCalculator {
    /// 窗口內各 (門市, 商品) 的缺貨率
    ///
    /// 預設使用單日窗口，每組只有一筆觀測，結果只會是 0.0 或 100.0。
    pub fn calculate(window: &Window) -> Vec<StockOutRate> {
        Aggregator::by_store_product(window)
            .into_iter()
            .map(|((store_id, sku), stats)| {
                let stockout_pct = guarded_div(
                    Decimal::ONE_HUNDRED * Decimal::from(stats.stock_out_count()),
                    Some(Decimal::from(stats.count())),
                )
                .map(|pct| round_half_up(pct, 1));

                StockOutRate {
                    store_id,
                    sku,
                    observed_days: stats.count(),
                    stock_out_days: stats.stock_out_count(),
                    stockout_pct,
                }
            })
            .collect()
    }
}
