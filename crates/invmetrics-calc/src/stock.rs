//! 庫存總量

use invmetrics_core::DimensionLookup;
use serde::{Deserialize, Serialize};

use crate::aggregate::{Aggregator, Field};
use crate::window::Window;

/// 門市庫存總量
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStock {
    pub store_id: String,
    pub total_stock: u64,
}

/// 區域庫存總量
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionStock {
    pub region: String,
    pub total_stock: u64,
}

/// 基準日各 (門市, 商品) 的現有庫存
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentStock {
    pub store_id: String,
    pub sku: String,
    pub inventory_level: u64,
}

/// 區域彙總結果
#[derive(Debug, Clone, Default)]
pub struct RegionTotals {
    pub rows: Vec<RegionStock>,

    /// 查不到區域的門市
    pub unmapped_stores: Vec<String>,
}

/// 庫存總量計算器
///
/// 輸入皆為基準日當天的單日窗口。
pub struct StockTotalsCalculator;

impl StockTotalsCalculator {
    /// 依門市加總庫存（門市ID遞增）
    pub fn by_store(latest: &Window) -> Vec<StoreStock> {
        Aggregator::by_store(latest)
            .into_iter()
            .map(|(store_id, stats)| StoreStock {
                store_id,
                total_stock: stats.sum(Field::InventoryLevel),
            })
            .collect()
    }

    /// 依區域加總庫存（區域名稱遞增）
    pub fn by_region(latest: &Window, dimensions: &dyn DimensionLookup) -> RegionTotals {
        let (regions, unmapped_stores) = Aggregator::by_region(latest, dimensions);

        RegionTotals {
            rows: regions
                .into_iter()
                .map(|(region, stats)| RegionStock {
                    region,
                    total_stock: stats.sum(Field::InventoryLevel),
                })
                .collect(),
            unmapped_stores,
        }
    }

    /// 各 (門市, 商品) 的現有庫存
    pub fn current_stock(latest: &Window) -> Vec<CurrentStock> {
        Aggregator::by_store_product(latest)
            .into_iter()
            .map(|((store_id, sku), stats)| CurrentStock {
                store_id,
                sku,
                inventory_level: stats.sum(Field::InventoryLevel),
            })
            .collect()
    }
}
