//! 補貨建議

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::reorder::ReorderPoint;
use crate::stock::CurrentStock;

/// 補貨建議（正值 = 需要補貨）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub store_id: String,
    pub sku: String,
    pub inventory_level: u64,
    pub reorder_point: Option<i64>,

    /// `reorder_point - inventory_level`
    pub to_order: Option<i64>,
}

/// 低庫存警示（現有庫存低於再訂購點）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LowStockAlert {
    pub store_id: String,
    pub sku: String,
    pub inventory_level: u64,
    pub reorder_point: i64,
}

/// 補貨建議引擎
pub struct RecommendationEngine;

impl RecommendationEngine {
    /// 合併再訂購點與現有庫存（內連接），依建議量遞減排序
    ///
    /// 只出現在其中一邊的 (門市, 商品) 會被捨棄；建議量未定義者排在最後。
    pub fn recommend(
        reorder_points: &[ReorderPoint],
        current_stock: &[CurrentStock],
    ) -> Vec<Recommendation> {
        let stock: HashMap<(&str, &str), u64> = current_stock
            .iter()
            .map(|row| ((row.store_id.as_str(), row.sku.as_str()), row.inventory_level))
            .collect();

        let mut recommendations: Vec<Recommendation> = reorder_points
            .iter()
            .filter_map(|rp| {
                let inventory_level = *stock.get(&(rp.store_id.as_str(), rp.sku.as_str()))?;
                let to_order = rp.reorder_point.and_then(|point| {
                    i64::try_from(inventory_level)
                        .ok()
                        .and_then(|level| point.checked_sub(level))
                });

                Some(Recommendation {
                    store_id: rp.store_id.clone(),
                    sku: rp.sku.clone(),
                    inventory_level,
                    reorder_point: rp.reorder_point,
                    to_order,
                })
            })
            .collect();

        recommendations.sort_by(|a, b| descending_defined_first(a.to_order, b.to_order));
        recommendations
    }

    /// 低庫存警示，依門市、商品遞增
    pub fn low_stock_alerts(recommendations: &[Recommendation]) -> Vec<LowStockAlert> {
        let mut alerts: Vec<LowStockAlert> = recommendations
            .iter()
            .filter_map(|rec| {
                let reorder_point = rec.reorder_point?;
                let below = i64::try_from(rec.inventory_level).map_or(false, |level| level < reorder_point);
                below.then(|| LowStockAlert {
                    store_id: rec.store_id.clone(),
                    sku: rec.sku.clone(),
                    inventory_level: rec.inventory_level,
                    reorder_point,
                })
            })
            .collect();

        alerts.sort_by(|a, b| (&a.store_id, &a.sku).cmp(&(&b.store_id, &b.sku)));
        alerts
    }
}

/// 遞減排序，`None` 排在最後
pub(crate) fn descending_defined_first<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
