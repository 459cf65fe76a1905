//! ABC 分類（快慢速品項）

use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::aggregate::{Aggregator, Field};
use crate::window::Window;

/// ABC 類別
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AbcClass {
    /// 快速流動
    A,
    /// 中速流動
    B,
    /// 慢速流動
    C,
}

impl AbcClass {
    /// 依累計佔比分類；佔比未定義歸為 C
    pub fn from_cumulative_share(
        share: Option<Decimal>,
        a_threshold: Decimal,
        b_threshold: Decimal,
    ) -> Self {
        match share {
            Some(share) if share <= a_threshold => AbcClass::A,
            Some(share) if share <= b_threshold => AbcClass::B,
            _ => AbcClass::C,
        }
    }

    /// 顯示用標籤
    pub fn label(&self) -> &'static str {
        match self {
            AbcClass::A => "A (Fast)",
            AbcClass::B => "B (Medium)",
            AbcClass::C => "C (Slow)",
        }
    }
}

impl fmt::Display for AbcClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// ABC 分類結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbcRow {
    pub store_id: String,
    pub sku: String,
    pub total_sold: u64,

    /// 依銷量遞減累計至此品項的佔比
    pub cumulative_share: Option<Decimal>,

    pub class: AbcClass,
}

/// ABC 分類器
pub struct AbcClassifier;

impl AbcClassifier {
    /// 在每家門市內依年度銷量分類
    ///
    /// 排序：銷量遞減，同銷量保持商品ID順序；累計佔比逐列累加。
    /// 輸出依門市、類別、銷量遞減排列。門市總銷量為 0 時佔比未定義，全部歸為 C。
    pub fn classify(
        annual_window: &Window,
        a_threshold: Decimal,
        b_threshold: Decimal,
    ) -> Vec<AbcRow> {
        let mut per_store: BTreeMap<String, Vec<(String, u64)>> = BTreeMap::new();
        for ((store_id, sku), stats) in Aggregator::by_store_product(annual_window) {
            per_store
                .entry(store_id)
                .or_default()
                .push((sku, stats.sum(Field::UnitsSold)));
        }

        let mut rows = Vec::new();
        for (store_id, mut products) in per_store {
            products.sort_by(|a, b| b.1.cmp(&a.1));

            let store_total: u64 = products.iter().map(|(_, sold)| sold).sum();
            let store_total = Decimal::from(store_total);
            let mut running: u64 = 0;

            let mut store_rows: Vec<AbcRow> = products
                .into_iter()
                .map(|(sku, total_sold)| {
                    running += total_sold;
                    let cumulative_share = Decimal::from(running).checked_div(store_total);

                    AbcRow {
                        store_id: store_id.clone(),
                        sku,
                        total_sold,
                        cumulative_share,
                        class: AbcClass::from_cumulative_share(
                            cumulative_share,
                            a_threshold,
                            b_threshold,
                        ),
                    }
                })
                .collect();

            store_rows.sort_by(|a, b| a.class.cmp(&b.class).then(b.total_sold.cmp(&a.total_sold)));
            rows.extend(store_rows);
        }

        rows
    }
}
