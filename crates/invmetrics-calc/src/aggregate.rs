//! 窗口彙總

use std::collections::BTreeMap;

use chrono::{Datelike, Weekday};
use invmetrics_core::{DimensionLookup, Observation};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::window::Window;

/// 可彙總欄位
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    InventoryLevel,
    UnitsSold,
    UnitsOrdered,
}

impl Field {
    fn value(self, observation: &Observation) -> u32 {
        match self {
            Field::InventoryLevel => observation.inventory_level,
            Field::UnitsSold => observation.units_sold,
            Field::UnitsOrdered => observation.units_ordered,
        }
    }
}

/// 單組彙總值
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroupStats {
    count: u64,
    inventory_sum: u64,
    sold_sum: u64,
    ordered_sum: u64,
    stock_out_count: u64,
}

impl GroupStats {
    /// 從觀測記錄累加
    pub fn from_observations<'a>(observations: impl IntoIterator<Item = &'a Observation>) -> Self {
        let mut stats = Self::default();
        for observation in observations {
            stats.add(observation);
        }
        stats
    }

    pub fn add(&mut self, observation: &Observation) {
        self.count += 1;
        self.inventory_sum += u64::from(observation.inventory_level);
        self.sold_sum += u64::from(observation.units_sold);
        self.ordered_sum += u64::from(observation.units_ordered);
        if observation.is_stock_out() {
            self.stock_out_count += 1;
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// 缺貨（庫存為 0）的記錄數
    pub fn stock_out_count(&self) -> u64 {
        self.stock_out_count
    }

    pub fn sum(&self, field: Field) -> u64 {
        match field {
            Field::InventoryLevel => self.inventory_sum,
            Field::UnitsSold => self.sold_sum,
            Field::UnitsOrdered => self.ordered_sum,
        }
    }

    /// 平均值；空組為 `None`
    pub fn avg(&self, field: Field) -> Option<Decimal> {
        Decimal::from(self.sum(field)).checked_div(Decimal::from(self.count))
    }
}

/// 彙總器
pub struct Aggregator;

impl Aggregator {
    /// 依自訂鍵彙總
    pub fn aggregate_by<K, F>(window: &Window, key_fn: F) -> BTreeMap<K, GroupStats>
    where
        K: Ord,
        F: Fn(&Observation) -> K,
    {
        window
            .group_by(key_fn)
            .into_iter()
            .map(|(key, observations)| (key, GroupStats::from_observations(observations)))
            .collect()
    }

    /// 依門市彙總
    pub fn by_store(window: &Window) -> BTreeMap<String, GroupStats> {
        Self::aggregate_by(window, |o| o.store_id.clone())
    }

    /// 依 (門市, 商品) 彙總
    pub fn by_store_product(window: &Window) -> BTreeMap<(String, String), GroupStats> {
        Self::aggregate_by(window, |o| (o.store_id.clone(), o.product_id.clone()))
    }

    /// 依區域彙總
    ///
    /// 查不到區域的門市不計入，並回傳於第二個值。
    pub fn by_region(
        window: &Window,
        dimensions: &dyn DimensionLookup,
    ) -> (BTreeMap<String, GroupStats>, Vec<String>) {
        let mut regions: BTreeMap<String, GroupStats> = BTreeMap::new();
        let mut unmapped = Vec::new();

        for (store_id, observations) in window.group_by(|o| o.store_id.clone()) {
            match dimensions.region_of(&store_id) {
                Some(region) => {
                    let stats = regions.entry(region).or_default();
                    for observation in observations {
                        stats.add(observation);
                    }
                }
                None => unmapped.push(store_id),
            }
        }

        (regions, unmapped)
    }

    /// 依星期彙總（鍵為距週日天數，週日 = 0）
    pub fn by_weekday(window: &Window) -> BTreeMap<u32, GroupStats> {
        Self::aggregate_by(window, |o| o.date.weekday().num_days_from_sunday())
    }

    /// 全體彙總
    pub fn overall(window: &Window) -> GroupStats {
        GroupStats::from_observations(window.observations())
    }
}

/// 四捨五入（中點遠離零）
pub fn round_half_up(value: Decimal, decimal_places: u32) -> Decimal {
    value.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointAwayFromZero)
}

/// 除法；分母為 0 或未定義時回傳 `None`
pub fn guarded_div(numerator: Decimal, denominator: Option<Decimal>) -> Option<Decimal> {
    denominator
        .filter(|d| !d.is_zero())
        .and_then(|d| numerator.checked_div(d))
}

/// 星期排序鍵（週日 = 0）
pub fn weekday_key(weekday: Weekday) -> u32 {
    weekday.num_days_from_sunday()
}
