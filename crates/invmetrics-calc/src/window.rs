//! 回溯窗口擷取

use std::collections::BTreeMap;

use chrono::NaiveDate;
use invmetrics_core::{DateRange, FactStore, Observation, ObservationFilter};

/// 回溯窗口：基準日前 `lookback_days` 天（含基準日）的觀測記錄
#[derive(Debug, Clone)]
pub struct Window {
    /// 基準日
    pub as_of: NaiveDate,

    /// 回溯天數
    pub lookback_days: u32,

    /// 日期範圍
    pub range: DateRange,

    observations: Vec<Observation>,
}

impl Window {
    /// 由觀測記錄建立窗口（範圍外的記錄會被剔除，其餘依日期穩定排序）
    pub fn new(as_of: NaiveDate, lookback_days: u32, observations: Vec<Observation>) -> Self {
        let range = DateRange::lookback(as_of, lookback_days);
        let mut observations: Vec<Observation> = observations
            .into_iter()
            .filter(|o| range.contains(o.date))
            .collect();
        observations.sort_by_key(|o| o.date);

        Self {
            as_of,
            lookback_days,
            range,
            observations,
        }
    }

    /// 縮小為較短的回溯窗口（同一基準日）
    pub fn narrow(&self, lookback_days: u32) -> Self {
        let range = DateRange::lookback(self.as_of, lookback_days.min(self.lookback_days));
        Self {
            as_of: self.as_of,
            lookback_days: lookback_days.min(self.lookback_days),
            range,
            observations: self
                .observations
                .iter()
                .filter(|o| range.contains(o.date))
                .cloned()
                .collect(),
        }
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// 依鍵分組；組內保持日期順序，沒有記錄的組不會出現
    pub fn group_by<K, F>(&self, key_fn: F) -> BTreeMap<K, Vec<&Observation>>
    where
        K: Ord,
        F: Fn(&Observation) -> K,
    {
        let mut groups: BTreeMap<K, Vec<&Observation>> = BTreeMap::new();
        for observation in &self.observations {
            groups.entry(key_fn(observation)).or_default().push(observation);
        }
        groups
    }
}

/// 窗口擷取器
pub struct WindowExtractor;

impl WindowExtractor {
    /// 從事實表擷取回溯窗口
    pub fn extract(
        fact_store: &dyn FactStore,
        filter: &ObservationFilter,
        as_of: NaiveDate,
        lookback_days: u32,
    ) -> invmetrics_core::Result<Window> {
        let range = DateRange::lookback(as_of, lookback_days);
        let observations = fact_store.observations_in_range(filter, range)?;

        tracing::debug!(
            "擷取窗口 [{} ~ {}]（回溯 {} 天）：{} 筆",
            range.from,
            range.to,
            lookback_days,
            observations.len()
        );

        Ok(Window::new(as_of, lookback_days, observations))
    }
}
