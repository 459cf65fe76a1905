//! 事實表存取介面
//!
//! 指標計算只透過 [`FactStore`] 與 [`DimensionLookup`] 讀取資料，
//! 實際的資料庫連線由外部實作注入。

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::NaiveDate;

use crate::{DateRange, InventoryError, Observation, Product, Result, Store};

/// 觀測查詢篩選條件（`None` 表示全部）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservationFilter {
    /// 門市ID
    pub store_id: Option<String>,

    /// 商品ID
    pub product_id: Option<String>,
}

impl ObservationFilter {
    /// 不篩選
    pub fn all() -> Self {
        Self::default()
    }

    /// 建構器模式：限定門市
    pub fn with_store(mut self, store_id: impl Into<String>) -> Self {
        self.store_id = Some(store_id.into());
        self
    }

    /// 建構器模式：限定商品
    pub fn with_product(mut self, product_id: impl Into<String>) -> Self {
        self.product_id = Some(product_id.into());
        self
    }

    /// 檢查觀測是否符合條件
    pub fn matches(&self, observation: &Observation) -> bool {
        self.store_id
            .as_deref()
            .map_or(true, |id| id == observation.store_id)
            && self
                .product_id
                .as_deref()
                .map_or(true, |id| id == observation.product_id)
    }
}

/// 事實表存取
pub trait FactStore: Send + Sync {
    /// 取得區間內的觀測記錄，依日期、門市、商品遞增排序
    ///
    /// 無法取得完整區間時回傳 [`InventoryError::DataUnavailable`]，
    /// 不可回傳部分結果。
    fn observations_in_range(
        &self,
        filter: &ObservationFilter,
        range: DateRange,
    ) -> Result<Vec<Observation>>;

    /// 所有有觀測記錄的日期（由新到舊）
    fn observed_dates(&self) -> Result<Vec<NaiveDate>>;
}

/// 維度查詢
pub trait DimensionLookup: Send + Sync {
    /// 門市所屬區域
    fn region_of(&self, store_id: &str) -> Option<String>;

    /// 商品類別
    fn category_of(&self, product_id: &str) -> Option<String>;
}

/// 記憶體內事實表（測試與示範用）
#[derive(Debug, Clone, Default)]
pub struct InMemoryFactStore {
    stores: HashMap<String, Store>,
    products: HashMap<String, Product>,
    observations: BTreeMap<(NaiveDate, String, String), Observation>,
}

impl InMemoryFactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 註冊門市
    pub fn add_store(&mut self, store: Store) {
        self.stores.insert(store.store_id.clone(), store);
    }

    /// 註冊商品
    pub fn add_product(&mut self, product: Product) {
        self.products.insert(product.product_id.clone(), product);
    }

    /// 新增觀測記錄
    ///
    /// 門市與商品必須先註冊；同一 (門市, 商品, 日期) 只能有一筆。
    pub fn add_observation(&mut self, observation: Observation) -> Result<()> {
        if !self.stores.contains_key(&observation.store_id) {
            return Err(InventoryError::UnknownStore(observation.store_id));
        }
        if !self.products.contains_key(&observation.product_id) {
            return Err(InventoryError::UnknownProduct(observation.product_id));
        }

        let key = (
            observation.date,
            observation.store_id.clone(),
            observation.product_id.clone(),
        );
        if self.observations.contains_key(&key) {
            return Err(InventoryError::DuplicateObservation {
                store_id: observation.store_id,
                product_id: observation.product_id,
                date: observation.date,
            });
        }

        self.observations.insert(key, observation);
        Ok(())
    }

    /// 批次新增觀測記錄，遇到第一個錯誤即停止
    pub fn extend_observations(
        &mut self,
        observations: impl IntoIterator<Item = Observation>,
    ) -> Result<()> {
        for observation in observations {
            self.add_observation(observation)?;
        }
        Ok(())
    }

    /// 觀測記錄筆數
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

impl FactStore for InMemoryFactStore {
    fn observations_in_range(
        &self,
        filter: &ObservationFilter,
        range: DateRange,
    ) -> Result<Vec<Observation>> {
        let lower = (range.from, String::new(), String::new());

        Ok(self
            .observations
            .range(lower..)
            .map(|(_, observation)| observation)
            .take_while(|observation| observation.date <= range.to)
            .filter(|observation| filter.matches(observation))
            .cloned()
            .collect())
    }

    fn observed_dates(&self) -> Result<Vec<NaiveDate>> {
        let dates: BTreeSet<NaiveDate> = self.observations.keys().map(|(date, _, _)| *date).collect();
        Ok(dates.into_iter().rev().collect())
    }
}

impl DimensionLookup for InMemoryFactStore {
    fn region_of(&self, store_id: &str) -> Option<String> {
        self.stores.get(store_id).map(|store| store.region.clone())
    }

    fn category_of(&self, product_id: &str) -> Option<String> {
        self.products
            .get(product_id)
            .map(|product| product.category.clone())
    }
}
