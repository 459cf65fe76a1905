//! 觀測記錄與維度模型

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 每日觀測記錄（事實表的一列）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    /// 觀測日期
    pub date: NaiveDate,

    /// 門市ID
    pub store_id: String,

    /// 商品ID（SKU）
    pub product_id: String,

    /// 日終庫存快照
    pub inventory_level: u32,

    /// 當日銷售量
    pub units_sold: u32,

    /// 當日訂購量（指標計算不使用）
    pub units_ordered: u32,
}

impl Observation {
    /// 創建新的觀測記錄
    pub fn new(
        date: NaiveDate,
        store_id: impl Into<String>,
        product_id: impl Into<String>,
        inventory_level: u32,
        units_sold: u32,
    ) -> Self {
        Self {
            date,
            store_id: store_id.into(),
            product_id: product_id.into(),
            inventory_level,
            units_sold,
            units_ordered: 0,
        }
    }

    /// 建構器模式：設置訂購量
    pub fn with_units_ordered(mut self, units_ordered: u32) -> Self {
        self.units_ordered = units_ordered;
        self
    }

    /// 檢查是否缺貨
    pub fn is_stock_out(&self) -> bool {
        self.inventory_level == 0
    }
}

/// 門市維度
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    /// 門市ID
    pub store_id: String,

    /// 所屬區域
    pub region: String,
}

impl Store {
    pub fn new(store_id: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            store_id: store_id.into(),
            region: region.into(),
        }
    }
}

/// 商品維度
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// 商品ID（SKU）
    pub product_id: String,

    /// 商品類別
    pub category: String,
}

impl Product {
    pub fn new(product_id: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            product_id: product_id.into(),
            category: category.into(),
        }
    }
}
