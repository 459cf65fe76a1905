//! # Inventory Metrics Core
//!
//! 核心資料模型、配置與資料存取介面

pub mod calendar;
pub mod config;
pub mod fact_store;
pub mod observation;

// Re-export 主要類型
pub use calendar::DateRange;
pub use config::MetricsConfig;
pub use fact_store::{DimensionLookup, FactStore, InMemoryFactStore, ObservationFilter};
pub use observation::{Observation, Product, Store};

use chrono::NaiveDate;

/// 庫存指標錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    #[error("無法取得觀測資料 [{from} ~ {to}]: {reason}")]
    DataUnavailable {
        from: NaiveDate,
        to: NaiveDate,
        reason: String,
    },

    #[error("找不到門市: {0}")]
    UnknownStore(String),

    #[error("找不到商品: {0}")]
    UnknownProduct(String),

    #[error("重複的觀測記錄: 門市 {store_id}, 商品 {product_id}, 日期 {date}")]
    DuplicateObservation {
        store_id: String,
        product_id: String,
        date: NaiveDate,
    },

    #[error("無效的配置: {0}")]
    InvalidConfig(String),

    #[error("配置解析失敗: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, InventoryError>;
