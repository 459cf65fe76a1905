//! # Inventory Metrics
//!
//! 零售庫存指標引擎：庫存總量、再訂購點、補貨建議、周轉率、
//! 庫存天數、缺貨率、ABC 分類與星期季節性需求預測。
//!
//! ```
//! use chrono::NaiveDate;
//! use invmetrics::{InMemoryFactStore, MetricsCalculator, Observation, Product, Store};
//!
//! let as_of = NaiveDate::from_ymd_opt(2025, 11, 30).unwrap();
//! let mut facts = InMemoryFactStore::new();
//! facts.add_store(Store::new("S001", "North"));
//! facts.add_product(Product::new("P0001", "Toys"));
//! facts
//!     .add_observation(Observation::new(as_of, "S001", "P0001", 12, 3))
//!     .unwrap();
//!
//! let report = MetricsCalculator::new(&facts, &facts).calculate(as_of).unwrap();
//! assert_eq!(report.store_totals[0].total_stock, 12);
//! ```

pub use invmetrics_calc::*;
pub use invmetrics_core::{
    calendar, config, fact_store, observation, DateRange, DimensionLookup, FactStore,
    InMemoryFactStore, InventoryError, MetricsConfig, Observation, ObservationFilter, Product,
    Result, Store,
};
