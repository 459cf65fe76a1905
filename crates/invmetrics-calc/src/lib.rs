//! # Inventory Metrics Calculation Engine
//!
//! 庫存指標計算引擎：窗口擷取 → 彙總 → 各指標計算

pub mod abc;
pub mod aggregate;
pub mod calculator;
pub mod forecast;
pub mod recommendation;
pub mod reorder;
pub mod stock;
pub mod stockout;
pub mod turnover;
pub mod window;

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// Re-export 主要類型
pub use abc::{AbcClass, AbcClassifier, AbcRow};
pub use aggregate::{Aggregator, Field, GroupStats};
pub use calculator::MetricsCalculator;
pub use forecast::{DemandForecaster, ForecastPoint, WeekdayProfile};
pub use recommendation::{LowStockAlert, Recommendation, RecommendationEngine};
pub use reorder::{ReorderPoint, ReorderPointCalculator};
pub use stock::{CurrentStock, RegionStock, RegionTotals, StockTotalsCalculator, StoreStock};
pub use stockout::{StockOutCalculator, StockOutRate};
pub use turnover::{DaysOfInventory, DioCalculator, Turnover, TurnoverCalculator};
pub use window::{Window, WindowExtractor};

/// 指標種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricKind {
    StockTotals,
    ReorderPoint,
    Recommendation,
    Turnover,
    DaysOfInventory,
    StockOutRate,
    AbcClassification,
    DemandForecast,
}

impl MetricKind {
    /// 穩定名稱（可作為快取鍵的一部分）
    pub fn name(&self) -> &'static str {
        match self {
            MetricKind::StockTotals => "stock_totals",
            MetricKind::ReorderPoint => "reorder_point",
            MetricKind::Recommendation => "recommendation",
            MetricKind::Turnover => "turnover",
            MetricKind::DaysOfInventory => "days_of_inventory",
            MetricKind::StockOutRate => "stockout_rate",
            MetricKind::AbcClassification => "abc_classification",
            MetricKind::DemandForecast => "demand_forecast",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 單一基準日的完整指標報表
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsReport {
    /// 基準日
    pub as_of: NaiveDate,

    pub store_totals: Vec<StoreStock>,
    pub region_totals: Vec<RegionStock>,
    pub current_stock: Vec<CurrentStock>,
    pub reorder_points: Vec<ReorderPoint>,
    pub recommendations: Vec<Recommendation>,
    pub low_stock_alerts: Vec<LowStockAlert>,
    pub turnover: Vec<Turnover>,
    pub days_of_inventory: Vec<DaysOfInventory>,
    pub stockout_rates: Vec<StockOutRate>,
    pub abc_classes: Vec<AbcRow>,
    pub forecast: Vec<ForecastPoint>,

    /// 警告信息
    pub warnings: Vec<MetricWarning>,

    /// 計算耗時（毫秒）
    pub calculation_time_ms: Option<u64>,
}

impl MetricsReport {
    /// 創建空的報表
    pub fn empty(as_of: NaiveDate) -> Self {
        Self {
            as_of,
            store_totals: Vec::new(),
            region_totals: Vec::new(),
            current_stock: Vec::new(),
            reorder_points: Vec::new(),
            recommendations: Vec::new(),
            low_stock_alerts: Vec::new(),
            turnover: Vec::new(),
            days_of_inventory: Vec::new(),
            stockout_rates: Vec::new(),
            abc_classes: Vec::new(),
            forecast: Vec::new(),
            warnings: Vec::new(),
            calculation_time_ms: None,
        }
    }

    /// 添加警告
    pub fn add_warning(&mut self, warning: MetricWarning) {
        self.warnings.push(warning);
    }

    /// 指定指標的警告
    pub fn warnings_for(&self, metric: MetricKind) -> impl Iterator<Item = &MetricWarning> {
        self.warnings.iter().filter(move |w| w.metric == Some(metric))
    }
}

/// 指標警告
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricWarning {
    /// 相關指標；`None` 表示整份報表
    pub metric: Option<MetricKind>,
    pub message: String,
    pub severity: WarningSeverity,
}

impl MetricWarning {
    pub fn new(
        metric: impl Into<Option<MetricKind>>,
        message: String,
        severity: WarningSeverity,
    ) -> Self {
        Self {
            metric: metric.into(),
            message,
            severity,
        }
    }

    pub fn info(metric: impl Into<Option<MetricKind>>, message: String) -> Self {
        Self::new(metric, message, WarningSeverity::Info)
    }

    pub fn warning(metric: impl Into<Option<MetricKind>>, message: String) -> Self {
        Self::new(metric, message, WarningSeverity::Warning)
    }

    /// 整份報表層級的警告
    pub fn report_level(message: String, severity: WarningSeverity) -> Self {
        Self {
            metric: None,
            message,
            severity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningSeverity {
    Info,
    Warning,
}
