//! 指標主計算器

use chrono::NaiveDate;
use invmetrics_core::{DimensionLookup, FactStore, MetricsConfig, ObservationFilter};

use crate::abc::{AbcClassifier, AbcRow};
use crate::forecast::{DemandForecaster, ForecastPoint};
use crate::recommendation::{LowStockAlert, Recommendation, RecommendationEngine};
use crate::reorder::{ReorderPoint, ReorderPointCalculator};
use crate::stock::{CurrentStock, RegionTotals, StockTotalsCalculator, StoreStock};
use crate::stockout::{StockOutCalculator, StockOutRate};
use crate::turnover::{DaysOfInventory, DioCalculator, Turnover, TurnoverCalculator};
use crate::window::{Window, WindowExtractor};
use crate::{MetricKind, MetricWarning, MetricsReport, WarningSeverity};

/// 指標計算器
///
/// 事實表與維度查詢由呼叫端注入；計算器本身不持有可變狀態，
/// 同一基準日重複計算結果相同。
pub struct MetricsCalculator<'a> {
    /// 事實表存取
    fact_store: &'a dyn FactStore,

    /// 維度查詢
    dimensions: &'a dyn DimensionLookup,

    /// 計算參數
    config: MetricsConfig,
}

impl<'a> MetricsCalculator<'a> {
    /// 創建新的指標計算器（預設配置）
    pub fn new(fact_store: &'a dyn FactStore, dimensions: &'a dyn DimensionLookup) -> Self {
        Self {
            fact_store,
            dimensions,
            config: MetricsConfig::default(),
        }
    }

    /// 建構器模式：設置配置（會先驗證）
    pub fn with_config(mut self, config: MetricsConfig) -> invmetrics_core::Result<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    pub fn config(&self) -> &MetricsConfig {
        &self.config
    }

    /// 最新的觀測日期（可作為預設基準日）
    pub fn latest_as_of(&self) -> invmetrics_core::Result<Option<NaiveDate>> {
        Ok(self.fact_store.observed_dates()?.first().copied())
    }

    fn window(&self, as_of: NaiveDate, lookback_days: u32) -> invmetrics_core::Result<Window> {
        WindowExtractor::extract(self.fact_store, &ObservationFilter::all(), as_of, lookback_days)
    }

    /// 各門市庫存總量
    pub fn stock_by_store(&self, as_of: NaiveDate) -> invmetrics_core::Result<Vec<StoreStock>> {
        Ok(StockTotalsCalculator::by_store(&self.window(as_of, 0)?))
    }

    /// 各區域庫存總量
    pub fn stock_by_region(&self, as_of: NaiveDate) -> invmetrics_core::Result<RegionTotals> {
        Ok(StockTotalsCalculator::by_region(
            &self.window(as_of, 0)?,
            self.dimensions,
        ))
    }

    /// 基準日現有庫存
    pub fn current_stock(&self, as_of: NaiveDate) -> invmetrics_core::Result<Vec<CurrentStock>> {
        Ok(StockTotalsCalculator::current_stock(&self.window(as_of, 0)?))
    }

    /// 再訂購點
    pub fn reorder_points(&self, as_of: NaiveDate) -> invmetrics_core::Result<Vec<ReorderPoint>> {
        let demand = self.window(as_of, self.config.demand_lookback_days)?;
        Ok(ReorderPointCalculator::calculate(
            &demand,
            self.config.reorder_coverage_days,
        ))
    }

    /// 補貨建議（建議量遞減）
    pub fn recommendations(
        &self,
        as_of: NaiveDate,
    ) -> invmetrics_core::Result<Vec<Recommendation>> {
        let demand = self.window(as_of, self.config.demand_lookback_days)?;
        let reorder_points =
            ReorderPointCalculator::calculate(&demand, self.config.reorder_coverage_days);
        let current = StockTotalsCalculator::current_stock(&demand.narrow(0));

        Ok(RecommendationEngine::recommend(&reorder_points, &current))
    }

    /// 低庫存警示
    pub fn low_stock_alerts(&self, as_of: NaiveDate) -> invmetrics_core::Result<Vec<LowStockAlert>> {
        Ok(RecommendationEngine::low_stock_alerts(
            &self.recommendations(as_of)?,
        ))
    }

    /// 年度周轉率
    pub fn turnover(&self, as_of: NaiveDate) -> invmetrics_core::Result<Vec<Turnover>> {
        let annual = self.window(as_of, self.config.annual_lookback_days)?;
        Ok(TurnoverCalculator::calculate(&annual))
    }

    /// 庫存天數
    pub fn days_of_inventory(
        &self,
        as_of: NaiveDate,
    ) -> invmetrics_core::Result<Vec<DaysOfInventory>> {
        let demand = self.window(as_of, self.config.demand_lookback_days)?;
        Ok(DioCalculator::calculate(&demand))
    }

    /// 缺貨率
    pub fn stockout_rates(&self, as_of: NaiveDate) -> invmetrics_core::Result<Vec<StockOutRate>> {
        let window = self.window(as_of, self.config.stockout_lookback_days)?;
        Ok(StockOutCalculator::calculate(&window))
    }

    /// ABC 分類
    pub fn abc_classification(&self, as_of: NaiveDate) -> invmetrics_core::Result<Vec<AbcRow>> {
        let annual = self.window(as_of, self.config.annual_lookback_days)?;
        Ok(AbcClassifier::classify(
            &annual,
            self.config.abc_a_threshold,
            self.config.abc_b_threshold,
        ))
    }

    /// 全體需求預測
    pub fn demand_forecast(&self, as_of: NaiveDate) -> invmetrics_core::Result<Vec<ForecastPoint>> {
        self.demand_forecast_for(as_of, &ObservationFilter::all())
    }

    /// 限定門市／商品的需求預測
    pub fn demand_forecast_for(
        &self,
        as_of: NaiveDate,
        filter: &ObservationFilter,
    ) -> invmetrics_core::Result<Vec<ForecastPoint>> {
        let history = WindowExtractor::extract(
            self.fact_store,
            filter,
            as_of,
            self.config.forecast_lookback_days,
        )?;
        Ok(DemandForecaster::forecast(
            &history,
            self.config.forecast_horizon_days,
        ))
    }

    /// 計算基準日的完整報表
    ///
    /// 只讀取一次最寬的窗口，其餘窗口由其縮小而得；各指標平行計算。
    /// 任何資料讀取失敗都會使整份報表失敗，不回傳部分結果。
    pub fn calculate(&self, as_of: NaiveDate) -> invmetrics_core::Result<MetricsReport> {
        tracing::info!("開始指標計算：基準日 {}", as_of);

        let start_time = std::time::Instant::now();
        let config = &self.config;

        // Step 1: 讀取資料
        tracing::debug!("Step 1: 擷取窗口");
        let widest = config.lookbacks().into_iter().max().unwrap_or(0);
        let history = self.window(as_of, widest)?;
        let observed_dates = self.fact_store.observed_dates()?;

        // Step 2: 依各指標回溯天數縮小窗口
        tracing::debug!("Step 2: 縮小窗口");
        let latest = history.narrow(0);
        let demand = history.narrow(config.demand_lookback_days);
        let annual = history.narrow(config.annual_lookback_days);
        let forecast_history = history.narrow(config.forecast_lookback_days);
        let stockout_window = history.narrow(config.stockout_lookback_days);
        tracing::debug!(
            "窗口筆數：當日 {}，需求 {}，年度 {}",
            latest.len(),
            demand.len(),
            annual.len()
        );

        // Step 3: 平行計算各指標
        tracing::debug!("Step 3: 平行計算指標");
        let mut report = MetricsReport::empty(as_of);
        let mut region_totals = RegionTotals::default();

        rayon::scope(|s| {
            s.spawn(|_| report.store_totals = StockTotalsCalculator::by_store(&latest));
            s.spawn(|_| {
                region_totals = StockTotalsCalculator::by_region(&latest, self.dimensions);
            });
            s.spawn(|_| {
                let current = StockTotalsCalculator::current_stock(&latest);
                let reorder_points =
                    ReorderPointCalculator::calculate(&demand, config.reorder_coverage_days);
                let recommendations = RecommendationEngine::recommend(&reorder_points, &current);

                report.low_stock_alerts = RecommendationEngine::low_stock_alerts(&recommendations);
                report.current_stock = current;
                report.reorder_points = reorder_points;
                report.recommendations = recommendations;
            });
            s.spawn(|_| report.turnover = TurnoverCalculator::calculate(&annual));
            s.spawn(|_| report.days_of_inventory = DioCalculator::calculate(&demand));
            s.spawn(|_| report.stockout_rates = StockOutCalculator::calculate(&stockout_window));
            s.spawn(|_| {
                report.abc_classes = AbcClassifier::classify(
                    &annual,
                    config.abc_a_threshold,
                    config.abc_b_threshold,
                );
            });
            s.spawn(|_| {
                report.forecast =
                    DemandForecaster::forecast(&forecast_history, config.forecast_horizon_days);
            });
        });

        report.region_totals = region_totals.rows;

        // Step 4: 彙整警告
        tracing::debug!("Step 4: 檢查警告");
        if let Some(warning) = Self::check_as_of(as_of, &observed_dates, &latest) {
            report.add_warning(warning);
        }
        if !region_totals.unmapped_stores.is_empty() {
            report.add_warning(MetricWarning::warning(
                MetricKind::StockTotals,
                format!(
                    "{} 家門市查無區域，未計入區域總量: {}",
                    region_totals.unmapped_stores.len(),
                    region_totals.unmapped_stores.join(", ")
                ),
            ));
        }
        Self::collect_undefined_warnings(&mut report);

        report.calculation_time_ms = u64::try_from(start_time.elapsed().as_millis()).ok();

        tracing::info!("指標計算完成，耗時 {:?}", start_time.elapsed());
        tracing::info!(
            "補貨建議 {} 筆，低庫存警示 {} 筆，警告 {} 筆",
            report.recommendations.len(),
            report.low_stock_alerts.len(),
            report.warnings.len()
        );

        Ok(report)
    }

    /// 檢查基準日是否落在資料範圍內
    fn check_as_of(
        as_of: NaiveDate,
        observed_dates: &[NaiveDate],
        latest: &Window,
    ) -> Option<MetricWarning> {
        // observed_dates 由新到舊
        let (Some(&newest), Some(&oldest)) = (observed_dates.first(), observed_dates.last()) else {
            return Some(MetricWarning::report_level(
                "事實表沒有任何觀測記錄".to_string(),
                WarningSeverity::Warning,
            ));
        };

        if as_of < oldest || as_of > newest {
            return Some(MetricWarning::report_level(
                format!("基準日 {} 超出資料範圍 [{} ~ {}]", as_of, oldest, newest),
                WarningSeverity::Warning,
            ));
        }

        latest.is_empty().then(|| {
            MetricWarning::report_level(
                format!("基準日 {} 沒有觀測記錄", as_of),
                WarningSeverity::Info,
            )
        })
    }

    /// 統計各指標未定義的列數
    fn collect_undefined_warnings(report: &mut MetricsReport) {
        let counts = [
            (
                MetricKind::ReorderPoint,
                report
                    .reorder_points
                    .iter()
                    .filter(|r| r.reorder_point.is_none())
                    .count(),
                "再訂購點",
            ),
            (
                MetricKind::Turnover,
                report
                    .turnover
                    .iter()
                    .filter(|r| r.turnover_ratio.is_none())
                    .count(),
                "周轉率（平均庫存為 0）",
            ),
            (
                MetricKind::DaysOfInventory,
                report
                    .days_of_inventory
                    .iter()
                    .filter(|r| r.days_of_inventory.is_none())
                    .count(),
                "庫存天數（平均庫存或日銷量為 0）",
            ),
            (
                MetricKind::AbcClassification,
                report
                    .abc_classes
                    .iter()
                    .filter(|r| r.cumulative_share.is_none())
                    .count(),
                "ABC 累計佔比（門市總銷量為 0）",
            ),
            (
                MetricKind::DemandForecast,
                report
                    .forecast
                    .iter()
                    .filter(|p| p.forecast_sales.is_none())
                    .count(),
                "需求預測（該星期無歷史資料）",
            ),
        ];

        for (metric, undefined, label) in counts {
            if undefined > 0 {
                tracing::debug!("{}: {} 筆未定義", metric, undefined);
                report.add_warning(MetricWarning::info(
                    metric,
                    format!("{} 筆{}無法計算", undefined, label),
                ));
            }
        }
    }
}
