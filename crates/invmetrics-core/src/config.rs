//! 指標計算配置

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{InventoryError, Result};

/// 指標計算參數配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// 需求速率回溯天數（再訂購點、DIO）
    pub demand_lookback_days: u32,

    /// 年度回溯天數（周轉率、ABC 分類）
    pub annual_lookback_days: u32,

    /// 需求預測的歷史回溯天數
    pub forecast_lookback_days: u32,

    /// 再訂購點涵蓋天數
    pub reorder_coverage_days: u32,

    /// 缺貨率回溯天數
    ///
    /// 預設 0：只看基準日當天，每組結果只會是 0 或 100。
    pub stockout_lookback_days: u32,

    /// A 類累計佔比上限
    pub abc_a_threshold: Decimal,

    /// B 類累計佔比上限
    pub abc_b_threshold: Decimal,

    /// 預測天數
    pub forecast_horizon_days: u32,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            demand_lookback_days: 30,
            annual_lookback_days: 365,
            forecast_lookback_days: 365,
            reorder_coverage_days: 7,
            stockout_lookback_days: 0,
            abc_a_threshold: Decimal::new(80, 2),
            abc_b_threshold: Decimal::new(95, 2),
            forecast_horizon_days: 30,
        }
    }
}

impl MetricsConfig {
    /// 創建預設配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 建構器模式：設置需求速率回溯天數
    pub fn with_demand_lookback(mut self, days: u32) -> Self {
        self.demand_lookback_days = days;
        self
    }

    /// 建構器模式：設置年度回溯天數
    pub fn with_annual_lookback(mut self, days: u32) -> Self {
        self.annual_lookback_days = days;
        self
    }

    /// 建構器模式：設置預測歷史回溯天數
    pub fn with_forecast_lookback(mut self, days: u32) -> Self {
        self.forecast_lookback_days = days;
        self
    }

    /// 建構器模式：設置再訂購點涵蓋天數
    pub fn with_reorder_coverage(mut self, days: u32) -> Self {
        self.reorder_coverage_days = days;
        self
    }

    /// 建構器模式：設置缺貨率回溯天數
    pub fn with_stockout_lookback(mut self, days: u32) -> Self {
        self.stockout_lookback_days = days;
        self
    }

    /// 建構器模式：設置 ABC 分類門檻
    pub fn with_abc_thresholds(mut self, a_threshold: Decimal, b_threshold: Decimal) -> Self {
        self.abc_a_threshold = a_threshold;
        self.abc_b_threshold = b_threshold;
        self
    }

    /// 建構器模式：設置預測天數
    pub fn with_forecast_horizon(mut self, days: u32) -> Self {
        self.forecast_horizon_days = days;
        self
    }

    /// 檢查配置是否合法
    pub fn validate(&self) -> Result<()> {
        let unit_interval = |value: Decimal| value > Decimal::ZERO && value <= Decimal::ONE;

        if !unit_interval(self.abc_a_threshold) || !unit_interval(self.abc_b_threshold) {
            return Err(InventoryError::InvalidConfig(format!(
                "ABC 門檻必須介於 (0, 1]：A={}, B={}",
                self.abc_a_threshold, self.abc_b_threshold
            )));
        }

        if self.abc_a_threshold > self.abc_b_threshold {
            return Err(InventoryError::InvalidConfig(format!(
                "A 類門檻不可大於 B 類門檻：A={}, B={}",
                self.abc_a_threshold, self.abc_b_threshold
            )));
        }

        if self.reorder_coverage_days == 0 {
            return Err(InventoryError::InvalidConfig(
                "再訂購點涵蓋天數必須大於 0".to_string(),
            ));
        }

        if self.forecast_horizon_days == 0 {
            return Err(InventoryError::InvalidConfig(
                "預測天數必須大於 0".to_string(),
            ));
        }

        Ok(())
    }

    /// 從 JSON 載入配置（未提供的欄位使用預設值）
    ///
    /// ```
    /// use invmetrics_core::MetricsConfig;
    ///
    /// let config = MetricsConfig::from_json_str(r#"{ "reorder_coverage_days": 14 }"#).unwrap();
    /// assert_eq!(config.reorder_coverage_days, 14);
    /// assert_eq!(config.demand_lookback_days, 30);
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// 所有指標用到的回溯天數（去重、遞增）
    pub fn lookbacks(&self) -> Vec<u32> {
        let mut days = vec![
            0,
            self.demand_lookback_days,
            self.annual_lookback_days,
            self.forecast_lookback_days,
            self.stockout_lookback_days,
        ];
        days.sort_unstable();
        days.dedup();
        days
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MetricsConfig::default();

        assert_eq!(config.demand_lookback_days, 30);
        assert_eq!(config.annual_lookback_days, 365);
        assert_eq!(config.reorder_coverage_days, 7);
        assert_eq!(config.stockout_lookback_days, 0);
        assert_eq!(config.abc_a_threshold, Decimal::new(80, 2));
        assert_eq!(config.abc_b_threshold, Decimal::new(95, 2));
        assert_eq!(config.forecast_horizon_days, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = MetricsConfig::new()
            .with_demand_lookback(14)
            .with_reorder_coverage(10)
            .with_stockout_lookback(7)
            .with_abc_thresholds(Decimal::new(70, 2), Decimal::new(90, 2))
            .with_forecast_horizon(14);

        assert_eq!(config.demand_lookback_days, 14);
        assert_eq!(config.reorder_coverage_days, 10);
        assert_eq!(config.stockout_lookback_days, 7);
        assert_eq!(config.abc_a_threshold, Decimal::new(70, 2));
        assert_eq!(config.forecast_horizon_days, 14);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_thresholds() {
        let inverted = MetricsConfig::new()
            .with_abc_thresholds(Decimal::new(95, 2), Decimal::new(80, 2));
        assert!(matches!(
            inverted.validate(),
            Err(InventoryError::InvalidConfig(_))
        ));

        let out_of_range =
            MetricsConfig::new().with_abc_thresholds(Decimal::ZERO, Decimal::new(95, 2));
        assert!(out_of_range.validate().is_err());

        let no_coverage = MetricsConfig::new().with_reorder_coverage(0);
        assert!(no_coverage.validate().is_err());
    }

    #[test]
    fn test_from_json() {
        let config = MetricsConfig::from_json_str(
            r#"{ "stockout_lookback_days": 30, "abc_a_threshold": "0.7" }"#,
        )
        .unwrap();

        assert_eq!(config.stockout_lookback_days, 30);
        assert_eq!(config.abc_a_threshold, Decimal::new(7, 1));
        assert_eq!(config.annual_lookback_days, 365);

        assert!(matches!(
            MetricsConfig::from_json_str("not json"),
            Err(InventoryError::ConfigParse(_))
        ));
        assert!(matches!(
            MetricsConfig::from_json_str(r#"{ "forecast_horizon_days": 0 }"#),
            Err(InventoryError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_lookbacks_are_deduplicated() {
        let config = MetricsConfig::default();
        assert_eq!(config.lookbacks(), vec![0, 30, 365]);

        let widened = config.with_stockout_lookback(7);
        assert_eq!(widened.lookbacks(), vec![0, 7, 30, 365]);
    }
}
