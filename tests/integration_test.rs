//! 集成測試

use chrono::{Days, NaiveDate};
use invmetrics::*;
use proptest::prelude::*;
use rstest::rstest;
use rust_decimal::Decimal;

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 11, 30).unwrap()
}

fn dimensions(facts: &mut InMemoryFactStore) {
    facts.add_store(Store::new("S001", "North"));
    facts.add_store(Store::new("S002", "North"));
    facts.add_store(Store::new("S003", "South"));
    for (product_id, category) in [
        ("P0001", "Toys"),
        ("P0002", "Groceries"),
        ("P0003", "Electronics"),
    ] {
        facts.add_product(Product::new(product_id, category));
    }
}

/// 連鎖零售的一個月資料
fn retail_month() -> InMemoryFactStore {
    let mut facts = InMemoryFactStore::new();
    dimensions(&mut facts);

    for offset in 0..30u64 {
        let date = as_of() - Days::new(offset);
        let rows = [
            // 30 天共賣 40，當日庫存 3
            ("S001", "P0001", if offset == 0 { 3 } else { 50 }, if offset < 4 { 10 } else { 0 }),
            ("S001", "P0002", 20, 2),
            ("S002", "P0001", 80, 1),
            // 當日缺貨
            ("S003", "P0003", if offset == 0 { 0 } else { 5 }, 3),
        ];
        for (store_id, product_id, level, sold) in rows {
            facts
                .add_observation(Observation::new(date, store_id, product_id, level, sold))
                .unwrap();
        }
    }
    facts
}

#[test]
fn test_full_report() {
    let facts = retail_month();
    let calculator = MetricsCalculator::new(&facts, &facts);

    let report = calculator.calculate(as_of()).unwrap();

    // 庫存總量
    let totals: Vec<_> = report
        .store_totals
        .iter()
        .map(|r| (r.store_id.as_str(), r.total_stock))
        .collect();
    assert_eq!(totals, vec![("S001", 23), ("S002", 80), ("S003", 0)]);

    let regions: Vec<_> = report
        .region_totals
        .iter()
        .map(|r| (r.region.as_str(), r.total_stock))
        .collect();
    assert_eq!(regions, vec![("North", 103), ("South", 0)]);

    // 再訂購點：ceil(40 × 7 / 30) = 10
    let s1p1 = report
        .reorder_points
        .iter()
        .find(|r| r.store_id == "S001" && r.sku == "P0001")
        .unwrap();
    assert_eq!(s1p1.reorder_point, Some(10));

    // 補貨建議依建議量遞減
    let to_order: Vec<_> = report.recommendations.iter().map(|r| r.to_order).collect();
    let mut sorted = to_order.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(to_order, sorted);

    // 低庫存：S001/P0001 (3 < 10)、S003/P0003 (0 < 21)
    let alerts: Vec<_> = report
        .low_stock_alerts
        .iter()
        .map(|a| (a.store_id.as_str(), a.sku.as_str()))
        .collect();
    assert_eq!(alerts, vec![("S001", "P0001"), ("S003", "P0003")]);

    // 缺貨率
    let s3p3 = report
        .stockout_rates
        .iter()
        .find(|r| r.store_id == "S003")
        .unwrap();
    assert_eq!(s3p3.stockout_pct, Some(Decimal::ONE_HUNDRED));

    assert_eq!(report.forecast.len(), 30);
    assert!(report.calculation_time_ms.is_some());
}

#[test]
fn test_forecast_weekday_average() {
    let mut facts = InMemoryFactStore::new();
    dimensions(&mut facts);
    // 2025-11-24、2025-11-17 皆為週一
    for (date, sold) in [
        (NaiveDate::from_ymd_opt(2025, 11, 24).unwrap(), 8),
        (NaiveDate::from_ymd_opt(2025, 11, 17).unwrap(), 4),
        (as_of(), 1),
    ] {
        facts
            .add_observation(Observation::new(date, "S001", "P0001", 10, sold))
            .unwrap();
    }

    let forecast = MetricsCalculator::new(&facts, &facts)
        .demand_forecast(as_of())
        .unwrap();

    // 2025-12-01 為週一
    assert_eq!(forecast[0].date, NaiveDate::from_ymd_opt(2025, 12, 1).unwrap());
    assert_eq!(forecast[0].forecast_sales, Some(Decimal::from(6)));
    assert_eq!(forecast[1].forecast_sales, None);
    assert_eq!(forecast[6].forecast_sales, Some(Decimal::ONE));
}

#[test]
fn test_zero_inventory_leaves_ratios_undefined() {
    let mut facts = InMemoryFactStore::new();
    dimensions(&mut facts);
    for offset in 0..10u64 {
        facts
            .add_observation(Observation::new(
                as_of() - Days::new(offset),
                "S001",
                "P0002",
                0,
                5,
            ))
            .unwrap();
    }
    let calculator = MetricsCalculator::new(&facts, &facts);

    let report = calculator.calculate(as_of()).unwrap();

    assert_eq!(report.turnover[0].turnover_ratio, None);
    assert_eq!(report.days_of_inventory[0].days_of_inventory, None);
    assert_eq!(report.warnings_for(MetricKind::Turnover).count(), 1);
    assert_eq!(report.warnings_for(MetricKind::DaysOfInventory).count(), 1);
}

struct OfflineWarehouse;

impl FactStore for OfflineWarehouse {
    fn observations_in_range(
        &self,
        _filter: &ObservationFilter,
        range: DateRange,
    ) -> invmetrics::Result<Vec<Observation>> {
        Err(InventoryError::DataUnavailable {
            from: range.from,
            to: range.to,
            reason: "warehouse offline".to_string(),
        })
    }

    fn observed_dates(&self) -> invmetrics::Result<Vec<NaiveDate>> {
        Err(InventoryError::DataUnavailable {
            from: NaiveDate::MIN,
            to: NaiveDate::MAX,
            reason: "warehouse offline".to_string(),
        })
    }
}

#[test]
fn test_unavailable_source_returns_error() {
    let dims = retail_month();
    let calculator = MetricsCalculator::new(&OfflineWarehouse, &dims);

    let err = calculator.calculate(as_of()).unwrap_err();
    assert!(matches!(err, InventoryError::DataUnavailable { .. }));
    assert!(err.to_string().contains("warehouse offline"));
    assert!(calculator.latest_as_of().is_err());
}

#[rstest]
#[case::before_history(as_of() - Days::new(500))]
#[case::after_history(as_of() + Days::new(500))]
fn test_as_of_outside_history(#[case] date: NaiveDate) {
    let facts = retail_month();
    let report = MetricsCalculator::new(&facts, &facts)
        .calculate(date)
        .unwrap();

    assert!(report.store_totals.is_empty());
    assert!(report.current_stock.is_empty());
    assert!(report.reorder_points.is_empty());
    assert!(report.abc_classes.is_empty());
    assert!(report
        .warnings
        .iter()
        .any(|w| w.metric.is_none() && w.severity == WarningSeverity::Warning));
}

#[test]
fn test_report_serializes_to_json() {
    let facts = retail_month();
    let report = MetricsCalculator::new(&facts, &facts)
        .calculate(as_of())
        .unwrap();

    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["as_of"], "2025-11-30");
    assert!(json["recommendations"].is_array());
    assert_eq!(json["abc_classes"][0]["store_id"], "S001");

    let restored: MetricsReport = serde_json::from_value(json).unwrap();
    assert_eq!(restored.recommendations, report.recommendations);
}

#[test]
fn test_config_from_json() {
    let facts = retail_month();
    let config =
        MetricsConfig::from_json_str(r#"{ "reorder_coverage_days": 14, "forecast_horizon_days": 7 }"#)
            .unwrap();
    let calculator = MetricsCalculator::new(&facts, &facts)
        .with_config(config)
        .unwrap();

    assert_eq!(calculator.config().demand_lookback_days, 30);

    let reorder = calculator.reorder_points(as_of()).unwrap();
    assert_eq!(reorder[0].reorder_point, Some(19));
    assert_eq!(calculator.demand_forecast(as_of()).unwrap().len(), 7);

    assert!(matches!(
        MetricsConfig::from_json_str("{ not json"),
        Err(InventoryError::ConfigParse(_))
    ));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn region_totals_add_up_to_store_totals(
        levels in proptest::collection::vec((0usize..3, 0usize..3, 0u32..1_000), 0..30),
    ) {
        let stores = ["S001", "S002", "S003"];
        let products = ["P0001", "P0002", "P0003"];
        let mut facts = InMemoryFactStore::new();
        dimensions(&mut facts);
        for (s, p, level) in levels {
            // 重複的 (門市, 商品) 會被拒絕，略過即可
            let _ = facts.add_observation(Observation::new(as_of(), stores[s], products[p], level, 0));
        }

        let calculator = MetricsCalculator::new(&facts, &facts);
        let stores_total: u64 = calculator
            .stock_by_store(as_of())
            .unwrap()
            .iter()
            .map(|r| r.total_stock)
            .sum();
        let regions = calculator.stock_by_region(as_of()).unwrap();
        let regions_total: u64 = regions.rows.iter().map(|r| r.total_stock).sum();

        prop_assert_eq!(stores_total, regions_total);
        prop_assert!(regions.unmapped_stores.is_empty());
    }
}
