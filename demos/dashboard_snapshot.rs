//! 儀表板快照範例
//!
//! 產生三家門市、四個商品 90 天的模擬資料，計算完整指標報表並輸出 JSON。
//!
//! ```text
//! RUST_LOG=debug cargo run --example dashboard_snapshot
//! ```

use anyhow::Context;
use chrono::{Datelike, Days, NaiveDate};
use invmetrics::{
    InMemoryFactStore, MetricsCalculator, MetricsConfig, Observation, Product, Store,
    WarningSeverity,
};
use tracing_subscriber::EnvFilter;

const CONFIG_JSON: &str = r#"{
    "demand_lookback_days": 30,
    "reorder_coverage_days": 7,
    "forecast_horizon_days": 14
}"#;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let as_of = NaiveDate::from_ymd_opt(2025, 11, 30).context("無效的基準日")?;
    let facts = build_fact_store(as_of, 90)?;
    tracing::info!("已載入 {} 筆觀測", facts.len());

    let config = MetricsConfig::from_json_str(CONFIG_JSON)?;
    let calculator = MetricsCalculator::new(&facts, &facts).with_config(config)?;

    let report = calculator.calculate(as_of)?;

    println!("===== Inventory Snapshot {} =====\n", report.as_of);

    println!("[1] Stock by Region");
    for row in &report.region_totals {
        println!("    {:<8} {:>6}", row.region, row.total_stock);
    }

    println!("\n[2] Low Stock Alerts");
    for alert in &report.low_stock_alerts {
        println!(
            "    {} / {}: level {} < reorder point {}",
            alert.store_id, alert.sku, alert.inventory_level, alert.reorder_point
        );
    }

    println!("\n[3] Fast Movers");
    for row in report.abc_classes.iter().filter(|r| r.class == invmetrics::AbcClass::A) {
        println!("    {} / {} ({})", row.store_id, row.sku, row.class);
    }

    for warning in &report.warnings {
        match warning.severity {
            WarningSeverity::Warning => tracing::warn!("{}", warning.message),
            WarningSeverity::Info => tracing::info!("{}", warning.message),
        }
    }

    println!("\n[4] Full Report (JSON)");
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

/// 以固定公式產生可重現的模擬資料
fn build_fact_store(as_of: NaiveDate, days: u64) -> anyhow::Result<InMemoryFactStore> {
    let mut facts = InMemoryFactStore::new();
    facts.add_store(Store::new("S001", "North"));
    facts.add_store(Store::new("S002", "South"));
    facts.add_store(Store::new("S003", "North"));
    facts.add_product(Product::new("P0001", "Toys"));
    facts.add_product(Product::new("P0002", "Groceries"));
    facts.add_product(Product::new("P0003", "Electronics"));
    facts.add_product(Product::new("P0004", "Clothing"));

    let stores = ["S001", "S002", "S003"];
    let products = ["P0001", "P0002", "P0003", "P0004"];

    for offset in 0..days {
        let date = as_of
            .checked_sub_days(Days::new(offset))
            .context("日期超出範圍")?;
        // 週末銷量較高
        let weekend_boost = if date.weekday().num_days_from_monday() >= 5 { 2 } else { 1 };

        for (s, store_id) in stores.iter().enumerate() {
            for (p, product_id) in products.iter().enumerate() {
                let seed = (offset as u32 + 1) * (s as u32 + 3) + (p as u32 + 1) * 7;
                let units_sold = (seed % 9) * weekend_boost / (p as u32 + 1);
                let inventory_level = (seed * 13) % 120;
                let units_ordered = if inventory_level < 20 { 50 } else { 0 };

                facts.add_observation(
                    Observation::new(date, *store_id, *product_id, inventory_level, units_sold)
                        .with_units_ordered(units_ordered),
                )?;
            }
        }
    }

    Ok(facts)
}
