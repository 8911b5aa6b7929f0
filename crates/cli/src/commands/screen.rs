//! Screen CLI command: run the scoring pipeline over cached feed data and
//! write the report files.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;
use serde_json::json;
use tracing::{debug, info, warn};

use hl_screen_core::config::ScoreCategory;
use hl_screen_core::correlation::score_correlation_matrix;
use hl_screen_core::{sig_figs, AssetRecord, ConfigLoader, Screener};
use hl_screen_data::cache::{
    analytics_file, candle_file, contract_size_file, PayloadCache, MARKETCAP_FILE,
    VENUE_SNAPSHOT_FILE,
};
use hl_screen_data::extract;
use hl_screen_data::extract::reference::ReferenceWindow;
use hl_screen_data::models::analytics::{AnalyticsSnapshot, ChartPoint};
use hl_screen_data::{Candle, CapResponse, ChartResponse, LiquidityResponse, MetaAndAssetCtxs};

use crate::table;

/// Arguments for the screen command.
#[derive(Args, Debug, Clone)]
pub struct ScreenArgs {
    /// Config file path
    #[arg(short, long, default_value = "config/Config.toml")]
    pub config: String,

    /// Main report output path
    #[arg(long, default_value = "hl_screen_main.json")]
    pub output: String,

    /// Correlation matrix output path
    #[arg(long, default_value = "hl_screen_corr.json")]
    pub corr_output: String,

    /// Rows to print in the summary table
    #[arg(long, default_value_t = 25)]
    pub top: usize,
}

/// Runs the screen command.
///
/// # Errors
/// Returns an error if configuration is malformed, a required cached feed
/// is missing, or a report file cannot be written.
pub fn run_screen(args: &ScreenArgs) -> Result<()> {
    let config = ConfigLoader::load_from(&args.config)?;
    let cache = PayloadCache::new(&config.cache_dir);
    let screener = Screener::new(config.screen.clone())?;

    let windows = load_reference_windows(&cache, &config)?;
    let reference = extract::reference::extract(
        &windows,
        screener.reconciler(),
        config.screen.days_to_consider,
        config.screen.retained_window_days,
        Utc::now().timestamp_millis(),
    );

    let payload: MetaAndAssetCtxs = cache
        .load(VENUE_SNAPSHOT_FILE)
        .context("Venue snapshot missing; run `hl-screen fetch` first")?;
    let venue = extract::venue::extract(&payload.0.universe, screener.reconciler());

    let snapshot = load_analytics_snapshot(&cache)?;
    let analytics = extract::analytics::extract(
        &snapshot,
        screener.reconciler(),
        config.screen.days_to_consider,
    );

    let listings = if cache.has(MARKETCAP_FILE) {
        cache.load::<CapResponse>(MARKETCAP_FILE)?.data
    } else {
        warn!("Market-cap snapshot missing; caps score as 0");
        Vec::new()
    };
    let marketcap = extract::marketcap::extract(&listings, screener.reconciler());

    let records = screener.run(&[marketcap, reference, venue, analytics]);

    write_reports(args, &records, &config.screen.categories)?;
    println!("{}", table::format_records(&records, args.top));
    Ok(())
}

fn load_reference_windows(cache: &PayloadCache, config: &hl_screen_core::AppConfig) -> Result<Vec<ReferenceWindow>> {
    let mut windows = Vec::new();
    for exchange in &config.reference_exchanges {
        for market_type in &exchange.markets {
            let file = candle_file(&exchange.name, *market_type);
            if !cache.has(&file) {
                debug!(exchange = %exchange.name, market = %market_type, "no cached candles");
                continue;
            }
            let candles: BTreeMap<String, Vec<Candle>> = cache.load(&file)?;
            let sizes_file = contract_size_file(&exchange.name, *market_type);
            let contract_sizes: BTreeMap<String, f64> =
                if cache.has(&sizes_file) { cache.load(&sizes_file)? } else { BTreeMap::new() };
            windows.push(ReferenceWindow {
                exchange: exchange.name.clone(),
                market_type: *market_type,
                candles,
                contract_sizes,
            });
        }
    }
    info!(windows = windows.len(), "loaded reference candle windows");
    Ok(windows)
}

fn load_analytics_snapshot(cache: &PayloadCache) -> Result<AnalyticsSnapshot> {
    let load_chart = |query: &str| -> Result<Vec<ChartPoint>> {
        let response: ChartResponse = cache
            .load(&analytics_file(query))
            .with_context(|| format!("Analytics dataset {query} missing; run `hl-screen fetch`"))?;
        Ok(response.chart_data)
    };
    Ok(AnalyticsSnapshot {
        daily_usd_volume_by_coin: load_chart("daily_usd_volume_by_coin")?,
        total_volume: load_chart("total_volume")?,
        asset_ctxs: load_chart("asset_ctxs")?,
        hlp_positions: load_chart("hlp_positions")?,
        liquidity_by_coin: cache
            .load::<LiquidityResponse>(&analytics_file("liquidity_by_coin"))
            .context("Analytics dataset liquidity_by_coin missing; run `hl-screen fetch`")?
            .chart_data,
    })
}

fn write_reports(args: &ScreenArgs, records: &[AssetRecord], categories: &[ScoreCategory]) -> Result<()> {
    let report = json!({
        "data": report_rows(records, categories),
        "meta": {"time": Utc::now().format("%Y-%m-%d").to_string(), "version": 1.1},
    });
    std::fs::write(&args.output, serde_json::to_string_pretty(&report)?)
        .with_context(|| format!("Failed to write report: {}", args.output))?;

    let matrix = score_correlation_matrix(records);
    std::fs::write(&args.corr_output, serde_json::to_string_pretty(&matrix)?)
        .with_context(|| format!("Failed to write correlation matrix: {}", args.corr_output))?;

    info!(report = %args.output, correlation = %args.corr_output, "reports written");
    Ok(())
}

/// Report rows mirror the published column set: identity and action first,
/// then each category score followed by its member metrics' raw values,
/// display-rounded.
fn report_rows(
    records: &[AssetRecord],
    categories: &[ScoreCategory],
) -> Vec<serde_json::Map<String, serde_json::Value>> {
    records
        .iter()
        .map(|record| {
            let mut row = serde_json::Map::new();
            row.insert("Symbol".to_string(), json!(record.coin));
            row.insert("Max Lev. on HL".to_string(), json!(record.max_leverage));
            row.insert("Strict".to_string(), json!(record.strict));
            row.insert("Recommendation".to_string(), json!(record.recommendation.label()));
            row.insert("Score".to_string(), json!(sig_figs(record.score, 3)));
            for category in categories {
                let score = record.category_scores.get(&category.name).copied().unwrap_or(0);
                row.insert(category.name.clone(), json!(score));
                for member in &category.metrics {
                    let raw = record.metrics.get(&member.metric).copied().unwrap_or(0.0);
                    row.insert(member.metric.clone(), json!(sig_figs(raw, 3)));
                }
            }
            row
        })
        .collect()
}
