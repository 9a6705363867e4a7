use chrono::{Duration, NaiveDate, NaiveDateTime};
use fairy_core::common::Ticker;
use fairy_core::common::time::format_timestamp;
use fairy_core::config::{DetectionConfig, ScanConfig};
use fairy_core::market::entity::Observation;
use fairy_core::store::port::{SummaryStore, WindowStore};
use fairy_core::testing::{MemSummaryStore, MemWindowStore, StaticProvider};
use fairy_detect::detector_suite;
use fairy_manager::report::render;
use fairy_manager::scan::{ManagerError, ScanManager};
use fairy_store::summary::SqliteSummaryStore;
use fairy_store::window::SqliteWindowStore;
use std::sync::Arc;
use tempfile::tempdir;

fn slot(i: usize) -> NaiveDateTime {
    let start = NaiveDate::from_ymd_opt(2024, 1, 2)
        .and_then(|d| d.and_hms_opt(9, 30, 0))
        .expect("valid start");
    start + Duration::minutes(30 * i64::try_from(i).expect("small index"))
}

/// 平稳行情：收盘价小幅摆动，振幅约 2%，成交量周期性波动
fn quiet(n: usize) -> Vec<Observation> {
    (0..n)
        .map(|i| {
            let x = f64::from(u32::try_from(i).expect("small index"));
            let close = 100.0 + 0.5 * (x * 1.7).sin();
            Observation {
                time: slot(i),
                open: close,
                high: close * 1.01,
                low: close * 0.99,
                close,
                volume: 100_000 + u64::try_from(i % 7).expect("small index") * 1_000,
            }
        })
        .collect()
}

/// 在平稳行情的第 `at` 根制造一次大振幅 (收盘价不变)
fn with_spike(n: usize, at: usize) -> Vec<Observation> {
    let mut rows = quiet(n);
    rows[at].low = 90.0;
    rows[at].high = 110.0;
    rows
}

fn scan_config(tickers: &[&str], max_rows: usize) -> ScanConfig {
    ScanConfig {
        tickers: tickers.iter().map(|s| s.to_string()).collect(),
        max_rows,
        ..ScanConfig::default()
    }
}

struct Harness {
    provider: Arc<StaticProvider>,
    windows: Arc<MemWindowStore>,
    summaries: Arc<MemSummaryStore>,
}

impl Harness {
    fn new() -> Self {
        Self {
            provider: Arc::new(StaticProvider::new()),
            windows: Arc::new(MemWindowStore::new()),
            summaries: Arc::new(MemSummaryStore::new()),
        }
    }

    fn manager(&self, config: ScanConfig) -> ScanManager {
        ScanManager::new(
            self.provider.clone(),
            self.windows.clone(),
            self.summaries.clone(),
            detector_suite(&DetectionConfig::default()),
            config,
        )
    }
}

#[tokio::test]
async fn test_pass_isolates_failing_tickers() -> anyhow::Result<()> {
    let h = Harness::new();
    h.provider.set_rows("AAPL", quiet(40));
    h.provider.set_rows("GME", with_spike(40, 20));
    h.provider.set_failure("TUP", "connection reset");
    h.provider.set_rows("COIN", with_spike(40, 5));
    h.windows.fail_writes_for("COIN");
    h.provider.set_rows("CVNA", with_spike(40, 10));
    h.summaries.fail_writes_for("CVNA");
    // VFS 未预设，抓取结果为空

    let manager = h.manager(scan_config(&["AAPL", "GME", "TUP", "VFS", "COIN", "CVNA"], 774));
    let report = manager.run_pass().await;

    assert_eq!(report.evaluated, 3);
    assert_eq!(report.flagged.len(), 1);

    let gme = &report.flagged[0];
    assert_eq!(gme.symbol, "GME");
    assert_eq!(
        gme.reasons,
        format!("High volatility on {}", format_timestamp(&slot(20)))
    );
    assert!(gme.tip.as_deref().is_some_and(|t| t.starts_with("The abnormal data is 1 ")));

    let skipped: Vec<&str> = report.skipped.iter().map(|s| s.symbol.as_str()).collect();
    assert_eq!(skipped, vec!["TUP", "VFS", "COIN", "CVNA"]);
    assert!(matches!(report.skipped[0].error, ManagerError::Fetch(_)));
    assert!(matches!(report.skipped[1].error, ManagerError::EmptyFetch));
    assert!(matches!(report.skipped[2].error, ManagerError::Store(_)));
    assert!(matches!(report.skipped[3].error, ManagerError::Store(_)));

    // 失败的窗口写入不留下任何数据，汇总只包含成功写入的记录
    assert!(h.windows.load_window(&Ticker::new("COIN")).await?.is_empty());
    assert_eq!(h.windows.load_window(&Ticker::new("CVNA")).await?.len(), 40);
    assert_eq!(h.summaries.list().await?, report.flagged);

    let text = render(&report);
    assert!(text.starts_with("Fairy Stock: GME\nReasons: High volatility on "));
    assert!(!text.contains("CVNA"));
    Ok(())
}

#[tokio::test]
async fn test_batch_trimmed_to_max_rows() -> anyhow::Result<()> {
    let h = Harness::new();
    // 截掉的前 20 行里包含大振幅，不应被检测到
    h.provider.set_rows("GME", with_spike(30, 3));

    let report = h.manager(scan_config(&["GME"], 10)).run_pass().await;
    assert_eq!(report.evaluated, 1);
    assert!(report.flagged.is_empty());

    let window = h.windows.load_window(&Ticker::new("GME")).await?;
    assert_eq!(window.len(), 10);
    assert_eq!(window[0].bar.time, slot(20));
    // 首行保留截取前计算的收益率
    assert!(window[0].log_return.is_some());
    Ok(())
}

#[tokio::test]
async fn test_repeated_pass_is_idempotent() -> anyhow::Result<()> {
    let h = Harness::new();
    h.provider.set_rows("GME", with_spike(40, 20));
    h.provider.set_rows("AAPL", quiet(40));
    let manager = h.manager(scan_config(&["GME", "AAPL"], 774));

    let first = manager.run_pass().await;
    let summary_after_first = h.summaries.list().await?;
    let second = manager.run_pass().await;

    assert_eq!(first.flagged, second.flagged);
    assert_eq!(h.summaries.list().await?, summary_after_first);
    assert_eq!(h.windows.load_window(&Ticker::new("GME")).await?.len(), 40);
    Ok(())
}

#[tokio::test]
async fn test_pass_with_sqlite_stores() -> anyhow::Result<()> {
    let tmp_dir = tempdir()?;
    let windows = Arc::new(SqliteWindowStore::open(&tmp_dir.path().join("us_stock_data.db")).await?);
    let summaries =
        Arc::new(SqliteSummaryStore::open(&tmp_dir.path().join("fairy_stocks.db")).await?);
    let provider = Arc::new(StaticProvider::new());
    provider.set_rows("GME", with_spike(40, 20));
    provider.set_rows("AAPL", quiet(40));

    let manager = ScanManager::new(
        provider,
        windows.clone(),
        summaries.clone(),
        detector_suite(&DetectionConfig::default()),
        scan_config(&["GME", "AAPL"], 30),
    );
    let report = manager.run_pass().await;

    assert_eq!(report.evaluated, 2);
    assert!(report.skipped.is_empty());
    assert_eq!(summaries.get("GME").await?, report.flagged.first().cloned());
    assert!(summaries.get("AAPL").await?.is_none());

    let window = windows.load_window(&Ticker::new("AAPL")).await?;
    assert_eq!(window.len(), 30);
    assert_eq!(window[0].bar.time, slot(10));

    windows.close().await;
    summaries.close().await;
    Ok(())
}
