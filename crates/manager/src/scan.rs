use fairy_core::common::Ticker;
use fairy_core::config::ScanConfig;
use fairy_core::market::error::MarketError;
use fairy_core::market::port::MarketDataProvider;
use fairy_core::signal::entity::{AnomalyReason, FairyStockRecord};
use fairy_core::signal::port::AnomalyDetector;
use fairy_core::store::error::StoreError;
use fairy_core::store::port::{SummaryStore, WindowStore};
use fairy_detect::aggregate::ReasonAggregator;
use fairy_detect::returns;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// # Summary
/// 单个标的在本轮被跳过的原因。
#[derive(Error, Debug)]
pub enum ManagerError {
    #[error("Fetch error: {0}")]
    Fetch(#[from] MarketError),
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    #[error("No data returned for this pass")]
    EmptyFetch,
}

/// # Summary
/// 被跳过的标的及原因。
#[derive(Debug)]
pub struct SkippedTicker {
    pub symbol: String,
    pub error: ManagerError,
}

/// # Summary
/// 一轮扫描的结果汇总。
///
/// # Invariants
/// - `flagged` 只包含已成功写入汇总存储的记录，顺序与标的列表一致。
#[derive(Debug, Default)]
pub struct ScanReport {
    // 完成检测的标的数量
    pub evaluated: usize,
    pub flagged: Vec<FairyStockRecord>,
    pub skipped: Vec<SkippedTicker>,
}

/// # Summary
/// 扫描管理器，批处理的应用服务层门面 (Facade)。
/// 编译期仅依赖 `fairy-core` 中的 Trait 定义，所有具体实现通过构造函数注入。
///
/// # Invariants
/// - 标的按列表顺序串行处理，不存在对同一窗口或记录的并发修改。
/// - 单个标的失败不影响后续标的，整轮扫描总能跑完。
/// - 窗口写入提交后才进行检测；汇总写入在全部标的检测完毕后统一进行。
pub struct ScanManager {
    // 行情数据源
    provider: Arc<dyn MarketDataProvider>,
    // 滚动窗口存储
    windows: Arc<dyn WindowStore>,
    // 妖股汇总存储
    summaries: Arc<dyn SummaryStore>,
    // 检测器，按固定顺序执行
    detectors: Vec<Box<dyn AnomalyDetector>>,
    aggregator: ReasonAggregator,
    config: ScanConfig,
}

impl ScanManager {
    /// # Summary
    /// 创建 ScanManager 实例。
    ///
    /// # Arguments
    /// * `provider` - 行情数据源的具体实现。
    /// * `windows` - 窗口存储的具体实现。
    /// * `summaries` - 汇总存储的具体实现。
    /// * `detectors` - 参与检测的规则集合。
    /// * `config` - 标的列表与抓取参数。
    pub fn new(
        provider: Arc<dyn MarketDataProvider>,
        windows: Arc<dyn WindowStore>,
        summaries: Arc<dyn SummaryStore>,
        detectors: Vec<Box<dyn AnomalyDetector>>,
        config: ScanConfig,
    ) -> Self {
        Self {
            provider,
            windows,
            summaries,
            detectors,
            aggregator: ReasonAggregator::new(),
            config,
        }
    }

    /// # Summary
    /// 执行一轮完整扫描。
    ///
    /// # Logic
    /// 1. 逐个标的执行抓取、窗口写入与检测，失败的标的记录到 `skipped`。
    /// 2. 全部标的检测完毕后，逐条写入妖股记录。
    /// 3. 汇总写入失败的标的同样记录到 `skipped`，不计入 `flagged`。
    ///
    /// # Returns
    /// * `ScanReport` - 本轮结果。
    pub async fn run_pass(&self) -> ScanReport {
        info!(
            tickers = self.config.tickers.len(),
            period = %self.config.period,
            interval = %self.config.interval,
            max_rows = self.config.max_rows,
            "Scan pass started"
        );

        let mut report = ScanReport::default();
        let mut pending = Vec::new();

        for symbol in &self.config.tickers {
            let ticker = Ticker::new(symbol.as_str());
            match self.scan_ticker(&ticker).await {
                Ok(record) => {
                    report.evaluated += 1;
                    pending.extend(record);
                }
                Err(ManagerError::EmptyFetch) => {
                    info!(ticker = %ticker, "No new data, skipping");
                    report.skipped.push(SkippedTicker {
                        symbol: symbol.clone(),
                        error: ManagerError::EmptyFetch,
                    });
                }
                Err(error) => {
                    warn!(ticker = %ticker, %error, "Ticker skipped");
                    report.skipped.push(SkippedTicker {
                        symbol: symbol.clone(),
                        error,
                    });
                }
            }
        }

        for record in pending {
            match self.summaries.upsert(&record).await {
                Ok(()) => report.flagged.push(record),
                Err(error) => {
                    warn!(ticker = %record.symbol, %error, "Summary write failed, result discarded");
                    report.skipped.push(SkippedTicker {
                        symbol: record.symbol,
                        error: error.into(),
                    });
                }
            }
        }

        info!(
            evaluated = report.evaluated,
            flagged = report.flagged.len(),
            skipped = report.skipped.len(),
            "Scan pass finished"
        );
        report
    }

    /// # Summary
    /// 处理单个标的。
    ///
    /// # Logic
    /// 1. 抓取行情，空结果视为本轮无更新。
    /// 2. 计算对数收益率，截取最新 `max_rows` 行作为本轮批次。
    /// 3. 写入窗口，失败则放弃该标的。
    /// 4. 在批次上运行全部检测器并汇总原因。
    ///
    /// # Returns
    /// * `Result<Option<FairyStockRecord>, ManagerError>` - 命中时返回妖股记录。
    async fn scan_ticker(&self, ticker: &Ticker) -> Result<Option<FairyStockRecord>, ManagerError> {
        let rows = self
            .provider
            .fetch_observations(ticker, self.config.period, self.config.interval)
            .await?;
        if rows.is_empty() {
            return Err(ManagerError::EmptyFetch);
        }

        let batch = returns::latest(returns::with_log_returns(rows), self.config.max_rows);
        let window = self
            .windows
            .ingest(ticker, &batch, self.config.max_rows)
            .await?;
        debug!(ticker = %ticker, batch = batch.len(), window = window.len(), "Window committed");

        let reasons: Vec<AnomalyReason> = self
            .detectors
            .iter()
            .filter_map(|d| d.detect(&batch))
            .collect();
        Ok(self.aggregator.aggregate(ticker, reasons))
    }
}
