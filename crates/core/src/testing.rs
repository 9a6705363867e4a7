//! 供下游 crate 测试使用的内存替身实现，需开启 `test-utils` feature。

use crate::common::{Interval, Period, Ticker};
use crate::market::entity::{AugmentedObservation, Observation};
use crate::market::error::MarketError;
use crate::market::port::MarketDataProvider;
use crate::signal::entity::FairyStockRecord;
use crate::store::error::StoreError;
use crate::store::port::{SummaryStore, WindowStore};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use dashmap::{DashMap, DashSet};
use std::collections::BTreeMap;

/// # Summary
/// 返回预设数据的行情源。
///
/// # Invariants
/// - 未预设的标的返回空列表 (即"本轮无更新")。
#[derive(Default)]
pub struct StaticProvider {
    responses: DashMap<String, Result<Vec<Observation>, String>>,
}

impl StaticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// 为标的预设一批行情
    pub fn set_rows(&self, symbol: &str, rows: Vec<Observation>) {
        self.responses.insert(symbol.to_string(), Ok(rows));
    }

    /// 令标的的抓取失败
    pub fn set_failure(&self, symbol: &str, message: &str) {
        self.responses
            .insert(symbol.to_string(), Err(message.to_string()));
    }
}

#[async_trait]
impl MarketDataProvider for StaticProvider {
    async fn fetch_observations(
        &self,
        ticker: &Ticker,
        _: Period,
        _: Interval,
    ) -> Result<Vec<Observation>, MarketError> {
        match self.responses.get(&ticker.symbol).map(|r| r.value().clone()) {
            Some(Ok(rows)) => Ok(rows),
            Some(Err(message)) => Err(MarketError::Network(message)),
            None => Ok(vec![]),
        }
    }
}

/// # Summary
/// 基于内存的滚动窗口存储。
///
/// # Invariants
/// - 与 SQLite 实现保持相同的 Upsert 与淘汰语义。
/// - 被标记为故障的标的写入失败且窗口保持原状。
#[derive(Default)]
pub struct MemWindowStore {
    windows: DashMap<String, BTreeMap<NaiveDateTime, AugmentedObservation>>,
    failing: DashSet<String>,
}

impl MemWindowStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 令标的后续的写入全部失败
    pub fn fail_writes_for(&self, symbol: &str) {
        self.failing.insert(symbol.to_string());
    }
}

#[async_trait]
impl WindowStore for MemWindowStore {
    async fn ingest(
        &self,
        ticker: &Ticker,
        rows: &[AugmentedObservation],
        max_rows: usize,
    ) -> Result<Vec<AugmentedObservation>, StoreError> {
        if self.failing.contains(&ticker.symbol) {
            return Err(StoreError::Write(format!(
                "simulated write failure for {}",
                ticker
            )));
        }
        if max_rows == 0 {
            return Err(StoreError::Write("max_rows must be positive".into()));
        }

        let mut window = self.windows.entry(ticker.symbol.clone()).or_default();
        for row in rows {
            window.insert(row.bar.time, row.clone());
        }
        while window.len() > max_rows {
            window.pop_first();
        }
        Ok(window.values().cloned().collect())
    }

    async fn load_window(&self, ticker: &Ticker) -> Result<Vec<AugmentedObservation>, StoreError> {
        Ok(self
            .windows
            .get(&ticker.symbol)
            .map(|w| w.values().cloned().collect())
            .unwrap_or_default())
    }
}

/// # Summary
/// 基于内存的妖股汇总存储。
#[derive(Default)]
pub struct MemSummaryStore {
    records: DashMap<String, FairyStockRecord>,
    failing: DashSet<String>,
}

impl MemSummaryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 令标的后续的汇总写入全部失败
    pub fn fail_writes_for(&self, symbol: &str) {
        self.failing.insert(symbol.to_string());
    }
}

#[async_trait]
impl SummaryStore for MemSummaryStore {
    async fn upsert(&self, record: &FairyStockRecord) -> Result<(), StoreError> {
        if self.failing.contains(&record.symbol) {
            return Err(StoreError::Write(format!(
                "simulated summary failure for {}",
                record.symbol
            )));
        }
        self.records.insert(record.symbol.clone(), record.clone());
        Ok(())
    }

    async fn get(&self, symbol: &str) -> Result<Option<FairyStockRecord>, StoreError> {
        Ok(self.records.get(symbol).map(|r| r.value().clone()))
    }

    async fn list(&self) -> Result<Vec<FairyStockRecord>, StoreError> {
        let mut records: Vec<FairyStockRecord> =
            self.records.iter().map(|r| r.value().clone()).collect();
        records.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        Ok(records)
    }
}
