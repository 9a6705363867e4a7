use super::error::StoreError;
use crate::common::Ticker;
use crate::market::entity::AugmentedObservation;
use crate::signal::entity::FairyStockRecord;
use async_trait::async_trait;

/// # Summary
/// 滚动窗口存储接口，负责每个标的有界行情窗口的持久化。
///
/// # Invariants
/// - 任意一次 `ingest` 之后，窗口行数不超过 `max_rows`，且时间戳唯一。
/// - 超出上限时按时间升序淘汰最旧的数据。
/// - 写入要么完整提交，要么窗口保持原状。
#[async_trait]
pub trait WindowStore: Send + Sync {
    /// # Summary
    /// 将新抓取的行情合并进标的窗口。
    ///
    /// # Logic
    /// 1. 按时间戳执行 Upsert (同键替换，不产生重复)。
    /// 2. 若行数超过 `max_rows`，删除最旧的多余行。
    /// 3. 提交后读取当前窗口快照。
    ///
    /// # Arguments
    /// * `ticker`: 目标标的。
    /// * `rows`: 按时间升序的新数据。
    /// * `max_rows`: 窗口容量上限。
    ///
    /// # Returns
    /// 成功返回按时间升序的窗口快照，写入失败返回 `StoreError::Write`。
    async fn ingest(
        &self,
        ticker: &Ticker,
        rows: &[AugmentedObservation],
        max_rows: usize,
    ) -> Result<Vec<AugmentedObservation>, StoreError>;

    /// # Summary
    /// 读取标的当前窗口。
    ///
    /// # Returns
    /// 按时间升序的窗口数据，标的从未写入时返回空列表。
    async fn load_window(&self, ticker: &Ticker) -> Result<Vec<AugmentedObservation>, StoreError>;
}

/// # Summary
/// 妖股汇总存储接口。
///
/// # Invariants
/// - 以 symbol 为键幂等替换。
/// - 本系统从不删除记录，过期记录保留至下一次覆盖。
#[async_trait]
pub trait SummaryStore: Send + Sync {
    /// # Summary
    /// 保存或替换一条妖股记录。
    async fn upsert(&self, record: &FairyStockRecord) -> Result<(), StoreError>;

    /// # Summary
    /// 根据代码查询妖股记录。
    async fn get(&self, symbol: &str) -> Result<Option<FairyStockRecord>, StoreError>;

    /// # Summary
    /// 列出全部妖股记录，按代码升序。
    async fn list(&self) -> Result<Vec<FairyStockRecord>, StoreError>;
}
