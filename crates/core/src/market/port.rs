use crate::common::{Interval, Period, Ticker};
use crate::market::entity::Observation;
use crate::market::error::MarketError;
use async_trait::async_trait;

/// # Summary
/// 市场行情数据提供者接口（原始数据源）。
///
/// # Invariants
/// - 返回的数据必须按时间升序排列。
/// - 空结果代表"本轮无更新"，不视为错误。
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// # Summary
    /// 获取特定标的在最近一段时间内的行情序列。
    ///
    /// # Logic
    /// 1. 将回溯跨度与采样周期映射为数据源参数。
    /// 2. 执行网络请求并解析响应数据。
    /// 3. 丢弃字段缺失的行情点。
    ///
    /// # Arguments
    /// * `ticker`: 标的。
    /// * `period`: 回溯跨度。
    /// * `interval`: 采样周期。
    ///
    /// # Returns
    /// 成功返回按时间升序的行情列表，失败返回 MarketError。
    async fn fetch_observations(
        &self,
        ticker: &Ticker,
        period: Period,
        interval: Interval,
    ) -> Result<Vec<Observation>, MarketError>;
}
