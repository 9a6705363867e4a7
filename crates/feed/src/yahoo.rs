use async_trait::async_trait;
use chrono::DateTime;
use fairy_core::common::{Interval, Period, Ticker};
use fairy_core::market::entity::Observation;
use fairy_core::market::error::MarketError;
use fairy_core::market::port::MarketDataProvider;
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// # Summary
/// Yahoo Finance 行情提供者实现。
///
/// # Invariants
/// - 使用 `reqwest` 异步客户端进行通讯。
/// - 返回的时间为交易所本地时间 (按响应中的 gmtoffset 换算)。
#[derive(Clone)]
pub struct YahooProvider {
    /// 内部使用的 HTTP 客户端
    client: Client,
}

impl YahooProvider {
    /// # Summary
    /// 创建一个新的 YahooProvider 实例。
    ///
    /// # Logic
    /// 1. 安装进程级 rustls 加密后端 (已安装时跳过)。
    /// 2. 配置 10 秒超时。
    /// 3. 设置伪装浏览器 Header (User-Agent) 以减少被拦截风险。
    /// 4. 初始化 reqwest 客户端。
    ///
    /// # Returns
    /// 返回初始化后的 YahooProvider，客户端构建失败返回 MarketError。
    pub fn new() -> Result<Self, MarketError> {
        if rustls::crypto::ring::default_provider()
            .install_default()
            .is_err()
        {
            debug!("rustls crypto provider already installed");
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
            ),
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .default_headers(headers)
            .build()
            .map_err(|e| MarketError::Network(e.to_string()))?;

        Ok(Self { client })
    }
}

/// # Summary
/// Yahoo API 响应顶层结构。
///
/// # Invariants
/// - 映射自 Yahoo v8 chart 接口。
#[derive(Deserialize, Debug)]
pub(crate) struct YahooResponse {
    chart: YahooChart,
}

/// # Summary
/// Yahoo API 图表数据部分。
#[derive(Deserialize, Debug)]
struct YahooChart {
    result: Option<Vec<YahooResult>>,
    error: Option<YahooError>,
}

/// # Summary
/// Yahoo API 错误详情。
#[derive(Deserialize, Debug)]
struct YahooError {
    code: Option<String>,
    description: String,
}

/// # Summary
/// Yahoo API 单个时间序列结果。
///
/// # Invariants
/// - 区间内没有成交时 `timestamp` 与 `indicators.quote` 可能缺失。
#[derive(Deserialize, Debug)]
struct YahooResult {
    meta: YahooMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: YahooIndicators,
}

/// # Summary
/// Yahoo API 元数据，只取交易所时区偏移。
#[derive(Deserialize, Debug)]
struct YahooMeta {
    // 交易所相对 UTC 的秒数偏移
    #[serde(default)]
    gmtoffset: i64,
}

/// # Summary
/// Yahoo API 指标容器。
#[derive(Deserialize, Debug)]
struct YahooIndicators {
    #[serde(default)]
    quote: Vec<YahooQuote>,
}

/// # Summary
/// Yahoo API 原始报价数据。
#[derive(Deserialize, Debug, Default)]
struct YahooQuote {
    /// 开盘价列表
    #[serde(default)]
    open: Vec<Option<f64>>,
    /// 最高价列表
    #[serde(default)]
    high: Vec<Option<f64>>,
    /// 最低价列表
    #[serde(default)]
    low: Vec<Option<f64>>,
    /// 收盘价列表
    #[serde(default)]
    close: Vec<Option<f64>>,
    /// 成交量列表
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

/// Yahoo 接受的 interval 参数
fn interval_param(interval: Interval) -> &'static str {
    match interval {
        Interval::Minute1 => "1m",
        Interval::Minute5 => "5m",
        Interval::Minute15 => "15m",
        Interval::Minute30 => "30m",
        Interval::Hour1 => "60m",
        Interval::Day1 => "1d",
    }
}

/// # Summary
/// 将 chart 响应还原为行情列表。
///
/// # Logic
/// 1. 响应携带 error 时: `Not Found` 映射为 NotFound，其余为 Unknown。
/// 2. 缺少 result 视为 NotFound；缺少 quote 视为空序列。
/// 3. 时间戳加上 gmtoffset 得到交易所本地时间。
/// 4. 跳过任一字段为 null 的行，按时间升序并去重。
pub(crate) fn parse_chart(response: YahooResponse) -> Result<Vec<Observation>, MarketError> {
    if let Some(err) = response.chart.error {
        return match err.code.as_deref() {
            Some("Not Found") => Err(MarketError::NotFound),
            _ => Err(MarketError::Unknown(err.description)),
        };
    }

    let result = response
        .chart
        .result
        .and_then(|mut r| r.pop())
        .ok_or(MarketError::NotFound)?;

    let Some(quote) = result.indicators.quote.first() else {
        return Ok(vec![]);
    };
    let offset = result.meta.gmtoffset;

    let mut observations = Vec::with_capacity(result.timestamp.len());
    for (i, &ts) in result.timestamp.iter().enumerate() {
        let time = ts
            .checked_add(offset)
            .and_then(|local| DateTime::from_timestamp(local, 0))
            .ok_or_else(|| MarketError::Parse(format!("timestamp out of range: {}", ts)))?
            .naive_utc();

        if let (Some(open), Some(high), Some(low), Some(close), Some(volume)) = (
            quote.open.get(i).copied().flatten(),
            quote.high.get(i).copied().flatten(),
            quote.low.get(i).copied().flatten(),
            quote.close.get(i).copied().flatten(),
            quote.volume.get(i).copied().flatten(),
        ) {
            observations.push(Observation {
                time,
                open,
                high,
                low,
                close,
                volume,
            });
        }
    }

    observations.sort_by_key(|o| o.time);
    observations.dedup_by_key(|o| o.time);
    Ok(observations)
}

#[async_trait]
impl MarketDataProvider for YahooProvider {
    /// # Summary
    /// 从 Yahoo Finance 抓取最近一段时间的行情。
    ///
    /// # Logic
    /// 1. 映射回溯跨度为 `range`、采样周期为 `interval`。
    /// 2. 发起异步请求并解析嵌套的 JSON 数据。
    /// 3. 404 视为标的不存在。
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
    ) -> Result<Vec<Observation>, MarketError> {
        let url = format!("{}/{}", CHART_URL, ticker.symbol);
        let range = period.to_string();

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("range", range.as_str()),
                ("interval", interval_param(interval)),
                ("includePrePost", "false"),
            ])
            .send()
            .await
            .map_err(|e| MarketError::Network(e.to_string()))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(MarketError::NotFound);
        }
        if !resp.status().is_success() {
            return Err(MarketError::Network(format!("HTTP {}", resp.status())));
        }

        let json: YahooResponse = resp
            .json()
            .await
            .map_err(|e| MarketError::Parse(e.to_string()))?;

        let observations = parse_chart(json)?;
        debug!(ticker = %ticker, rows = observations.len(), "fetched observations");
        Ok(observations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fairy_core::common::time::format_timestamp;

    fn parse(json: &str) -> Result<Vec<Observation>, MarketError> {
        let response: YahooResponse = serde_json::from_str(json).expect("valid json");
        parse_chart(response)
    }

    #[test]
    fn test_parse_applies_exchange_offset_and_skips_nulls() {
        // 1704205800 = 2024-01-02 14:30:00 UTC = 09:30 纽约时间
        let json = r#"{
            "chart": {
                "result": [{
                    "meta": { "gmtoffset": -18000 },
                    "timestamp": [1704205800, 1704207600, 1704209400],
                    "indicators": { "quote": [{
                        "open":   [100.0, null, 101.0],
                        "high":   [101.0, 102.0, 103.0],
                        "low":    [99.5, 100.5, 100.0],
                        "close":  [100.5, 101.5, 102.5],
                        "volume": [120000, 80000, 95000]
                    }]}
                }],
                "error": null
            }
        }"#;
        let rows = parse(json).expect("parse ok");
        assert_eq!(rows.len(), 2);
        assert_eq!(format_timestamp(&rows[0].time), "2024-01-02 09:30:00");
        assert_eq!(format_timestamp(&rows[1].time), "2024-01-02 10:30:00");
        assert_eq!(rows[1].volume, 95000);
        assert_eq!(rows[1].close, 102.5);
    }

    #[test]
    fn test_parse_empty_range() {
        let json = r#"{
            "chart": {
                "result": [{ "meta": { "gmtoffset": -18000 }, "indicators": { "quote": [{}] } }],
                "error": null
            }
        }"#;
        assert!(parse(json).expect("parse ok").is_empty());
    }

    #[test]
    fn test_parse_error_payloads() {
        let not_found = r#"{ "chart": { "result": null, "error": { "code": "Not Found", "description": "No data found, symbol may be delisted" } } }"#;
        assert!(matches!(parse(not_found), Err(MarketError::NotFound)));

        let bad_request = r#"{ "chart": { "result": null, "error": { "code": "Bad Request", "description": "Invalid input - interval=7m" } } }"#;
        assert!(matches!(parse(bad_request), Err(MarketError::Unknown(_))));
    }

    #[test]
    fn test_parse_rejects_overflowing_offset() {
        let json = r#"{
            "chart": {
                "result": [{
                    "meta": { "gmtoffset": 9223372036854775807 },
                    "timestamp": [1704205800],
                    "indicators": { "quote": [{
                        "open": [100.0], "high": [101.0], "low": [99.5],
                        "close": [100.5], "volume": [120000]
                    }]}
                }],
                "error": null
            }
        }"#;
        assert!(matches!(parse(json), Err(MarketError::Parse(_))));
    }

    #[test]
    fn test_interval_mapping() {
        assert_eq!(interval_param(Interval::Minute30), "30m");
        assert_eq!(interval_param(Interval::Hour1), "60m");
    }
}
