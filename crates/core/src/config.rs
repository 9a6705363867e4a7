use crate::common::{Interval, Period};
use serde::{Deserialize, Serialize};

/// 默认扫描的美股列表，包含若干历史上的典型妖股 (VFS, COIN, TUP, GME, CVNA)。
const DEFAULT_TICKERS: &[&str] = &[
    "AAPL", "MSFT", "AMZN", "GOOGL", "TSLA", "VFS", "JPM", "COIN", "JNJ", "V", "PG", "HD", "MA",
    "DIS", "VZ", "T", "BAC", "CSCO", "TUP", "PFE", "MRK", "GME", "INTC", "KO", "PEP", "WMT", "XOM",
    "NKE", "ABT", "GOOG", "CVX", "COST", "MCD", "IBM", "TMO", "HON", "PM", "LOW", "CAT", "CVNA",
];

/// 全局应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub scan: ScanConfig,
    pub detection: DetectionConfig,
    pub database: DatabaseConfig,
    pub log: LogConfig,
}

/// 单轮扫描的参数
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub tickers: Vec<String>,
    pub period: Period,
    pub interval: Interval,
    // 每个标的窗口保留的最大行数
    pub max_rows: usize,
}

/// 异常检测阈值
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    pub return_zscore_threshold: f64,
    pub range_ratio_threshold: f64,
    pub volume_zscore_threshold: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub data_dir: String,
    pub window_db: String,
    pub summary_db: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    // 默认日志级别，RUST_LOG 优先
    pub level: String,
    // 日志文件目录，为空时只输出到终端
    pub dir: Option<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            tickers: DEFAULT_TICKERS.iter().map(|s| s.to_string()).collect(),
            period: Period::default(),
            interval: Interval::Minute30,
            max_rows: 774,
        }
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            return_zscore_threshold: 15.0,
            range_ratio_threshold: 0.10,
            volume_zscore_threshold: 15.0,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
            window_db: "us_stock_data.db".to_string(),
            summary_db: "fairy_stocks.db".to_string(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: None,
        }
    }
}
