pub mod time;

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// # Summary
/// 扫描标的实体，代表批处理关注的特定股票。
///
/// # Invariants
/// - `symbol` 必须是数据源可识别的交易代码 (例如: AAPL, BRK-B)。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ticker {
    // 股票代码
    pub symbol: String,
}

impl Ticker {
    /// # Summary
    /// 通过股票代码构造标的。
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
        }
    }

    /// # Summary
    /// 将股票代码映射为存储安全的表名。
    ///
    /// # Logic
    /// 1. ASCII 字母统一转为大写。
    /// 2. 保留字母、数字与下划线，其余字符一律替换为 `_` (例如 `BRK-B` -> `BRK_B`)。
    ///
    /// # Invariants
    /// - SQLite 表名不区分大小写，因此只差大小写或特殊字符的代码
    ///   (`aapl`/`AAPL`、`BRK-B`/`BRK.B`) 共用同一张表。
    ///
    /// # Returns
    /// 可直接用作 SQLite 标识符的字符串。
    pub fn table_name(&self) -> String {
        self.symbol
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect()
    }
}

impl std::fmt::Display for Ticker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.symbol)
    }
}

/// # Summary
/// K 线采样周期枚举，定义单根行情的时间跨度。
///
/// # Invariants
/// - 文本形式与数据源的 interval 参数一致 (例如 "30m")。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub enum Interval {
    // 1分钟
    Minute1,
    // 5分钟
    Minute5,
    // 15分钟
    Minute15,
    // 30分钟
    Minute30,
    // 1小时
    Hour1,
    // 1日
    Day1,
}

impl FromStr for Interval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "1m" | "minute1" => Ok(Interval::Minute1),
            "5m" | "minute5" => Ok(Interval::Minute5),
            "15m" | "minute15" => Ok(Interval::Minute15),
            "30m" | "minute30" => Ok(Interval::Minute30),
            "1h" | "60m" | "hour1" => Ok(Interval::Hour1),
            "1d" | "day1" => Ok(Interval::Day1),
            _ => Err(format!("Unknown Interval: {}", s)),
        }
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Interval::Minute1 => write!(f, "1m"),
            Interval::Minute5 => write!(f, "5m"),
            Interval::Minute15 => write!(f, "15m"),
            Interval::Minute30 => write!(f, "30m"),
            Interval::Hour1 => write!(f, "1h"),
            Interval::Day1 => write!(f, "1d"),
        }
    }
}

impl TryFrom<String> for Interval {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Interval> for String {
    fn from(value: Interval) -> Self {
        value.to_string()
    }
}

/// # Summary
/// 行情回溯跨度，以自然日计 (例如 "60d")。
///
/// # Invariants
/// - 天数必须大于 0。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Period {
    days: u32,
}

impl Period {
    /// # Summary
    /// 以天数构造回溯跨度，0 天返回 None。
    pub fn days(days: u32) -> Option<Self> {
        (days > 0).then_some(Self { days })
    }

    /// # Summary
    /// 获取回溯天数。
    pub fn as_days(&self) -> u32 {
        self.days
    }
}

impl Default for Period {
    fn default() -> Self {
        Self { days: 60 }
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().to_lowercase();
        trimmed
            .strip_suffix('d')
            .and_then(|n| n.parse::<u32>().ok())
            .and_then(Period::days)
            .ok_or_else(|| format!("Unknown Period: {}", s))
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}d", self.days)
    }
}

impl TryFrom<String> for Period {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Period> for String {
    fn from(value: Period) -> Self {
        value.to_string()
    }
}
