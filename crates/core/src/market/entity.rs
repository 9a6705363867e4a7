use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// # Summary
/// 单根行情观测数据，记录特定时段内的价格与成交量。
///
/// # Invariants
/// - 价格字段与成交量均非负。
/// - 同一标的内 `time` 为自然主键。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    // 时段开始时间 (交易所本地时间)
    pub time: NaiveDateTime,
    // 开盘价
    pub open: f64,
    // 最高价
    pub high: f64,
    // 最低价
    pub low: f64,
    // 收盘价
    pub close: f64,
    // 成交量
    pub volume: u64,
}

/// # Summary
/// 附带对数收益率的行情观测数据。
///
/// # Invariants
/// - `log_return` 只由同一抓取批次内相邻收盘价计算得出。
/// - 批次首行或前收盘价为 0 时 `log_return` 为 None，此类行仍需落库。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AugmentedObservation {
    // 原始行情数据
    pub bar: Observation,
    // 百分比对数收益率
    pub log_return: Option<f64>,
}
