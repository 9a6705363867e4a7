use crate::common::time::format_timestamp;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// # Summary
/// 异常类型枚举。
///
/// # Invariants
/// - 枚举顺序即汇总原因时的固定顺序。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AnomalyKind {
    // 收益率离群
    ReturnOutlier,
    // 单根振幅过大
    VolatilityRange,
    // 成交量离群 (仅放量)
    VolumeOutlier,
}

impl AnomalyKind {
    /// # Summary
    /// 原因文本的固定前缀。
    pub fn prefix(&self) -> &'static str {
        match self {
            AnomalyKind::ReturnOutlier => "Unusual return rate on ",
            AnomalyKind::VolatilityRange => "High volatility on ",
            AnomalyKind::VolumeOutlier => "High trading volume on ",
        }
    }
}

/// # Summary
/// 单个检测器产出的异常原因。
///
/// # Invariants
/// - `triggering_timestamps` 非空且升序。
/// - `message` 由前缀与 `, ` 连接的时间戳组成，只作为文本持久化。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnomalyReason {
    pub kind: AnomalyKind,
    pub triggering_timestamps: BTreeSet<NaiveDateTime>,
    pub message: String,
}

impl AnomalyReason {
    /// # Summary
    /// 根据异常类型与触发时间构造原因。
    ///
    /// # Logic
    /// 1. 去重并升序整理触发时间。
    /// 2. 按 `YYYY-MM-DD HH:MM:SS` 格式化并以 `, ` 连接。
    /// 3. 拼接类型前缀。
    ///
    /// # Returns
    /// 没有任何触发时间时返回 None。
    pub fn new(
        kind: AnomalyKind,
        timestamps: impl IntoIterator<Item = NaiveDateTime>,
    ) -> Option<Self> {
        let triggering_timestamps: BTreeSet<NaiveDateTime> = timestamps.into_iter().collect();
        if triggering_timestamps.is_empty() {
            return None;
        }
        let listed = triggering_timestamps
            .iter()
            .map(format_timestamp)
            .collect::<Vec<_>>()
            .join(", ");
        Some(Self {
            kind,
            message: format!("{}{}", kind.prefix(), listed),
            triggering_timestamps,
        })
    }
}

/// # Summary
/// 妖股汇总记录，对应汇总表中的一行。
///
/// # Invariants
/// - `reasons` 为各原因文本以 `; ` 连接的结果，至少包含一条原因。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FairyStockRecord {
    // 股票代码
    pub symbol: String,
    // 成为妖股的原因
    pub reasons: String,
    // 人工复核提示 (异常点较少时给出)
    pub tip: Option<String>,
}
