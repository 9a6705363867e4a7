use fairy_core::common::Ticker;
use fairy_core::signal::entity::{AnomalyReason, FairyStockRecord};

/// 异常点计数不超过该值时附加人工复核提示
const TIP_MAX_ABNORMAL: usize = 3;

/// # Summary
/// 原因汇总器，将各检测器的输出合并为一条妖股记录。
///
/// # Invariants
/// - 原因按 ReturnOutlier -> VolatilityRange -> VolumeOutlier 的固定顺序以 `; ` 连接。
/// - 异常点计数沿用 "1 + 各原因逗号数之和" 的口径，不做去重。
#[derive(Debug, Clone, Default)]
pub struct ReasonAggregator;

impl ReasonAggregator {
    pub fn new() -> Self {
        Self
    }

    /// # Summary
    /// 汇总一个标的在本轮的全部异常原因。
    ///
    /// # Logic
    /// 1. 无原因时返回 None (本轮不是妖股)。
    /// 2. 按异常类型排序后连接原因文本。
    /// 3. 计算异常点计数，不超过 3 时附加提示。
    ///
    /// # Arguments
    /// * `ticker`: 标的。
    /// * `reasons`: 检测器输出。
    ///
    /// # Returns
    /// 妖股记录或 None。
    pub fn aggregate(
        &self,
        ticker: &Ticker,
        mut reasons: Vec<AnomalyReason>,
    ) -> Option<FairyStockRecord> {
        if reasons.is_empty() {
            return None;
        }
        reasons.sort_by_key(|r| r.kind);

        let messages: Vec<&str> = reasons.iter().map(|r| r.message.as_str()).collect();
        let abnormal = abnormal_data_num(&messages);
        let tip = (abnormal <= TIP_MAX_ABNORMAL).then(|| tip_text(abnormal));

        Some(FairyStockRecord {
            symbol: ticker.symbol.clone(),
            reasons: messages.join("; "),
            tip,
        })
    }
}

/// # Summary
/// 异常点计数：1 加上各原因文本中的逗号数。
pub fn abnormal_data_num(messages: &[&str]) -> usize {
    1 + messages
        .iter()
        .map(|m| m.matches(',').count())
        .sum::<usize>()
}

fn tip_text(abnormal: usize) -> String {
    format!(
        "The abnormal data is {} (less than or equal to 3 data), please check if any obvious reason or news that would justify such a change. If yes, it may not be a fairy stock.",
        abnormal
    )
}
