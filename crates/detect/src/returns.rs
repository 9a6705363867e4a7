use fairy_core::market::entity::{AugmentedObservation, Observation};

/// # Summary
/// 为一个抓取批次计算百分比对数收益率。
///
/// # Logic
/// 1. 批次首行收益率为 None (不沿用上一批次)。
/// 2. 其余行 `log_return = 100 * ln(close[i] / close[i-1])`。
/// 3. 前收盘价为 0 或结果非有限值时记为 None。
///
/// # Arguments
/// * `rows`: 按时间升序的抓取批次。
///
/// # Returns
/// 与输入等长、同序的增强行情列表。
pub fn with_log_returns(rows: Vec<Observation>) -> Vec<AugmentedObservation> {
    let mut prev_close: Option<f64> = None;
    rows.into_iter()
        .map(|bar| {
            let log_return = prev_close.and_then(|prev| log_return(prev, bar.close));
            prev_close = Some(bar.close);
            AugmentedObservation { bar, log_return }
        })
        .collect()
}

/// # Summary
/// 截取批次中最新的 `max_rows` 行。
///
/// # Invariants
/// - 保留行的收益率不重新计算，首行仍携带与被截掉前一行之间的收益率。
pub fn latest(mut rows: Vec<AugmentedObservation>, max_rows: usize) -> Vec<AugmentedObservation> {
    let excess = rows.len().saturating_sub(max_rows);
    rows.drain(..excess);
    rows
}

fn log_return(prev_close: f64, close: f64) -> Option<f64> {
    if prev_close == 0.0 {
        return None;
    }
    let value = 100.0 * (close / prev_close).ln();
    value.is_finite().then_some(value)
}
