use chrono::{Duration, NaiveDate, NaiveDateTime};
use fairy_core::market::entity::{AugmentedObservation, Observation};

/// 2024-01-02 09:30:00 起第 `i` 个 30 分钟时段
pub(crate) fn slot(i: usize) -> NaiveDateTime {
    let start = NaiveDate::from_ymd_opt(2024, 1, 2)
        .and_then(|d| d.and_hms_opt(9, 30, 0))
        .unwrap_or_default();
    start + Duration::minutes(30 * i64::try_from(i).unwrap_or(0))
}

pub(crate) fn row(i: usize, low: f64, high: f64, volume: u64, log_return: Option<f64>) -> AugmentedObservation {
    AugmentedObservation {
        bar: Observation {
            time: slot(i),
            open: low,
            high,
            low,
            close: high,
            volume,
        },
        log_return,
    }
}

/// 有界的确定性小幅扰动，幅度不超过 `scale`
pub(crate) fn wiggle(i: usize, scale: f64) -> f64 {
    let x = f64::from(u32::try_from(i).unwrap_or(0));
    scale * (x * 1.7).sin()
}
