use crate::stats::Moments;
use fairy_core::market::entity::AugmentedObservation;
use fairy_core::signal::entity::{AnomalyKind, AnomalyReason};
use fairy_core::signal::port::AnomalyDetector;
use tracing::debug;

/// # Summary
/// 收益率离群检测：对数收益率的 |z| 超过阈值即命中。
///
/// # Invariants
/// - 只统计收益率有定义且有限的行。
/// - 采用总体均值与总体标准差。
#[derive(Debug, Clone)]
pub struct ReturnOutlier {
    zscore_threshold: f64,
}

impl ReturnOutlier {
    pub fn new(zscore_threshold: f64) -> Self {
        Self { zscore_threshold }
    }
}

impl Default for ReturnOutlier {
    fn default() -> Self {
        Self::new(15.0)
    }
}

impl AnomalyDetector for ReturnOutlier {
    fn kind(&self) -> AnomalyKind {
        AnomalyKind::ReturnOutlier
    }

    /// # Summary
    /// 检测收益率异常的时段。
    ///
    /// # Logic
    /// 1. 过滤出收益率有定义且有限的行。
    /// 2. 不足 2 行或标准差为 0 时不做判断。
    /// 3. 标记 |z| 严格大于阈值的行。
    fn detect(&self, rows: &[AugmentedObservation]) -> Option<AnomalyReason> {
        let returns: Vec<(&AugmentedObservation, f64)> = rows
            .iter()
            .filter_map(|r| r.log_return.filter(|v| v.is_finite()).map(|v| (r, v)))
            .collect();
        let values: Vec<f64> = returns.iter().map(|(_, v)| *v).collect();
        let moments = Moments::population(&values)?;
        if moments.is_degenerate() {
            return None;
        }

        let flagged = returns.iter().filter_map(|(r, v)| {
            moments
                .zscore(*v)
                .filter(|z| z.abs() > self.zscore_threshold)
                .map(|_| r.bar.time)
        });
        let reason = AnomalyReason::new(self.kind(), flagged)?;
        debug!(
            hits = reason.triggering_timestamps.len(),
            mean = moments.mean,
            std = moments.std,
            "return outlier detected"
        );
        Some(reason)
    }
}
