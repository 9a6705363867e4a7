use crate::stats::Moments;
use fairy_core::market::entity::AugmentedObservation;
use fairy_core::signal::entity::{AnomalyKind, AnomalyReason};
use fairy_core::signal::port::AnomalyDetector;
use tracing::debug;

/// # Summary
/// 成交量离群检测：只关注放量，z 严格大于阈值即命中。
///
/// # Invariants
/// - 统计覆盖批次内全部行，采用总体口径。
#[derive(Debug, Clone)]
pub struct VolumeOutlier {
    zscore_threshold: f64,
}

impl VolumeOutlier {
    pub fn new(zscore_threshold: f64) -> Self {
        Self { zscore_threshold }
    }
}

impl Default for VolumeOutlier {
    fn default() -> Self {
        Self::new(15.0)
    }
}

impl AnomalyDetector for VolumeOutlier {
    fn kind(&self) -> AnomalyKind {
        AnomalyKind::VolumeOutlier
    }

    fn detect(&self, rows: &[AugmentedObservation]) -> Option<AnomalyReason> {
        // 成交量远小于 2^53，转换无精度损失
        #[allow(clippy::cast_precision_loss)]
        let volumes: Vec<f64> = rows.iter().map(|r| r.bar.volume as f64).collect();
        let moments = Moments::population(&volumes)?;
        if moments.is_degenerate() {
            return None;
        }

        let flagged = rows.iter().zip(&volumes).filter_map(|(r, v)| {
            moments
                .zscore(*v)
                .filter(|z| *z > self.zscore_threshold)
                .map(|_| r.bar.time)
        });
        let reason = AnomalyReason::new(self.kind(), flagged)?;
        debug!(
            hits = reason.triggering_timestamps.len(),
            mean = moments.mean,
            "high trading volume detected"
        );
        Some(reason)
    }
}
