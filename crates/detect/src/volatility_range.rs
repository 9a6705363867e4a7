use fairy_core::market::entity::AugmentedObservation;
use fairy_core::signal::entity::{AnomalyKind, AnomalyReason};
use fairy_core::signal::port::AnomalyDetector;
use tracing::debug;

/// # Summary
/// 振幅检测：单根行情 `(high - low) / low` 严格大于阈值即命中。
///
/// # Invariants
/// - `low <= 0` 的行不参与判断。
#[derive(Debug, Clone)]
pub struct VolatilityRange {
    ratio_threshold: f64,
}

impl VolatilityRange {
    pub fn new(ratio_threshold: f64) -> Self {
        Self { ratio_threshold }
    }
}

impl Default for VolatilityRange {
    fn default() -> Self {
        Self::new(0.10)
    }
}

impl AnomalyDetector for VolatilityRange {
    fn kind(&self) -> AnomalyKind {
        AnomalyKind::VolatilityRange
    }

    fn detect(&self, rows: &[AugmentedObservation]) -> Option<AnomalyReason> {
        let flagged = rows
            .iter()
            .filter(|r| r.bar.low > 0.0)
            .filter(|r| (r.bar.high - r.bar.low) / r.bar.low > self.ratio_threshold)
            .map(|r| r.bar.time);
        let reason = AnomalyReason::new(self.kind(), flagged)?;
        debug!(
            hits = reason.triggering_timestamps.len(),
            "high volatility detected"
        );
        Some(reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{row, slot};

    #[test]
    fn test_threshold_is_strict() {
        let detector = VolatilityRange::default();
        assert!(detector.detect(&[row(0, 100.0, 110.0, 1, None)]).is_none());

        let reason = detector
            .detect(&[row(0, 100.0, 110.0, 1, None), row(1, 100.0, 111.0, 1, None)])
            .expect("should flag");
        assert_eq!(reason.triggering_timestamps.len(), 1);
        assert!(reason.triggering_timestamps.contains(&slot(1)));
        assert_eq!(reason.message, "High volatility on 2024-01-02 10:00:00");
    }

    #[test]
    fn test_multiple_hits_listed_ascending() {
        let rows = vec![
            row(0, 10.0, 12.0, 1, None),
            row(1, 10.0, 10.1, 1, None),
            row(2, 10.0, 15.0, 1, None),
        ];
        let reason = VolatilityRange::default().detect(&rows).expect("should flag");
        assert_eq!(
            reason.message,
            "High volatility on 2024-01-02 09:30:00, 2024-01-02 10:30:00"
        );
    }

    #[test]
    fn test_non_positive_low_is_excluded() {
        let rows = vec![row(0, 0.0, 5.0, 1, None), row(1, -1.0, 5.0, 1, None)];
        assert!(VolatilityRange::default().detect(&rows).is_none());
    }

    #[test]
    fn test_evaluates_rows_without_returns() {
        // 首行没有收益率，但振幅检测照常进行
        let rows = vec![row(0, 50.0, 60.0, 1, None)];
        assert!(VolatilityRange::default().detect(&rows).is_some());
    }
}
