pub mod aggregate;
pub mod return_outlier;
pub mod returns;
pub mod stats;
pub mod volatility_range;
pub mod volume_outlier;

#[cfg(test)]
mod fixtures;

use fairy_core::config::DetectionConfig;
use fairy_core::signal::port::AnomalyDetector;

/// # Summary
/// 按固定顺序组装三个检测器。
///
/// # Logic
/// 1. 收益率离群 -> 振幅过大 -> 成交量离群。
/// 2. 阈值全部取自配置。
pub fn detector_suite(config: &DetectionConfig) -> Vec<Box<dyn AnomalyDetector>> {
    vec![
        Box::new(return_outlier::ReturnOutlier::new(
            config.return_zscore_threshold,
        )),
        Box::new(volatility_range::VolatilityRange::new(
            config.range_ratio_threshold,
        )),
        Box::new(volume_outlier::VolumeOutlier::new(
            config.volume_zscore_threshold,
        )),
    ]
}
