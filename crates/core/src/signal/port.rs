use crate::market::entity::AugmentedObservation;
use crate::signal::entity::{AnomalyKind, AnomalyReason};

/// # Summary
/// 异常检测规则接口。
///
/// # Invariants
/// - 检测器之间相互独立，结果与执行顺序无关。
/// - 统计量无定义 (样本不足、标准差为 0) 时返回 None，而不是错误。
pub trait AnomalyDetector: Send + Sync {
    /// # Summary
    /// 该检测器产出的异常类型。
    fn kind(&self) -> AnomalyKind;

    /// # Summary
    /// 在当前抓取批次上执行检测。
    ///
    /// # Arguments
    /// * `rows`: 已附带对数收益率的批次数据，按时间升序。
    ///
    /// # Returns
    /// 命中时返回异常原因，否则返回 None。
    fn detect(&self, rows: &[AugmentedObservation]) -> Option<AnomalyReason>;
}
