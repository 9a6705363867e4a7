/// # Summary
/// 总体均值与总体标准差。
///
/// # Invariants
/// - 样本数少于 2 时统计量无定义，返回 None。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Moments {
    pub mean: f64,
    pub std: f64,
}

impl Moments {
    /// # Summary
    /// 计算一组数值的总体均值与标准差。
    ///
    /// # Logic
    /// 1. 样本数少于 2 返回 None。
    /// 2. 先求均值，再以 n 为分母求方差 (总体口径)。
    pub fn population(values: &[f64]) -> Option<Self> {
        if values.len() < 2 {
            return None;
        }
        // 样本量远小于 2^53，转换无精度损失
        #[allow(clippy::cast_precision_loss)]
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        Some(Self {
            mean,
            std: variance.sqrt(),
        })
    }

    /// # Summary
    /// 计算 z 分数。
    ///
    /// # Returns
    /// 标准差为 0 或非有限值时返回 None。
    pub fn zscore(&self, value: f64) -> Option<f64> {
        if self.std > 0.0 && self.std.is_finite() {
            Some((value - self.mean) / self.std)
        } else {
            None
        }
    }

    /// 标准差是否可用于标准化
    pub fn is_degenerate(&self) -> bool {
        !(self.std > 0.0 && self.std.is_finite())
    }
}
