use crate::scan::ScanReport;
use std::fmt::Write;

/// # Summary
/// 将本轮命中的妖股渲染为终端文本。
///
/// # Logic
/// 每个妖股输出 `Fairy Stock:` 与 `Reasons:` 两行，有提示时追加 `Tip:`，记录之间空一行。
pub fn render(report: &ScanReport) -> String {
    let mut out = String::new();
    for record in &report.flagged {
        // 写入 String 不会失败，忽略 fmt::Result
        writeln!(out, "Fairy Stock: {}", record.symbol).ok();
        writeln!(out, "Reasons: {}", record.reasons).ok();
        if let Some(tip) = &record.tip {
            writeln!(out, "Tip: {}", tip).ok();
        }
        out.push('\n');
    }
    out
}
