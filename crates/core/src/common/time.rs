use chrono::NaiveDateTime;

/// 时间戳的规范文本格式，持久化主键与异常原因文本共用。
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// # Summary
/// 将行情时间格式化为 `YYYY-MM-DD HH:MM:SS`。
///
/// # Invariants
/// - 输出为定长文本，字典序与时间先后一致。
pub fn format_timestamp(time: &NaiveDateTime) -> String {
    time.format(TIMESTAMP_FORMAT).to_string()
}

/// # Summary
/// 解析规范文本格式的时间戳。
pub fn parse_timestamp(text: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_timestamp_text_round_trip() {
        let time = NaiveDate::from_ymd_opt(2024, 3, 5)
            .and_then(|d| d.and_hms_opt(9, 30, 0))
            .expect("valid date");
        let text = format_timestamp(&time);
        assert_eq!(text, "2024-03-05 09:30:00");
        assert_eq!(parse_timestamp(&text).expect("parse"), time);
    }

    #[test]
    fn test_text_order_matches_time_order() {
        let early = parse_timestamp("2024-03-05 15:30:00").expect("parse");
        let late = parse_timestamp("2024-03-06 09:30:00").expect("parse");
        assert!(format_timestamp(&early) < format_timestamp(&late));
    }
}
