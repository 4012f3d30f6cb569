use chrono::{DateTime, Local};

pub const MISSING_VALUE: &str = "-";

pub fn format_optional(value: Option<&str>) -> &str {
    value.unwrap_or(MISSING_VALUE)
}

pub fn format_report_time(time: DateTime<Local>) -> String {
    time.format("%Y-%m-%d %H:%M:%S %Z").to_string()
}
