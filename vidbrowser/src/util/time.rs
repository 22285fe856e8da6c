use chrono::{DateTime, Local, TimeZone, Utc};

/// Get the current time as a UTC datetime.
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Get the current wall clock time in epoch milliseconds.
pub fn now_millis() -> i64 {
    now().timestamp_millis()
}

/// Format an epoch millisecond timestamp as a local wall clock time.
///
/// Returns `"N/A"` for timestamps outside the representable range.
pub fn format_millis(ms: i64) -> String {
    match Utc.timestamp_millis_opt(ms).single() {
        Some(dt) => dt.with_timezone(&Local).format("%H:%M:%S").to_string(),
        None => "N/A".to_string(),
    }
}
