/// Format a number the way markup attributes expect it: integers without a
/// fractional part, no negative zero, shortest round-trip digits otherwise.
pub fn fmt_num(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else if value.is_finite() {
        format!("{value}")
    } else if value.is_nan() {
        "NaN".to_string()
    } else if value > 0.0 {
        "Infinity".to_string()
    } else {
        "-Infinity".to_string()
    }
}
