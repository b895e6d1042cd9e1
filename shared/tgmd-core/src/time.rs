//! Playback time helpers

/// Format seconds as `MM:SS`, or `HH:MM:SS` from one hour on.
///
/// Non-finite and negative values render as `00:00`.
pub fn format_time(sec: f64) -> String {
    if !sec.is_finite() || sec < 0.0 {
        return "00:00".to_string();
    }

    let total = sec.floor() as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}

/// Clamp `value` into `[min, max]`; `min` wins if the bounds cross
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.min(max).max(min)
}
