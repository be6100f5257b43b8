/// Format seconds as `m:ss` for thumb tooltips.
///
/// Minutes are not wrapped into hours, so an hour-long video ends at `60:00`.
/// Non-finite or negative input renders as `0:00`.
pub fn format_time(seconds: f64) -> String {
    let seconds = if seconds.is_finite() && seconds > 0.0 { seconds } else { 0.0 };
    let minutes = (seconds / 60.0).floor() as u64;
    let secs = (seconds % 60.0).floor() as u64;
    format!("{minutes}:{secs:02}")
}
