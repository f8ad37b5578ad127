use std::time::Duration;

/// Wall-clock time of a run, for the summary log.
///
/// Sub-second runs show milliseconds; longer ones show the largest
/// units, zero-padded below the leading one (`2m 05s`, `1h 00m 07s`).
pub fn format_elapsed(elapsed: Duration) -> String {
    let total_secs = elapsed.as_secs();
    if total_secs == 0 {
        return format!("{}ms", elapsed.subsec_millis());
    }
    if total_secs < 60 {
        return format!("{:.1}s", elapsed.as_secs_f64());
    }

    let (hours, mins, secs) = (total_secs / 3600, total_secs % 3600 / 60, total_secs % 60);
    if hours == 0 {
        format!("{}m {:02}s", mins, secs)
    } else {
        format!("{}h {:02}m {:02}s", hours, mins, secs)
    }
}
