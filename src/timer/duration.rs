use chrono::TimeDelta;

/// Format a signed duration as `"{h}h {m}m {s}s"`, dropping leading zero
/// components: hours are omitted below one hour, hours and minutes below one
/// minute. Exactly zero renders as `"0s"`.
///
/// Seconds are zero-padded to two digits when a minutes or hours component
/// precedes them (`"1m 05s"`) and unpadded on their own (`"5s"`). A delta
/// carrying sub-second precision renders its seconds as a 2-decimal float
/// (`"4.98s"`), which is what the live countdown display feeds through here.
/// Negative deltas render as `"-"` followed by the absolute value.
pub fn format_duration(delta: TimeDelta) -> String {
    let negative = delta < TimeDelta::zero();
    let abs = if negative { -delta } else { delta };

    let total_secs = abs.num_seconds();
    let nanos = abs.subsec_nanos();

    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let secs = total_secs % 60;

    let seconds_part = if nanos != 0 {
        format!("{:.2}s", secs as f64 + f64::from(nanos) / 1e9)
    } else if hours > 0 || minutes > 0 {
        format!("{secs:02}s")
    } else {
        format!("{secs}s")
    };

    let body = if hours > 0 {
        format!("{hours}h {minutes}m {seconds_part}")
    } else if minutes > 0 {
        format!("{minutes}m {seconds_part}")
    } else {
        seconds_part
    };

    if negative { format!("-{body}") } else { body }
}

/// Convenience wrapper for whole-second durations.
pub fn format_secs(secs: i64) -> String {
    format_duration(TimeDelta::seconds(secs))
}

/// Split a whole-second duration into raw `(hours, minutes, seconds)`
/// components, unformatted.
pub fn split_duration(secs: u32) -> (u32, u32, u32) {
    (secs / 3600, (secs % 3600) / 60, secs % 60)
}

/// Parse a countdown length given either as plain seconds (`"90"`) or in
/// clock form (`"MM:SS"` / `"HH:MM:SS"`). Returns `None` on anything else.
pub fn parse_duration(input: &str) -> Option<u32> {
    let parts: Vec<&str> = input.split(':').collect();
    match parts.as_slice() {
        [secs] => secs.trim().parse().ok(),
        [m, s] => {
            let minutes: u32 = m.trim().parse().ok()?;
            let seconds: u32 = s.trim().parse().ok()?;
            if seconds >= 60 {
                return None;
            }
            minutes.checked_mul(60)?.checked_add(seconds)
        }
        [h, m, s] => {
            let hours: u32 = h.trim().parse().ok()?;
            let minutes: u32 = m.trim().parse().ok()?;
            let seconds: u32 = s.trim().parse().ok()?;
            if minutes >= 60 || seconds >= 60 {
                return None;
            }
            // minutes and seconds are both < 60 here, so only the hours
            // product can overflow.
            hours.checked_mul(3600)?.checked_add(minutes * 60 + seconds)
        }
        _ => None,
    }
}
