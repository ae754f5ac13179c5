use std::time::Duration;

const MILLIS_PER_SECOND: u128 = 1_000;
const MILLIS_PER_MINUTE: u128 = 60 * MILLIS_PER_SECOND;
const MILLIS_PER_HOUR: u128 = 60 * MILLIS_PER_MINUTE;
const MILLIS_PER_DAY: u128 = 24 * MILLIS_PER_HOUR;

/// Formats a duration as `<d>d <h>h <m>m <s>.<mmm>s`.
///
/// Leading zero units are omitted; once a unit is printed every smaller unit
/// follows it. Sub-millisecond precision is truncated.
pub fn format_duration(duration: Duration) -> String {
    let mut remainder = duration.as_millis();
    let days = remainder / MILLIS_PER_DAY;
    remainder -= days * MILLIS_PER_DAY;
    let hours = remainder / MILLIS_PER_HOUR;
    remainder -= hours * MILLIS_PER_HOUR;
    let minutes = remainder / MILLIS_PER_MINUTE;
    remainder -= minutes * MILLIS_PER_MINUTE;
    let seconds = remainder / MILLIS_PER_SECOND;
    let millis = remainder - seconds * MILLIS_PER_SECOND;

    let mut out = String::new();
    let mut shown = false;
    if days != 0 {
        out.push_str(&format!("{days}d "));
        shown = true;
    }
    if hours != 0 || shown {
        out.push_str(&format!("{hours}h "));
        shown = true;
    }
    if minutes != 0 || shown {
        out.push_str(&format!("{minutes}m "));
    }
    out.push_str(&format!("{seconds}.{millis:03}s"));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn zero_is_seconds_only() {
        assert_eq!(format_duration(Duration::ZERO), "0.000s");
    }

    #[test]
    fn minutes_without_hours() {
        assert_eq!(format_duration(ms(61_234)), "1m 1.234s");
    }

    #[test]
    fn every_unit() {
        assert_eq!(format_duration(ms(86_400_000 + 3_661_000)), "1d 1h 1m 1.000s");
    }

    #[test]
    fn higher_units_force_zero_lower_units() {
        assert_eq!(format_duration(ms(86_400_000)), "1d 0h 0m 0.000s");
        assert_eq!(format_duration(ms(3_600_000 + 5)), "1h 0m 0.005s");
    }

    #[test]
    fn sub_millisecond_precision_is_truncated() {
        assert_eq!(format_duration(Duration::from_micros(1_999)), "0.001s");
        assert_eq!(format_duration(ms(59_999)), "59.999s");
    }
}
