//! General time utility functions

use chrono;

/// Number of nanoseconds in a second
pub const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// Convert a duration into a number of seconds, or `None` if overflow
pub fn duration_to_seconds(duration: chrono::Duration) -> Option<f64> {
    duration
        .num_nanoseconds()
        .map(|ns| ns as f64 / NANOS_PER_SECOND as f64)
}

/// Number of whole cycles needed to cover `duration_s` at the given cycle
/// frequency.
///
/// Any partial cycle is rounded up so that a non-zero duration always lasts at
/// least one cycle.
pub fn seconds_to_cycles(duration_s: f64, cycle_frequency_hz: f64) -> u64 {
    if duration_s <= 0.0 || cycle_frequency_hz <= 0.0 {
        return 0;
    }

    (duration_s * cycle_frequency_hz).ceil() as u64
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_duration_to_seconds() {
        assert_eq!(
            duration_to_seconds(chrono::Duration::milliseconds(250)),
            Some(0.25)
        );
        assert_eq!(duration_to_seconds(chrono::Duration::max_value()), None);
    }

    #[test]
    fn test_seconds_to_cycles() {
        assert_eq!(seconds_to_cycles(0.25, 50.0), 13);
        assert_eq!(seconds_to_cycles(0.2, 10.0), 2);
        assert_eq!(seconds_to_cycles(0.0, 50.0), 0);
        assert_eq!(seconds_to_cycles(1.0, 0.0), 0);
    }
}
