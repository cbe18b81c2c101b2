//! Record timestamps.
//!
//! Timestamps are local ISO-8601 strings with a fixed microsecond width, so
//! lexicographic order equals chronological order. Within one process the
//! clock never goes backwards: a reading older than the last one issued is
//! clamped to it.

use std::sync::{Mutex, PoisonError};

use chrono::{Local, NaiveDateTime};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

static LAST_ISSUED: Mutex<Option<NaiveDateTime>> = Mutex::new(None);

/// Current local time as an ISO-8601 string, non-decreasing across calls.
pub fn now_iso() -> String {
    next_after(Local::now().naive_local())
        .format(TIMESTAMP_FORMAT)
        .to_string()
}

fn next_after(now: NaiveDateTime) -> NaiveDateTime {
    let mut last = LAST_ISSUED.lock().unwrap_or_else(PoisonError::into_inner);
    let issued = clamp(*last, now);
    *last = Some(issued);
    issued
}

/// `now`, unless an earlier issue was later than it.
fn clamp(previous: Option<NaiveDateTime>, now: NaiveDateTime) -> NaiveDateTime {
    match previous {
        Some(previous) if previous > now => previous,
        _ => now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_timestamps_are_fixed_width() {
        let stamp = now_iso();
        // 2026-10-18T09:15:02.123456
        assert_eq!(stamp.len(), 26);
        assert!(NaiveDateTime::parse_from_str(&stamp, TIMESTAMP_FORMAT).is_ok());
    }

    #[test]
    fn test_clamp_never_goes_backwards() {
        let now = Local::now().naive_local();
        let ahead = now + Duration::hours(1);

        assert_eq!(clamp(None, now), now);
        assert_eq!(clamp(Some(ahead), now), ahead);
        assert_eq!(clamp(Some(now), ahead), ahead);
    }

    #[test]
    fn test_issued_timestamps_are_ordered() {
        let stamps: Vec<String> = (0..50).map(|_| now_iso()).collect();
        assert!(stamps.windows(2).all(|pair| pair[0] <= pair[1]));
    }
}
