//! Clock-skew correction for phase countdowns.
//!
//! The server sends when a phase timer started, in its own clock. The
//! client derives remaining time from its own clock on every snapshot, so a
//! delayed or replayed event still shows the right countdown.

use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::debug;

use crate::config::PhaseDurations;
use crate::protocol::inbound::Timeout;
use crate::session::state::Phase;

/// Parse a server timestamp such as `2025-04-19T13:12:43.589464205+02:00`.
pub fn parse_timestamp(raw: &str) -> Option<OffsetDateTime> {
    OffsetDateTime::parse(raw.trim(), &Rfc3339).ok()
}

/// Whole seconds elapsed from `start` to `now`, rounded down.
pub fn seconds_since(start: OffsetDateTime, now: OffsetDateTime) -> i64 {
    let elapsed = now - start;
    let secs = elapsed.whole_seconds();
    if elapsed.subsec_nanoseconds() < 0 {
        secs - 1
    } else {
        secs
    }
}

/// `duration - (now - start)`, never below zero.
pub fn time_left(duration: i64, start: OffsetDateTime, now: OffsetDateTime) -> i64 {
    (duration - seconds_since(start, now)).max(0)
}

/// Remaining seconds of `phase` from whatever timing fields a payload has.
///
/// The duration is the payload's `timeout` seconds, or the configured
/// fallback for the phase. The start is `timeout_start_date`, or `timeout`
/// when an older server sent a date there. Without a usable start the full
/// duration is left.
pub fn phase_time_left(
    phase: Phase,
    timeout: Option<&Timeout>,
    start_date: Option<&str>,
    durations: &PhaseDurations,
    now: OffsetDateTime,
) -> Option<i64> {
    let duration = match timeout {
        Some(Timeout::Seconds(secs)) => Some(*secs),
        _ => durations.for_phase(phase),
    }?;

    let start_raw = start_date.or(match timeout {
        Some(Timeout::Date(date)) => Some(date.as_str()),
        _ => None,
    });
    match start_raw.map(|raw| (raw, parse_timestamp(raw))) {
        Some((_, Some(start))) => Some(time_left(duration, start, now)),
        Some((raw, None)) => {
            debug!(raw, "[RECONCILE] unparseable timer start, using full duration");
            Some(duration.max(0))
        }
        None => Some(duration.max(0)),
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    #[test]
    fn forty_five_seconds_into_a_sixty_second_phase() {
        let now = datetime!(2025-04-19 13:13:28.2 +02:00);
        let start = parse_timestamp("2025-04-19T13:12:43.189464205+02:00").unwrap();
        assert_eq!(time_left(60, start, now), 15);
    }

    #[test]
    fn clamps_at_zero_and_rounds_down() {
        let start = datetime!(2025-01-01 00:00:00 UTC);
        assert_eq!(time_left(10, start, datetime!(2025-01-01 00:05:00 UTC)), 0);
        assert_eq!(seconds_since(start, datetime!(2025-01-01 00:00:01.999 UTC)), 1);
        assert_eq!(seconds_since(start, datetime!(2024-12-31 23:59:59.5 UTC)), -1);
    }

    #[test]
    fn offsets_are_honored() {
        let start = parse_timestamp("2025-04-19T13:00:00+02:00").unwrap();
        let now = datetime!(2025-04-19 11:00:30 UTC);
        assert_eq!(time_left(60, start, now), 30);
    }

    #[test]
    fn falls_back_to_configured_duration() {
        let durations = PhaseDurations::new([30, 120, 60, 30, 10]);
        let now = datetime!(2025-01-01 00:00:20 UTC);
        let left = phase_time_left(
            Phase::Play,
            None,
            Some("2025-01-01T00:00:00Z"),
            &durations,
            now,
        );
        assert_eq!(left, Some(100));

        let legacy = Timeout::Date("2025-01-01T00:00:00Z".into());
        assert_eq!(
            phase_time_left(Phase::Blind, Some(&legacy), None, &durations, now),
            Some(10)
        );
        assert_eq!(
            phase_time_left(Phase::None, None, None, &durations, now),
            None
        );
    }
}
