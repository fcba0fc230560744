use chrono::{Duration, NaiveDateTime};
use tracing::warn;

/// Text format cooldown timestamps are stored in
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn format_timestamp(at: NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Parses a stored timestamp. Unparseable values are logged and treated as
/// absent so that corrupted history never blocks a user.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    match NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT) {
        Ok(parsed) => Some(parsed),
        Err(error) => {
            warn!(raw, %error, "Ignoring malformed cooldown timestamp");
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CooldownStatus {
    pub ready: bool,
    pub remaining: Duration,
}

impl CooldownStatus {
    pub fn ready() -> Self {
        Self {
            ready: true,
            remaining: Duration::zero(),
        }
    }

    fn from_remaining(remaining: Duration) -> Self {
        if remaining > Duration::zero() {
            Self {
                ready: false,
                remaining,
            }
        } else {
            Self::ready()
        }
    }
}

/// Rolling window: ready once `window` has elapsed since `last_time`
pub fn check(
    last_time: Option<NaiveDateTime>,
    window: Duration,
    now: NaiveDateTime,
) -> CooldownStatus {
    let Some(last) = last_time else {
        return CooldownStatus::ready();
    };

    match last.checked_add_signed(window) {
        Some(ends) => CooldownStatus::from_remaining(ends - now),
        None => {
            warn!(%last, "Ignoring out-of-range cooldown timestamp");
            CooldownStatus::ready()
        }
    }
}

/// Once per calendar date: blocked for the rest of the day `last_time` fell
/// on, however many hours ago that was.
pub fn check_calendar_day(
    last_time: Option<NaiveDateTime>,
    now: NaiveDateTime,
) -> CooldownStatus {
    match last_time {
        Some(last) if last.date() == now.date() => {
            let remaining = now
                .date()
                .succ_opt()
                .and_then(|tomorrow| tomorrow.and_hms_opt(0, 0, 0))
                .map(|midnight| midnight - now)
                .unwrap_or_else(Duration::zero);
            CooldownStatus {
                ready: false,
                remaining,
            }
        }
        _ => CooldownStatus::ready(),
    }
}

/// How often an action may be performed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CooldownPolicy {
    Unlimited,
    Rolling(Duration),
    CalendarDay,
}

impl CooldownPolicy {
    /// A zero or negative window means no cooldown
    pub fn rolling_secs(secs: i64) -> Self {
        if secs > 0 {
            CooldownPolicy::Rolling(Duration::seconds(secs))
        } else {
            CooldownPolicy::Unlimited
        }
    }

    /// Evaluates the policy against a raw stored timestamp
    pub fn check(&self, stored: Option<&str>, now: NaiveDateTime) -> CooldownStatus {
        let last_time = stored.and_then(parse_timestamp);
        match self {
            CooldownPolicy::Unlimited => CooldownStatus::ready(),
            CooldownPolicy::Rolling(window) => check(last_time, *window, now),
            CooldownPolicy::CalendarDay => check_calendar_day(last_time, now),
        }
    }
}

/// Whole seconds left, rounded up so a wait never reads as zero
pub fn remaining_secs(remaining: Duration) -> i64 {
    let millis = remaining.num_milliseconds().max(0);
    (millis + 999) / 1000
}

/// "4m 12s", "1h 3m 0s", "9s"
pub fn format_remaining(remaining: Duration) -> String {
    let total = remaining_secs(remaining);
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("{hours}h {minutes}m {seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
    }
}
