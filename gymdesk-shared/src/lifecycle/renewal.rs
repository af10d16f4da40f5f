/// Membership durations and renewal arithmetic
///
/// A membership month is a fixed 30 days. Renewal either restarts from today
/// (membership already lapsed) or extends from the current end date (still active,
/// so no paid time is lost).
///
/// # Example
///
/// ```
/// use chrono::{Duration, Utc};
/// use gymdesk_shared::lifecycle::renewal::{renew, MembershipDuration};
///
/// let now = Utc::now();
/// let end = now + Duration::days(10);
/// let renewed = renew(end, MembershipDuration::ThreeMonths, now);
/// assert_eq!(renewed, end + Duration::days(90));
/// ```

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Days counted per membership month
pub const DAYS_PER_MONTH: i64 = 30;

/// Allowed membership durations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum MembershipDuration {
    /// 1 month
    OneMonth,

    /// 3 months
    ThreeMonths,

    /// 6 months
    SixMonths,

    /// 12 months
    TwelveMonths,
}

/// Rejected duration value
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Invalid membership duration: {0}")]
pub struct InvalidDuration(pub i64);

impl MembershipDuration {
    /// Duration in months
    pub fn months(&self) -> i64 {
        match self {
            MembershipDuration::OneMonth => 1,
            MembershipDuration::ThreeMonths => 3,
            MembershipDuration::SixMonths => 6,
            MembershipDuration::TwelveMonths => 12,
        }
    }

    /// Duration in days (`months * 30`)
    pub fn days(&self) -> i64 {
        self.months() * DAYS_PER_MONTH
    }

    /// Duration as a `chrono::Duration`
    pub fn as_duration(&self) -> Duration {
        Duration::days(self.days())
    }
}

impl TryFrom<i64> for MembershipDuration {
    type Error = InvalidDuration;

    fn try_from(months: i64) -> Result<Self, Self::Error> {
        match months {
            1 => Ok(MembershipDuration::OneMonth),
            3 => Ok(MembershipDuration::ThreeMonths),
            6 => Ok(MembershipDuration::SixMonths),
            12 => Ok(MembershipDuration::TwelveMonths),
            other => Err(InvalidDuration(other)),
        }
    }
}

impl From<MembershipDuration> for i64 {
    fn from(duration: MembershipDuration) -> Self {
        duration.months()
    }
}

/// End date of a brand-new membership starting at `now`
pub fn initial_end(now: DateTime<Utc>, duration: MembershipDuration) -> DateTime<Utc> {
    now + duration.as_duration()
}

/// Computes the new membership end date for a renewal
///
/// - `current_end < now` (lapsed): `now + duration`
/// - otherwise: `current_end + duration`
pub fn renew(
    current_end: DateTime<Utc>,
    duration: MembershipDuration,
    now: DateTime<Utc>,
) -> DateTime<Utc> {
    if current_end < now {
        now + duration.as_duration()
    } else {
        current_end + duration.as_duration()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(n: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 9, 30, 0).unwrap() + Duration::days(n)
    }

    #[test]
    fn test_duration_days() {
        assert_eq!(MembershipDuration::OneMonth.days(), 30);
        assert_eq!(MembershipDuration::ThreeMonths.days(), 90);
        assert_eq!(MembershipDuration::SixMonths.days(), 180);
        assert_eq!(MembershipDuration::TwelveMonths.days(), 360);
    }

    #[test]
    fn test_duration_try_from_rejects_other_values() {
        for months in [-12, -1, 0, 2, 4, 5, 7, 11, 13, 24] {
            assert_eq!(
                MembershipDuration::try_from(months),
                Err(InvalidDuration(months)),
                "{} should be rejected",
                months
            );
        }
    }

    #[test]
    fn test_active_member_extends_from_current_end() {
        // current_end = day 0, now = day -5, duration = 3 -> day 90
        let renewed = renew(day(0), MembershipDuration::ThreeMonths, day(-5));
        assert_eq!(renewed, day(90));
    }

    #[test]
    fn test_expired_member_restarts_from_now() {
        // current_end = day -10, now = day 0, duration = 1 -> day 30
        let renewed = renew(day(-10), MembershipDuration::OneMonth, day(0));
        assert_eq!(renewed, day(30));
    }

    #[test]
    fn test_expired_renewal_ignores_how_long_ago_it_lapsed() {
        let now = day(0);
        for lapsed in [1, 10, 100, 1000] {
            let renewed = renew(day(-lapsed), MembershipDuration::SixMonths, now);
            assert_eq!(renewed, day(180));
        }
    }

    #[test]
    fn test_active_renewal_is_additive() {
        let now = day(0);
        for remaining in [0, 1, 45, 400] {
            let renewed = renew(day(remaining), MembershipDuration::TwelveMonths, now);
            assert_eq!(renewed, day(remaining + 360));
        }
    }

    #[test]
    fn test_end_equal_to_now_extends() {
        let now = day(0);
        assert_eq!(renew(now, MembershipDuration::OneMonth, now), day(30));
    }

    #[test]
    fn test_initial_end() {
        assert_eq!(initial_end(day(0), MembershipDuration::ThreeMonths), day(90));
    }

    #[test]
    fn test_duration_serde() {
        let duration: MembershipDuration = serde_json::from_str("6").unwrap();
        assert_eq!(duration, MembershipDuration::SixMonths);
        assert_eq!(serde_json::to_string(&duration).unwrap(), "6");
        assert!(serde_json::from_str::<MembershipDuration>("5").is_err());
    }
}
