/// Lifecycle computations over raw (not yet normalized) end dates
///
/// These are the entry points for values arriving from outside the store. The
/// input is normalized with [`normalize_or_now`] and the fallback flag is carried
/// into the result.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::renewal::{renew, MembershipDuration};
use super::status::{classify_membership, MembershipStatus, StatusReport};
use super::timestamp::{normalize_or_now, RawTimestamp};

/// Status of a raw end date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusPreview {
    pub status: MembershipStatus,
    pub days_left: i64,

    /// The end date was unparsable and `now` was used instead
    pub fell_back: bool,
}

/// Renewal of a raw end date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RenewalPreview {
    pub membership_end: DateTime<Utc>,
    pub fell_back: bool,
}

pub fn preview_status(raw: &RawTimestamp, now: DateTime<Utc>) -> StatusPreview {
    let normalized = normalize_or_now(raw, now);
    let StatusReport {
        status, days_left, ..
    } = classify_membership(normalized.instant, now);

    StatusPreview {
        status,
        days_left,
        fell_back: normalized.fell_back,
    }
}

pub fn preview_renewal(
    raw: &RawTimestamp,
    duration: MembershipDuration,
    now: DateTime<Utc>,
) -> RenewalPreview {
    let normalized = normalize_or_now(raw, now);

    RenewalPreview {
        membership_end: renew(normalized.instant, duration, now),
        fell_back: normalized.fell_back,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_text_end_date_is_classified() {
        let preview = preview_status(&RawTimestamp::Text("2025-03-08T12:00:00+00:00".into()), now());
        assert_eq!(preview.status, MembershipStatus::ExpiringSoon);
        assert_eq!(preview.days_left, 7);
        assert!(!preview.fell_back);
    }

    #[test]
    fn test_unparsable_end_date_is_expired_and_flagged() {
        let preview = preview_status(&RawTimestamp::Text("tomorrow".into()), now());
        assert_eq!(preview.status, MembershipStatus::Expired);
        assert_eq!(preview.days_left, 0);
        assert!(preview.fell_back);
    }

    #[test]
    fn test_unparsable_end_date_renews_from_now() {
        let preview = preview_renewal(
            &RawTimestamp::Text("??".into()),
            MembershipDuration::OneMonth,
            now(),
        );
        assert_eq!(preview.membership_end, now() + Duration::days(30));
        assert!(preview.fell_back);
    }

    #[test]
    fn test_offset_and_naive_inputs_agree() {
        let aware = preview_renewal(
            &RawTimestamp::Text("2025-03-10T14:00:00+02:00".into()),
            MembershipDuration::OneMonth,
            now(),
        );
        let naive = preview_renewal(
            &RawTimestamp::Text("2025-03-10T12:00:00".into()),
            MembershipDuration::OneMonth,
            now(),
        );
        assert_eq!(aware.membership_end, naive.membership_end);
    }
}
