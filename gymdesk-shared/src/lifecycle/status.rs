/// Membership status classification
///
/// Two views of a member's standing coexist and are deliberately kept apart:
///
/// - [`classify_membership`]: the three-tier view (Active / Expiring Soon / Expired)
///   shown on a member's detail page, with a `days_left` countdown.
/// - [`listing_status`]: the binary view (Active / Expired) used by roster listings
///   and search results.
///
/// The two disagree for members whose membership ends within the next day or week,
/// and call sites depend on that difference.
///
/// # Example
///
/// ```
/// use chrono::{Duration, Utc};
/// use gymdesk_shared::lifecycle::status::{classify_membership, listing_status, ListingStatus, MembershipStatus};
///
/// let now = Utc::now();
/// let report = classify_membership(now + Duration::days(7), now);
/// assert_eq!(report.status, MembershipStatus::ExpiringSoon);
/// assert_eq!(listing_status(now + Duration::days(7), now), ListingStatus::Active);
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Days at or below which an active membership counts as expiring soon
pub const EXPIRING_SOON_DAYS: i64 = 7;

const SECONDS_PER_DAY: i64 = 86_400;

/// Three-tier membership status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MembershipStatus {
    /// More than a week remaining
    #[serde(rename = "Active")]
    Active,

    /// One to seven full days remaining
    #[serde(rename = "Expiring Soon")]
    ExpiringSoon,

    /// No full day remaining
    #[serde(rename = "Expired")]
    Expired,
}

impl MembershipStatus {
    /// Display label
    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipStatus::Active => "Active",
            MembershipStatus::ExpiringSoon => "Expiring Soon",
            MembershipStatus::Expired => "Expired",
        }
    }
}

/// Binary status used by listings and search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListingStatus {
    /// Membership end is strictly in the future
    Active,

    /// Membership end is now or in the past
    Expired,
}

impl ListingStatus {
    /// Display label
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingStatus::Active => "Active",
            ListingStatus::Expired => "Expired",
        }
    }
}

/// Result of the three-tier classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    /// Derived status
    pub status: MembershipStatus,

    /// Whole days remaining, clamped at 0 for display
    pub days_left: i64,

    /// Whole days remaining before clamping (negative once expired)
    #[serde(skip)]
    pub raw_days: i64,
}

/// Whole days from `now` until `end`, rounded toward negative infinity
///
/// Half a day past expiry is `-1`, not `0`.
pub fn whole_days_between(now: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    let delta = end.signed_duration_since(now);
    delta.num_seconds().div_euclid(SECONDS_PER_DAY)
}

/// Classifies a membership into Active / Expiring Soon / Expired
///
/// - `days_left > 7` → Active
/// - `0 < days_left <= 7` → Expiring Soon
/// - `days_left <= 0` → Expired
///
/// Exactly seven days is Expiring Soon and exactly zero is Expired.
pub fn classify_membership(membership_end: DateTime<Utc>, now: DateTime<Utc>) -> StatusReport {
    let raw_days = whole_days_between(now, membership_end);

    let status = if raw_days > EXPIRING_SOON_DAYS {
        MembershipStatus::Active
    } else if raw_days > 0 {
        MembershipStatus::ExpiringSoon
    } else {
        MembershipStatus::Expired
    };

    StatusReport {
        status,
        days_left: raw_days.max(0),
        raw_days,
    }
}

/// Binary listing status: Active iff `membership_end > now`
pub fn listing_status(membership_end: DateTime<Utc>, now: DateTime<Utc>) -> ListingStatus {
    if membership_end > now {
        ListingStatus::Active
    } else {
        ListingStatus::Expired
    }
}

/// Days remaining as shown in listings (clamped at 0)
pub fn days_remaining(membership_end: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    whole_days_between(now, membership_end).max(0)
}
