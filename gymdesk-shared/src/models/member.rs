/// Member model and database operations
///
/// Members are the gym's customers. Every query takes the owning gym's id and
/// filters on it; there is no way to read or write a member without one.
///
/// Health and emergency-contact data are stored as nested JSON groups rather than
/// flattened columns.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE members (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     owner_id UUID NOT NULL REFERENCES gym_owners(id) ON DELETE CASCADE,
///     name VARCHAR(255) NOT NULL,
///     email VARCHAR(255) NOT NULL,
///     phone VARCHAR(64) NOT NULL,
///     address TEXT NOT NULL,
///     join_date TIMESTAMPTZ NOT NULL,
///     membership_end TIMESTAMPTZ NOT NULL,
///     photo_url VARCHAR(512),
///     needs_pt BOOLEAN NOT NULL DEFAULT FALSE,
///     trainer_id UUID,
///     pt_sessions INTEGER,
///     health_info JSONB NOT NULL DEFAULT '{}',
///     emergency_contact JSONB NOT NULL,
///     updated_at TIMESTAMPTZ
/// );
///
/// CREATE UNIQUE INDEX members_owner_email_key ON members (owner_id, lower(email));
/// ```
///
/// `trainer_id` is intentionally not a foreign key: a member may outlive the
/// trainer it points at.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, PgExecutor, PgPool};
use uuid::Uuid;

use crate::lifecycle::status::EXPIRING_SOON_DAYS;

use super::{like_pattern, same_email};

const MEMBER_COLUMNS: &str = "id, owner_id, name, email, phone, address, needs_pt, trainer_id, \
     pt_sessions, health_info, emergency_contact, join_date, membership_end, photo_url, updated_at";

/// Allowed personal-training session counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(try_from = "i64", into = "i64")]
#[repr(i32)]
pub enum PtSessions {
    One = 1,
    Two = 2,
    Three = 3,
    Five = 5,
}

/// Rejected session count
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Invalid number of PT sessions: {0}")]
pub struct InvalidPtSessions(pub i64);

impl PtSessions {
    /// Number of sessions
    pub fn count(&self) -> i64 {
        *self as i64
    }
}

impl TryFrom<i64> for PtSessions {
    type Error = InvalidPtSessions;

    fn try_from(count: i64) -> Result<Self, Self::Error> {
        match count {
            1 => Ok(PtSessions::One),
            2 => Ok(PtSessions::Two),
            3 => Ok(PtSessions::Three),
            5 => Ok(PtSessions::Five),
            other => Err(InvalidPtSessions(other)),
        }
    }
}

impl From<PtSessions> for i64 {
    fn from(sessions: PtSessions) -> Self {
        sessions.count()
    }
}

/// Health block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthInfo {
    /// Weight in kilograms (positive when present)
    pub weight: Option<f64>,

    /// Height in centimetres (positive when present)
    pub height: Option<f64>,

    /// Free-text medical notes
    pub health_conditions: Option<String>,
}

/// Emergency contact (both fields required)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyContact {
    pub name: String,
    pub phone: String,
}

/// Editable member fields, as produced by the enrollment validator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MemberDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,

    /// Whether the member signed up for personal training
    pub needs_pt: bool,

    /// Weak reference to a trainer of the same owner
    pub trainer_id: Option<Uuid>,

    /// Session count, present only with `needs_pt`
    pub pt_sessions: Option<PtSessions>,

    #[sqlx(json)]
    pub health_info: HealthInfo,

    #[sqlx(json)]
    pub emergency_contact: EmergencyContact,
}

/// Member record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Member {
    /// Unique member ID
    pub id: Uuid,

    /// Owning gym
    pub owner_id: Uuid,

    #[sqlx(flatten)]
    #[serde(flatten)]
    pub details: MemberDetails,

    /// When the member enrolled
    pub join_date: DateTime<Utc>,

    /// When the paid membership runs out
    pub membership_end: DateTime<Utc>,

    /// Photo reference
    pub photo_url: Option<String>,

    /// Last edit or renewal
    pub updated_at: Option<DateTime<Utc>>,
}

/// Input for inserting a member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMember {
    pub details: MemberDetails,
    pub join_date: DateTime<Utc>,
    pub membership_end: DateTime<Utc>,
    pub photo_url: Option<String>,
}

/// Partial update for a member
///
/// `details` replaces every editable field at once. `membership_end` and
/// `photo_url` are written only when `Some`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberPatch {
    pub details: Option<MemberDetails>,
    pub membership_end: Option<DateTime<Utc>>,
    pub photo_url: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl MemberPatch {
    /// Applies the patch to an in-memory record
    pub fn apply(&self, member: &mut Member) {
        if let Some(details) = &self.details {
            member.details = details.clone();
        }
        if let Some(end) = self.membership_end {
            member.membership_end = end;
        }
        if let Some(photo_url) = &self.photo_url {
            member.photo_url = Some(photo_url.clone());
        }
        member.updated_at = Some(self.updated_at);
    }
}

/// Result ordering for member queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberOrder {
    /// Alphabetical by name
    #[default]
    Name,

    /// Newest `join_date` first
    RecentlyJoined,
}

/// Filter for member queries
///
/// The owner id is not part of the filter; it is a separate, mandatory argument
/// on every query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberFilter {
    /// Exact email (case-insensitive)
    pub email: Option<String>,

    /// Skip this member id (self-exclusion on edit)
    pub exclude_id: Option<Uuid>,

    /// Case-insensitive substring of name, email, or phone
    pub search: Option<String>,

    pub order: MemberOrder,

    pub limit: Option<i64>,
}

impl MemberFilter {
    /// Every member, alphabetical
    pub fn all() -> Self {
        Self::default()
    }

    /// Members with the given email
    pub fn with_email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            ..Default::default()
        }
    }

    /// Members whose name, email, or phone contains `query`
    pub fn search(query: impl Into<String>) -> Self {
        Self {
            search: Some(query.into()),
            ..Default::default()
        }
    }

    /// Most recently joined first
    pub fn recently_joined() -> Self {
        Self {
            order: MemberOrder::RecentlyJoined,
            ..Default::default()
        }
    }

    pub fn excluding(mut self, id: Option<Uuid>) -> Self {
        self.exclude_id = id;
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// In-memory equivalent of the SQL filter
    pub fn matches(&self, member: &Member) -> bool {
        if let Some(email) = &self.email {
            if !same_email(&member.details.email, email) {
                return false;
            }
        }
        if self.exclude_id == Some(member.id) {
            return false;
        }
        if let Some(query) = &self.search {
            let needle = query.to_lowercase();
            let details = &member.details;
            let hit = [&details.name, &details.email, &details.phone]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }
        true
    }
}

/// Dashboard counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MembershipCounts {
    /// `membership_end >= now`
    pub active: i64,

    /// `membership_end < now`
    pub expired: i64,

    /// `now <= membership_end <= now + 7 days`
    pub expiring_soon: i64,
}

impl MembershipCounts {
    /// Tallies counters over in-memory records
    pub fn tally<'a>(members: impl IntoIterator<Item = &'a Member>, now: DateTime<Utc>) -> Self {
        let week_out = now + Duration::days(EXPIRING_SOON_DAYS);
        let mut counts = Self::default();
        for member in members {
            let end = member.membership_end;
            if end >= now {
                counts.active += 1;
                if end <= week_out {
                    counts.expiring_soon += 1;
                }
            } else {
                counts.expired += 1;
            }
        }
        counts
    }
}

impl Member {
    /// Inserts a member for `owner_id`
    ///
    /// # Errors
    ///
    /// Returns an error if the email is already used by another member of the
    /// same owner (`members_owner_email_key`) or the database is unreachable.
    pub async fn create<'e, E: PgExecutor<'e>>(
        executor: E,
        owner_id: Uuid,
        data: NewMember,
    ) -> Result<Self, sqlx::Error> {
        let details = data.details;
        let sql = format!(
            r#"
            INSERT INTO members (owner_id, name, email, phone, address, needs_pt, trainer_id,
                                 pt_sessions, health_info, emergency_contact, join_date,
                                 membership_end, photo_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {MEMBER_COLUMNS}
            "#
        );

        let member = sqlx::query_as::<_, Member>(&sql)
            .bind(owner_id)
            .bind(details.name)
            .bind(details.email)
            .bind(details.phone)
            .bind(details.address)
            .bind(details.needs_pt)
            .bind(details.trainer_id)
            .bind(details.pt_sessions)
            .bind(Json(details.health_info))
            .bind(Json(details.emergency_contact))
            .bind(data.join_date)
            .bind(data.membership_end)
            .bind(data.photo_url)
            .fetch_one(executor)
            .await?;

        Ok(member)
    }

    /// Finds one member of `owner_id`
    pub async fn find_by_id(
        pool: &PgPool,
        owner_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!("SELECT {MEMBER_COLUMNS} FROM members WHERE owner_id = $1 AND id = $2");

        let member = sqlx::query_as::<_, Member>(&sql)
            .bind(owner_id)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(member)
    }

    /// Lists members of `owner_id` matching `filter`
    pub async fn find(
        pool: &PgPool,
        owner_id: Uuid,
        filter: &MemberFilter,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let sql = format!(
            r#"
            SELECT {MEMBER_COLUMNS}
            FROM members
            WHERE owner_id = $1
              AND ($2::text IS NULL OR lower(email) = lower($2))
              AND ($3::uuid IS NULL OR id <> $3)
              AND ($4::text IS NULL OR name ILIKE $4 OR email ILIKE $4 OR phone ILIKE $4)
            ORDER BY (CASE WHEN $5 THEN NULL ELSE lower(name) END) COLLATE "C" ASC,
                     (CASE WHEN $5 THEN NULL ELSE name END) COLLATE "C" ASC,
                     join_date DESC
            LIMIT $6
            "#
        );

        let members = sqlx::query_as::<_, Member>(&sql)
            .bind(owner_id)
            .bind(filter.email.as_deref())
            .bind(filter.exclude_id)
            .bind(filter.search.as_deref().map(like_pattern))
            .bind(filter.order == MemberOrder::RecentlyJoined)
            .bind(filter.limit)
            .fetch_all(pool)
            .await?;

        Ok(members)
    }

    /// Updates one member of `owner_id`
    ///
    /// # Returns
    ///
    /// The updated member, or None if no such member belongs to the owner
    pub async fn update(
        pool: &PgPool,
        owner_id: Uuid,
        id: Uuid,
        patch: MemberPatch,
    ) -> Result<Option<Self>, sqlx::Error> {
        let has_details = patch.details.is_some();
        let details = patch.details.unwrap_or_else(|| MemberDetails {
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            needs_pt: false,
            trainer_id: None,
            pt_sessions: None,
            health_info: HealthInfo::default(),
            emergency_contact: EmergencyContact::default(),
        });

        let sql = format!(
            r#"
            UPDATE members
            SET name = CASE WHEN $3 THEN $4 ELSE name END,
                email = CASE WHEN $3 THEN $5 ELSE email END,
                phone = CASE WHEN $3 THEN $6 ELSE phone END,
                address = CASE WHEN $3 THEN $7 ELSE address END,
                needs_pt = CASE WHEN $3 THEN $8 ELSE needs_pt END,
                trainer_id = CASE WHEN $3 THEN $9 ELSE trainer_id END,
                pt_sessions = CASE WHEN $3 THEN $10 ELSE pt_sessions END,
                health_info = CASE WHEN $3 THEN $11 ELSE health_info END,
                emergency_contact = CASE WHEN $3 THEN $12 ELSE emergency_contact END,
                membership_end = COALESCE($13, membership_end),
                photo_url = COALESCE($14, photo_url),
                updated_at = $15
            WHERE owner_id = $1 AND id = $2
            RETURNING {MEMBER_COLUMNS}
            "#
        );

        let member = sqlx::query_as::<_, Member>(&sql)
            .bind(owner_id)
            .bind(id)
            .bind(has_details)
            .bind(details.name)
            .bind(details.email)
            .bind(details.phone)
            .bind(details.address)
            .bind(details.needs_pt)
            .bind(details.trainer_id)
            .bind(details.pt_sessions)
            .bind(Json(details.health_info))
            .bind(Json(details.emergency_contact))
            .bind(patch.membership_end)
            .bind(patch.photo_url)
            .bind(patch.updated_at)
            .fetch_optional(pool)
            .await?;

        Ok(member)
    }

    /// Dashboard counters for `owner_id`
    pub async fn counts(
        pool: &PgPool,
        owner_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<MembershipCounts, sqlx::Error> {
        let counts = sqlx::query_as::<_, MembershipCounts>(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE membership_end >= $2) AS active,
                COUNT(*) FILTER (WHERE membership_end < $2) AS expired,
                COUNT(*) FILTER (WHERE membership_end >= $2 AND membership_end <= $3) AS expiring_soon
            FROM members
            WHERE owner_id = $1
            "#,
        )
        .bind(owner_id)
        .bind(now)
        .bind(now + Duration::days(EXPIRING_SOON_DAYS))
        .fetch_one(pool)
        .await?;

        Ok(counts)
    }
}
