/// Notification model and database operations
///
/// Notifications are created by member enrollment and changed only by the
/// read acknowledgement.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE notifications (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     owner_id UUID NOT NULL REFERENCES gym_owners(id) ON DELETE CASCADE,
///     message TEXT NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     is_read BOOLEAN NOT NULL DEFAULT FALSE
/// );
///
/// CREATE INDEX idx_notifications_owner_created ON notifications (owner_id, created_at DESC);
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

/// Notification record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Notification {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub is_read: bool,
}

/// Input for creating a notification (always unread)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNotification {
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl NewNotification {
    /// Message announcing an enrolled member
    pub fn member_added(member_name: &str, at: DateTime<Utc>) -> Self {
        Self {
            message: format!("New member {} has been added", member_name),
            created_at: at,
        }
    }
}

/// Filter for notification queries, always newest first
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotificationFilter {
    pub unread_only: bool,
}

impl NotificationFilter {
    pub fn all() -> Self {
        Self { unread_only: false }
    }

    pub fn unread() -> Self {
        Self { unread_only: true }
    }

    pub fn matches(&self, notification: &Notification) -> bool {
        !self.unread_only || !notification.is_read
    }
}

impl Notification {
    pub async fn create<'e, E: PgExecutor<'e>>(
        executor: E,
        owner_id: Uuid,
        data: NewNotification,
    ) -> Result<Self, sqlx::Error> {
        let notification = sqlx::query_as::<_, Notification>(
            r#"
            INSERT INTO notifications (owner_id, message, created_at, is_read)
            VALUES ($1, $2, $3, FALSE)
            RETURNING id, owner_id, message, created_at, is_read
            "#,
        )
        .bind(owner_id)
        .bind(data.message)
        .bind(data.created_at)
        .fetch_one(executor)
        .await?;

        Ok(notification)
    }

    /// Lists notifications of `owner_id`, newest first
    pub async fn find(
        pool: &PgPool,
        owner_id: Uuid,
        filter: NotificationFilter,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let notifications = sqlx::query_as::<_, Notification>(
            r#"
            SELECT id, owner_id, message, created_at, is_read
            FROM notifications
            WHERE owner_id = $1 AND (NOT $2 OR is_read = FALSE)
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner_id)
        .bind(filter.unread_only)
        .fetch_all(pool)
        .await?;

        Ok(notifications)
    }

    /// Marks one notification of `owner_id` as read
    ///
    /// # Returns
    ///
    /// `true` if the notification exists for this owner
    pub async fn mark_read(pool: &PgPool, owner_id: Uuid, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE notifications
            SET is_read = TRUE
            WHERE owner_id = $1 AND id = $2
            "#,
        )
        .bind(owner_id)
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn count_unread(pool: &PgPool, owner_id: Uuid) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM notifications WHERE owner_id = $1 AND is_read = FALSE",
        )
        .bind(owner_id)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }
}
