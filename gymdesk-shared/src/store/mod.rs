/// Persistence gateway
///
/// [`GymStore`] is the single interface through which tenant data is read and
/// written. Every member, trainer, and notification method takes the owner id as
/// an explicit argument, so there is no call path that can reach another
/// owner's records.
///
/// Available backends:
/// - [`PgStore`]: PostgreSQL, used by the API server
/// - [`MemoryStore`]: in-memory, used by tests and local development
///
/// # Example
///
/// ```
/// use gymdesk_shared::store::{GymStore, MemoryStore};
/// use gymdesk_shared::models::owner::CreateOwner;
///
/// # async fn example() -> Result<(), gymdesk_shared::store::StoreError> {
/// let store = MemoryStore::new();
/// let owner = store.insert_owner(CreateOwner {
///     name: "Dana".into(),
///     gym_name: "Iron Works".into(),
///     email: "dana@ironworks.example".into(),
///     password_hash: "$argon2id$...".into(),
///     photo_url: None,
/// }).await?;
///
/// assert!(store.find_owner(owner.id).await?.is_some());
/// # Ok(())
/// # }
/// ```

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::member::{Member, MemberFilter, MemberPatch, MembershipCounts, NewMember};
use crate::models::notification::{NewNotification, Notification, NotificationFilter};
use crate::models::owner::{CreateOwner, GymOwner, UpdateOwner};
use crate::models::trainer::{Trainer, TrainerDetails, TrainerFilter};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Store errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Underlying database failure
    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),

    /// A uniqueness constraint rejected the write
    #[error("Unique constraint violated: {constraint}")]
    Conflict { constraint: String },

    /// The record vanished between lookup and write
    #[error("{0} not found")]
    NotFound(&'static str),
}

impl StoreError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict { .. })
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            if db_err.is_unique_violation() {
                return StoreError::Conflict {
                    constraint: db_err.constraint().unwrap_or("unique").to_string(),
                };
            }
        }
        StoreError::Database(err)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Owner-partitioned persistence gateway
#[async_trait]
pub trait GymStore: Send + Sync {
    /// Checks the backend is reachable
    async fn ping(&self) -> StoreResult<()>;

    // Owners

    async fn insert_owner(&self, data: CreateOwner) -> StoreResult<GymOwner>;

    async fn find_owner(&self, id: Uuid) -> StoreResult<Option<GymOwner>>;

    /// Case-insensitive lookup by login email
    async fn find_owner_by_email(&self, email: &str) -> StoreResult<Option<GymOwner>>;

    async fn update_owner(&self, id: Uuid, data: UpdateOwner) -> StoreResult<Option<GymOwner>>;

    // Members

    async fn insert_member(&self, owner_id: Uuid, data: NewMember) -> StoreResult<Member>;

    /// Inserts a member and its notification as one write
    ///
    /// Either both rows are stored or neither is.
    async fn enroll_member(
        &self,
        owner_id: Uuid,
        member: NewMember,
        notification: NewNotification,
    ) -> StoreResult<(Member, Notification)>;

    async fn find_member(&self, owner_id: Uuid, id: Uuid) -> StoreResult<Option<Member>>;

    async fn find_members(&self, owner_id: Uuid, filter: &MemberFilter) -> StoreResult<Vec<Member>>;

    async fn update_member(
        &self,
        owner_id: Uuid,
        id: Uuid,
        patch: MemberPatch,
    ) -> StoreResult<Option<Member>>;

    async fn membership_counts(
        &self,
        owner_id: Uuid,
        now: DateTime<Utc>,
    ) -> StoreResult<MembershipCounts>;

    // Trainers

    async fn insert_trainer(&self, owner_id: Uuid, data: TrainerDetails) -> StoreResult<Trainer>;

    async fn find_trainer(&self, owner_id: Uuid, id: Uuid) -> StoreResult<Option<Trainer>>;

    async fn find_trainers(
        &self,
        owner_id: Uuid,
        filter: &TrainerFilter,
    ) -> StoreResult<Vec<Trainer>>;

    async fn update_trainer(
        &self,
        owner_id: Uuid,
        id: Uuid,
        data: TrainerDetails,
    ) -> StoreResult<Option<Trainer>>;

    // Notifications

    async fn insert_notification(
        &self,
        owner_id: Uuid,
        data: NewNotification,
    ) -> StoreResult<Notification>;

    /// Newest first
    async fn find_notifications(
        &self,
        owner_id: Uuid,
        filter: NotificationFilter,
    ) -> StoreResult<Vec<Notification>>;

    /// Returns `false` when the notification doesn't belong to the owner
    async fn mark_notification_read(&self, owner_id: Uuid, id: Uuid) -> StoreResult<bool>;

    async fn count_unread_notifications(&self, owner_id: Uuid) -> StoreResult<i64>;
}
