/// PostgreSQL store
///
/// Thin delegation to the model operations in [`crate::models`], with
/// `sqlx::Error` mapped to [`StoreError`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{GymStore, StoreResult};
use crate::db::pool::health_check;
use crate::models::member::{Member, MemberFilter, MemberPatch, MembershipCounts, NewMember};
use crate::models::notification::{NewNotification, Notification, NotificationFilter};
use crate::models::owner::{CreateOwner, GymOwner, UpdateOwner};
use crate::models::trainer::{Trainer, TrainerDetails, TrainerFilter};

/// Store backed by a PostgreSQL pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl GymStore for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        health_check(&self.pool).await?;
        Ok(())
    }

    async fn insert_owner(&self, data: CreateOwner) -> StoreResult<GymOwner> {
        Ok(GymOwner::create(&self.pool, data).await?)
    }

    async fn find_owner(&self, id: Uuid) -> StoreResult<Option<GymOwner>> {
        Ok(GymOwner::find_by_id(&self.pool, id).await?)
    }

    async fn find_owner_by_email(&self, email: &str) -> StoreResult<Option<GymOwner>> {
        Ok(GymOwner::find_by_email(&self.pool, email).await?)
    }

    async fn update_owner(&self, id: Uuid, data: UpdateOwner) -> StoreResult<Option<GymOwner>> {
        Ok(GymOwner::update(&self.pool, id, data).await?)
    }

    async fn insert_member(&self, owner_id: Uuid, data: NewMember) -> StoreResult<Member> {
        Ok(Member::create(&self.pool, owner_id, data).await?)
    }

    async fn enroll_member(
        &self,
        owner_id: Uuid,
        member: NewMember,
        notification: NewNotification,
    ) -> StoreResult<(Member, Notification)> {
        let mut tx = self.pool.begin().await?;

        let member = Member::create(&mut *tx, owner_id, member).await?;
        let notification = Notification::create(&mut *tx, owner_id, notification).await?;

        tx.commit().await?;
        Ok((member, notification))
    }

    async fn find_member(&self, owner_id: Uuid, id: Uuid) -> StoreResult<Option<Member>> {
        Ok(Member::find_by_id(&self.pool, owner_id, id).await?)
    }

    async fn find_members(&self, owner_id: Uuid, filter: &MemberFilter) -> StoreResult<Vec<Member>> {
        Ok(Member::find(&self.pool, owner_id, filter).await?)
    }

    async fn update_member(
        &self,
        owner_id: Uuid,
        id: Uuid,
        patch: MemberPatch,
    ) -> StoreResult<Option<Member>> {
        Ok(Member::update(&self.pool, owner_id, id, patch).await?)
    }

    async fn membership_counts(
        &self,
        owner_id: Uuid,
        now: DateTime<Utc>,
    ) -> StoreResult<MembershipCounts> {
        Ok(Member::counts(&self.pool, owner_id, now).await?)
    }

    async fn insert_trainer(&self, owner_id: Uuid, data: TrainerDetails) -> StoreResult<Trainer> {
        Ok(Trainer::create(&self.pool, owner_id, data).await?)
    }

    async fn find_trainer(&self, owner_id: Uuid, id: Uuid) -> StoreResult<Option<Trainer>> {
        Ok(Trainer::find_by_id(&self.pool, owner_id, id).await?)
    }

    async fn find_trainers(
        &self,
        owner_id: Uuid,
        filter: &TrainerFilter,
    ) -> StoreResult<Vec<Trainer>> {
        Ok(Trainer::find(&self.pool, owner_id, filter).await?)
    }

    async fn update_trainer(
        &self,
        owner_id: Uuid,
        id: Uuid,
        data: TrainerDetails,
    ) -> StoreResult<Option<Trainer>> {
        Ok(Trainer::update(&self.pool, owner_id, id, data).await?)
    }

    async fn insert_notification(
        &self,
        owner_id: Uuid,
        data: NewNotification,
    ) -> StoreResult<Notification> {
        Ok(Notification::create(&self.pool, owner_id, data).await?)
    }

    async fn find_notifications(
        &self,
        owner_id: Uuid,
        filter: NotificationFilter,
    ) -> StoreResult<Vec<Notification>> {
        Ok(Notification::find(&self.pool, owner_id, filter).await?)
    }

    async fn mark_notification_read(&self, owner_id: Uuid, id: Uuid) -> StoreResult<bool> {
        Ok(Notification::mark_read(&self.pool, owner_id, id).await?)
    }

    async fn count_unread_notifications(&self, owner_id: Uuid) -> StoreResult<i64> {
        Ok(Notification::count_unread(&self.pool, owner_id).await?)
    }
}
