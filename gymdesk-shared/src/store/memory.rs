/// In-memory store for tests and local development
///
/// Enforces the same email uniqueness rules as the PostgreSQL indexes
/// (owners globally, members and trainers per owner, Unicode case-insensitive)
/// and applies filters and name ordering with the same semantics as the SQL
/// queries.
///
/// Data is lost when the store is dropped.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{GymStore, StoreError, StoreResult};
use crate::models::member::{
    Member, MemberFilter, MemberOrder, MemberPatch, MembershipCounts, NewMember,
};
use crate::models::notification::{NewNotification, Notification, NotificationFilter};
use crate::models::owner::{CreateOwner, GymOwner, UpdateOwner};
use crate::models::{name_order, same_email};
use crate::models::trainer::{Trainer, TrainerDetails, TrainerFilter};

#[derive(Default)]
struct Tables {
    owners: HashMap<Uuid, GymOwner>,
    members: HashMap<Uuid, Member>,
    trainers: HashMap<Uuid, Trainer>,
    notifications: HashMap<Uuid, Notification>,
}

/// Store holding every table in process memory
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of members across all owners
    pub async fn member_count(&self) -> usize {
        self.tables.read().await.members.len()
    }

    /// Number of notifications across all owners
    pub async fn notification_count(&self) -> usize {
        self.tables.read().await.notifications.len()
    }
}

fn conflict(constraint: &str) -> StoreError {
    StoreError::Conflict {
        constraint: constraint.to_string(),
    }
}

fn truncate<T>(mut rows: Vec<T>, limit: Option<i64>) -> Vec<T> {
    if let Some(limit) = limit {
        rows.truncate(usize::try_from(limit.max(0)).unwrap_or(usize::MAX));
    }
    rows
}

impl Tables {
    fn owner_email_taken(&self, email: &str, except: Option<Uuid>) -> bool {
        self.owners
            .values()
            .any(|o| Some(o.id) != except && same_email(&o.email, email))
    }

    fn member_email_taken(&self, owner_id: Uuid, email: &str, except: Option<Uuid>) -> bool {
        self.members.values().any(|m| {
            m.owner_id == owner_id && Some(m.id) != except && same_email(&m.details.email, email)
        })
    }

    fn trainer_email_taken(&self, owner_id: Uuid, email: &str, except: Option<Uuid>) -> bool {
        self.trainers.values().any(|t| {
            t.owner_id == owner_id && Some(t.id) != except && same_email(&t.details.email, email)
        })
    }

    fn insert_member(&mut self, owner_id: Uuid, data: NewMember) -> StoreResult<Member> {
        if self.member_email_taken(owner_id, &data.details.email, None) {
            return Err(conflict("members_owner_email_key"));
        }

        let member = Member {
            id: Uuid::new_v4(),
            owner_id,
            details: data.details,
            join_date: data.join_date,
            membership_end: data.membership_end,
            photo_url: data.photo_url,
            updated_at: None,
        };
        self.members.insert(member.id, member.clone());
        Ok(member)
    }

    fn insert_notification(&mut self, owner_id: Uuid, data: NewNotification) -> Notification {
        let notification = Notification {
            id: Uuid::new_v4(),
            owner_id,
            message: data.message,
            created_at: data.created_at,
            is_read: false,
        };
        self.notifications.insert(notification.id, notification.clone());
        notification
    }
}

#[async_trait]
impl GymStore for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn insert_owner(&self, data: CreateOwner) -> StoreResult<GymOwner> {
        let mut tables = self.tables.write().await;
        if tables.owner_email_taken(&data.email, None) {
            return Err(conflict("gym_owners_email_key"));
        }

        let owner = GymOwner {
            id: Uuid::new_v4(),
            name: data.name,
            gym_name: data.gym_name,
            email: data.email,
            password_hash: data.password_hash,
            photo_url: data.photo_url,
            created_at: Utc::now(),
        };
        tables.owners.insert(owner.id, owner.clone());
        Ok(owner)
    }

    async fn find_owner(&self, id: Uuid) -> StoreResult<Option<GymOwner>> {
        Ok(self.tables.read().await.owners.get(&id).cloned())
    }

    async fn find_owner_by_email(&self, email: &str) -> StoreResult<Option<GymOwner>> {
        let tables = self.tables.read().await;
        Ok(tables
            .owners
            .values()
            .find(|o| same_email(&o.email, email))
            .cloned())
    }

    async fn update_owner(&self, id: Uuid, data: UpdateOwner) -> StoreResult<Option<GymOwner>> {
        let mut tables = self.tables.write().await;
        if let Some(email) = &data.email {
            if tables.owner_email_taken(email, Some(id)) {
                return Err(conflict("gym_owners_email_key"));
            }
        }

        Ok(tables.owners.get_mut(&id).map(|owner| {
            data.apply(owner);
            owner.clone()
        }))
    }

    async fn insert_member(&self, owner_id: Uuid, data: NewMember) -> StoreResult<Member> {
        self.tables.write().await.insert_member(owner_id, data)
    }

    async fn enroll_member(
        &self,
        owner_id: Uuid,
        member: NewMember,
        notification: NewNotification,
    ) -> StoreResult<(Member, Notification)> {
        let mut tables = self.tables.write().await;
        let member = tables.insert_member(owner_id, member)?;
        let notification = tables.insert_notification(owner_id, notification);
        Ok((member, notification))
    }

    async fn find_member(&self, owner_id: Uuid, id: Uuid) -> StoreResult<Option<Member>> {
        let tables = self.tables.read().await;
        Ok(tables
            .members
            .get(&id)
            .filter(|m| m.owner_id == owner_id)
            .cloned())
    }

    async fn find_members(&self, owner_id: Uuid, filter: &MemberFilter) -> StoreResult<Vec<Member>> {
        let tables = self.tables.read().await;
        let mut members: Vec<Member> = tables
            .members
            .values()
            .filter(|m| m.owner_id == owner_id && filter.matches(m))
            .cloned()
            .collect();

        match filter.order {
            MemberOrder::Name => members.sort_by(|a, b| {
                name_order(&a.details.name, &b.details.name)
                    .then(b.join_date.cmp(&a.join_date))
            }),
            MemberOrder::RecentlyJoined => members.sort_by(|a, b| b.join_date.cmp(&a.join_date)),
        }

        Ok(truncate(members, filter.limit))
    }

    async fn update_member(
        &self,
        owner_id: Uuid,
        id: Uuid,
        patch: MemberPatch,
    ) -> StoreResult<Option<Member>> {
        let mut tables = self.tables.write().await;
        if let Some(details) = &patch.details {
            if tables.member_email_taken(owner_id, &details.email, Some(id)) {
                return Err(conflict("members_owner_email_key"));
            }
        }

        Ok(tables
            .members
            .get_mut(&id)
            .filter(|m| m.owner_id == owner_id)
            .map(|member| {
                patch.apply(member);
                member.clone()
            }))
    }

    async fn membership_counts(
        &self,
        owner_id: Uuid,
        now: DateTime<Utc>,
    ) -> StoreResult<MembershipCounts> {
        let tables = self.tables.read().await;
        Ok(MembershipCounts::tally(
            tables.members.values().filter(|m| m.owner_id == owner_id),
            now,
        ))
    }

    async fn insert_trainer(&self, owner_id: Uuid, data: TrainerDetails) -> StoreResult<Trainer> {
        let mut tables = self.tables.write().await;
        if tables.trainer_email_taken(owner_id, &data.email, None) {
            return Err(conflict("trainers_owner_email_key"));
        }

        let trainer = Trainer {
            id: Uuid::new_v4(),
            owner_id,
            details: data,
            created_at: Utc::now(),
        };
        tables.trainers.insert(trainer.id, trainer.clone());
        Ok(trainer)
    }

    async fn find_trainer(&self, owner_id: Uuid, id: Uuid) -> StoreResult<Option<Trainer>> {
        let tables = self.tables.read().await;
        Ok(tables
            .trainers
            .get(&id)
            .filter(|t| t.owner_id == owner_id)
            .cloned())
    }

    async fn find_trainers(
        &self,
        owner_id: Uuid,
        filter: &TrainerFilter,
    ) -> StoreResult<Vec<Trainer>> {
        let tables = self.tables.read().await;
        let mut trainers: Vec<Trainer> = tables
            .trainers
            .values()
            .filter(|t| t.owner_id == owner_id && filter.matches(t))
            .cloned()
            .collect();
        trainers.sort_by(|a, b| name_order(&a.details.name, &b.details.name));

        Ok(truncate(trainers, filter.limit))
    }

    async fn update_trainer(
        &self,
        owner_id: Uuid,
        id: Uuid,
        data: TrainerDetails,
    ) -> StoreResult<Option<Trainer>> {
        let mut tables = self.tables.write().await;
        if tables.trainer_email_taken(owner_id, &data.email, Some(id)) {
            return Err(conflict("trainers_owner_email_key"));
        }

        Ok(tables
            .trainers
            .get_mut(&id)
            .filter(|t| t.owner_id == owner_id)
            .map(|trainer| {
                trainer.details = data;
                trainer.clone()
            }))
    }

    async fn insert_notification(
        &self,
        owner_id: Uuid,
        data: NewNotification,
    ) -> StoreResult<Notification> {
        Ok(self.tables.write().await.insert_notification(owner_id, data))
    }

    async fn find_notifications(
        &self,
        owner_id: Uuid,
        filter: NotificationFilter,
    ) -> StoreResult<Vec<Notification>> {
        let tables = self.tables.read().await;
        let mut notifications: Vec<Notification> = tables
            .notifications
            .values()
            .filter(|n| n.owner_id == owner_id && filter.matches(n))
            .cloned()
            .collect();
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(notifications)
    }

    async fn mark_notification_read(&self, owner_id: Uuid, id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        match tables.notifications.get_mut(&id) {
            Some(n) if n.owner_id == owner_id => {
                n.is_read = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn count_unread_notifications(&self, owner_id: Uuid) -> StoreResult<i64> {
        let tables = self.tables.read().await;
        let count = tables
            .notifications
            .values()
            .filter(|n| n.owner_id == owner_id && !n.is_read)
            .count();
        Ok(count as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::member::{EmergencyContact, HealthInfo, MemberDetails};
    use chrono::Duration;

    fn owner_data(email: &str) -> CreateOwner {
        CreateOwner {
            name: "Dana".to_string(),
            gym_name: "Iron Works".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            photo_url: None,
        }
    }

    fn new_member(name: &str, email: &str, joined: DateTime<Utc>) -> NewMember {
        NewMember {
            details: MemberDetails {
                name: name.to_string(),
                email: email.to_string(),
                phone: "555".to_string(),
                address: "x".to_string(),
                needs_pt: false,
                trainer_id: None,
                pt_sessions: None,
                health_info: HealthInfo::default(),
                emergency_contact: EmergencyContact {
                    name: "Sam".to_string(),
                    phone: "1".to_string(),
                },
            },
            join_date: joined,
            membership_end: joined + Duration::days(30),
            photo_url: None,
        }
    }

    #[tokio::test]
    async fn test_owner_email_is_unique_case_insensitive() {
        let store = MemoryStore::new();
        store.insert_owner(owner_data("dana@example.com")).await.unwrap();
        let err = store
            .insert_owner(owner_data("DANA@example.com"))
            .await
            .unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_members_are_partitioned_by_owner() {
        let store = MemoryStore::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let now = Utc::now();

        let member = store.insert_member(a, new_member("Ana", "ana@x", now)).await.unwrap();
        // Same email is fine under a different owner
        store.insert_member(b, new_member("Ana", "ana@x", now)).await.unwrap();

        assert!(store.find_member(b, member.id).await.unwrap().is_none());
        assert_eq!(store.find_members(a, &MemberFilter::all()).await.unwrap().len(), 1);

        let patch = MemberPatch {
            details: None,
            membership_end: Some(now),
            photo_url: None,
            updated_at: now,
        };
        assert!(store.update_member(b, member.id, patch).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_member_ordering_and_limit() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let now = Utc::now();
        store.insert_member(owner, new_member("Cleo", "c@x", now - Duration::days(1))).await.unwrap();
        store.insert_member(owner, new_member("Ana", "a@x", now - Duration::days(5))).await.unwrap();
        store.insert_member(owner, new_member("Bo", "b@x", now)).await.unwrap();

        let by_name = store.find_members(owner, &MemberFilter::all()).await.unwrap();
        let names: Vec<_> = by_name.iter().map(|m| m.details.name.as_str()).collect();
        assert_eq!(names, ["Ana", "Bo", "Cleo"]);

        let recent = store
            .find_members(owner, &MemberFilter::recently_joined().limit(2))
            .await
            .unwrap();
        let names: Vec<_> = recent.iter().map(|m| m.details.name.as_str()).collect();
        assert_eq!(names, ["Bo", "Cleo"]);
    }

    #[tokio::test]
    async fn test_enroll_member_writes_both_or_neither() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let now = Utc::now();

        let (member, notification) = store
            .enroll_member(owner, new_member("Ana", "ana@x", now), NewNotification::member_added("Ana", now))
            .await
            .unwrap();
        assert_eq!(notification.owner_id, member.owner_id);

        let err = store
            .enroll_member(owner, new_member("Ana", "ANA@x", now), NewNotification::member_added("Ana", now))
            .await
            .unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(store.member_count().await, 1);
        assert_eq!(store.notification_count().await, 1);
    }

    #[tokio::test]
    async fn test_member_email_uniqueness_folds_unicode() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let now = Utc::now();
        store.insert_member(owner, new_member("Øyvind", "øyvind@x", now)).await.unwrap();

        let err = store
            .insert_member(owner, new_member("Øyvind", "ØYVIND@x", now))
            .await
            .unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_mark_read_is_owner_scoped() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let n = store
            .insert_notification(owner, NewNotification::member_added("Ana", Utc::now()))
            .await
            .unwrap();

        assert!(!store.mark_notification_read(Uuid::new_v4(), n.id).await.unwrap());
        assert_eq!(store.count_unread_notifications(owner).await.unwrap(), 1);

        assert!(store.mark_notification_read(owner, n.id).await.unwrap());
        assert_eq!(store.count_unread_notifications(owner).await.unwrap(), 0);
    }
}
