/// Roster service
///
/// Ties the lifecycle engine and validators to the store: enrollment, member
/// edits and renewals, trainer management, lookups, search, and the dashboard.
/// Every operation takes the owner id first and never touches another owner's
/// records.
///
/// Callers pass a reference `now` into every time-dependent operation.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use chrono::Utc;
/// use gymdesk_shared::roster::RosterService;
/// use gymdesk_shared::store::MemoryStore;
/// use gymdesk_shared::validation::member::{EmergencyContactForm, MemberForm};
///
/// # async fn example() -> Result<(), gymdesk_shared::roster::RosterError> {
/// let roster = RosterService::new(Arc::new(MemoryStore::new()));
/// let owner_id = uuid::Uuid::new_v4();
///
/// let form = MemberForm {
///     name: "Ana Lima".into(),
///     email: "ana@example.com".into(),
///     phone: "555-0100".into(),
///     address: "1 Main St".into(),
///     emergency_contact: EmergencyContactForm { name: "Sam".into(), phone: "555-0199".into() },
///     ..Default::default()
/// };
///
/// let member = roster.enroll(owner_id, &form, Utc::now()).await?;
/// let view = roster.view_member(owner_id, member.id, Utc::now()).await?;
/// # Ok(())
/// # }
/// ```

pub mod views;

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::lifecycle::renewal::initial_end;
use crate::lifecycle::{renew, LifecycleError, MembershipDuration};
use crate::models::member::{Member, MemberFilter, MemberPatch, NewMember};
use crate::models::notification::{NewNotification, Notification, NotificationFilter};
use crate::models::trainer::{Trainer, TrainerFilter};
use crate::models::name_order;
use crate::store::{GymStore, StoreError};
use crate::validation::{MemberForm, RecordKind, TrainerForm, ValidationError};

pub use views::{Dashboard, MemberListing, MemberView, SearchHit, SearchKind};

/// Maximum members and maximum trainers in one search response
pub const SEARCH_LIMIT_PER_KIND: i64 = 5;

/// Members shown on the dashboard
pub const DASHBOARD_RECENT_MEMBERS: i64 = 10;

/// Roster errors
#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error("Member not found")]
    MemberNotFound(Uuid),

    #[error("Trainer not found")]
    TrainerNotFound(Uuid),
}

pub type RosterResult<T> = Result<T, RosterError>;

/// Maps a unique-index rejection of a write to the duplicate-email error
fn duplicate_on_conflict(kind: RecordKind) -> impl Fn(StoreError) -> RosterError {
    move |err| {
        if err.is_conflict() {
            RosterError::Validation(ValidationError::DuplicateEmail(kind))
        } else {
            RosterError::Store(err)
        }
    }
}

/// Roster operations over a [`GymStore`]
#[derive(Clone)]
pub struct RosterService {
    store: Arc<dyn GymStore>,
}

impl RosterService {
    pub fn new(store: Arc<dyn GymStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn GymStore> {
        &self.store
    }

    async fn ensure_unique_member_email(
        &self,
        owner_id: Uuid,
        email: &str,
        exclude_id: Option<Uuid>,
    ) -> RosterResult<()> {
        let filter = MemberFilter::with_email(email).excluding(exclude_id).limit(1);
        if !self.store.find_members(owner_id, &filter).await?.is_empty() {
            return Err(ValidationError::DuplicateEmail(RecordKind::Member).into());
        }
        Ok(())
    }

    async fn ensure_unique_trainer_email(
        &self,
        owner_id: Uuid,
        email: &str,
        exclude_id: Option<Uuid>,
    ) -> RosterResult<()> {
        let filter = TrainerFilter::with_email(email).excluding(exclude_id).limit(1);
        if !self.store.find_trainers(owner_id, &filter).await?.is_empty() {
            return Err(ValidationError::DuplicateEmail(RecordKind::Trainer).into());
        }
        Ok(())
    }

    async fn existing_member(&self, owner_id: Uuid, id: Uuid) -> RosterResult<Member> {
        self.store
            .find_member(owner_id, id)
            .await?
            .ok_or(RosterError::MemberNotFound(id))
    }

    // Members

    /// Enrolls a new member and raises the "new member" notification
    ///
    /// `join_date` is `now` and the membership ends `duration * 30` days later.
    ///
    /// # Errors
    ///
    /// - `RosterError::Validation` for the first failed form rule, including a
    ///   duplicate email within this owner's members
    /// - `RosterError::Store` if the store is unavailable
    pub async fn enroll(
        &self,
        owner_id: Uuid,
        form: &MemberForm,
        now: DateTime<Utc>,
    ) -> RosterResult<Member> {
        let validated = form.validate()?;
        self.ensure_unique_member_email(owner_id, &validated.details.email, None)
            .await?;

        let notification = NewNotification::member_added(&validated.details.name, now);
        let (member, _) = self
            .store
            .enroll_member(
                owner_id,
                NewMember {
                    details: validated.details,
                    join_date: now,
                    membership_end: initial_end(now, validated.duration),
                    photo_url: validated.photo_url,
                },
                notification,
            )
            .await
            .map_err(duplicate_on_conflict(RecordKind::Member))?;

        info!(
            owner_id = %owner_id,
            member_id = %member.id,
            months = validated.duration.months(),
            "Member enrolled"
        );

        Ok(member)
    }

    /// Edits a member and renews the membership with the submitted duration
    ///
    /// Every enrollment rule applies; the email check excludes the member being
    /// edited. The photo reference is kept unless the form carries a new one.
    pub async fn update_member(
        &self,
        owner_id: Uuid,
        id: Uuid,
        form: &MemberForm,
        now: DateTime<Utc>,
    ) -> RosterResult<Member> {
        let existing = self.existing_member(owner_id, id).await?;

        let validated = form.validate()?;
        self.ensure_unique_member_email(owner_id, &validated.details.email, Some(id))
            .await?;

        let membership_end = renew(existing.membership_end, validated.duration, now);
        let patch = MemberPatch {
            details: Some(validated.details),
            membership_end: Some(membership_end),
            photo_url: validated.photo_url,
            updated_at: now,
        };

        let member = self
            .store
            .update_member(owner_id, id, patch)
            .await
            .map_err(duplicate_on_conflict(RecordKind::Member))?
            .ok_or(RosterError::MemberNotFound(id))?;

        info!(
            owner_id = %owner_id,
            member_id = %id,
            membership_end = %member.membership_end,
            "Member updated"
        );

        Ok(member)
    }

    /// Renews a membership without editing any other field
    pub async fn renew_member(
        &self,
        owner_id: Uuid,
        id: Uuid,
        duration: MembershipDuration,
        now: DateTime<Utc>,
    ) -> RosterResult<Member> {
        let existing = self.existing_member(owner_id, id).await?;
        let membership_end = renew(existing.membership_end, duration, now);

        let patch = MemberPatch {
            details: None,
            membership_end: Some(membership_end),
            photo_url: None,
            updated_at: now,
        };

        let member = self
            .store
            .update_member(owner_id, id, patch)
            .await?
            .ok_or(RosterError::MemberNotFound(id))?;

        info!(
            owner_id = %owner_id,
            member_id = %id,
            months = duration.months(),
            lapsed = existing.membership_end < now,
            "Membership renewed"
        );

        Ok(member)
    }

    /// Member detail with three-tier status and resolved trainer
    pub async fn view_member(
        &self,
        owner_id: Uuid,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> RosterResult<MemberView> {
        let member = self.existing_member(owner_id, id).await?;
        let trainer = self.resolve_trainer(owner_id, &member).await?;
        Ok(MemberView::new(member, trainer, now))
    }

    /// All members, alphabetical, with the binary listing status
    pub async fn list_members(
        &self,
        owner_id: Uuid,
        now: DateTime<Utc>,
    ) -> RosterResult<Vec<MemberListing>> {
        let members = self.store.find_members(owner_id, &MemberFilter::all()).await?;
        Ok(members
            .into_iter()
            .map(|member| MemberListing::new(member, now))
            .collect())
    }

    // Trainers

    pub async fn create_trainer(&self, owner_id: Uuid, form: &TrainerForm) -> RosterResult<Trainer> {
        let details = form.validate()?;
        self.ensure_unique_trainer_email(owner_id, &details.email, None)
            .await?;

        let trainer = self
            .store
            .insert_trainer(owner_id, details)
            .await
            .map_err(duplicate_on_conflict(RecordKind::Trainer))?;

        info!(owner_id = %owner_id, trainer_id = %trainer.id, "Trainer added");
        Ok(trainer)
    }

    pub async fn update_trainer(
        &self,
        owner_id: Uuid,
        id: Uuid,
        form: &TrainerForm,
    ) -> RosterResult<Trainer> {
        if self.store.find_trainer(owner_id, id).await?.is_none() {
            return Err(RosterError::TrainerNotFound(id));
        }

        let details = form.validate()?;
        self.ensure_unique_trainer_email(owner_id, &details.email, Some(id))
            .await?;

        let trainer = self
            .store
            .update_trainer(owner_id, id, details)
            .await
            .map_err(duplicate_on_conflict(RecordKind::Trainer))?
            .ok_or(RosterError::TrainerNotFound(id))?;

        info!(owner_id = %owner_id, trainer_id = %id, "Trainer updated");
        Ok(trainer)
    }

    pub async fn trainer(&self, owner_id: Uuid, id: Uuid) -> RosterResult<Trainer> {
        self.store
            .find_trainer(owner_id, id)
            .await?
            .ok_or(RosterError::TrainerNotFound(id))
    }

    /// All trainers, alphabetical
    pub async fn list_trainers(&self, owner_id: Uuid) -> RosterResult<Vec<Trainer>> {
        Ok(self.store.find_trainers(owner_id, &TrainerFilter::all()).await?)
    }

    async fn lookup_trainer(&self, owner_id: Uuid, trainer_id: Uuid) -> RosterResult<Trainer> {
        self.store
            .find_trainer(owner_id, trainer_id)
            .await?
            .ok_or(RosterError::Lifecycle(LifecycleError::DanglingTrainerReference(
                trainer_id,
            )))
    }

    /// The member's trainer, or `None` when unassigned or dangling
    ///
    /// # Errors
    ///
    /// Only store failures; a missing trainer is not an error.
    pub async fn resolve_trainer(
        &self,
        owner_id: Uuid,
        member: &Member,
    ) -> RosterResult<Option<Trainer>> {
        let Some(trainer_id) = member.details.trainer_id else {
            return Ok(None);
        };

        match self.lookup_trainer(owner_id, trainer_id).await {
            Ok(trainer) => Ok(Some(trainer)),
            Err(RosterError::Lifecycle(err @ LifecycleError::DanglingTrainerReference(_))) => {
                warn!(member_id = %member.id, error = %err, "Treating member as having no trainer");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    // Search and dashboard

    /// Case-insensitive substring search over members and trainers
    ///
    /// A blank query returns nothing. At most five of each kind are returned,
    /// merged and sorted by name.
    pub async fn search(
        &self,
        owner_id: Uuid,
        query: &str,
        now: DateTime<Utc>,
    ) -> RosterResult<Vec<SearchHit>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let members = self
            .store
            .find_members(owner_id, &MemberFilter::search(query).limit(SEARCH_LIMIT_PER_KIND))
            .await?;
        let trainers = self
            .store
            .find_trainers(owner_id, &TrainerFilter::search(query).limit(SEARCH_LIMIT_PER_KIND))
            .await?;

        let mut hits: Vec<SearchHit> = members
            .iter()
            .map(|member| SearchHit::member(member, now))
            .chain(trainers.iter().map(SearchHit::trainer))
            .collect();
        hits.sort_by(|a, b| name_order(&a.name, &b.name));

        debug!(owner_id = %owner_id, hits = hits.len(), "Search completed");
        Ok(hits)
    }

    pub async fn dashboard(&self, owner_id: Uuid, now: DateTime<Utc>) -> RosterResult<Dashboard> {
        let counts = self.store.membership_counts(owner_id, now).await?;
        let recent = self
            .store
            .find_members(
                owner_id,
                &MemberFilter::recently_joined().limit(DASHBOARD_RECENT_MEMBERS),
            )
            .await?;
        let notifications = self
            .store
            .find_notifications(owner_id, NotificationFilter::unread())
            .await?;

        Ok(Dashboard {
            counts,
            recent_members: recent
                .into_iter()
                .map(|member| MemberListing::new(member, now))
                .collect(),
            notifications,
        })
    }

    // Notifications

    /// All notifications, newest first
    pub async fn notifications(&self, owner_id: Uuid) -> RosterResult<Vec<Notification>> {
        Ok(self
            .store
            .find_notifications(owner_id, NotificationFilter::all())
            .await?)
    }

    /// Returns `false` when no such notification belongs to the owner
    pub async fn mark_notification_read(&self, owner_id: Uuid, id: Uuid) -> RosterResult<bool> {
        let marked = self.store.mark_notification_read(owner_id, id).await?;
        debug!(owner_id = %owner_id, notification_id = %id, marked, "Notification acknowledged");
        Ok(marked)
    }

    pub async fn unread_count(&self, owner_id: Uuid) -> RosterResult<i64> {
        Ok(self.store.count_unread_notifications(owner_id).await?)
    }
}
