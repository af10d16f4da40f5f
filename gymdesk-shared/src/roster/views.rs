/// Read models returned by the roster service
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::lifecycle::status::{days_remaining, listing_status};
use crate::lifecycle::{classify_membership, ListingStatus, MembershipStatus};
use crate::models::member::{Member, MembershipCounts};
use crate::models::notification::Notification;
use crate::models::trainer::Trainer;

/// Member with the binary listing status
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberListing {
    #[serde(flatten)]
    pub member: Member,
    pub status: ListingStatus,
    pub days_remaining: i64,
}

impl MemberListing {
    pub fn new(member: Member, now: DateTime<Utc>) -> Self {
        Self {
            status: listing_status(member.membership_end, now),
            days_remaining: days_remaining(member.membership_end, now),
            member,
        }
    }
}

/// Member detail with the three-tier status and the resolved trainer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberView {
    #[serde(flatten)]
    pub member: Member,
    pub status: MembershipStatus,
    pub days_left: i64,

    /// Absent when no trainer is assigned or the reference is dangling
    pub trainer: Option<Trainer>,
}

impl MemberView {
    pub fn new(member: Member, trainer: Option<Trainer>, now: DateTime<Utc>) -> Self {
        let report = classify_membership(member.membership_end, now);
        Self {
            member,
            status: report.status,
            days_left: report.days_left,
            trainer,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SearchKind {
    Member,
    Trainer,
}

/// One search result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,

    #[serde(rename = "type")]
    pub kind: SearchKind,

    /// Members only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ListingStatus>,

    /// Trainers only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,

    /// API path of the record
    pub url: String,
}

impl SearchHit {
    pub fn member(member: &Member, now: DateTime<Utc>) -> Self {
        Self {
            id: member.id,
            name: member.details.name.clone(),
            email: member.details.email.clone(),
            phone: member.details.phone.clone(),
            kind: SearchKind::Member,
            status: Some(listing_status(member.membership_end, now)),
            specialization: None,
            url: format!("/v1/members/{}", member.id),
        }
    }

    pub fn trainer(trainer: &Trainer) -> Self {
        Self {
            id: trainer.id,
            name: trainer.details.name.clone(),
            email: trainer.details.email.clone(),
            phone: trainer.details.phone.clone(),
            kind: SearchKind::Trainer,
            status: None,
            specialization: trainer.details.specialization.clone(),
            url: format!("/v1/trainers/{}", trainer.id),
        }
    }
}

/// Dashboard summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub counts: MembershipCounts,

    /// Most recently joined first
    pub recent_members: Vec<MemberListing>,

    /// Unread, newest first
    pub notifications: Vec<Notification>,
}
