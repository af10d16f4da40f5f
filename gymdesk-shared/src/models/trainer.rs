/// Trainer model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE trainers (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     owner_id UUID NOT NULL REFERENCES gym_owners(id) ON DELETE CASCADE,
///     name VARCHAR(255) NOT NULL,
///     email VARCHAR(255) NOT NULL,
///     phone VARCHAR(64) NOT NULL,
///     specialization VARCHAR(255),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
///
/// CREATE UNIQUE INDEX trainers_owner_email_key ON trainers (owner_id, lower(email));
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::{like_pattern, same_email};

const TRAINER_COLUMNS: &str = "id, owner_id, name, email, phone, specialization, created_at";

/// Editable trainer fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TrainerDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub specialization: Option<String>,
}

/// Trainer record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Trainer {
    pub id: Uuid,

    /// Owning gym
    pub owner_id: Uuid,

    #[sqlx(flatten)]
    #[serde(flatten)]
    pub details: TrainerDetails,

    pub created_at: DateTime<Utc>,
}

/// Filter for trainer queries, always sorted by name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrainerFilter {
    /// Exact email (case-insensitive)
    pub email: Option<String>,

    /// Skip this trainer id (self-exclusion on edit)
    pub exclude_id: Option<Uuid>,

    /// Case-insensitive substring of name, email, phone, or specialization
    pub search: Option<String>,

    pub limit: Option<i64>,
}

impl TrainerFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            ..Default::default()
        }
    }

    pub fn search(query: impl Into<String>) -> Self {
        Self {
            search: Some(query.into()),
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
    pub fn matches(&self, trainer: &Trainer) -> bool {
        if let Some(email) = &self.email {
            if !same_email(&trainer.details.email, email) {
                return false;
            }
        }
        if self.exclude_id == Some(trainer.id) {
            return false;
        }
        if let Some(query) = &self.search {
            let needle = query.to_lowercase();
            let details = &trainer.details;
            let specialization = details.specialization.as_deref().unwrap_or_default();
            let hit = [
                details.name.as_str(),
                details.email.as_str(),
                details.phone.as_str(),
                specialization,
            ]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }
        true
    }
}

impl Trainer {
    /// Inserts a trainer for `owner_id`
    ///
    /// # Errors
    ///
    /// Returns an error if the email is already used by another trainer of the
    /// same owner (`trainers_owner_email_key`) or the database is unreachable.
    pub async fn create(
        pool: &PgPool,
        owner_id: Uuid,
        data: TrainerDetails,
    ) -> Result<Self, sqlx::Error> {
        let sql = format!(
            r#"
            INSERT INTO trainers (owner_id, name, email, phone, specialization)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {TRAINER_COLUMNS}
            "#
        );

        let trainer = sqlx::query_as::<_, Trainer>(&sql)
            .bind(owner_id)
            .bind(data.name)
            .bind(data.email)
            .bind(data.phone)
            .bind(data.specialization)
            .fetch_one(pool)
            .await?;

        Ok(trainer)
    }

    pub async fn find_by_id(
        pool: &PgPool,
        owner_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!("SELECT {TRAINER_COLUMNS} FROM trainers WHERE owner_id = $1 AND id = $2");

        let trainer = sqlx::query_as::<_, Trainer>(&sql)
            .bind(owner_id)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(trainer)
    }

    /// Lists trainers of `owner_id` matching `filter`
    pub async fn find(
        pool: &PgPool,
        owner_id: Uuid,
        filter: &TrainerFilter,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let sql = format!(
            r#"
            SELECT {TRAINER_COLUMNS}
            FROM trainers
            WHERE owner_id = $1
              AND ($2::text IS NULL OR lower(email) = lower($2))
              AND ($3::uuid IS NULL OR id <> $3)
              AND ($4::text IS NULL
                   OR name ILIKE $4 OR email ILIKE $4 OR phone ILIKE $4
                   OR specialization ILIKE $4)
            ORDER BY lower(name) COLLATE "C" ASC, name COLLATE "C" ASC
            LIMIT $5
            "#
        );

        let trainers = sqlx::query_as::<_, Trainer>(&sql)
            .bind(owner_id)
            .bind(filter.email.as_deref())
            .bind(filter.exclude_id)
            .bind(filter.search.as_deref().map(like_pattern))
            .bind(filter.limit)
            .fetch_all(pool)
            .await?;

        Ok(trainers)
    }

    /// Replaces the editable fields of one trainer of `owner_id`
    ///
    /// # Returns
    ///
    /// The updated trainer, or None if no such trainer belongs to the owner
    pub async fn update(
        pool: &PgPool,
        owner_id: Uuid,
        id: Uuid,
        data: TrainerDetails,
    ) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!(
            r#"
            UPDATE trainers
            SET name = $3, email = $4, phone = $5, specialization = $6
            WHERE owner_id = $1 AND id = $2
            RETURNING {TRAINER_COLUMNS}
            "#
        );

        let trainer = sqlx::query_as::<_, Trainer>(&sql)
            .bind(owner_id)
            .bind(id)
            .bind(data.name)
            .bind(data.email)
            .bind(data.phone)
            .bind(data.specialization)
            .fetch_optional(pool)
            .await?;

        Ok(trainer)
    }
}
