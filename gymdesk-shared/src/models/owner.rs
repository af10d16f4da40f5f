/// Gym owner model and database operations
///
/// A gym owner is the tenant: every member, trainer, and notification row carries
/// the owner's id, and all of those reads and writes are filtered by it.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE gym_owners (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     gym_name VARCHAR(255) NOT NULL,
///     email VARCHAR(255) NOT NULL,
///     password_hash VARCHAR(255) NOT NULL,
///     photo_url VARCHAR(512),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
///
/// CREATE UNIQUE INDEX gym_owners_email_key ON gym_owners (lower(email));
/// ```
///
/// # Example
///
/// ```no_run
/// use gymdesk_shared::models::owner::{CreateOwner, GymOwner};
/// use gymdesk_shared::db::pool::{create_pool, PoolSettings};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(&PoolSettings::new("postgresql://localhost/gymdesk")).await?;
///
/// let owner = GymOwner::create(&pool, CreateOwner {
///     name: "Dana Reyes".to_string(),
///     gym_name: "Iron Works".to_string(),
///     email: "dana@ironworks.example".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     photo_url: None,
/// }).await?;
///
/// let found = GymOwner::find_by_email(&pool, "dana@ironworks.example").await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Gym name shown when an owner never set one
pub const DEFAULT_GYM_NAME: &str = "My Gym";

/// Gym owner account
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct GymOwner {
    /// Unique owner ID (UUID v4)
    pub id: Uuid,

    /// Owner's display name
    pub name: String,

    /// Name of the gym
    pub gym_name: String,

    /// Login email (unique across owners, case-insensitive)
    pub email: String,

    /// Argon2id password hash
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Profile photo reference
    pub photo_url: Option<String>,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

impl GymOwner {
    /// Display name, falling back to the gym name when blank
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            self.display_gym_name()
        } else {
            &self.name
        }
    }

    /// Gym name, falling back to "My Gym" when blank
    pub fn display_gym_name(&self) -> &str {
        if self.gym_name.trim().is_empty() {
            DEFAULT_GYM_NAME
        } else {
            &self.gym_name
        }
    }
}

/// Input for creating a gym owner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOwner {
    pub name: String,
    pub gym_name: String,
    pub email: String,
    /// Argon2id hash, never the plaintext password
    pub password_hash: String,
    pub photo_url: Option<String>,
}

/// Partial update for a gym owner
///
/// Only `Some` fields are written.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateOwner {
    pub name: Option<String>,
    pub gym_name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub photo_url: Option<String>,
}

impl UpdateOwner {
    /// True when no field would change
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.gym_name.is_none()
            && self.email.is_none()
            && self.password_hash.is_none()
            && self.photo_url.is_none()
    }

    /// Applies the set fields to an in-memory owner
    pub fn apply(&self, owner: &mut GymOwner) {
        if let Some(name) = &self.name {
            owner.name = name.clone();
        }
        if let Some(gym_name) = &self.gym_name {
            owner.gym_name = gym_name.clone();
        }
        if let Some(email) = &self.email {
            owner.email = email.clone();
        }
        if let Some(password_hash) = &self.password_hash {
            owner.password_hash = password_hash.clone();
        }
        if let Some(photo_url) = &self.photo_url {
            owner.photo_url = Some(photo_url.clone());
        }
    }
}

impl GymOwner {
    /// Creates a new owner
    ///
    /// # Errors
    ///
    /// Returns an error if the email is already registered (unique index
    /// `gym_owners_email_key`) or the database is unreachable.
    pub async fn create(pool: &PgPool, data: CreateOwner) -> Result<Self, sqlx::Error> {
        let owner = sqlx::query_as::<_, GymOwner>(
            r#"
            INSERT INTO gym_owners (name, gym_name, email, password_hash, photo_url)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, gym_name, email, password_hash, photo_url, created_at
            "#,
        )
        .bind(data.name)
        .bind(data.gym_name)
        .bind(data.email)
        .bind(data.password_hash)
        .bind(data.photo_url)
        .fetch_one(pool)
        .await?;

        Ok(owner)
    }

    /// Finds an owner by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let owner = sqlx::query_as::<_, GymOwner>(
            r#"
            SELECT id, name, gym_name, email, password_hash, photo_url, created_at
            FROM gym_owners
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(owner)
    }

    /// Finds an owner by login email (case-insensitive)
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let owner = sqlx::query_as::<_, GymOwner>(
            r#"
            SELECT id, name, gym_name, email, password_hash, photo_url, created_at
            FROM gym_owners
            WHERE lower(email) = lower($1)
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(owner)
    }

    /// Applies a partial update
    ///
    /// # Returns
    ///
    /// The updated owner, or None if the owner doesn't exist
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateOwner,
    ) -> Result<Option<Self>, sqlx::Error> {
        let owner = sqlx::query_as::<_, GymOwner>(
            r#"
            UPDATE gym_owners
            SET name = COALESCE($2, name),
                gym_name = COALESCE($3, gym_name),
                email = COALESCE($4, email),
                password_hash = COALESCE($5, password_hash),
                photo_url = COALESCE($6, photo_url)
            WHERE id = $1
            RETURNING id, name, gym_name, email, password_hash, photo_url, created_at
            "#,
        )
        .bind(id)
        .bind(data.name)
        .bind(data.gym_name)
        .bind(data.email)
        .bind(data.password_hash)
        .bind(data.photo_url)
        .fetch_optional(pool)
        .await?;

        Ok(owner)
    }
}
