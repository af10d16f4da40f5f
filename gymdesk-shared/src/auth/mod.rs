/// Authentication utilities for gym owners
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing
/// - [`jwt`]: access and refresh tokens carrying the owner id
/// - [`middleware`]: Axum middleware and the `AuthContext` extractor
///
/// # Example
///
/// ```no_run
/// use gymdesk_shared::auth::password::{hash_password, verify_password};
/// use gymdesk_shared::auth::jwt::issue_token_pair;
///
/// # fn example(owner_id: uuid::Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("front-desk-2025")?;
/// assert!(verify_password("front-desk-2025", &hash)?);
///
/// let tokens = issue_token_pair(owner_id, "a-secret-key-that-is-at-least-32-bytes")?;
/// # Ok(())
/// # }
/// ```

pub mod jwt;
pub mod middleware;
pub mod password;
