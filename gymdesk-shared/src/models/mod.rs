/// Database models for GymDesk
///
/// This module contains the records and their PostgreSQL operations. Tenant data
/// (members, trainers, notifications) is always read and written with an explicit
/// owner id.
///
/// # Models
///
/// - `owner`: Gym owner accounts (the tenant)
/// - `member`: Gym customers with a time-bounded membership
/// - `trainer`: Trainers a member may be assigned to
/// - `notification`: Owner notifications raised by enrollments
///
/// # Example
///
/// ```no_run
/// use gymdesk_shared::models::member::{Member, MemberFilter};
/// use gymdesk_shared::db::pool::{create_pool, PoolSettings};
///
/// # async fn example(owner_id: uuid::Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(&PoolSettings::new("postgresql://localhost/gymdesk")).await?;
///
/// let roster = Member::find(&pool, owner_id, &MemberFilter::all()).await?;
/// # Ok(())
/// # }
/// ```

pub mod member;
pub mod notification;
pub mod owner;
pub mod trainer;

use std::cmp::Ordering;

/// Builds an ILIKE pattern matching `query` as a literal substring
pub(crate) fn like_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Email equality as enforced by the `lower(email)` unique indexes
pub(crate) fn same_email(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

/// Sort key for name ordering
///
/// Matches `ORDER BY lower(name) COLLATE "C", name COLLATE "C"` in the SQL
/// queries: Unicode lowercase first, then code point order.
pub(crate) fn name_order(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_email_folds_unicode_case() {
        assert!(same_email("Ana@Example.com", "ana@example.com"));
        assert!(same_email("ÉLODIE@gym.example", "élodie@gym.example"));
        assert!(!same_email("ana@example.com", "ana@example.org"));
    }

    #[test]
    fn test_name_order_ignores_case() {
        let mut names = vec!["bo", "Ana", "Émile", "Cleo", "ana"];
        names.sort_by(|a, b| name_order(a, b));
        assert_eq!(names, vec!["Ana", "ana", "bo", "Cleo", "Émile"]);
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("ana"), "%ana%");
        assert_eq!(like_pattern("50%_off\\"), "%50\\%\\_off\\\\%");
    }
}
