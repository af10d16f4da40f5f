/// API route handlers, one module per resource
///
/// Every handler under `/v1` except `auth` takes [`AuthContext`] and passes its
/// owner id to the store; nothing reads the owner id from the request itself.
///
/// [`AuthContext`]: gymdesk_shared::auth::middleware::AuthContext

pub mod auth;
pub mod dashboard;
pub mod health;
pub mod lifecycle;
pub mod members;
pub mod notifications;
pub mod owner;
pub mod search;
pub mod trainers;
