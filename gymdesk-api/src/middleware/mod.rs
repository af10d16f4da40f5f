/// Middleware for the API server
///
/// - `security`: security response headers
///
/// JWT authentication lives in `gymdesk_shared::auth::middleware` and is
/// wired into the router by `app::jwt_auth_layer`.

pub mod security;
