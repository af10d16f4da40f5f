/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use gymdesk_api::{app::{build_router, AppState}, config::Config};
/// use gymdesk_shared::db::pool::{create_pool, PoolSettings};
/// use gymdesk_shared::store::PgStore;
/// use std::sync::Arc;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(&PoolSettings::new(config.database.url.clone())).await?;
/// let state = AppState::new(Arc::new(PgStore::new(pool)), config);
/// let app = build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, error::ApiError, middleware::security::SecurityHeadersLayer};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::{self, Next},
    response::Response,
    routing::{get, post, put},
    Router,
};
use gymdesk_shared::auth::middleware::authenticate;
use gymdesk_shared::roster::RosterService;
use gymdesk_shared::store::GymStore;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned into each handler by the `State` extractor; every field is an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Persistence gateway, used directly for owner accounts
    pub store: Arc<dyn GymStore>,

    /// Member, trainer, and notification operations over the same store
    pub roster: RosterService,

    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Arc<dyn GymStore>, config: Config) -> Self {
        Self {
            roster: RosterService::new(store.clone()),
            store,
            config: Arc::new(config),
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete router
///
/// ```text
/// /
/// ├── GET  /health
/// └── /v1/
///     ├── /auth/                      (public)
///     │   ├── POST /signup
///     │   ├── POST /login
///     │   └── POST /refresh
///     └── (Bearer access token)
///         ├── GET|PUT /profile
///         ├── PUT     /settings
///         ├── GET     /dashboard
///         ├── GET|POST /members
///         ├── GET|PUT  /members/:id
///         ├── POST     /members/:id/renew
///         ├── GET|POST /trainers
///         ├── GET|PUT  /trainers/:id
///         ├── GET      /notifications
///         ├── POST     /notifications/:id/read
///         ├── GET      /notifications/unread/count
///         ├── GET      /search?query=
///         ├── POST     /lifecycle/status
///         └── POST     /lifecycle/renewal
/// ```
///
/// Layers, outermost first: security headers, CORS, request tracing.
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let auth_routes = Router::new()
        .route("/signup", post(routes::auth::signup))
        .route("/login", post(routes::auth::login))
        .route("/refresh", post(routes::auth::refresh));

    let protected_routes = Router::new()
        .route(
            "/profile",
            get(routes::owner::get_profile).put(routes::owner::update_profile),
        )
        .route("/settings", put(routes::owner::update_settings))
        .route("/dashboard", get(routes::dashboard::dashboard))
        .route(
            "/members",
            get(routes::members::list_members).post(routes::members::create_member),
        )
        .route(
            "/members/:id",
            get(routes::members::get_member).put(routes::members::update_member),
        )
        .route("/members/:id/renew", post(routes::members::renew_member))
        .route(
            "/trainers",
            get(routes::trainers::list_trainers).post(routes::trainers::create_trainer),
        )
        .route(
            "/trainers/:id",
            get(routes::trainers::get_trainer).put(routes::trainers::update_trainer),
        )
        .route("/notifications", get(routes::notifications::list_notifications))
        .route(
            "/notifications/unread/count",
            get(routes::notifications::unread_count),
        )
        .route(
            "/notifications/:id/read",
            post(routes::notifications::mark_read),
        )
        .route("/search", get(routes::search::search))
        .route("/lifecycle/status", post(routes::lifecycle::status))
        .route("/lifecycle/renewal", post(routes::lifecycle::renewal))
        .layer(middleware::from_fn_with_state(state.clone(), jwt_auth_layer));

    let v1_routes = Router::new()
        .nest("/auth", auth_routes)
        .merge(protected_routes);

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state.config))
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.allows_any_origin() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}

/// Validates the bearer access token and injects `AuthContext`
async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth = authenticate(req.headers(), state.jwt_secret())?;
    req.extensions_mut().insert(auth);
    Ok(next.run(req).await)
}
