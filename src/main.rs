use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

use movies_api::auth::password;
use movies_api::config::{self, AppConfig};
use movies_api::handlers;
use movies_api::middleware::jwt_auth_middleware;
use movies_api::models::NewUser;
use movies_api::state::AppState;
use movies_api::store::{MemoryMovieStore, MemoryUserStore, PgStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = config::config();

    let state = build_state(config).await?;
    seed_users(&state, config).await?;

    let app = app(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "movies API listening");

    axum::serve(listener, app).await?;
    Ok(())
}

fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(handlers::home::root))
        .route("/health", get(handlers::home::health))
        .merge(movie_routes())
        .merge(auth_routes())
        .merge(file_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn movie_routes() -> Router<AppState> {
    use handlers::movies;

    Router::new()
        .route("/movies", get(movies::list).post(movies::create))
        // Static segment must be registered alongside the :id matcher
        .route("/movies/by_category", get(movies::search))
        .route(
            "/movies/:id",
            get(movies::get).put(movies::update).delete(movies::delete),
        )
}

fn auth_routes() -> Router<AppState> {
    use handlers::auth;

    let protected = Router::new()
        .route("/auth/profile", get(auth::profile))
        .route("/auth/dashboard", get(auth::dashboard))
        .route_layer(axum::middleware::from_fn(jwt_auth_middleware));

    Router::new()
        .route("/auth/token", post(auth::token))
        .merge(protected)
}

fn file_routes() -> Router<AppState> {
    Router::new().route("/files/sample", get(handlers::files::sample))
}

/// Pick the store implementation: Postgres when DATABASE_URL is set,
/// otherwise the in-memory variant.
async fn build_state(config: &AppConfig) -> anyhow::Result<AppState> {
    match &config.database.url {
        Some(url) => {
            let store = Arc::new(PgStore::connect(url, config.database.max_connections).await?);
            Ok(AppState {
                movies: store.clone(),
                users: store,
            })
        }
        None => {
            tracing::info!("DATABASE_URL not set, using in-memory store");
            Ok(AppState {
                movies: Arc::new(MemoryMovieStore::new()),
                users: Arc::new(MemoryUserStore::new()),
            })
        }
    }
}

/// Create the demo users when they are missing from the store.
async fn seed_users(state: &AppState, config: &AppConfig) -> anyhow::Result<()> {
    let seeds = [
        ("reich", &config.security.seed_admin_password, "admin"),
        ("will", &config.security.seed_user_password, "user"),
    ];

    for (username, secret, role) in seeds {
        if state.users.find_by_username(username).await?.is_none() {
            let password_hash = password::hash_password(secret)
                .map_err(|e| anyhow::anyhow!("failed to hash seed password: {}", e))?;
            state
                .users
                .insert(NewUser {
                    username: username.to_string(),
                    password_hash,
                    role: role.to_string(),
                })
                .await?;
            tracing::info!(username, role, "seeded user");
        }
    }
    Ok(())
}
