mod auth;
mod db;
mod error;
mod query;
mod users;
mod validation;

use axum::{
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use auth::{AuthService, CredentialHasher, TokenService};
use users::UserDirectory;
use validation::RequestValidator;

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        auth::handlers::signup_handler,
        auth::handlers::login_handler,
        auth::handlers::refresh_handler,
        users::handlers::list_users_handler,
        users::handlers::get_user_handler,
    ),
    components(
        schemas(
            users::models::User,
            users::models::Role,
            users::models::UserListResponse,
            auth::models::SignupRequest,
            auth::models::LoginRequest,
            auth::models::RefreshRequest,
            auth::models::SignupResponse,
            auth::models::TokenPairResponse,
        )
    ),
    tags(
        (name = "auth", description = "Signup, login, and token refresh"),
        (name = "users", description = "User directory queries")
    ),
    info(
        title = "User Directory API",
        version = "1.0.0",
        description = "Authenticated REST API for user registration and directory queries"
    )
)]
struct ApiDoc;

/// Application state shared across handlers
///
/// Everything in here is constructed once in main and injected; the token
/// service holds the process-wide signing secret, read-only after startup.
#[derive(Clone)]
struct AppState {
    auth: AuthService,
    directory: UserDirectory,
    tokens: Arc<TokenService>,
}

/// Wire every component together from its externally-supplied inputs
fn build_state(db: PgPool, jwt_secret: &str, db_timeout: Duration) -> AppState {
    let tokens = Arc::new(TokenService::new(jwt_secret));
    let directory = UserDirectory::new(db, db_timeout);
    let auth = AuthService::new(
        directory.clone(),
        CredentialHasher::new(),
        Arc::clone(&tokens),
        RequestValidator::new(),
    );

    AppState {
        auth,
        directory,
        tokens,
    }
}

/// Creates and configures the application router
fn create_router(state: AppState) -> Router {
    use tower_http::cors::{Any, CorsLayer};

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/signup", post(auth::handlers::signup_handler))
        .route("/login", post(auth::handlers::login_handler))
        .route("/refresh", post(auth::handlers::refresh_handler))
        .route("/users", get(users::handlers::list_users_handler))
        .route("/users/:user_id", get(users::handlers::get_user_handler))
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("User Directory API - Starting...");

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");
    let jwt_secret = std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in environment");
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "9000".to_string());
    let db_timeout = std::env::var("DB_TIMEOUT_SECS")
        .ok()
        .and_then(|raw| raw.parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(Duration::from_secs(100));

    tracing::info!("Connecting to database...");
    let db_pool = db::create_pool(&database_url)
        .await
        .expect("Failed to create database pool");

    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Migrations completed successfully");

    let state = build_state(db_pool, &jwt_secret, db_timeout);
    let app = create_router(state);

    let addr = format!("{}:{}", host, port);
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("User Directory API is running on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, app).await.expect("Server error");
}

#[cfg(test)]
mod tests;
