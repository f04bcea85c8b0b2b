use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use auth::PasswordHasher;
use auth::TokenIssuer;
use identity_service::config::Config;
use identity_service::domain::identity::service::IdentityService;
use identity_service::inbound::http::router::create_router;
use identity_service::outbound::repositories::PostgresIdentityRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "identity_service=debug,auth=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "identity-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        hash_max_concurrency = config.hashing.max_concurrency,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(Duration::from_secs(config.database.connect_timeout_seconds))
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let password_hasher =
        PasswordHasher::new(config.hashing.cost(), config.credentials.max_secret_length)?;
    let token_issuer = TokenIssuer::new(
        config.token.signing_key.as_bytes(),
        &config.token.issuer,
        config.token.ttl()?,
    );

    let hash_cost = password_hasher.cost();
    tracing::info!(
        hash_memory_kib = hash_cost.memory_kib,
        hash_iterations = hash_cost.iterations,
        hash_parallelism = hash_cost.parallelism,
        token_ttl_seconds = token_issuer.ttl().num_seconds(),
        "Credential settings applied"
    );
    let authenticator = Arc::new(Authenticator::new(password_hasher, token_issuer)?);

    let identity_repository = Arc::new(PostgresIdentityRepository::new(pg_pool));
    let identity_service = Arc::new(IdentityService::new(
        identity_repository,
        authenticator,
        config.credentials.policy(),
        config.hashing.max_concurrency,
    ));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    axum::serve(http_listener, create_router(identity_service)).await?;

    tracing::info!("Server exited successfully");

    Ok(())
}
