use std::sync::Arc;

use auth_api::config::Config;
use auth_api::domain::account::service::AccountService;
use auth_api::inbound::http::router::create_router;
use auth_api::outbound::repositories::PostgresAccountStore;
use credentials::PasswordHasher;
use credentials::TokenSigner;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "auth_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "auth-api",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        database = "postgresql",
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = 5,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let store = Arc::new(PostgresAccountStore::new(pg_pool));
    let hasher = PasswordHasher::new();
    let signer = TokenSigner::new(config.jwt.secret.as_bytes());
    let account_service = Arc::new(AccountService::new(store, hasher, signer));

    let address = format!("0.0.0.0:{}", config.server.http_port);
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "App listening");

    let application = create_router(account_service);
    axum::serve(listener, application).await?;

    Ok(())
}
