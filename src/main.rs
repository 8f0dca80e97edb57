//! autostack server binary
//!
//! Reads configuration from the environment (and `.env`), connects the
//! configured storage backend, creates tables or indexes, then serves the
//! CRUD routes until Ctrl+C or SIGTERM.
//!
//! ```text
//! DB_BACKEND=postgres DB_PASSWORD=secret cargo run --features postgres
//! ```

use anyhow::{Context, Result, bail};
use autostack::config::{AppConfig, Backend, DatabaseConfig};
use autostack::entities::{Note, User};
use autostack::server::ServerBuilder;
use autostack::storage::InMemoryDataService;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "autostack=info,tower_http=info";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let config = AppConfig::from_env().context("failed to load configuration")?;
    let addr = config.address();

    tracing::info!(
        backend = config.database.backend.as_str(),
        "starting autostack v{}",
        env!("CARGO_PKG_VERSION")
    );

    let builder = connect(&config.database).await?;
    builder.serve(&addr).await
}

/// Connect the configured backend and wire both entity services
async fn connect(db: &DatabaseConfig) -> Result<ServerBuilder> {
    match db.backend {
        Backend::InMemory => Ok(ServerBuilder::new()
            .with_user_service(InMemoryDataService::<User>::new())
            .with_note_service(InMemoryDataService::<Note>::new())),

        #[cfg(feature = "postgres")]
        Backend::Postgres => {
            use autostack::storage::PostgresDataService;
            use autostack::storage::postgres::ensure_schema;
            use sqlx::postgres::PgPoolOptions;

            let pool = PgPoolOptions::new()
                .max_connections(db.max_connections)
                .connect(&connection_url(db)?)
                .await
                .context("failed to connect to PostgreSQL")?;
            ensure_schema(&pool).await?;
            tracing::info!("connected to PostgreSQL database '{}'", db.name);

            Ok(ServerBuilder::new()
                .with_user_service(PostgresDataService::<User>::new(pool.clone()))
                .with_note_service(PostgresDataService::<Note>::new(pool)))
        }

        #[cfg(feature = "mysql")]
        Backend::MySql => {
            use autostack::storage::MysqlDataService;
            use autostack::storage::mysql::ensure_schema;
            use sqlx::mysql::MySqlPoolOptions;

            let pool = MySqlPoolOptions::new()
                .max_connections(db.max_connections)
                .connect(&connection_url(db)?)
                .await
                .context("failed to connect to MySQL")?;
            ensure_schema(&pool).await?;
            tracing::info!("connected to MySQL database '{}'", db.name);

            Ok(ServerBuilder::new()
                .with_user_service(MysqlDataService::<User>::new(pool.clone()))
                .with_note_service(MysqlDataService::<Note>::new(pool)))
        }

        #[cfg(feature = "mongodb_backend")]
        Backend::MongoDb => {
            use autostack::storage::MongoDataService;
            use mongodb::Client;
            use mongodb::options::ClientOptions;

            let mut options = ClientOptions::parse(connection_url(db)?)
                .await
                .context("invalid MongoDB connection string")?;
            options.max_pool_size = Some(db.max_connections);
            let client = Client::with_options(options).context("failed to create MongoDB client")?;
            let database = client.database(&db.name);

            let users = MongoDataService::<User>::new(database.clone());
            let notes = MongoDataService::<Note>::new(database);
            users.ensure_indexes().await?;
            notes.ensure_indexes().await?;
            tracing::info!("connected to MongoDB database '{}'", db.name);

            Ok(ServerBuilder::new()
                .with_user_service(users)
                .with_note_service(notes))
        }

        #[allow(unreachable_patterns)]
        other => bail!(
            "storage backend '{}' is not compiled in; rebuild with its cargo feature",
            other
        ),
    }
}

#[allow(dead_code)]
fn connection_url(db: &DatabaseConfig) -> Result<String> {
    db.connection_url()
        .with_context(|| format!("no connection URL for backend '{}'", db.backend))
}
