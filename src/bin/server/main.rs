use anyhow::{Context, Result};
use clap::Parser;
use listing_lifecycle_server::{
    app::{AppBuilder, AppConfig, RepositoryBackend, StorageBackend},
    domain::value_objects::Currency,
    services::ListingPolicy,
};
use std::{net::SocketAddr, time::Duration};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "listing-lifecycle-server")]
#[command(about = "Marketplace listing lifecycle and media service", long_about = None)]
struct Cli {
    /// Server port to listen on
    #[arg(short, long, env = "SERVER_PORT", default_value = "3000")]
    port: u16,

    /// Server host to bind to
    #[arg(long, env = "SERVER_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Storage backend type (memory, s3, minio)
    #[arg(long, env = "STORAGE_BACKEND", default_value = "memory")]
    storage_backend: String,

    /// Repository backend type (memory, postgres)
    #[arg(long, env = "REPOSITORY_BACKEND", default_value = "memory")]
    repository_backend: String,

    /// S3 endpoint URL (for MinIO and other S3-compatible servers)
    #[arg(long, env = "S3_ENDPOINT")]
    s3_endpoint: Option<String>,

    /// S3 bucket name
    #[arg(long, env = "S3_BUCKET")]
    s3_bucket: Option<String>,

    /// S3 region
    #[arg(long, env = "S3_REGION", default_value = "us-east-1")]
    s3_region: String,

    /// S3 access key
    #[arg(long, env = "S3_ACCESS_KEY")]
    s3_access_key: Option<String>,

    /// S3 secret key
    #[arg(long, env = "S3_SECRET_KEY")]
    s3_secret_key: Option<String>,

    /// Allow plain HTTP to the S3 endpoint
    #[arg(long, env = "S3_ALLOW_HTTP", default_value = "false")]
    s3_allow_http: bool,

    /// Public base URL images are served from
    #[arg(long, env = "S3_PUBLIC_BASE_URL")]
    public_base_url: Option<String>,

    /// Presigned URL lifetime in seconds, used without a public base URL
    #[arg(long, env = "SIGNED_URL_TTL_SECS")]
    signed_url_ttl_secs: Option<u64>,

    /// Maximum images per listing
    #[arg(long, env = "MAX_FILES_PER_LISTING", default_value = "8")]
    max_files_per_listing: usize,

    /// Maximum size of one image in bytes
    #[arg(long, env = "MAX_UPLOAD_BYTES", default_value = "10485760")]
    max_upload_bytes: usize,

    /// Timeout for a single object store call in milliseconds
    #[arg(long, env = "STORAGE_TIMEOUT_MS", default_value = "10000")]
    storage_timeout_ms: u64,

    /// Currency applied when a listing does not name one
    #[arg(long, env = "DEFAULT_CURRENCY", default_value = "GBP")]
    default_currency: String,

    /// Database URL for repository backend (PostgreSQL)
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Database pool size
    #[arg(long, env = "DATABASE_MAX_CONNECTIONS", default_value = "10")]
    database_max_connections: u32,

    /// Log level, overridden by RUST_LOG
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,
}

impl Cli {
    fn to_app_config(&self) -> Result<AppConfig> {
        let storage_backend = match self.storage_backend.as_str() {
            "memory" => StorageBackend::InMemory,
            "s3" | "minio" => {
                let bucket = self
                    .s3_bucket
                    .clone()
                    .context("S3_BUCKET is required for S3 backend")?;
                if self.storage_backend == "minio" && self.s3_endpoint.is_none() {
                    anyhow::bail!("S3_ENDPOINT is required for MinIO backend");
                }

                StorageBackend::S3 {
                    bucket,
                    region: self.s3_region.clone(),
                    endpoint: self.s3_endpoint.clone(),
                    access_key: self.s3_access_key.clone(),
                    secret_key: self.s3_secret_key.clone(),
                    allow_http: self.s3_allow_http,
                }
            }
            _ => anyhow::bail!("Unknown storage backend: {}", self.storage_backend),
        };

        let repository_backend = match self.repository_backend.as_str() {
            "memory" => RepositoryBackend::InMemory,
            "postgres" | "database" | "db" => {
                let connection_string = self
                    .database_url
                    .clone()
                    .context("DATABASE_URL is required for database backend")?;
                RepositoryBackend::Postgres {
                    connection_string,
                    max_connections: self.database_max_connections,
                }
            }
            _ => anyhow::bail!("Unknown repository backend: {}", self.repository_backend),
        };

        if self.max_files_per_listing == 0 {
            anyhow::bail!("MAX_FILES_PER_LISTING must be at least 1");
        }

        let policy = ListingPolicy {
            max_images: self.max_files_per_listing,
            max_upload_bytes: self.max_upload_bytes,
            storage_timeout: Duration::from_millis(self.storage_timeout_ms),
            public_base_url: self.public_base_url.clone(),
            signed_url_ttl: self.signed_url_ttl_secs.map(Duration::from_secs),
            default_currency: Currency::new(&self.default_currency)
                .context("Invalid DEFAULT_CURRENCY")?,
            ..ListingPolicy::default()
        };

        Ok(AppConfig {
            storage_backend,
            repository_backend,
            policy,
        })
    }

    fn init_logging(&self) -> Result<()> {
        let env_filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.log_level))
            .context("Invalid log level")?;

        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()
            .context("Failed to install tracing subscriber")?;

        Ok(())
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    cli.init_logging()?;

    info!("Starting listing lifecycle server");
    info!("Storage backend: {}", cli.storage_backend);
    info!("Repository backend: {}", cli.repository_backend);

    // Create app configuration
    let config = cli.to_app_config()?;

    // Build the application
    let app_services = AppBuilder::new()
        .with_config(config)
        .build()
        .await
        .context("Failed to build application")?;

    // Create the router
    let router = app_services.router();

    // Bind to address
    let addr: SocketAddr = format!("{}:{}", cli.host, cli.port).parse()?;
    let listener = TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);

    // Start the server
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Failed to start server")?;

    Ok(())
}
