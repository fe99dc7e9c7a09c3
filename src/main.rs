//! CookShare backend daemon
//!
//! ## Usage
//!
//! ```bash
//! # Start with defaults
//! cookshare
//!
//! # Custom port and storage directory
//! cookshare --http-port 8080 --storage-dir /data/recipes
//!
//! # Secrets come from the environment (or a .env file)
//! ADMIN_PASSWORD=... ADMIN_FLAG=... cookshare
//! ```
//!
//! ## HTTP API
//!
//! - `POST /api/validaterecipe`   - Upload and score a recipe
//! - `GET  /api/leaderboard`      - Current standings
//! - `POST /api/adminleaderboard` - Admin score override (flag reveal)
//! - `GET  /health`               - Health check

use clap::Parser;
use cookshare::{
    AdminGateway, BlobStorage, Config, FsBlobStore, HttpServer, Leaderboard, RecipeService,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_ADMIN_PASSWORD: &str = "default-admin-password";
const DEFAULT_ADMIN_FLAG: &str = "default-flag";

#[derive(Parser, Debug)]
#[command(name = "cookshare")]
#[command(about = "Recipe validation and leaderboard backend")]
struct Args {
    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Root directory for recipe blob storage
    #[arg(long)]
    storage_dir: Option<PathBuf>,

    /// HTTP API port
    #[arg(long)]
    http_port: Option<u16>,

    /// Admin password for leaderboard overrides
    #[arg(
        long,
        env = "ADMIN_PASSWORD",
        default_value = DEFAULT_ADMIN_PASSWORD,
        hide_env_values = true
    )]
    admin_password: String,

    /// Flag revealed to authenticated admins
    #[arg(
        long,
        env = "ADMIN_FLAG",
        default_value = DEFAULT_ADMIN_FLAG,
        hide_env_values = true
    )]
    admin_flag: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional; deployments usually set the environment directly.
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("cookshare=info".parse()?))
        .init();

    let args = Args::parse();

    // Load config
    let mut config = if let Some(config_path) = &args.config {
        Config::load(config_path)?
    } else {
        Config::default()
    };

    // Apply CLI overrides
    if let Some(dir) = args.storage_dir {
        config.storage_dir = dir;
    }
    if let Some(port) = args.http_port {
        config.http_port = port;
    }

    if args.admin_password == DEFAULT_ADMIN_PASSWORD {
        warn!("ADMIN_PASSWORD not set, using the built-in default");
    }
    if args.admin_flag == DEFAULT_ADMIN_FLAG {
        warn!("ADMIN_FLAG not set, using the built-in default");
    }

    info!(
        storage_dir = %config.storage_dir.display(),
        container = %config.container_name,
        http_port = config.http_port,
        "Starting cookshare"
    );

    // Ensure storage directory exists
    tokio::fs::create_dir_all(&config.storage_dir).await?;

    // Save default config if it doesn't exist
    let config_path = config.config_path();
    if !config_path.exists() {
        config.save(&config_path)?;
        info!(path = %config_path.display(), "Created default config");
    }

    // Wire up the components
    let storage: Arc<dyn BlobStorage> =
        Arc::new(FsBlobStore::new(&config.storage_dir, &config.container_name));
    let leaderboard = Arc::new(Leaderboard::new());
    let recipes = Arc::new(RecipeService::new(
        Arc::clone(&storage),
        Arc::clone(&leaderboard),
    ));
    let admin = Arc::new(AdminGateway::new(
        Arc::clone(&leaderboard),
        args.admin_password,
        args.admin_flag,
    ));

    let http_addr: SocketAddr = format!("0.0.0.0:{}", config.http_port).parse()?;
    let server = Arc::new(HttpServer::new(
        recipes,
        admin,
        Arc::clone(&leaderboard),
        Arc::clone(&storage),
        http_addr,
    ));

    info!("HTTP API available at http://{}", http_addr);
    info!("Endpoints:");
    info!("  POST /api/validaterecipe   - Upload and score a recipe");
    info!("  GET  /api/leaderboard      - Current standings");
    info!("  POST /api/adminleaderboard - Admin score override");
    info!("  GET  /health               - Health check");
    info!("Press Ctrl+C to stop.");

    // Handle shutdown signal
    let shutdown = async {
        tokio::signal::ctrl_c().await.ok();
        info!("Shutting down...");
    };

    // Run HTTP server with graceful shutdown
    tokio::select! {
        result = server.run() => {
            if let Err(e) = result {
                error!(error = %e, "HTTP server error");
            }
        }
        _ = shutdown => {}
    }

    // Print stats before exit
    if let Ok(stats) = storage.stats().await {
        info!(
            recipes = stats.total_blobs,
            bytes = stats.total_bytes,
            leaderboard_entries = leaderboard.len(),
            "Final stats"
        );
    }

    Ok(())
}
