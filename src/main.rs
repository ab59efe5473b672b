// Main entry point for the memory gateway
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use memory_gateway::api::{create_router, AppState};
use memory_gateway::auth::token::JwtValidator;
use memory_gateway::config::Config;
use memory_gateway::memory::http::HttpMemoryBackend;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Bind address override (e.g. "0.0.0.0")
    #[arg(long)]
    bind: Option<String>,

    /// Port override
    #[arg(short, long)]
    port: Option<u16>,

    /// Print the effective configuration and exit
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Install panic hook
    install_panic_hook();

    let mut config = Config::from_env()?;
    if let Some(bind) = cli.bind {
        config.bind_address = bind;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }

    if let Err(e) = init_tracing(&config) {
        eprintln!("Failed to init tracing: {}", e);
    }

    if cli.dry_run {
        println!("--- Dry Run: Effective Configuration ---");
        println!("bind: {}:{}", config.bind_address, config.port);
        println!("backend: {}", config.backend_base_url);
        println!("origins: {:?}", config.allowed_origins);
        println!("tool discovery: {:?}", config.tool_discovery);
        println!("legacy GET: {}", config.legacy_get);
        return Ok(());
    }

    let addr: SocketAddr = format!("{}:{}", config.bind_address, config.port).parse()?;

    let validator = Arc::new(JwtValidator::new(&config.jwt_secret));
    let backend = Arc::new(HttpMemoryBackend::new(
        &config.backend_base_url,
        config.backend_service_token.clone(),
        config.backend_timeout_secs,
    )?);

    let app_state = AppState {
        validator,
        backend,
        config: Arc::new(config),
    };

    let router = create_router(app_state);

    info!("Memory gateway listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

fn install_panic_hook() {
    std::panic::set_hook(Box::new(|panic_info| {
        let location = panic_info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
            .unwrap_or_else(|| "unknown".to_string());

        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("PANIC: {} at {}", message, location);
    }));
}

fn init_tracing(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("memory_gateway=debug,info"));

    let subscriber = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr);

    if config.log_format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    Ok(())
}
