use anyhow::Result;
use clap::Parser;
use httpd_exporter::{config::Config, runner};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/Default.toml")]
    config: String,

    /// httpd host to poll (overrides config)
    #[arg(long, env = "HTTPD_HOST")]
    host: Option<String>,

    /// httpd port to poll (overrides config)
    #[arg(long, env = "HTTPD_PORT")]
    port: Option<u16>,

    /// Host identity records are attributed to (overrides config)
    #[arg(long, env = "HTTPD_HOSTNAME")]
    hostname: Option<String>,

    /// Run a single collection cycle and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing; stdout is reserved for records
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting httpd exporter v{}", env!("CARGO_PKG_VERSION"));

    // Parse CLI arguments
    let args = Args::parse();

    // Load configuration
    let mut config = Config::load(&args.config)?;

    // Override with CLI arguments if provided
    if let Some(host) = args.host {
        config.httpd.host = host;
    }
    if let Some(port) = args.port {
        config.httpd.port = port;
    }
    if let Some(hostname) = args.hostname {
        config.httpd.hostname = hostname;
    }
    config.validate()?;

    info!("Configuration loaded successfully");
    info!(
        "httpd target: {}:{} (reporting as {})",
        config.httpd.host, config.httpd.port, config.httpd.hostname
    );
    match &config.response_check {
        Some(check) => info!("Response check: {}:{}{}", check.host, check.port, check.path),
        None => info!("Response check disabled"),
    }

    if let Err(e) = runner::start(config, args.once).await {
        error!("Collector error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
