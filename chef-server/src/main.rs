use std::path::PathBuf;

use anyhow::{Context, Result};
use chef_server::{
    config::Config,
    llm::OpenAiProvider,
    routes::{router, AppState},
};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// The address and optionally port to bind to
    #[clap(long, default_value = "0.0.0.0:8000")]
    address: String,

    /// PEM certificate chain; serve HTTPS when given along with --tls-key
    #[clap(long, requires = "tls_key")]
    tls_cert: Option<PathBuf>,

    /// PEM private key for --tls-cert
    #[clap(long, requires = "tls_cert")]
    tls_key: Option<PathBuf>,

    /// Write JSON logs to a daily rolling file in this directory instead of stdout
    #[clap(long)]
    log_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // initialize tracing; the guard has to outlive the server
    let _guard = match &args.log_dir {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::daily(dir, "access.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            tracing_subscriber::fmt()
                .json()
                .with_writer(non_blocking)
                .with_env_filter(EnvFilter::from_default_env())
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(EnvFilter::from_default_env())
                .init();
            None
        }
    };

    let config = Config::from_env();
    tracing::info!("Loaded configuration: {:?}", config);
    let app = router(AppState::new(OpenAiProvider::new(&config.llm)));

    match (args.tls_cert, args.tls_key) {
        (Some(cert), Some(key)) => {
            rustls::crypto::ring::default_provider()
                .install_default()
                .map_err(|_| anyhow::anyhow!("Failed to install rustls crypto provider"))?;
            let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(cert, key)
                .await
                .context("Loading TLS certificate")?;

            let addr = args.address.parse().context("Parsing listen address")?;
            tracing::info!("Listening on https://{}", addr);
            axum_server::bind_rustls(addr, tls_config)
                .serve(app.into_make_service())
                .await
                .context("Starting TLS server")?;
        }
        _ => {
            let listener = tokio::net::TcpListener::bind(&args.address)
                .await
                .with_context(|| format!("Binding to {}", args.address))?;
            tracing::info!("Listening on http://{}", args.address);
            axum::serve(listener, app).await?;
        }
    }
    Ok(())
}
