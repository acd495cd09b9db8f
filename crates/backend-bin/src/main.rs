use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use backend_lib::{
    config::{LogFormat, Settings, DEFAULT_CONFIG_FILE},
    mail::{LogMailer, Mailer, SmtpMailer},
    router,
    storage::FlatFileStorage,
    AppState,
};
use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// GraphQL backend for the Shopfront store
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// TOML config file; environment variables prefixed SHOPFRONT_ override it
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Address to listen on, overriding `bind_addr`
    #[arg(long)]
    bind: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut settings = Settings::load_from(&args.config)
        .with_context(|| format!("loading configuration from {}", args.config.display()))?;
    if let Some(bind) = args.bind {
        settings.bind_addr = bind;
    }

    init_tracing(&settings);

    // Create storage
    let storage = FlatFileStorage::new(&settings.data_dir)
        .with_context(|| format!("opening store in {}", settings.data_dir.display()))?;
    tracing::info!(path = %storage.path().display(), "store opened");

    let mailer: Arc<dyn Mailer> = match &settings.mail.smtp {
        Some(smtp) => {
            tracing::info!(host = %smtp.host, port = smtp.port, "sending mail through SMTP relay");
            Arc::new(SmtpMailer::new(smtp).context("configuring SMTP relay")?)
        },
        None => {
            tracing::warn!("no SMTP relay configured; mail will only be logged");
            Arc::new(LogMailer)
        },
    };

    let addr = settings.bind_addr;
    let state = Arc::new(AppState::new(Arc::new(storage), mailer, settings));
    let app = router::create_router(state).context("building router")?;

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!("listening on {addr}");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Install the global subscriber; `RUST_LOG` wins over `log_level`
fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.log_level.to_lowercase()));

    let registry = tracing_subscriber::registry().with(filter);
    match settings.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}
