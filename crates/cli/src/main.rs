mod render;

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use freshstories_core::{
    load_config, load_config_or_default, validate_config, Config, HackerNewsClient, ItemSource,
    LogFormat, Story, StorySearch,
};

/// Config file used when `FRESHSTORIES_CONFIG` is not set
const DEFAULT_CONFIG_PATH: &str = "freshstories.toml";

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // An explicitly named config file must exist; the default one may not.
    let (config_path, config) = match std::env::var("FRESHSTORIES_CONFIG") {
        Ok(path) => {
            let path = PathBuf::from(path);
            let config = load_config(&path);
            (path, config)
        }
        Err(_) => {
            let path = PathBuf::from(DEFAULT_CONFIG_PATH);
            let config = load_config_or_default(&path);
            (path, config)
        }
    };

    // Logging goes up before config errors are reported, so they get logged too
    init_logging(
        config
            .as_ref()
            .map(|c| c.logging.format)
            .unwrap_or_default(),
    );

    let config = config.with_context(|| format!("Failed to load config from {:?}", config_path))?;
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded from {:?}", config_path);
    info!("API: {}", config.api.base_url);

    let stories = fetch_stories(&config).await?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    render::render(&stories, config.output.format, &mut out)?;
    out.flush()?;

    Ok(())
}

/// Run one search, abandoning it on Ctrl+C or SIGTERM.
async fn fetch_stories(config: &Config) -> Result<Vec<Story>> {
    let client = HackerNewsClient::new(&config.api).context("Failed to create API client")?;
    let source: Arc<dyn ItemSource> = Arc::new(client);
    let search = StorySearch::from_config(source, config);

    tokio::select! {
        result = search.fetch_current_stories() => {
            result.context("Story search failed")
        }
        _ = shutdown_signal() => {
            bail!("Interrupted before the search finished")
        }
    }
}

fn init_logging(format: LogFormat) {
    let (pretty, json) = match format {
        LogFormat::Pretty => (
            Some(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
            None,
        ),
        LogFormat::Json => (
            None,
            Some(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            ),
        ),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(pretty)
        .with(json)
        .init();
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use freshstories_core::testing::{fixtures, MockItemSource};
    use freshstories_core::OutputFormat;

    #[tokio::test]
    async fn test_search_and_render_over_mock() {
        let source = Arc::new(MockItemSource::new());
        let now = Utc::now().timestamp();
        source.set_backlog(vec![3, 2, 1]).await;
        source
            .add_items(vec![
                fixtures::story(3, 120, now),
                fixtures::story(2, 10, now),
                fixtures::story(1, 95, now - 60),
            ])
            .await;

        let config = Config::default();
        let search = StorySearch::from_config(source.clone(), &config);
        let stories = search.fetch_current_stories().await.unwrap();

        let mut buf = Vec::new();
        render::render(&stories, OutputFormat::Text, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("1. Item 3 <https://example.com/3>"));
        assert!(text.contains("2. Item 1 <https://example.com/1>"));
        assert!(!text.contains("Item 2"));
    }
}
