use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use tagrelay::{
    BroadcastOptions, Config, DeliverySweep, JsonItemStore, JsonSubscriptionStore, Renderer,
    TagStats, TelegramTransport,
};

fn usage() {
    eprintln!("Usage: tagrelay <command>");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  send     Broadcast all matching items to all subscribers");
    eprintln!("  stats    Show the most used hashtags");
}

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load_with_env("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    // Initialize logging
    if let Err(e) = tagrelay::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        tagrelay::logging::init_console_only(&config.logging.level);
    }

    let command = std::env::args().nth(1);
    match command.as_deref() {
        Some("send") => {
            if let Err(e) = run_broadcast(&config).await {
                eprintln!("Broadcast failed: {e}");
                std::process::exit(1);
            }
        }
        Some("stats") => {
            if let Err(e) = show_stats(&config) {
                eprintln!("Failed to read hashtag statistics: {e}");
                std::process::exit(1);
            }
        }
        _ => {
            usage();
            std::process::exit(2);
        }
    }
}

async fn run_broadcast(config: &Config) -> tagrelay::Result<()> {
    config.validate()?;

    let subscriptions = Arc::new(JsonSubscriptionStore::open(
        &config.stores.subscribers_path,
    )?);
    let items = Arc::new(JsonItemStore::open(&config.stores.items_path)?);
    let transport = TelegramTransport::new(config.transport.token.clone())
        .with_api_base(config.transport.api_base.clone());

    let sweep = DeliverySweep::new(subscriptions, items, transport)
        .with_renderer(Renderer::new().with_channel(config.feed.channel.clone()))
        .with_pacing(Duration::from_secs(config.delivery.broadcast_delay_secs));

    let report = sweep.broadcast(&BroadcastOptions::new()).await?;
    info!(
        "Broadcast done: sent={}/{} retried={} failed={} skipped={}",
        report.sent, report.total, report.retried, report.failed, report.skipped
    );
    Ok(())
}

fn show_stats(config: &Config) -> tagrelay::Result<()> {
    let stats = TagStats::load(&config.stores.stats_path)?;
    if stats.is_empty() {
        println!("No hashtags recorded yet.");
        return Ok(());
    }
    for (tag, count) in stats.top(10) {
        println!("{count:>6}  {tag}");
    }
    Ok(())
}
