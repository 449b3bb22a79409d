use anyhow::Context;
use reactor::{
    bus::{Event, EventBus},
    interface::telegram::{TelegramClient, TelegramInterface},
    logging, report, Manager, Scheduler, Settings,
};
use std::sync::Arc;
use std::time::Duration;
use teloxide::Bot;
use tokio::sync::broadcast::error::RecvError;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file before reading LOG_DIR and the token
    let dotenv = dotenvy::dotenv();

    let log_dir = std::env::var("LOG_DIR").unwrap_or_else(|_| "logs".into());
    let log_file = logging::init(&log_dir)?;
    if let Err(e) = dotenv {
        // It's not fatal if .env doesn't exist, but good to know
        info!("No .env file found or failed to load: {}", e);
    }

    info!("Reactor starting, logging to {}", log_file.display());

    let config_path = std::env::var("REACTOR_CONFIG").unwrap_or_else(|_| "config.yaml".into());
    let settings = match Settings::from_file(&config_path) {
        Ok(settings) => settings,
        Err(e) => {
            error!("The program launch failed. Check {}: {}", config_path, e);
            return Err(e).context("Failed to load settings");
        }
    };
    report::success("The settings look fine!");

    let token = std::env::var("TELOXIDE_TOKEN")
        .or_else(|_| std::env::var("TELEGRAM_BOT_TOKEN"))
        .context("No Telegram token found, set TELOXIDE_TOKEN or TELEGRAM_BOT_TOKEN")?;

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(130))
        .connect_timeout(Duration::from_secs(10))
        .build()?;

    let client = Arc::new(TelegramClient::new(
        http.clone(),
        &token,
        settings.msg_queue_size,
    ));
    let bus = Arc::new(EventBus::new());
    let scheduler = Scheduler::new(settings.update_interval(), settings.update_jitter());
    let manager = Arc::new(Manager::new(client.clone(), &settings, scheduler.handle()));

    // Spawn the rotation scheduler in the background
    let rotation = manager.clone();
    let scheduler_handle = tokio::spawn(async move {
        info!("Starting scheduler...");
        scheduler
            .start(move || {
                let manager = rotation.clone();
                async move {
                    manager.rotate().await;
                }
            })
            .await;
    });

    // Every inbound message gets its own task so a FloodWait doesn't block the rest
    let mut rx = bus.subscribe();
    let responder = manager.clone();
    let dispatch_handle = tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(Event::Message(msg)) => {
                    let manager = responder.clone();
                    tokio::spawn(async move {
                        if let Err(e) = manager.on_message(&msg).await {
                            error!("Failed to react to message {}: {}", msg.id, e);
                        }
                    });
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Inbound queue lagged, {} messages dropped", skipped);
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    let bot = Bot::with_client(token, http);
    let telegram = TelegramInterface::new(bus.clone(), client);
    let telegram_handle = tokio::spawn(async move {
        if let Err(e) = telegram.run(bot).await {
            error!("Telegram bot stopped with error: {}", e);
        }
    });

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down...");
        }
        _ = scheduler_handle => {
            error!("Scheduler stopped unexpectedly");
        }
        _ = dispatch_handle => {
            error!("Message dispatch stopped unexpectedly");
        }
        _ = telegram_handle => {
            info!("Telegram bot finished");
        }
    }

    Ok(())
}
