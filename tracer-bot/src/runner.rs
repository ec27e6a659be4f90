use std::sync::Arc;

use anyhow::{Context, Result};
use handler_chain::HandlerChain;
use handlers::{AuthHandler, CommandHandler, LoggingHandler, RepeatHandler};
use tokio::sync::mpsc;
use tracer_core::{init_tracing, MessagingGateway, PresenceGateway, WatchList};
use tracer_telegram::{run_dispatch, TelegramGateway, UpdateIngestion};
use tracing::{info, instrument, warn};
use tracker::Tracker;
use vk_client::{mask_token, VkClient};

use crate::config::AppConfig;

/// Logging first, then the operator filter, then the two event handlers.
pub fn build_handler_chain(
    operator_id: i64,
    watch_list: &WatchList,
    presence: Arc<dyn PresenceGateway>,
    messenger: Arc<dyn MessagingGateway>,
) -> HandlerChain {
    HandlerChain::new()
        .add_handler(Arc::new(LoggingHandler))
        .add_handler(Arc::new(AuthHandler::new(operator_id)))
        .add_handler(Arc::new(CommandHandler::new(
            watch_list.clone(),
            presence.clone(),
            messenger.clone(),
        )))
        .add_handler(Arc::new(RepeatHandler::new(
            watch_list.clone(),
            presence,
            messenger,
        )))
}

/// Main entry: validate config, init logging, build gateways, then run the tracking,
/// ingestion and dispatch loops until one of them exits.
#[instrument(skip(config))]
pub async fn run_tracer(config: AppConfig) -> Result<()> {
    config.validate()?;
    init_tracing(&config.log_file).context("failed to initialize logging")?;

    info!(
        owner_id = config.owner_id,
        tg_token = %mask_token(&config.tg_token),
        vk_token = %mask_token(&config.vk_token),
        vk_api_url = %config.vk_api_url,
        track_interval_secs = config.track_interval.as_secs(),
        "Initializing tracer"
    );

    let messenger: Arc<dyn MessagingGateway> = Arc::new(
        TelegramGateway::from_token(config.tg_token.clone(), config.telegram_api_url.as_deref())
            .context("failed to build Telegram gateway")?,
    );
    let presence: Arc<dyn PresenceGateway> = Arc::new(VkClient::with_base_url(
        config.vk_token.clone(),
        config.vk_api_url.clone(),
    ));
    let watch_list = WatchList::new();

    let chain = build_handler_chain(
        config.owner_id,
        &watch_list,
        presence.clone(),
        messenger.clone(),
    );
    let tracker = Tracker::new(
        watch_list,
        presence,
        messenger.clone(),
        config.owner_id,
    );
    let (tx, rx) = mpsc::unbounded_channel();

    let tracking = tokio::spawn(tracker.run(config.track_interval));
    let ingestion = tokio::spawn(UpdateIngestion::new(messenger).run(tx));
    let dispatch = tokio::spawn(run_dispatch(chain, rx));

    info!("Tracer started successfully");

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("received ctrl-c, shutting down");
        }
        _ = tracking => {
            warn!("tracking loop exited unexpectedly");
        }
        _ = ingestion => {
            warn!("update ingestion exited unexpectedly");
        }
        _ = dispatch => {
            warn!("dispatch loop exited unexpectedly");
        }
    }

    Ok(())
}
