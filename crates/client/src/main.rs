//! Mana headless client
//!
//! Connects to a game server with the options from `client.cfg` (or the path
//! given as first argument) and logs every state change until the session
//! ends or Ctrl-C is pressed.

use anyhow::Context;
use mana_config::ClientConfig;
use mana_game::{EventReceiver, EventSink, GameClient};
use mana_network::{connect_and_run, SessionEnd};
use mana_resources::{AbilityDb, MapCache, TextMapLoader};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = "client.cfg";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG.to_string());
    let config = ClientConfig::load_from_file(&config_path)
        .with_context(|| format!("loading {}", config_path))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .context("invalid log filter")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Mana client starting");
    config.display();

    let ability_db = match AbilityDb::load_from_file(&config.abilities_file) {
        Ok(db) => {
            info!("Loaded {} abilities", db.len());
            db
        }
        Err(e) => {
            warn!("Failed to load {}: {}", config.abilities_file.display(), e);
            AbilityDb::default()
        }
    };
    let maps = Arc::new(MapCache::new(TextMapLoader::new(config.maps_dir.clone())));

    let (sink, events) = EventSink::channel();
    let logger = tokio::spawn(log_events(events));

    let mut client = GameClient::new(config.player_name.clone(), maps, Arc::new(ability_db), sink);
    let address = config.server_address();

    let outcome = tokio::select! {
        result = connect_and_run(&address, &mut client, &config.token, config.tick_interval()) => Some(result),
        _ = tokio::signal::ctrl_c() => None,
    };

    let result = match outcome {
        Some(Ok(SessionEnd::ClosedByClient)) => {
            info!("Session closed");
            Ok(())
        }
        Some(Ok(SessionEnd::ClosedByServer)) => {
            info!("Server ended the session");
            Ok(())
        }
        Some(Err(e)) => {
            error!("Session failed: {}", e);
            Err(e.into())
        }
        None => {
            info!("Interrupted, shutting down");
            client.on_disconnected();
            Ok(())
        }
    };

    // Closing the last sink ends the logger
    drop(client);
    if let Err(e) = logger.await {
        warn!("Event logger stopped abnormally: {}", e);
    }
    result
}

async fn log_events(mut events: EventReceiver) {
    while let Some(event) = events.recv().await {
        info!(target: "mana_client::events", "{:?}", event);
    }
}
