//! # Session Loop
//!
//! Drives a [`GameClient`] from one task: inbound frames and clock ticks are
//! handled strictly one at a time, and whatever the client queued is written
//! out after each of them.
//!
//! # Lifecycle
//!
//! ```text
//! connect → authenticate → loop { frame | tick → flush } → reset
//! ```
//!
//! The loop ends when the client asks to close, the server hangs up, the
//! transport fails or a message turns out to be malformed. In every case the
//! client is reset before returning.

use crate::connection::Connection;
use mana_core::Result;
use mana_game::{GameClient, Outgoing};
use std::time::Duration;
use tokio::time::{interval, Instant, MissedTickBehavior};

/// Why a session ended without an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The client queued a close request
    ClosedByClient,
    /// The server closed the stream
    ClosedByServer,
}

enum Flow {
    Continue,
    Close,
}

/// Connect, authenticate and run until the session ends
pub async fn connect_and_run(
    address: &str,
    client: &mut GameClient,
    token: &str,
    tick: Duration,
) -> Result<SessionEnd> {
    tracing::info!("Connecting to game server at {}", address);
    let connection = Connection::connect(address).await?;
    run_session(connection, client, token, tick).await
}

/// Authenticate on an open connection and run the session loop
///
/// # Arguments
/// * `connection` - Connection to the game server
/// * `client` - Client state, reset when the session ends
/// * `token` - Credential token
/// * `tick` - Interval between two client updates
///
/// # Errors
/// Transport failures and fatal protocol errors. Non-fatal handler errors
/// are logged and the session continues.
pub async fn run_session(
    mut connection: Connection,
    client: &mut GameClient,
    token: &str,
    tick: Duration,
) -> Result<SessionEnd> {
    let result = session_loop(&mut connection, client, token, tick).await;
    match &result {
        Ok(SessionEnd::ClosedByClient) => {
            if let Err(e) = connection.close().await {
                tracing::debug!("Error while closing connection: {}", e);
            }
        }
        Ok(SessionEnd::ClosedByServer) => tracing::info!("Server closed the connection"),
        Err(e) if e.is_fatal() => tracing::error!("Protocol error, ending session: {}", e),
        Err(e) => tracing::error!("Connection failed: {}", e),
    }
    client.on_disconnected();
    result
}

async fn session_loop(
    connection: &mut Connection,
    client: &mut GameClient,
    token: &str,
    tick: Duration,
) -> Result<SessionEnd> {
    client.authenticate(token)?;
    if let Flow::Close = flush(connection, client).await? {
        return Ok(SessionEnd::ClosedByClient);
    }

    let mut ticker = interval(tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last_tick = Instant::now();

    loop {
        tokio::select! {
            frame = connection.recv() => {
                let Some(frame) = frame? else {
                    return Ok(SessionEnd::ClosedByServer);
                };
                if let Err(e) = client.handle_frame(frame) {
                    if e.is_fatal() {
                        return Err(e);
                    }
                    tracing::warn!("Error handling message: {}", e);
                }
            }

            now = ticker.tick() => {
                let dt = now.saturating_duration_since(last_tick);
                last_tick = now;
                if client.is_authenticated() {
                    client.update(dt);
                }
            }
        }

        if let Flow::Close = flush(connection, client).await? {
            return Ok(SessionEnd::ClosedByClient);
        }
    }
}

/// Write everything the client queued, stopping at a close request
async fn flush(connection: &mut Connection, client: &mut GameClient) -> Result<Flow> {
    for out in client.take_outgoing() {
        match out {
            Outgoing::Message(msg) => connection.send(msg).await?,
            Outgoing::Close => return Ok(Flow::Close),
        }
    }
    Ok(Flow::Continue)
}
