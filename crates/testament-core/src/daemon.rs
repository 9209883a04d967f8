//! Bot daemon — startup, shutdown, and main event loop.

use std::sync::Arc;

use tokio::sync::{Mutex, broadcast};
use tracing::{debug, info, warn};

use crate::bot::Bot;
use crate::message::Envelope;

/// Shutdown signal sent via broadcast channel.
#[derive(Debug, Clone)]
pub struct ShutdownSignal;

/// Receivers created with the daemon so nothing sent before `run` is lost.
struct Receivers {
    shutdown: broadcast::Receiver<ShutdownSignal>,
    inbox: broadcast::Receiver<Envelope>,
}

/// The Testament daemon: feeds inbound messages to the [`Bot`] and publishes
/// its replies on the same message bus.
pub struct Daemon {
    bot: Arc<Bot>,
    shutdown_tx: broadcast::Sender<ShutdownSignal>,
    message_tx: broadcast::Sender<Envelope>,
    receivers: Mutex<Receivers>,
}

impl Daemon {
    /// Create a new daemon around `bot`.
    pub fn new(bot: Bot) -> Self {
        let (shutdown_tx, shutdown) = broadcast::channel(1);
        let (message_tx, inbox) = broadcast::channel(256);

        Self {
            bot: Arc::new(bot),
            shutdown_tx,
            message_tx,
            receivers: Mutex::new(Receivers { shutdown, inbox }),
        }
    }

    /// Run the daemon until a shutdown signal or Ctrl-C is received.
    pub async fn run(&self) -> Result<(), DaemonError> {
        let mut receivers = self
            .receivers
            .try_lock()
            .map_err(|_| DaemonError::AlreadyRunning)?;
        let Receivers { shutdown, inbox } = &mut *receivers;

        info!(store = %self.bot.resolver().store_name(), "Testament daemon starting");

        loop {
            tokio::select! {
                // Queued messages are answered before a shutdown request.
                biased;

                _ = tokio::signal::ctrl_c() => {
                    warn!("Ctrl-C received, initiating graceful shutdown");
                    break;
                }
                received = inbox.recv() => match received {
                    Ok(message) if message.is_inbound() => {
                        debug!(id = message.id, channel = %message.channel, "Inbound message");
                        if let Some(reply) = self.bot.handle(&message).await {
                            let _ = self.message_tx.send(reply);
                        }
                    }
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Message bus lagged, dropped inbound messages");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
                _ = shutdown.recv() => {
                    info!("Shutdown signal received, stopping daemon");
                    break;
                }
            }
        }

        info!("Daemon stopped");
        Ok(())
    }

    /// Request a graceful shutdown of the daemon.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(ShutdownSignal);
    }

    /// Get a sender for the message bus.
    pub fn message_sender(&self) -> broadcast::Sender<Envelope> {
        self.message_tx.clone()
    }

    /// Subscribe to the message bus.
    pub fn message_subscriber(&self) -> broadcast::Receiver<Envelope> {
        self.message_tx.subscribe()
    }

    /// The bot handling messages.
    pub fn bot(&self) -> &Bot {
        &self.bot
    }
}

/// Errors from the daemon runtime.
#[derive(Debug, thiserror::Error)]
pub enum DaemonError {
    #[error("daemon is already running")]
    AlreadyRunning,
}
