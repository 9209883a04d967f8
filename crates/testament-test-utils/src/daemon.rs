//! A running daemon for end-to-end tests.

use std::sync::Arc;
use std::time::Duration;

use testament_config::AppConfig;
use testament_core::message::{Direction, Envelope};
use testament_core::store::VerseStore;
use testament_core::{Bot, Daemon};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

/// A daemon running on a background task, with a bus subscription for
/// reading its replies. Shuts the daemon down on drop.
pub struct TestDaemon {
    pub daemon: Arc<Daemon>,
    replies: broadcast::Receiver<Envelope>,
    task: Option<JoinHandle<()>>,
}

impl TestDaemon {
    /// Start a daemon for `config` backed by `store`.
    pub fn start(config: &AppConfig, store: Arc<dyn VerseStore>) -> Self {
        let daemon = Arc::new(Daemon::new(Bot::from_config(config, store)));
        let replies = daemon.message_subscriber();
        let task = tokio::spawn({
            let daemon = Arc::clone(&daemon);
            async move {
                daemon.run().await.expect("daemon run failed");
            }
        });
        Self {
            daemon,
            replies,
            task: Some(task),
        }
    }

    /// Publish an inbound message from `sender`.
    pub fn send(&self, sender: &str, body: &str) {
        self.daemon
            .message_sender()
            .send(Envelope::new("test", sender, body))
            .expect("message bus closed");
    }

    /// Wait (up to five seconds) for the next outbound message.
    pub async fn next_reply(&mut self) -> Envelope {
        tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                let envelope = self.replies.recv().await.expect("message bus closed");
                if envelope.direction == Direction::Outbound {
                    return envelope;
                }
            }
        })
        .await
        .expect("timed out waiting for a reply")
    }

    /// Send `body` and return the reply text.
    pub async fn ask(&mut self, body: &str) -> String {
        self.send("tester", body);
        self.next_reply().await.body
    }

    /// Shut down and wait for the daemon task to finish.
    pub async fn stop(mut self) {
        self.daemon.shutdown();
        if let Some(task) = self.task.take() {
            task.await.expect("daemon task panicked");
        }
    }
}

impl Drop for TestDaemon {
    fn drop(&mut self) {
        self.daemon.shutdown();
    }
}
