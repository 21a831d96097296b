//! The serialized command queue.
//!
//! Every source of commands (chat lines, UI actions, the offline sweeper)
//! sends a [`Request`] into one bounded queue. A single writer task drains
//! it in arrival order, applies each request through the processor and
//! publishes every commit before taking the next request.

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, warn};

use taskboard_commands::{is_command, Command};
use taskboard_core::{Applied, CommandError, CommandProcessor};
use taskboard_models::User;

use crate::error::{Result, RuntimeError};
use crate::event::BoardEvent;
use crate::sync::SyncChannel;

type Reply<T> = oneshot::Sender<std::result::Result<T, CommandError>>;

/// A unit of work for the writer task.
#[derive(Debug)]
pub(crate) enum Request {
    /// A raw chat line.
    Chat {
        line: String,
        user: User,
        reply: Reply<Option<Applied>>,
    },
    /// A pre-built command, e.g. from a management action.
    Command {
        command: Command,
        reply: Reply<Applied>,
    },
    /// Mark idle owners offline.
    Sweep {
        now: DateTime<Utc>,
        reply: Reply<Option<Applied>>,
    },
}

/// Submits work to the writer task. Cheap to clone.
#[derive(Debug, Clone)]
pub struct CommandSender {
    tx: mpsc::Sender<Request>,
}

impl CommandSender {
    pub(crate) fn new(tx: mpsc::Sender<Request>) -> Self {
        Self { tx }
    }

    /// Submits a chat line from `user`.
    ///
    /// Any line refreshes the sender's presence. Lines that are not
    /// commands resolve to `Ok(None)`. Waits for queue capacity and then
    /// for the processor's verdict; requests queued before the runtime
    /// starts are processed once it does.
    pub async fn submit(&self, line: impl Into<String>, user: User) -> Result<Option<Applied>> {
        let line = line.into();
        self.request(|reply| Request::Chat { line, user, reply })
            .await
    }

    /// Submits a pre-built command.
    pub async fn submit_command(&self, command: Command) -> Result<Applied> {
        self.request(|reply| Request::Command { command, reply })
            .await
    }

    /// Runs an offline sweep as of `now`.
    pub async fn sweep(&self, now: DateTime<Utc>) -> Result<Option<Applied>> {
        self.request(|reply| Request::Sweep { now, reply }).await
    }

    async fn request<T>(&self, build: impl FnOnce(Reply<T>) -> Request) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(build(reply_tx))
            .await
            .map_err(|_| RuntimeError::Channel("command queue closed".to_string()))?;
        let result = reply_rx
            .await
            .map_err(|_| RuntimeError::Channel("request dropped before processing".to_string()))?;
        Ok(result?)
    }
}

/// Drains the queue until shutdown, then hands the receiver back so the
/// runtime can be restarted with the same senders.
pub(crate) async fn run_writer(
    processor: CommandProcessor,
    sync: SyncChannel,
    mut rx: mpsc::Receiver<Request>,
    mut shutdown: watch::Receiver<bool>,
) -> mpsc::Receiver<Request> {
    debug!("command writer started");
    loop {
        tokio::select! {
            biased;
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    debug!("writer received shutdown signal");
                    break;
                }
            }
            request = rx.recv() => match request {
                Some(request) => handle(&processor, &sync, request),
                None => break,
            },
        }
    }
    debug!("command writer stopped");
    rx
}

fn handle(processor: &CommandProcessor, sync: &SyncChannel, request: Request) {
    match request {
        Request::Chat { line, user, reply } => {
            match processor.observe_presence(&user.name, Utc::now()) {
                Ok(Some(applied)) => publish(sync, &applied),
                Ok(None) => {}
                Err(e) => warn!(user = %user.name, error = %e, "presence update failed"),
            }

            let result = if is_command(&line) {
                processor.process_line(&line, user).map(Some)
            } else {
                Ok(None)
            };
            if let Ok(Some(applied)) = &result {
                publish(sync, applied);
            }
            let _ = reply.send(result);
        }
        Request::Command { command, reply } => {
            let result = processor.process(command);
            if let Ok(applied) = &result {
                publish(sync, applied);
            }
            let _ = reply.send(result);
        }
        Request::Sweep { now, reply } => {
            let result = processor.sweep_offline(now);
            if let Ok(Some(applied)) = &result {
                publish(sync, applied);
            }
            let _ = reply.send(result);
        }
    }
}

fn publish(sync: &SyncChannel, applied: &Applied) {
    sync.publish(BoardEvent::from(applied));
}
