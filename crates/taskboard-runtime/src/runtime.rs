//! Main runtime manager.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use taskboard_core::CommandProcessor;
use taskboard_models::Board;
use taskboard_views::Projector;

use crate::config::RuntimeConfig;
use crate::error::{Result, RuntimeError};
use crate::queue::{run_writer, CommandSender, Request};
use crate::sweeper::OfflineSweeper;
use crate::sync::SyncChannel;
use crate::view::{Delivery, ViewHandle};

/// Main runtime manager combining the writer task, the sweeper and the
/// sync channel.
pub struct Runtime {
    /// The single writer of board state.
    processor: CommandProcessor,
    /// Fan-out to views.
    sync: SyncChannel,
    /// Timing and capacity knobs.
    config: RuntimeConfig,
    /// Queue handle given to submitters.
    sender: CommandSender,
    /// Queue receiver while the writer is not running.
    receiver: Option<mpsc::Receiver<Request>>,
    /// Handle to the writer task.
    writer_handle: Option<JoinHandle<mpsc::Receiver<Request>>>,
    /// Handle to the sweeper task.
    sweeper_handle: Option<JoinHandle<()>>,
    /// Shutdown signal sender.
    shutdown_tx: watch::Sender<bool>,
    /// Shutdown signal receiver (for cloning to tasks).
    shutdown_rx: watch::Receiver<bool>,
    /// Whether the runtime has been started.
    started: bool,
}

impl Runtime {
    /// Create a new runtime around `processor`.
    pub fn new(processor: CommandProcessor, config: RuntimeConfig) -> Self {
        let sync = SyncChannel::new(processor.snapshot(), config.event_capacity);
        let (tx, rx) = mpsc::channel(config.queue_capacity.max(1));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        Self {
            processor,
            sync,
            config,
            sender: CommandSender::new(tx),
            receiver: Some(rx),
            writer_handle: None,
            sweeper_handle: None,
            shutdown_tx,
            shutdown_rx,
            started: false,
        }
    }

    /// Start the writer and the offline sweeper.
    pub async fn start(&mut self) -> Result<()> {
        if self.started {
            return Err(RuntimeError::AlreadyStarted);
        }
        let receiver = self.receiver.take().ok_or(RuntimeError::AlreadyStarted)?;

        info!("starting runtime");
        self.shutdown_tx.send_replace(false);

        let writer = tokio::spawn(run_writer(
            self.processor.clone(),
            self.sync.clone(),
            receiver,
            self.shutdown_rx.clone(),
        ));

        let sender = self.sender.clone();
        let period = self.config.sweep_interval;
        let shutdown_rx = self.shutdown_rx.clone();
        let sweeper = tokio::spawn(async move {
            let mut sweeper = OfflineSweeper::new(sender, period, shutdown_rx);
            sweeper.run().await;
        });

        self.writer_handle = Some(writer);
        self.sweeper_handle = Some(sweeper);
        self.started = true;

        debug!("runtime started");

        Ok(())
    }

    /// Stop the runtime gracefully. Requests still queued stay queued
    /// until the next start.
    pub async fn shutdown(&mut self) -> Result<()> {
        if !self.started {
            return Err(RuntimeError::NotStarted);
        }

        info!("shutting down runtime");

        self.shutdown_tx.send_replace(true);

        if let Some(handle) = self.sweeper_handle.take() {
            debug!("waiting for sweeper to stop");
            handle
                .await
                .map_err(|e| RuntimeError::Shutdown(format!("sweeper task panicked: {}", e)))?;
        }

        if let Some(handle) = self.writer_handle.take() {
            debug!("waiting for writer to stop");
            let receiver = handle
                .await
                .map_err(|e| RuntimeError::Shutdown(format!("writer task panicked: {}", e)))?;
            self.receiver = Some(receiver);
        }

        self.started = false;

        info!("runtime stopped");

        Ok(())
    }

    /// Handle for submitting chat lines and commands.
    pub fn sender(&self) -> CommandSender {
        self.sender.clone()
    }

    /// The sync channel views attach to.
    pub fn sync(&self) -> &SyncChannel {
        &self.sync
    }

    /// Latest published board.
    pub fn board(&self) -> Arc<Board> {
        self.sync.latest()
    }

    /// The processor behind the writer task.
    pub fn processor(&self) -> &CommandProcessor {
        &self.processor
    }

    /// Attaches a live view using the configured poll interval for
    /// [`Delivery::Poll`]-style views.
    pub fn attach_polled<P: Projector>(&self, projector: P) -> ViewHandle<P::View> {
        self.sync
            .attach(projector, Delivery::Poll(self.config.poll_interval))
    }

    /// Attaches a push-delivered live view.
    pub fn attach_pushed<P: Projector>(&self, projector: P) -> ViewHandle<P::View> {
        self.sync.attach(projector, Delivery::Push)
    }

    /// Check if the runtime has been started.
    pub fn is_started(&self) -> bool {
        self.started
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        // Send shutdown signal if still running
        if self.started {
            self.shutdown_tx.send_replace(true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use taskboard_core::BoardConfig;
    use taskboard_models::User;

    fn runtime() -> Runtime {
        Runtime::new(
            CommandProcessor::seeded(BoardConfig::default()),
            RuntimeConfig::new().with_poll_interval(Duration::from_millis(10)),
        )
    }

    #[tokio::test]
    async fn test_runtime_start_stop() {
        let mut runtime = runtime();
        assert!(!runtime.is_started());

        runtime.start().await.unwrap();
        assert!(runtime.is_started());

        runtime.shutdown().await.unwrap();
        assert!(!runtime.is_started());
    }

    #[tokio::test]
    async fn test_runtime_double_start() {
        let mut runtime = runtime();
        runtime.start().await.unwrap();

        let result = runtime.start().await;
        assert!(matches!(result, Err(RuntimeError::AlreadyStarted)));

        runtime.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_shutdown_without_start() {
        let mut runtime = runtime();
        assert!(matches!(
            runtime.shutdown().await,
            Err(RuntimeError::NotStarted)
        ));
    }

    #[tokio::test]
    async fn test_restart_keeps_senders() {
        let mut runtime = runtime();
        let sender = runtime.sender();

        runtime.start().await.unwrap();
        sender
            .submit("!addlist Raid", User::moderator("Mod"))
            .await
            .unwrap();
        runtime.shutdown().await.unwrap();

        runtime.start().await.unwrap();
        sender
            .submit("!deletelist Raid", User::moderator("Mod"))
            .await
            .unwrap();
        assert_eq!(runtime.board().version, 2);
        runtime.shutdown().await.unwrap();
    }
}
