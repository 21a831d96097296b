//! Live views kept current by a background task.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, trace, warn};

use taskboard_models::Board;
use taskboard_views::Projector;

use crate::config::MIN_INTERVAL;
use crate::error::{Result, RuntimeError};
use crate::sync::SyncChannel;

/// How a view learns about commits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Re-project on every published event.
    Push,
    /// Re-project from the latest board on a fixed interval.
    Poll(Duration),
}

/// A projected view and the board version it came from.
#[derive(Debug, Clone)]
pub struct Projection<V> {
    /// Board version.
    pub version: u64,
    /// The view model.
    pub view: V,
}

/// Owns a live view. Dropping the handle stops its task.
#[derive(Debug)]
pub struct ViewHandle<V> {
    model: watch::Receiver<Projection<V>>,
    stop: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl<V: Clone + Send + Sync + 'static> ViewHandle<V> {
    pub(crate) fn spawn<P>(sync: &SyncChannel, projector: P, delivery: Delivery) -> Self
    where
        P: Projector<View = V>,
    {
        let board = sync.latest();
        let (model_tx, model) = watch::channel(Projection {
            version: board.version,
            view: projector.project(&board),
        });
        let (stop, stop_rx) = watch::channel(false);

        let updater = ViewUpdater {
            projector,
            model: model_tx,
            stop: stop_rx,
        };
        let task = match delivery {
            Delivery::Push => {
                let events = sync.subscribe();
                let latest = sync.watch();
                tokio::spawn(updater.run_push(events, latest))
            }
            Delivery::Poll(period) => {
                let period = period.max(MIN_INTERVAL);
                tokio::spawn(updater.run_poll(sync.watch(), period))
            }
        };

        Self {
            model,
            stop,
            task: Some(task),
        }
    }

    /// Current view model.
    pub fn latest(&self) -> V {
        self.model.borrow().view.clone()
    }

    /// Board version of the current model.
    pub fn version(&self) -> u64 {
        self.model.borrow().version
    }

    /// Waits for the next update and returns it.
    pub async fn changed(&mut self) -> Result<Projection<V>> {
        self.model
            .changed()
            .await
            .map_err(|_| RuntimeError::Channel("view task stopped".to_string()))?;
        Ok(self.model.borrow_and_update().clone())
    }

    /// Waits until the view reflects at least `version`.
    pub async fn wait_for(&mut self, version: u64) -> Result<V> {
        let projection = self
            .model
            .wait_for(|p| p.version >= version)
            .await
            .map_err(|_| RuntimeError::Channel("view task stopped".to_string()))?;
        Ok(projection.view.clone())
    }

    /// Returns true while the background task runs.
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Stops the background task and waits for it to exit.
    pub async fn stop(mut self) -> Result<()> {
        self.stop.send_replace(true);
        if let Some(task) = self.task.take() {
            task.await
                .map_err(|e| RuntimeError::Shutdown(format!("view task panicked: {}", e)))?;
        }
        Ok(())
    }
}

impl<V> Drop for ViewHandle<V> {
    fn drop(&mut self) {
        self.stop.send_replace(true);
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

struct ViewUpdater<P: Projector> {
    projector: P,
    model: watch::Sender<Projection<P::View>>,
    stop: watch::Receiver<bool>,
}

impl<P: Projector> ViewUpdater<P> {
    /// Re-projects if `board` is newer than the current model.
    fn apply(&self, board: &Board) {
        let current = self.model.borrow().version;
        if board.version <= current {
            return;
        }
        let view = self.projector.project(board);
        self.model.send_replace(Projection {
            version: board.version,
            view,
        });
        trace!(version = board.version, "view updated");
    }

    async fn run_push(
        mut self,
        mut events: tokio::sync::broadcast::Receiver<crate::event::BoardEvent>,
        latest: watch::Receiver<Arc<Board>>,
    ) {
        debug!("push view started");
        // catch up with anything published between projection and subscribe
        let board = Arc::clone(&latest.borrow());
        self.apply(&board);

        loop {
            tokio::select! {
                received = events.recv() => match received {
                    Ok(event) => self.apply(&event.board),
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "push view lagged, resyncing");
                        let board = Arc::clone(&latest.borrow());
                        self.apply(&board);
                    }
                    Err(RecvError::Closed) => break,
                },
                _ = self.stop.changed() => break,
            }
        }
        debug!("push view stopped");
    }

    async fn run_poll(mut self, latest: watch::Receiver<Arc<Board>>, period: Duration) {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        debug!(poll_interval_ms = period.as_millis(), "poll view started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let board = Arc::clone(&latest.borrow());
                    self.apply(&board);
                }
                _ = self.stop.changed() => break,
            }
        }
        debug!("poll view stopped");
    }
}
