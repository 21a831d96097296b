//! Async runtime for Taskboard.
//!
//! This crate wires the processor to live views:
//! - `CommandSender` - queues chat lines and UI commands for the single writer
//! - `SyncChannel` - publishes every commit to push and poll subscribers
//! - `ViewHandle` - a projection kept current by a background task
//! - `Runtime` - starts and stops the writer and the offline sweeper
//!
//! # Example
//!
//! ```
//! use taskboard_core::{BoardConfig, CommandProcessor};
//! use taskboard_models::User;
//! use taskboard_runtime::{Runtime, RuntimeConfig};
//! use taskboard_views::OverlayProjector;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let processor = CommandProcessor::seeded(BoardConfig::default());
//! let mut runtime = Runtime::new(processor, RuntimeConfig::default());
//! runtime.start().await?;
//!
//! let mut overlay = runtime.attach_pushed(OverlayProjector);
//! let sender = runtime.sender();
//! sender.submit("!addtask Viewers \"Say hi\"", User::moderator("Mod")).await?;
//!
//! let view = overlay.wait_for(1).await?;
//! assert_eq!(view.items.len(), 3);
//!
//! runtime.shutdown().await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod event;
pub mod queue;
pub mod runtime;
pub mod sweeper;
pub mod sync;
pub mod view;

pub use config::{RuntimeConfig, MIN_INTERVAL};
pub use error::{Result, RuntimeError};
pub use event::BoardEvent;
pub use queue::CommandSender;
pub use runtime::Runtime;
pub use sweeper::OfflineSweeper;
pub use sync::SyncChannel;
pub use view::{Delivery, Projection, ViewHandle};
