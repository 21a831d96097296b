//! Read-only projections of a Taskboard board.
//!
//! Every projection is a pure function of a board snapshot. Three views
//! exist:
//!
//! - [`WidgetView`]: every list with every task, plus the progress bar
//! - [`ManagementView`]: one list, filterable by status, with the actions
//!   the viewing role may take on each row
//! - [`OverlayView`]: a flat cross-list feed where completed tasks stay
//!   visible but struck through
//!
//! # Example
//!
//! ```
//! use taskboard_models::Board;
//! use taskboard_views::{project, ViewKind, ViewModel};
//!
//! let board = Board::seeded("Session Goals", "Viewers");
//! match project(&board, &ViewKind::widget()) {
//!     ViewModel::Widget(widget) => assert_eq!(widget.lists.len(), 2),
//!     _ => unreachable!(),
//! }
//! ```

pub mod management;
pub mod overlay;
pub mod projector;
pub mod row;
pub mod widget;

pub use management::{ManagementQuery, ManagementRow, ManagementView, TaskAction};
pub use overlay::{OverlayItem, OverlayProjector, OverlayView};
pub use projector::{project, Projector, ViewKind, ViewModel};
pub use row::TaskRow;
pub use widget::{ListView, WidgetProjector, WidgetView};
