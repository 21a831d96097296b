//! The projection seam.

use serde::Serialize;

use taskboard_models::{Board, Role, TierThresholds};

use crate::management::{ManagementQuery, ManagementView};
use crate::overlay::{OverlayProjector, OverlayView};
use crate::widget::{WidgetProjector, WidgetView};

/// A pure, read-only function from a board to a view model.
pub trait Projector: Send + Sync + 'static {
    /// The projected model.
    type View: Clone + Send + Sync + 'static;

    /// Projects `board`.
    fn project(&self, board: &Board) -> Self::View;
}

/// Which view to project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewKind {
    Widget(WidgetProjector),
    Management(ManagementQuery),
    Overlay,
}

impl ViewKind {
    /// Widget view with default tiers.
    pub fn widget() -> Self {
        ViewKind::Widget(WidgetProjector::default())
    }

    /// Widget view with custom tiers.
    pub fn widget_with_tiers(tiers: TierThresholds) -> Self {
        ViewKind::Widget(WidgetProjector::new(tiers))
    }

    /// Management view of `list` for `role`.
    pub fn management(list: impl Into<String>, role: Role) -> Self {
        ViewKind::Management(ManagementQuery::new(role).with_list(list))
    }
}

/// Any projected view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ViewModel {
    Widget(WidgetView),
    Management(ManagementView),
    Overlay(OverlayView),
}

impl ViewModel {
    /// Board version the model was projected from.
    pub fn version(&self) -> u64 {
        match self {
            ViewModel::Widget(v) => v.version,
            ViewModel::Management(v) => v.version,
            ViewModel::Overlay(v) => v.version,
        }
    }
}

/// Projects `board` as the requested view.
pub fn project(board: &Board, kind: &ViewKind) -> ViewModel {
    match kind {
        ViewKind::Widget(projector) => ViewModel::Widget(projector.project(board)),
        ViewKind::Management(query) => ViewModel::Management(query.project(board)),
        ViewKind::Overlay => ViewModel::Overlay(OverlayProjector.project(board)),
    }
}

impl Projector for ViewKind {
    type View = ViewModel;

    fn project(&self, board: &Board) -> ViewModel {
        project(board, self)
    }
}
