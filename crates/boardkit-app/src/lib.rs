//! boardkit application
//!
//! Loads a scenario (board options, elements, initial selection and a script of
//! input events), replays it through a [`BoardHost`] carrying the standard plugins
//! and reconciles a [`BoardView`] after every event.

use boardkit_core::board::{Board, BoardError, BoardOptions};
use boardkit_core::input::BoardEvent;
use boardkit_core::plugin::BoardHost;
use boardkit_core::resize::{GeometryResize, LineResize, WithResize};
use boardkit_core::shapes::{Element, ElementId};
use boardkit_core::{HoverHighlight, LineBoundReaction, Selection};
use boardkit_render::{BoardView, SceneError, SvgOptions, write_svg};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Margin around the content when the view box is fitted.
pub const FIT_MARGIN: f64 = 20.0;

/// Errors raised while loading or replaying a scenario.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid scenario: {0}")]
    Json(#[from] serde_json::Error),
    #[error("board error: {0}")]
    Board(#[from] BoardError),
    #[error("scene error: {0}")]
    Scene(#[from] SceneError),
    #[error("selected element {0} is not on the board")]
    UnknownSelection(ElementId),
}

/// Result type for application operations.
pub type AppResult<T> = Result<T, AppError>;

/// A board and the input script to run against it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub options: BoardOptions,
    pub elements: Vec<Element>,
    /// Elements selected before the first event.
    pub selection: Vec<ElementId>,
    pub events: Vec<BoardEvent>,
}

impl Scenario {
    pub fn from_json(json: &str) -> AppResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> AppResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

/// Outcome of a replay.
pub struct Replay {
    pub host: BoardHost,
    pub view: BoardView,
    /// Number of events that produced a flushed batch.
    pub flushed: usize,
}

impl Replay {
    /// Serialize the reconciled view, fitted to its content.
    pub fn to_svg(&self, pretty: bool) -> String {
        let tree = self.view.tree();
        let options = SvgOptions {
            pretty,
            ..SvgOptions::fit(tree, self.view.root(), FIT_MARGIN)
        };
        write_svg(tree, self.view.root(), &options)
    }
}

/// Host with the plugins every interactive board carries.
pub fn standard_host(board: Board) -> BoardHost {
    BoardHost::new(board)
        .with_plugin(Selection)
        .with_plugin(HoverHighlight)
        .with_plugin(WithResize::new(GeometryResize))
        .with_plugin(WithResize::new(LineResize))
        .with_plugin(LineBoundReaction)
}

/// Run every event of `scenario`, reconciling the view after each one.
pub fn replay(scenario: Scenario) -> AppResult<Replay> {
    let mut board = Board::new(scenario.elements, scenario.options);
    if let Some(missing) = scenario.selection.iter().find(|id| board.get_element(**id).is_none()) {
        return Err(AppError::UnknownSelection(*missing));
    }
    board.selection = scenario.selection;

    let mut host = standard_host(board);
    let mut view = BoardView::new();
    view.reconcile(&host.board)?;

    let mut flushed = 0;
    for (index, event) in scenario.events.iter().enumerate() {
        if host.handle(event) {
            flushed += 1;
            log::debug!("event {index} flushed a batch");
        }
        view.reconcile(&host.board)?;
    }
    log::info!(
        "replayed {} event(s), {} flushed batch(es), {} visual node(s)",
        scenario.events.len(),
        flushed,
        view.tree().len()
    );
    Ok(Replay { host, view, flushed })
}
