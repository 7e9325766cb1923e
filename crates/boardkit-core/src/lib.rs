//! boardkit core library
//!
//! Platform-agnostic element model, board state and interaction logic for the
//! boardkit diagram surface: geometry helpers, orthogonal connector routing, the
//! operation-based board tree, the plugin chain and the resize engine.

pub mod bindings;
pub mod board;
pub mod geometry;
pub mod input;
pub mod mind;
pub mod plugin;
pub mod resize;
pub mod routing;
pub mod shapes;
pub mod snap;
pub mod viewport;

pub use bindings::{HoverHighlight, LineBoundReaction, Selection};
pub use board::{Affinity, Board, BoardError, BoardOptions, BoardResult, Operation, Path, PointerType, Transforms};
pub use input::{BoardEvent, KeyEvent, PointerEvent};
pub use plugin::{BoardHost, BoardPlugin, Next};
pub use resize::{GeometryResize, LineResize, WithResize};
pub use routing::{ConnectorShape, DEFAULT_STANDOFF};
pub use shapes::{Element, ElementId};
pub use viewport::Viewport;
