//! boardkit render library
//!
//! Retained visual tree for boardkit boards: per-element generators that draw,
//! redraw and destroy visual nodes incrementally, the board view that reconciles
//! them with board state, and an SVG writer. A vello painter is available behind
//! the `vello-renderer` feature.

pub mod board_view;
pub mod generator;
pub mod generators;
pub mod scene;
pub mod svg;

#[cfg(feature = "vello-renderer")]
mod vello_painter;

pub use board_view::BoardView;
pub use generator::{AfterDraw, DrawContext, Generator, GeneratorOptions, GeneratorSlot};
pub use scene::{NodeId, SceneError, SceneResult, ShapeNode, TextNode, Visual, VisualTree};
pub use svg::{content_bounds, write_svg, write_svg_to, SvgOptions};

#[cfg(feature = "vello-renderer")]
pub use vello_painter::VelloPainter;
