//! Plugins that react to pointer input with live feedback.

mod hover;
mod line_bound;
mod selection;

pub use hover::HoverHighlight;
pub use line_bound::{LineBoundReaction, LINE_BOUND_OVERLAY_KEY};
pub use selection::Selection;
