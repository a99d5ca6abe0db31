//! Plain-text rendering for terminal output.

pub mod ai;
pub mod items;

pub use ai::render_explanation;
pub use items::{render_calculator, render_item, render_list, render_notice};

/// Width the calculator display is right-aligned to.
pub const DISPLAY_WIDTH: usize = 24;
