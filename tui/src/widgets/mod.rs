//! Widgets

pub mod breakdown;
pub mod text_block;

pub use breakdown::Breakdown;
pub use text_block::TextBlock;
