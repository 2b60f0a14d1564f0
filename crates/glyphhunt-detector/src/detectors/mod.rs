//! Component detector implementations.

pub mod bracket;
pub mod frame;

pub use bracket::BracketDetector;
pub use frame::FrameDetector;
