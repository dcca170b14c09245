//! Scripted walk to a destination spot.

pub mod autoplay;
pub mod script;
pub mod sequencer;

pub use autoplay::{Autoplay, DEFAULT_DWELL};
pub use script::{GuidanceScript, GuidanceStep, Maneuver};
pub use sequencer::{Advance, GuidanceFrame, GuidanceSequencer, GuidanceState};
