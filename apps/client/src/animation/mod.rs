pub mod sequencer;

pub use sequencer::{ScoreReveal, ScoreStep};
