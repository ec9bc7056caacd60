pub mod actions;
pub mod effects;
pub mod phase;
pub mod state;
pub mod store;

pub use effects::{Effect, Timer, TimerKind};
pub use state::{Hand, Phase, SessionState};
pub use store::SessionStore;
