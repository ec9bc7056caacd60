//! Runtime: the session façade, its virtual timeline and the tokio driver.

pub mod driver;
pub mod game;
pub mod intents;
pub mod timeline;
pub mod transport;

pub use game::GameSession;
pub use intents::UserIntent;
pub use timeline::Timeline;
