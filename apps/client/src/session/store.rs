//! Owned Session State with a revision counter observers can watch.

use tokio::sync::watch;

use super::state::SessionState;

#[derive(Debug)]
pub struct SessionStore {
    state: SessionState,
    revision: u64,
    tx: watch::Sender<u64>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(SessionState::new())
    }
}

impl SessionStore {
    pub fn new(state: SessionState) -> Self {
        let (tx, _rx) = watch::channel(0);
        Self {
            state,
            revision: 0,
            tx,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Receiver that observes the revision after every mutation.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.tx.subscribe()
    }

    /// Mutate the state and notify observers.
    pub fn update<T>(&mut self, f: impl FnOnce(&mut SessionState) -> T) -> T {
        let out = f(&mut self.state);
        self.revision += 1;
        self.tx.send_replace(self.revision);
        out
    }

    /// Drop the session (leaving a lobby, game end teardown). Id and
    /// epoch counters keep counting so nothing issued earlier is reused.
    pub fn reset(&mut self) {
        self.update(|state| {
            let ids = std::mem::take(&mut state.ids);
            let phase_epoch = state.phase_epoch + 1;
            let generation = state.anim.generation + 1;
            *state = SessionState::new();
            state.ids = ids;
            state.phase_epoch = phase_epoch;
            state.anim.generation = generation;
        });
    }
}
