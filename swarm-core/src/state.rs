//! Versioned scene inputs read fresh by every frame.

use std::sync::Arc;

use crate::{config::AnimationConfig, graph::GraphPayload, mode::Mode};

/// Everything the host controls that decides what the swarm shows.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SceneState {
    pub mode: Mode,
    pub config: AnimationConfig,
    pub payload: Option<GraphPayload>,
}

/// Shared, copy-on-write [`SceneState`] plus a version that increments on
/// every update.
///
/// Readers take a cheap [`snapshot`](Self::snapshot) and compare versions
/// to find out whether anything changed since they last looked.
#[derive(Clone, Debug, Default)]
pub struct StateCell {
    version: u64,
    state: Arc<SceneState>,
}

impl StateCell {
    pub fn new(state: SceneState) -> Self {
        Self {
            version: 0,
            state: Arc::new(state),
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn snapshot(&self) -> Arc<SceneState> {
        Arc::clone(&self.state)
    }

    pub fn get(&self) -> &SceneState {
        &self.state
    }

    /// Applies `f` to a private copy (if a snapshot is still held) and bumps
    /// the version when the state actually changed.
    pub fn update(&mut self, f: impl FnOnce(&mut SceneState)) -> bool {
        let mut next = SceneState::clone(&self.state);
        f(&mut next);
        if next == *self.state {
            return false;
        }
        self.state = Arc::new(next);
        self.version = self.version.wrapping_add(1);
        true
    }
}
