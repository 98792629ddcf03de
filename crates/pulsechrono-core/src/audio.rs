//! Audio cue collaborator.
//!
//! Cues are fire-and-forget. A failing cue is reported back to the shell,
//! which logs it and moves on; timer state never depends on playback.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::error::CueError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cue {
    /// Played after every accepted intent.
    Click,
    /// Played once when a countdown reaches zero.
    Complete,
}

pub trait AudioCue {
    fn play(&mut self, cue: Cue) -> Result<(), CueError>;
}

/// Plays nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl AudioCue for Silent {
    fn play(&mut self, _cue: Cue) -> Result<(), CueError> {
        Ok(())
    }
}

/// Records every cue it is asked to play. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingCue {
    played: Arc<Mutex<Vec<Cue>>>,
}

impl RecordingCue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn played(&self) -> Vec<Cue> {
        self.played.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

impl AudioCue for RecordingCue {
    fn play(&mut self, cue: Cue) -> Result<(), CueError> {
        if let Ok(mut played) = self.played.lock() {
            played.push(cue);
        }
        Ok(())
    }
}
