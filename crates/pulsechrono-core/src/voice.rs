//! Simulated voice input.
//!
//! There is no speech recognition here. A [`PhraseSource`] stands in for a
//! recognizer and hands back text, which the host then runs through an
//! [`IntentClassifier`](crate::intent::IntentClassifier).

use rand::seq::SliceRandom;
use rand::Rng;

/// Phrases the simulated recognizer can "hear".
pub const SAMPLE_PHRASES: [&str; 6] = [
    "Start timer",
    "Start stopwatch",
    "Stop",
    "Lap",
    "Switch to timer",
    "Switch to stopwatch",
];

/// Placeholder shown while the simulated recognizer is listening.
pub const LISTENING: &str = "Listening...";

pub trait PhraseSource {
    /// Next recognized phrase, or `None` if the source has nothing to say.
    fn next_phrase(&mut self) -> Option<String>;
}

/// Picks uniformly from [`SAMPLE_PHRASES`].
#[derive(Debug)]
pub struct RandomPhrases<R: Rng> {
    rng: R,
}

impl<R: Rng> RandomPhrases<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomPhrases<rand::rngs::ThreadRng> {
    pub fn thread_local() -> Self {
        Self::new(rand::thread_rng())
    }
}

impl<R: Rng> PhraseSource for RandomPhrases<R> {
    fn next_phrase(&mut self) -> Option<String> {
        SAMPLE_PHRASES.choose(&mut self.rng).map(|p| p.to_string())
    }
}

/// Replays a fixed list of phrases in order.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPhrases {
    phrases: std::collections::VecDeque<String>,
}

impl ScriptedPhrases {
    pub fn new<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            phrases: phrases.into_iter().map(Into::into).collect(),
        }
    }
}

impl PhraseSource for ScriptedPhrases {
    fn next_phrase(&mut self) -> Option<String> {
        self.phrases.pop_front()
    }
}
