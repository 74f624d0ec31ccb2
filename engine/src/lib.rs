use std::{collections::VecDeque, fmt};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

pub mod api;
pub mod content;
pub mod duel;
pub mod duelist;
pub mod phase;
pub mod presenter;
pub mod round;
pub mod timeline;
pub mod timings;

pub use duel::Duel;
pub use duelist::{AttackOutcome, Control, Duelist};
pub use phase::Phase;
pub use presenter::{EventLog, PresentationEvent, Presenter, Unbound};
pub use round::RoundController;
pub use timeline::{Entry, Timeline};
pub use timings::{ConfigError, SecondsRange, Timings};

/// Which side of the duel an actor is on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Identity {
    Player,
    Opponent,
}

impl Identity {
    pub fn opponent(self) -> Self {
        match self {
            Identity::Player => Identity::Opponent,
            Identity::Opponent => Identity::Player,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Identity::Player => "Player",
            Identity::Opponent => "Opponent",
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

enum Source {
    Seeded(ChaCha8Rng),
    Scripted(VecDeque<f64>),
}

/// Uniform sampler for the per-round random durations.
pub struct Sampler {
    source: Source,
}

impl Sampler {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            source: Source::Seeded(ChaCha8Rng::seed_from_u64(seed)),
        }
    }

    /// Replays `values` in order. Values outside the requested range, and
    /// draws past the end of the script, yield the range start.
    pub fn from_scripted(values: Vec<f64>) -> Self {
        Self {
            source: Source::Scripted(values.into()),
        }
    }

    /// Sample uniformly from `[range.start, range.end)`. A zero-width range
    /// always yields its start.
    pub fn uniform(&mut self, range: SecondsRange) -> f64 {
        match &mut self.source {
            Source::Seeded(rng) => {
                if range.is_fixed() {
                    range.start
                } else {
                    rng.gen_range(range.start..range.end)
                }
            }
            Source::Scripted(values) => match values.pop_front() {
                Some(v) if range.contains(v) => v,
                Some(v) => {
                    tracing::warn!(
                        value = v,
                        start = range.start,
                        end = range.end,
                        "scripted sample outside range; using range start"
                    );
                    range.start
                }
                None => range.start,
            },
        }
    }
}

impl fmt::Debug for Sampler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Source::Seeded(_) => f.write_str("Sampler::Seeded"),
            Source::Scripted(values) => write!(f, "Sampler::Scripted({} left)", values.len()),
        }
    }
}
