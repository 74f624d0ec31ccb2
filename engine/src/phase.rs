use std::fmt;

use serde::{Deserialize, Serialize};

/// Where a round currently is. Moves forward only; a reset returns to `Intro`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Intro,
    Wait,
    Draw,
    Finished,
}

impl Phase {
    pub fn is_finished(self) -> bool {
        matches!(self, Phase::Finished)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Intro => "INTRO",
            Phase::Wait => "WAIT",
            Phase::Draw => "DRAW",
            Phase::Finished => "FINISHED",
        };
        f.write_str(name)
    }
}
