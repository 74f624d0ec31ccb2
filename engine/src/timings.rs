use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_INTRO_DURATION: f64 = 1.0;
pub const DEFAULT_WAIT_RANGE: SecondsRange = SecondsRange {
    start: 2.0,
    end: 5.0,
};
pub const DEFAULT_REACTION_RANGE: SecondsRange = SecondsRange {
    start: 0.1,
    end: 0.3,
};
/// Presentation only; carried so integrators can read it from one place.
pub const DEFAULT_ATTACK_MOVE_DURATION: f64 = 0.2;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be a finite, non-negative number of seconds (got {value})")]
    InvalidDuration { field: &'static str, value: f64 },
    #[error("{field} is inverted: start {start} > end {end}")]
    InvertedRange {
        field: &'static str,
        start: f64,
        end: f64,
    },
    #[error("invalid timings JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid timings YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Half-open range of seconds, `[start, end)`. `start == end` pins the value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SecondsRange {
    pub start: f64,
    pub end: f64,
}

impl SecondsRange {
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn fixed(value: f64) -> Self {
        Self::new(value, value)
    }

    pub fn is_fixed(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, value: f64) -> bool {
        if self.is_fixed() {
            value == self.start
        } else {
            self.start <= value && value < self.end
        }
    }

    fn validate(&self, field: &'static str) -> Result<(), ConfigError> {
        check_duration(field, self.start)?;
        check_duration(field, self.end)?;
        if self.start > self.end {
            return Err(ConfigError::InvertedRange {
                field,
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }
}

/// Everything an integrator tunes about a round's pacing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct Timings {
    #[serde(default = "default_intro")]
    pub intro_duration: f64,
    #[serde(default = "default_wait")]
    pub wait_range: SecondsRange,
    #[serde(default = "default_reaction")]
    pub reaction_range: SecondsRange,
    #[serde(default = "default_attack_move")]
    pub attack_move_duration: f64,
}

fn default_intro() -> f64 {
    DEFAULT_INTRO_DURATION
}

fn default_wait() -> SecondsRange {
    DEFAULT_WAIT_RANGE
}

fn default_reaction() -> SecondsRange {
    DEFAULT_REACTION_RANGE
}

fn default_attack_move() -> f64 {
    DEFAULT_ATTACK_MOVE_DURATION
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            intro_duration: DEFAULT_INTRO_DURATION,
            wait_range: DEFAULT_WAIT_RANGE,
            reaction_range: DEFAULT_REACTION_RANGE,
            attack_move_duration: DEFAULT_ATTACK_MOVE_DURATION,
        }
    }
}

impl Timings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_duration("intro_duration", self.intro_duration)?;
        self.wait_range.validate("wait_range")?;
        self.reaction_range.validate("reaction_range")?;
        check_duration("attack_move_duration", self.attack_move_duration)?;
        Ok(())
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let timings: Timings = serde_json::from_str(text)?;
        timings.validate()?;
        Ok(timings)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let timings: Timings = serde_yaml::from_str(text)?;
        timings.validate()?;
        Ok(timings)
    }
}

fn check_duration(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidDuration { field, value })
    }
}
