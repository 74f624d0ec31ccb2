use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::presenter::Presenter;
use crate::round::RoundController;
use crate::timings::SecondsRange;
use crate::{Identity, Phase, Sampler};

/// Who decides when a duelist attacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Control {
    /// Attacks only when pressed from outside.
    #[default]
    Manual,
    /// Attacks on its own a sampled reaction delay after the draw signal.
    Automated,
}

/// What a single attack attempt did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackOutcome {
    /// This duelist already used its action this round.
    AlreadyActed,
    /// Attacked during `Wait`; the action is spent and nothing is reported.
    FalseStart,
    /// Valid attack that ended the round.
    Struck { defeated: Identity },
    /// Nothing happened beyond spending the action.
    Absorbed(Phase),
}

#[derive(Debug, Clone)]
pub struct Duelist {
    identity: Identity,
    control: Control,
    reaction_range: SecondsRange,
    reaction_delay: Option<f64>,
    has_acted: bool,
    attack_scheduled: bool,
}

impl Duelist {
    pub fn new(
        identity: Identity,
        control: Control,
        reaction_range: SecondsRange,
        sampler: &mut Sampler,
    ) -> Self {
        let mut duelist = Self {
            identity,
            control,
            reaction_range,
            reaction_delay: None,
            has_acted: false,
            attack_scheduled: false,
        };
        duelist.sample_reaction(sampler);
        duelist
    }

    /// Act now. Only the first attempt of a round counts.
    ///
    /// An attempt during `Intro` or `Finished` is absorbed without feedback
    /// but still spends the action for the round.
    pub fn attempt_attack(
        &mut self,
        round: &mut RoundController,
        presenter: &mut dyn Presenter,
    ) -> AttackOutcome {
        if self.has_acted {
            trace!(who = %self.identity, "already acted this round");
            return AttackOutcome::AlreadyActed;
        }
        self.has_acted = true;

        let phase = round.current_phase();
        debug!(who = %self.identity, %phase, at = round.elapsed(), "attack!");
        match phase {
            Phase::Wait => {
                presenter.on_invalid_attack(self.identity);
                AttackOutcome::FalseStart
            }
            Phase::Draw => {
                presenter.on_attacking(self.identity);
                match round.report_attack(self.identity, true, presenter) {
                    Some(defeated) => AttackOutcome::Struck { defeated },
                    None => AttackOutcome::Absorbed(phase),
                }
            }
            Phase::Intro | Phase::Finished => AttackOutcome::Absorbed(phase),
        }
    }

    /// Presentation only: this duelist lost the round.
    pub fn defeat(&mut self, presenter: &mut dyn Presenter) {
        presenter.on_defeated(self.identity);
    }

    pub fn reset(&mut self, sampler: &mut Sampler, presenter: &mut dyn Presenter) {
        self.has_acted = false;
        self.attack_scheduled = false;
        self.sample_reaction(sampler);
        presenter.on_idle(self.identity);
    }

    /// Polled every tick. An automated duelist arms its delayed attack the
    /// first time it sees `Draw` in a round. Returns true when it armed one.
    pub fn observe(&mut self, round: &mut RoundController) -> bool {
        let Some(delay) = self.reaction_delay else {
            return false;
        };
        if self.attack_scheduled || round.current_phase() != Phase::Draw {
            return false;
        }
        let Some(draw_at) = round.draw_began_at() else {
            return false;
        };
        self.attack_scheduled = true;
        round.schedule_attack(self.identity, draw_at + delay);
        true
    }

    pub fn identity(&self) -> Identity {
        self.identity
    }

    pub fn control(&self) -> Control {
        self.control
    }

    pub fn has_acted(&self) -> bool {
        self.has_acted
    }

    /// `None` for a manually controlled duelist.
    pub fn reaction_delay(&self) -> Option<f64> {
        self.reaction_delay
    }

    fn sample_reaction(&mut self, sampler: &mut Sampler) {
        self.reaction_delay = match self.control {
            Control::Manual => None,
            Control::Automated => Some(sampler.uniform(self.reaction_range)),
        };
    }
}
