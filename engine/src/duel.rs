use tracing::debug;

use crate::duelist::{AttackOutcome, Control, Duelist};
use crate::presenter::{Presenter, Unbound};
use crate::round::RoundController;
use crate::timings::{ConfigError, Timings};
use crate::{Identity, Phase, Sampler};

/// One controller, one player, one opponent, and the presenter they drive.
#[derive(Debug)]
pub struct Duel<P: Presenter> {
    round: RoundController,
    player: Duelist,
    opponent: Duelist,
    sampler: Sampler,
    presenter: P,
}

impl Duel<Unbound> {
    /// A duel with no presenter bound. Hooks are logged and skipped.
    pub fn unbound(timings: Timings, sampler: Sampler) -> Result<Self, ConfigError> {
        Self::new(timings, sampler, Unbound)
    }
}

impl<P: Presenter> Duel<P> {
    /// Manual player against an automated opponent.
    pub fn new(timings: Timings, sampler: Sampler, presenter: P) -> Result<Self, ConfigError> {
        Self::with_controls(
            timings,
            sampler,
            presenter,
            Control::Manual,
            Control::Automated,
        )
    }

    pub fn with_controls(
        timings: Timings,
        mut sampler: Sampler,
        presenter: P,
        player: Control,
        opponent: Control,
    ) -> Result<Self, ConfigError> {
        let round = RoundController::new(timings, &mut sampler)?;
        let player = Duelist::new(
            Identity::Player,
            player,
            timings.reaction_range,
            &mut sampler,
        );
        let opponent = Duelist::new(
            Identity::Opponent,
            opponent,
            timings.reaction_range,
            &mut sampler,
        );
        Ok(Self {
            round,
            player,
            opponent,
            sampler,
            presenter,
        })
    }

    /// Advance the duel by `dt` seconds, running the phase machine and any
    /// delayed attacks that come due within the step.
    pub fn tick(&mut self, dt: f64) {
        let mut due = self.round.tick(dt, &mut self.presenter);
        loop {
            self.player.observe(&mut self.round);
            self.opponent.observe(&mut self.round);
            due.extend(self.round.take_due(&mut self.presenter));
            if due.is_empty() {
                break;
            }
            for who in std::mem::take(&mut due) {
                self.attempt(who);
            }
        }
    }

    /// External "attack now" input for `who`.
    pub fn press(&mut self, who: Identity) -> AttackOutcome {
        self.attempt(who)
    }

    /// Start a new round. The controller resets first, then both duelists.
    pub fn reset(&mut self) {
        self.round.reset(&mut self.sampler, &mut self.presenter);
        self.player.reset(&mut self.sampler, &mut self.presenter);
        self.opponent.reset(&mut self.sampler, &mut self.presenter);
    }

    pub fn phase(&self) -> Phase {
        self.round.current_phase()
    }

    /// Winner of the current round, once decided.
    pub fn outcome(&self) -> Option<Identity> {
        self.round.winner()
    }

    pub fn round(&self) -> &RoundController {
        &self.round
    }

    pub fn duelist(&self, who: Identity) -> &Duelist {
        match who {
            Identity::Player => &self.player,
            Identity::Opponent => &self.opponent,
        }
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    fn attempt(&mut self, who: Identity) -> AttackOutcome {
        let (actor, other) = match who {
            Identity::Player => (&mut self.player, &mut self.opponent),
            Identity::Opponent => (&mut self.opponent, &mut self.player),
        };
        let outcome = actor.attempt_attack(&mut self.round, &mut self.presenter);
        if let AttackOutcome::Struck { defeated } = outcome {
            debug_assert_eq!(defeated, other.identity());
            other.defeat(&mut self.presenter);
        }
        debug!(%who, ?outcome, "attack resolved");
        outcome
    }
}
