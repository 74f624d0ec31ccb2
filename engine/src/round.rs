use tracing::{debug, info, trace};

use crate::presenter::Presenter;
use crate::timeline::Timeline;
use crate::timings::{ConfigError, Timings};
use crate::{Identity, Phase, Sampler};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Timer {
    DrawSignal,
    Attack(Identity),
}

/// Owns the phase state machine and the round's clock.
#[derive(Debug)]
pub struct RoundController {
    timings: Timings,
    elapsed: f64,
    phase: Phase,
    wait_duration: f64,
    wait_scheduled: bool,
    draw_began_at: Option<f64>,
    winner: Option<Identity>,
    generation: u64,
    timeline: Timeline<Timer>,
}

impl RoundController {
    pub fn new(timings: Timings, sampler: &mut Sampler) -> Result<Self, ConfigError> {
        timings.validate()?;
        let wait_duration = sampler.uniform(timings.wait_range);
        debug!(wait_duration, "round controller ready");
        Ok(Self {
            timings,
            elapsed: 0.0,
            phase: Phase::Intro,
            wait_duration,
            wait_scheduled: false,
            draw_began_at: None,
            winner: None,
            generation: 0,
            timeline: Timeline::new(),
        })
    }

    /// Advance the clock by `dt` seconds and run whatever became due.
    ///
    /// Returns the duelists whose delayed attack came due, in fire order.
    /// Does nothing once the round is finished or for a negative/non-finite `dt`.
    pub fn tick(&mut self, dt: f64, presenter: &mut dyn Presenter) -> Vec<Identity> {
        if self.phase.is_finished() {
            trace!(dt, "tick after finish ignored");
            return Vec::new();
        }
        if !dt.is_finite() || dt < 0.0 {
            debug!(dt, "ignoring invalid tick");
            return Vec::new();
        }

        self.elapsed += dt;
        if self.phase == Phase::Intro && self.elapsed > self.timings.intro_duration {
            self.enter_wait();
        }
        self.take_due(presenter)
    }

    /// Fire every entry due at the current time. The draw signal is handled
    /// here; attack entries are handed back to the caller.
    pub fn take_due(&mut self, presenter: &mut dyn Presenter) -> Vec<Identity> {
        let mut due = Vec::new();
        if self.phase.is_finished() {
            return due;
        }
        while let Some(entry) = self.timeline.pop_due(self.elapsed, self.generation) {
            match entry.event {
                Timer::DrawSignal => self.begin_draw(entry.fire_at, presenter),
                Timer::Attack(who) => due.push(who),
            }
        }
        due
    }

    pub fn current_phase(&self) -> Phase {
        self.phase
    }

    /// Ends the round. Calling it again is a no-op.
    pub fn finish_round(&mut self, presenter: &mut dyn Presenter) {
        if self.phase.is_finished() {
            return;
        }
        debug!(from = %self.phase, at = self.elapsed, "phase is now FINISHED");
        self.phase = Phase::Finished;
        presenter.on_round_finished();
    }

    /// Record the result of `actor`'s attack. A successful report on a live
    /// round finishes it and returns the side that lost; the first one wins.
    pub fn report_attack(
        &mut self,
        actor: Identity,
        successful: bool,
        presenter: &mut dyn Presenter,
    ) -> Option<Identity> {
        if !successful {
            debug!(%actor, "unsuccessful attack reported");
            return None;
        }
        if self.phase.is_finished() {
            debug!(%actor, "attack reported after the round ended; ignored");
            return None;
        }
        let defeated = actor.opponent();
        self.winner = Some(actor);
        self.finish_round(presenter);
        info!(winner = %actor, at = self.elapsed, "round won");
        Some(defeated)
    }

    /// Back to `Intro` with a fresh wait duration. Anything scheduled in the
    /// previous round is invalidated.
    pub fn reset(&mut self, sampler: &mut Sampler, presenter: &mut dyn Presenter) {
        self.generation += 1;
        self.timeline.discard_stale(self.generation);
        self.elapsed = 0.0;
        self.phase = Phase::Intro;
        self.wait_duration = sampler.uniform(self.timings.wait_range);
        self.wait_scheduled = false;
        self.draw_began_at = None;
        self.winner = None;
        debug!(
            generation = self.generation,
            wait_duration = self.wait_duration,
            "round reset"
        );
        presenter.on_round_reset();
    }

    /// Arm a one-shot attack for `actor` at absolute round time `fire_at`.
    pub fn schedule_attack(&mut self, actor: Identity, fire_at: f64) {
        trace!(%actor, fire_at, "attack scheduled");
        self.timeline
            .schedule(fire_at, Timer::Attack(actor), self.generation);
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn wait_duration(&self) -> f64 {
        self.wait_duration
    }

    /// Exact round time the draw signal fired, if it has.
    pub fn draw_began_at(&self) -> Option<f64> {
        self.draw_began_at
    }

    pub fn winner(&self) -> Option<Identity> {
        self.winner
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn timings(&self) -> &Timings {
        &self.timings
    }

    pub fn pending(&self) -> usize {
        self.timeline.len()
    }

    // Wait starts at the intro boundary rather than at the tick that noticed
    // it, so the draw time does not depend on step size.
    fn enter_wait(&mut self) {
        self.phase = Phase::Wait;
        if self.wait_scheduled {
            return;
        }
        self.wait_scheduled = true;
        let fire_at = self.timings.intro_duration + self.wait_duration;
        self.timeline
            .schedule(fire_at, Timer::DrawSignal, self.generation);
        debug!(fire_at, "phase is now WAIT");
    }

    fn begin_draw(&mut self, at: f64, presenter: &mut dyn Presenter) {
        if self.phase != Phase::Wait {
            trace!(phase = %self.phase, "draw signal outside wait ignored");
            return;
        }
        self.phase = Phase::Draw;
        self.draw_began_at = Some(at);
        debug!(at, "phase is now DRAW");
        presenter.on_draw_phase_began();
    }
}
