use serde::Serialize;

use crate::Identity;

/// Presentation hooks the core drives. Every hook defaults to doing nothing.
pub trait Presenter {
    /// The draw signal should become visible.
    fn on_draw_phase_began(&mut self) {}
    fn on_round_reset(&mut self) {}
    fn on_round_finished(&mut self) {}
    /// `who` attacked before the signal.
    fn on_invalid_attack(&mut self, _who: Identity) {}
    fn on_defeated(&mut self, _who: Identity) {}
    fn on_idle(&mut self, _who: Identity) {}
    fn on_attacking(&mut self, _who: Identity) {}
}

/// Stand-in used when no presenter has been bound. Logs each skipped hook.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unbound;

fn skipped(hook: &'static str, who: Option<Identity>) {
    tracing::warn!(hook, who = ?who, "no presenter bound; skipping");
}

impl Presenter for Unbound {
    fn on_draw_phase_began(&mut self) {
        skipped("on_draw_phase_began", None);
    }

    fn on_round_reset(&mut self) {
        skipped("on_round_reset", None);
    }

    fn on_round_finished(&mut self) {
        skipped("on_round_finished", None);
    }

    fn on_invalid_attack(&mut self, who: Identity) {
        skipped("on_invalid_attack", Some(who));
    }

    fn on_defeated(&mut self, who: Identity) {
        skipped("on_defeated", Some(who));
    }

    fn on_idle(&mut self, who: Identity) {
        skipped("on_idle", Some(who));
    }

    fn on_attacking(&mut self, who: Identity) {
        skipped("on_attacking", Some(who));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "who", rename_all = "snake_case")]
pub enum PresentationEvent {
    DrawPhaseBegan,
    RoundReset,
    RoundFinished,
    InvalidAttack(Identity),
    Defeated(Identity),
    Idle(Identity),
    Attacking(Identity),
}

impl PresentationEvent {
    pub fn describe(&self) -> String {
        match self {
            PresentationEvent::DrawPhaseBegan => "[DRAW] signal shown".to_string(),
            PresentationEvent::RoundReset => "[RESET] round reset".to_string(),
            PresentationEvent::RoundFinished => "[FINISH] round over".to_string(),
            PresentationEvent::InvalidAttack(who) => {
                format!("[FALSE START][{}] attacked before the signal ✖", who)
            }
            PresentationEvent::Defeated(who) => format!("[DEFEAT][{}] is cut down", who),
            PresentationEvent::Idle(who) => format!("[IDLE][{}] ready", who),
            PresentationEvent::Attacking(who) => format!("[ATTACK][{}] strikes ✔", who),
        }
    }
}

/// Presenter that records every hook in order. Used by the simulation
/// harness and handy in tests.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    events: Vec<PresentationEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[PresentationEvent] {
        &self.events
    }

    pub fn drain(&mut self) -> Vec<PresentationEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn count(&self, event: PresentationEvent) -> usize {
        self.events.iter().filter(|e| **e == event).count()
    }

    pub fn contains(&self, event: PresentationEvent) -> bool {
        self.events.contains(&event)
    }
}

impl Presenter for EventLog {
    fn on_draw_phase_began(&mut self) {
        self.events.push(PresentationEvent::DrawPhaseBegan);
    }

    fn on_round_reset(&mut self) {
        self.events.push(PresentationEvent::RoundReset);
    }

    fn on_round_finished(&mut self) {
        self.events.push(PresentationEvent::RoundFinished);
    }

    fn on_invalid_attack(&mut self, who: Identity) {
        self.events.push(PresentationEvent::InvalidAttack(who));
    }

    fn on_defeated(&mut self, who: Identity) {
        self.events.push(PresentationEvent::Defeated(who));
    }

    fn on_idle(&mut self, who: Identity) {
        self.events.push(PresentationEvent::Idle(who));
    }

    fn on_attacking(&mut self, who: Identity) {
        self.events.push(PresentationEvent::Attacking(who));
    }
}
