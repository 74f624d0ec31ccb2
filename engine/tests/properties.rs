use engine::{
    Duel, EventLog, Identity, Phase, PresentationEvent, RoundController, Sampler, Timings,
};
use proptest::prelude::*;

fn steps() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.001f64..0.5, 1..400)
}

proptest! {
    #[test]
    fn phase_follows_cumulative_time(wait in 2.0f64..5.0, dts in steps()) {
        let timings = Timings::default();
        let mut round =
            RoundController::new(timings, &mut Sampler::from_scripted(vec![wait])).unwrap();
        let mut log = EventLog::new();
        let draw_at = timings.intro_duration + wait;

        for dt in dts {
            round.tick(dt, &mut log);
            let t = round.elapsed();
            let expected = if t <= timings.intro_duration {
                Phase::Intro
            } else if t < draw_at {
                Phase::Wait
            } else {
                Phase::Draw
            };
            prop_assert_eq!(round.current_phase(), expected);
        }
        prop_assert!(log.count(PresentationEvent::DrawPhaseBegan) <= 1);
    }

    #[test]
    fn draw_time_ignores_step_size(wait in 2.0f64..5.0, dts in steps()) {
        let timings = Timings::default();
        let mut round =
            RoundController::new(timings, &mut Sampler::from_scripted(vec![wait])).unwrap();
        let mut log = EventLog::new();
        for dt in dts {
            round.tick(dt, &mut log);
        }
        // Pad out past the signal regardless of how far the steps got.
        round.tick(10.0, &mut log);
        round.tick(0.1, &mut log);

        prop_assert_eq!(round.draw_began_at(), Some(timings.intro_duration + wait));
        prop_assert_eq!(log.count(PresentationEvent::DrawPhaseBegan), 1);
    }

    #[test]
    fn fixed_samples_and_steps_fix_the_outcome(
        wait in 2.0f64..5.0,
        reaction in 0.1f64..0.3,
        press_at in 0.0f64..7.0,
        dt in 0.005f64..0.1,
    ) {
        let run = || {
            let mut duel = Duel::new(
                Timings::default(),
                Sampler::from_scripted(vec![wait, reaction]),
                EventLog::new(),
            )
            .unwrap();
            let mut pressed = false;
            while duel.round().elapsed() < 8.0 && duel.phase() != Phase::Finished {
                duel.tick(dt);
                if !pressed && duel.round().elapsed() >= press_at {
                    pressed = true;
                    duel.press(Identity::Player);
                }
            }
            (duel.outcome(), duel.presenter().events().to_vec())
        };
        let (winner, events) = run();
        prop_assert_eq!((winner, events.clone()), run());
        prop_assert!(winner.is_some());
        prop_assert_eq!(events.iter().filter(|e| matches!(e, PresentationEvent::Defeated(_))).count(), 1);
    }

    #[test]
    fn second_press_never_counts(first in 1.01f64..8.0, second in 1.01f64..8.0) {
        let mut duel = Duel::with_controls(
            Timings::default(),
            Sampler::from_scripted(vec![3.0]),
            EventLog::new(),
            engine::Control::Manual,
            engine::Control::Manual,
        )
        .unwrap();
        let (first, second) = if first <= second { (first, second) } else { (second, first) };
        duel.tick(first);
        let first_phase = duel.phase();
        duel.press(Identity::Player);
        duel.tick(second - first);
        let outcome = duel.press(Identity::Player);

        prop_assert_eq!(outcome, engine::AttackOutcome::AlreadyActed);
        match first_phase {
            Phase::Draw => prop_assert_eq!(duel.outcome(), Some(Identity::Player)),
            _ => prop_assert_eq!(duel.outcome(), None),
        }
    }
}
