use engine::api::{resolve_timings, simulate_many, simulate_round, RoundConfig};
use engine::{content, Control, Identity, SecondsRange, Timings};

fn pinned_timings() -> Timings {
    Timings {
        wait_range: SecondsRange::fixed(3.0),
        reaction_range: SecondsRange::fixed(0.2),
        ..Timings::default()
    }
}

#[test]
fn round_with_builtin_preset_runs() {
    let cfg = RoundConfig {
        preset: Some("classic".into()),
        seed: 2025,
        ..RoundConfig::default()
    };
    let res = simulate_round(cfg).unwrap();
    assert_eq!(res.winner, Some(Identity::Opponent));
    let draw_at = res.draw_at.expect("draw happened");
    assert!((3.0..6.0).contains(&draw_at));
    assert!(res.finished_at.unwrap() >= draw_at);
    assert!(res.false_starts.is_empty());
    assert!(!res.log.is_empty());
}

#[test]
fn quick_player_beats_the_opponent() {
    let cfg = RoundConfig {
        seed: 11,
        player_reaction: Some(0.05),
        ..RoundConfig::default()
    };
    let res = simulate_round(cfg).unwrap();
    assert_eq!(res.winner, Some(Identity::Player));
}

#[test]
fn early_press_is_reported_as_false_start() {
    let cfg = RoundConfig {
        timings: Some(pinned_timings()),
        presses: vec![2.0, 4.05],
        ..RoundConfig::default()
    };
    let res = simulate_round(cfg).unwrap();
    assert_eq!(res.false_starts, vec![Identity::Player]);
    assert_eq!(res.winner, Some(Identity::Opponent));
}

#[test]
fn intro_press_is_not_a_false_start() {
    let cfg = RoundConfig {
        timings: Some(pinned_timings()),
        presses: vec![0.5, 4.05],
        ..RoundConfig::default()
    };
    let res = simulate_round(cfg).unwrap();
    assert!(res.false_starts.is_empty());
    assert_eq!(res.winner, Some(Identity::Opponent));
}

#[test]
fn round_log_reads_like_a_transcript() {
    let cfg = RoundConfig {
        timings: Some(pinned_timings()),
        dt: Some(0.25),
        ..RoundConfig::default()
    };
    let res = simulate_round(cfg).unwrap();
    insta::assert_snapshot!(res.log.join("\n"), @r"
    [START] intro=1.000s wait=3.000s opponent_reaction=0.200s
    [t=4.000] [DRAW] signal shown
    [t=4.250] [ATTACK][Opponent] strikes ✔
    [t=4.250] [FINISH] round over
    [t=4.250] [DEFEAT][Player] is cut down
    [END] winner=Opponent at t=4.250
    ");
}

#[test]
fn two_manual_sides_leave_the_round_unresolved() {
    let cfg = RoundConfig {
        opponent: Control::Manual,
        max_time: Some(8.0),
        ..RoundConfig::default()
    };
    let res = simulate_round(cfg).unwrap();
    assert_eq!(res.winner, None);
    assert_eq!(res.finished_at, None);
    assert!(res.log.last().unwrap().contains("unresolved"));
}

#[test]
fn many_summary_makes_sense() {
    let cfg = RoundConfig {
        preset: Some("frantic".into()),
        seed: 1,
        ..RoundConfig::default()
    };
    let stats = simulate_many(cfg, 50).unwrap();
    assert_eq!(stats.samples, 50);
    assert_eq!(stats.player_wins + stats.opponent_wins + stats.unresolved, 50);
    assert_eq!(stats.opponent_wins, 50);
    assert!((1.5..3.0).contains(&stats.mean_draw_at));
}

#[test]
fn many_counts_false_starts_every_round() {
    let cfg = RoundConfig {
        timings: Some(pinned_timings()),
        presses: vec![1.5],
        ..RoundConfig::default()
    };
    let stats = simulate_many(cfg, 5).unwrap();
    assert_eq!(stats.player_false_starts, 5);
    assert_eq!(stats.opponent_wins, 5);
}

#[test]
fn unknown_preset_is_an_error() {
    let cfg = RoundConfig {
        preset: Some("sundown".into()),
        ..RoundConfig::default()
    };
    let err = simulate_round(cfg).unwrap_err();
    assert!(err.to_string().contains("not found"));
}

#[test]
fn bad_step_is_an_error() {
    let cfg = RoundConfig {
        dt: Some(0.0),
        ..RoundConfig::default()
    };
    assert!(simulate_round(cfg).is_err());
}

#[test]
fn builtin_presets_all_parse() {
    for name in content::builtin_presets().keys() {
        let timings = content::preset(name).unwrap().expect("listed preset exists");
        timings.validate().unwrap();
    }
    assert_eq!(content::preset("classic").unwrap(), Some(Timings::default()));
}

#[test]
fn timings_file_may_be_yaml() {
    let dir = std::path::Path::new(env!("CARGO_TARGET_TMPDIR"));
    let path = dir.join("quickdraw_timings.yaml");
    std::fs::write(
        &path,
        "intro_duration: 0.75\nwait_range: { start: 2.0, end: 2.0 }\n",
    )
    .unwrap();
    let cfg = RoundConfig {
        timings_path: Some(path.to_string_lossy().into_owned()),
        ..RoundConfig::default()
    };
    let timings = resolve_timings(&cfg).unwrap();
    assert_eq!(timings.intro_duration, 0.75);
    assert!(timings.wait_range.is_fixed());
    assert_eq!(timings.reaction_range, Timings::default().reaction_range);

    let res = simulate_round(cfg).unwrap();
    assert!((res.draw_at.unwrap() - 2.75).abs() < 1e-9);
}

#[test]
fn timings_file_rejects_unknown_fields() {
    let dir = std::path::Path::new(env!("CARGO_TARGET_TMPDIR"));
    let path = dir.join("quickdraw_bad_timings.json");
    std::fs::write(&path, r#"{ "intro": 1.0 }"#).unwrap();
    let cfg = RoundConfig {
        timings_path: Some(path.to_string_lossy().into_owned()),
        ..RoundConfig::default()
    };
    let err = resolve_timings(&cfg).unwrap_err();
    assert!(format!("{:#}", err).contains("failed to parse timings file"));
}

#[test]
fn press_just_before_an_off_frame_draw_is_a_false_start() {
    // Draw at 4.005s falls inside the frame ending at ~4.017s; the press at
    // 4.001s lands before it.
    let cfg = RoundConfig {
        timings: Some(Timings {
            wait_range: SecondsRange::fixed(3.005),
            reaction_range: SecondsRange::fixed(0.2),
            ..Timings::default()
        }),
        presses: vec![4.001],
        ..RoundConfig::default()
    };
    let res = simulate_round(cfg).unwrap();
    assert!((res.draw_at.unwrap() - 4.005).abs() < 1e-9);
    assert_eq!(res.false_starts, vec![Identity::Player]);
    assert_eq!(res.winner, Some(Identity::Opponent));
    let false_start = res.log.iter().position(|l| l.contains("[FALSE START]"));
    let draw = res.log.iter().position(|l| l.contains("[DRAW]"));
    assert!(false_start.unwrap() < draw.unwrap());
}

#[test]
fn reaction_press_uses_the_exact_draw_time() {
    // Opponent reacts 0.2s after the draw; the player 0.19s after. A frame
    // this coarse would otherwise apply both at its end.
    let cfg = RoundConfig {
        timings: Some(Timings {
            wait_range: SecondsRange::fixed(3.005),
            reaction_range: SecondsRange::fixed(0.2),
            ..Timings::default()
        }),
        dt: Some(0.5),
        player_reaction: Some(0.19),
        ..RoundConfig::default()
    };
    let res = simulate_round(cfg).unwrap();
    assert_eq!(res.winner, Some(Identity::Player));
}

#[test]
fn runaway_frame_count_is_rejected() {
    let cfg = RoundConfig {
        dt: Some(1e-300),
        opponent: Control::Manual,
        ..RoundConfig::default()
    };
    let err = simulate_round(cfg).unwrap_err();
    assert!(err.to_string().contains("too small"));
}
