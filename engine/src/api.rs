use std::{collections::VecDeque, fs, path::Path};

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::presenter::{EventLog, PresentationEvent};
use crate::{content, Control, Duel, Identity, Phase, Sampler, Timings};

const DEFAULT_DT: f64 = 1.0 / 60.0;
const DEFAULT_MAX_TIME: f64 = 15.0;
const MAX_FRAMES: f64 = 1_000_000.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RoundConfig {
    /// Built-in timing preset name. Ignored when `timings` or `timings_path` is set.
    #[serde(default)]
    pub preset: Option<String>,
    /// JSON or YAML timings file.
    #[serde(default)]
    pub timings_path: Option<String>,
    #[serde(default)]
    pub timings: Option<Timings>,
    #[serde(default)]
    pub seed: u64,
    /// Frame step in seconds.
    #[serde(default)]
    pub dt: Option<f64>,
    #[serde(default)]
    pub player: Control,
    #[serde(default = "default_opponent")]
    pub opponent: Control,
    /// Absolute round times at which the player presses attack.
    #[serde(default)]
    pub presses: Vec<f64>,
    /// Player presses this long after the draw signal.
    #[serde(default)]
    pub player_reaction: Option<f64>,
    /// Give up on a round after this many simulated seconds.
    #[serde(default)]
    pub max_time: Option<f64>,
}

fn default_opponent() -> Control {
    Control::Automated
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            preset: None,
            timings_path: None,
            timings: None,
            seed: 0,
            dt: None,
            player: Control::Manual,
            opponent: default_opponent(),
            presses: Vec::new(),
            player_reaction: None,
            max_time: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RoundReport {
    pub winner: Option<Identity>,
    pub wait_duration: f64,
    pub reaction_delay: Option<f64>,
    pub draw_at: Option<f64>,
    pub finished_at: Option<f64>,
    pub false_starts: Vec<Identity>,
    pub log: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ManyStats {
    pub samples: u32,
    pub player_wins: u32,
    pub opponent_wins: u32,
    pub unresolved: u32,
    pub player_false_starts: u32,
    pub opponent_false_starts: u32,
    pub mean_draw_at: f64,
}

struct Pacing {
    dt: f64,
    max_time: f64,
}

pub fn simulate_round(cfg: RoundConfig) -> Result<RoundReport> {
    let timings = resolve_timings(&cfg)?;
    let pacing = pacing(&cfg)?;
    let mut duel = Duel::with_controls(
        timings,
        Sampler::from_seed(cfg.seed),
        EventLog::new(),
        cfg.player,
        cfg.opponent,
    )?;
    Ok(run_round(&mut duel, &cfg, &pacing))
}

/// Play `samples` rounds on one duel, resetting between rounds.
pub fn simulate_many(cfg: RoundConfig, samples: u32) -> Result<ManyStats> {
    let timings = resolve_timings(&cfg)?;
    let pacing = pacing(&cfg)?;
    let mut duel = Duel::with_controls(
        timings,
        Sampler::from_seed(cfg.seed),
        EventLog::new(),
        cfg.player,
        cfg.opponent,
    )?;

    let mut stats = ManyStats {
        samples,
        player_wins: 0,
        opponent_wins: 0,
        unresolved: 0,
        player_false_starts: 0,
        opponent_false_starts: 0,
        mean_draw_at: 0.0,
    };
    let mut draw_total = 0.0;
    let mut draws = 0u32;

    for i in 0..samples {
        if i > 0 {
            duel.reset();
            duel.presenter_mut().drain();
        }
        let report = run_round(&mut duel, &cfg, &pacing);
        match report.winner {
            Some(Identity::Player) => stats.player_wins += 1,
            Some(Identity::Opponent) => stats.opponent_wins += 1,
            None => stats.unresolved += 1,
        }
        for who in &report.false_starts {
            match who {
                Identity::Player => stats.player_false_starts += 1,
                Identity::Opponent => stats.opponent_false_starts += 1,
            }
        }
        if let Some(at) = report.draw_at {
            draw_total += at;
            draws += 1;
        }
    }

    if draws > 0 {
        stats.mean_draw_at = draw_total / draws as f64;
    }
    tracing::info!(
        samples,
        player_wins = stats.player_wins,
        opponent_wins = stats.opponent_wins,
        "batch finished"
    );
    Ok(stats)
}

fn run_round(duel: &mut Duel<EventLog>, cfg: &RoundConfig, pacing: &Pacing) -> RoundReport {
    let mut presses: Vec<f64> = cfg.presses.iter().copied().filter(|t| t.is_finite()).collect();
    presses.sort_by(f64::total_cmp);
    let mut presses: VecDeque<f64> = presses.into();
    let mut reaction_pressed = false;

    let round = duel.round();
    let mut logs = vec![format!(
        "[START] intro={:.3}s wait={:.3}s opponent_reaction={}",
        round.timings().intro_duration,
        round.wait_duration(),
        format_delay(duel.duelist(Identity::Opponent).reaction_delay())
    )];
    let mut false_starts = Vec::new();
    let mut finished_at = None;
    let mut now = 0.0;

    while now < pacing.max_time {
        let frame_end = now + pacing.dt;

        // Inputs land at their own time within the frame, not at its end.
        loop {
            let reaction_at = cfg
                .player_reaction
                .filter(|_| !reaction_pressed)
                .map(|reaction| expected_draw_at(duel) + reaction);
            let next = [presses.front().copied(), reaction_at]
                .into_iter()
                .flatten()
                .filter(|&t| t <= frame_end)
                .min_by(f64::total_cmp);
            let Some(at) = next else { break };
            advance_to(duel, at);
            if presses.front() == Some(&at) {
                presses.pop_front();
            } else {
                reaction_pressed = true;
            }
            duel.press(Identity::Player);
        }
        advance_to(duel, frame_end);
        now = frame_end;

        for event in duel.presenter_mut().drain() {
            if let PresentationEvent::InvalidAttack(who) = event {
                false_starts.push(who);
            }
            logs.push(format!("[t={:.3}] {}", now, event.describe()));
        }

        if duel.phase() == Phase::Finished {
            finished_at = Some(now);
            break;
        }
    }

    let winner = duel.outcome();
    match winner {
        Some(who) => logs.push(format!("[END] winner={} at t={:.3}", who, now)),
        None => logs.push(format!("[END] unresolved after {:.3}s", pacing.max_time)),
    }

    RoundReport {
        winner,
        wait_duration: duel.round().wait_duration(),
        reaction_delay: duel.duelist(Identity::Opponent).reaction_delay(),
        draw_at: duel.round().draw_began_at(),
        finished_at,
        false_starts,
        log: logs,
    }
}

/// When the draw signal fired, or will fire if the round is still waiting.
fn expected_draw_at(duel: &Duel<EventLog>) -> f64 {
    let round = duel.round();
    round
        .draw_began_at()
        .unwrap_or(round.timings().intro_duration + round.wait_duration())
}

fn advance_to(duel: &mut Duel<EventLog>, at: f64) {
    let step = at - duel.round().elapsed();
    if step > 0.0 {
        duel.tick(step);
    }
}

fn pacing(cfg: &RoundConfig) -> Result<Pacing> {
    let dt = cfg.dt.unwrap_or(DEFAULT_DT);
    if !dt.is_finite() || dt <= 0.0 {
        bail!("dt must be a positive number of seconds (got {})", dt);
    }
    let max_time = cfg.max_time.unwrap_or(DEFAULT_MAX_TIME);
    if !max_time.is_finite() || max_time <= 0.0 {
        bail!("max_time must be a positive number of seconds (got {})", max_time);
    }
    if max_time / dt > MAX_FRAMES {
        bail!(
            "dt {} is too small for max_time {} (more than {} frames)",
            dt,
            max_time,
            MAX_FRAMES
        );
    }
    Ok(Pacing { dt, max_time })
}

/// Inline timings win over a timings file, which wins over a preset.
pub fn resolve_timings(cfg: &RoundConfig) -> Result<Timings> {
    if let Some(timings) = cfg.timings {
        timings.validate()?;
        return Ok(timings);
    }
    if let Some(path) = cfg.timings_path.as_deref() {
        return load_timings(path);
    }
    if let Some(name) = cfg.preset.as_deref() {
        return content::preset(name)
            .with_context(|| format!("failed to parse built-in preset: {}", name))?
            .ok_or_else(|| anyhow!("preset '{}' not found", name));
    }
    Ok(Timings::default())
}

fn load_timings(path: &str) -> Result<Timings> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read timings file: {}", path))?;
    let is_yaml = matches!(
        Path::new(path).extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml")
    );
    let timings = if is_yaml {
        Timings::from_yaml_str(&text)
    } else {
        Timings::from_json_str(&text)
    };
    timings.with_context(|| format!("failed to parse timings file: {}", path))
}

fn format_delay(delay: Option<f64>) -> String {
    match delay {
        Some(d) => format!("{:.3}s", d),
        None => "manual".to_string(),
    }
}
