use clap::{Parser, Subcommand, ValueEnum};
use encoding_rs::Encoding;
use engine::api::{simulate_many, simulate_round, RoundConfig, RoundReport};
use engine::{content, Control};
use std::{fs, path::Path, path::PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Copy, Clone, ValueEnum)]
enum Side {
    Manual,
    Bot,
}

#[derive(clap::Args)]
struct RoundArgs {
    /// RNG seed for determinism
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Built-in timing preset
    #[arg(long, default_value = "classic")]
    preset: String,
    /// JSON/YAML timings file (overrides --preset)
    #[arg(long)]
    timings: Option<PathBuf>,
    /// Full round config as JSON (overrides every other flag)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Frame step in seconds
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f64,
    /// Player presses attack at this round time (repeatable)
    #[arg(long)]
    press: Vec<f64>,
    /// Player presses this many seconds after the draw signal
    #[arg(long)]
    reaction: Option<f64>,
    /// Who controls the player
    #[arg(long, value_enum, default_value_t = Side::Manual)]
    player: Side,
    /// Who controls the opponent
    #[arg(long, value_enum, default_value_t = Side::Bot)]
    opponent: Side,
    /// Give up after this many simulated seconds
    #[arg(long, default_value_t = 15.0)]
    max_time: f64,
}

#[derive(Subcommand)]
enum Cmd {
    /// Play one round and print its transcript
    Round {
        #[command(flatten)]
        args: RoundArgs,
        /// Print the report as JSON instead of the transcript
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Play many rounds on one duel and summarize the results
    Many {
        #[command(flatten)]
        args: RoundArgs,
        /// Number of rounds
        #[arg(long, default_value_t = 100)]
        samples: u32,
    },
    /// List the built-in timing presets
    Presets,
    /// Print a built-in preset as JSON (stdout)
    PresetDump {
        /// Preset name
        name: String,
    },
}

#[derive(Parser)]
#[command(name = "quickdraw")]
#[command(about = "Quickdraw reaction duel harness")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    cmd: Cmd,
}

fn to_control(side: Side) -> Control {
    match side {
        Side::Manual => Control::Manual,
        Side::Bot => Control::Automated,
    }
}

fn init_logging(verbosity: u8) {
    let default_directive = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env("QUICKDRAW_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn read_text_auto(path: &Path) -> anyhow::Result<String> {
    let bytes = fs::read(path)?;
    if let Some((enc, bom_len)) = Encoding::for_bom(&bytes) {
        let (cow, _, _) = enc.decode(&bytes[bom_len..]);
        Ok(cow.into_owned())
    } else {
        Ok(String::from_utf8(bytes)?)
    }
}

fn build_config(args: RoundArgs) -> anyhow::Result<RoundConfig> {
    if let Some(path) = args.config.as_ref() {
        let text = read_text_auto(path)?;
        return Ok(serde_json::from_str(&text)?);
    }
    Ok(RoundConfig {
        preset: Some(args.preset),
        timings_path: args.timings.map(|p| p.to_string_lossy().into_owned()),
        timings: None,
        seed: args.seed,
        dt: Some(args.dt),
        player: to_control(args.player),
        opponent: to_control(args.opponent),
        presses: args.press,
        player_reaction: args.reaction,
        max_time: Some(args.max_time),
    })
}

fn print_report(report: &RoundReport) {
    for line in &report.log {
        println!("{}", line);
    }
    println!();
    println!(
        "winner:             {}",
        report
            .winner
            .map(|w| w.to_string())
            .unwrap_or_else(|| "none".to_string())
    );
    println!("wait:               {:.3}s", report.wait_duration);
    if let Some(delay) = report.reaction_delay {
        println!("opponent reaction:  {:.3}s", delay);
    }
    if let Some(at) = report.draw_at {
        println!("draw at:            {:.3}s", at);
    }
    if let Some(at) = report.finished_at {
        println!("finished at:        {:.3}s", at);
    }
    if !report.false_starts.is_empty() {
        let who: Vec<_> = report.false_starts.iter().map(|w| w.to_string()).collect();
        println!("false starts:       {}", who.join(", "));
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Cmd::Round { args, json } => {
            let report = simulate_round(build_config(args)?)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
        }
        Cmd::Many { args, samples } => {
            let stats = simulate_many(build_config(args)?, samples)?;
            let total = stats.samples.max(1) as f64;
            println!("quickdraw many");
            println!("--------------");
            println!("rounds:             {}", stats.samples);
            println!(
                "player wins:        {} ({:.1}%)",
                stats.player_wins,
                stats.player_wins as f64 / total * 100.0
            );
            println!(
                "opponent wins:      {} ({:.1}%)",
                stats.opponent_wins,
                stats.opponent_wins as f64 / total * 100.0
            );
            println!("unresolved:         {}", stats.unresolved);
            println!("player false starts: {}", stats.player_false_starts);
            println!("mean draw at:       {:.3}s", stats.mean_draw_at);
        }
        Cmd::Presets => {
            for name in content::builtin_presets().keys() {
                println!("{}", name);
            }
        }
        Cmd::PresetDump { name } => {
            let timings = content::preset(&name)?
                .ok_or_else(|| anyhow::anyhow!("preset '{}' not found", name))?;
            println!("{}", serde_json::to_string_pretty(&timings)?);
        }
    }
    Ok(())
}
