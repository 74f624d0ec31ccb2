use clap::Parser;
use engine::api::{simulate_many, RoundConfig};

#[derive(Parser)]
#[command(name = "reaction-sweep")]
#[command(about = "Win rate against the bot across a range of player reaction times")]
struct Args {
    /// Fastest player reaction to try (seconds after the signal)
    #[arg(long, default_value_t = 0.05)]
    from: f64,

    /// Slowest player reaction to try
    #[arg(long, default_value_t = 0.35)]
    to: f64,

    /// Step between reaction times
    #[arg(long, default_value_t = 0.025)]
    step: f64,

    /// Rounds per reaction time
    #[arg(long, default_value_t = 500)]
    trials: u32,

    /// Built-in timing preset
    #[arg(long, default_value = "classic")]
    preset: String,

    /// Frame step in seconds
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f64,

    /// RNG base seed (each reaction time reuses it)
    #[arg(long, default_value_t = 12345)]
    seed: u64,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if !(args.step > 0.0) || args.to < args.from {
        anyhow::bail!("need from <= to and a positive step");
    }

    println!("reaction-sweep ({} rounds each, preset {})", args.trials, args.preset);
    println!("reaction   win rate");
    println!("--------   --------");

    let steps = ((args.to - args.from) / args.step).round() as u32;
    for i in 0..=steps {
        let reaction = args.from + args.step * i as f64;
        let cfg = RoundConfig {
            preset: Some(args.preset.clone()),
            seed: args.seed,
            dt: Some(args.dt),
            player_reaction: Some(reaction),
            ..RoundConfig::default()
        };
        let stats = simulate_many(cfg, args.trials)?;
        let win_rate = stats.player_wins as f64 / stats.samples.max(1) as f64;
        println!("{:>7.3}s   {:>7.1}%", reaction, win_rate * 100.0);
    }

    Ok(())
}
