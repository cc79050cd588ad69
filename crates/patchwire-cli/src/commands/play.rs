//! Run a patch's clock and report what the modules did.

use super::common::{format_value, load_patch, print_report};
use clap::Args;
use patchwire_config::load_str;
use patchwire_core::{GraphSession, Module};
use patchwire_registry::KindRegistry;
use std::time::Duration;

/// Upper bound on clock ticks for one run.
const MAX_TICKS: u64 = 10_000_000;

#[derive(Args)]
pub struct PlayArgs {
    /// Patch name or path
    patch: String,

    /// How long to run, in seconds
    #[arg(short, long, default_value = "4.0")]
    seconds: f64,

    /// Clock tick length in milliseconds
    #[arg(long, default_value = "20", value_parser = clap::value_parser!(u64).range(1..))]
    tick_ms: u64,

    /// Start playback even if the patch does not autoplay
    #[arg(long)]
    start: bool,

    /// Sleep between ticks so the clock runs at wall-clock speed
    #[arg(long)]
    realtime: bool,
}

pub fn run(args: PlayArgs) -> anyhow::Result<()> {
    if !args.seconds.is_finite() || args.seconds < 0.0 {
        anyhow::bail!("--seconds must be a non-negative number");
    }
    let tick = args.tick_ms as f64 / 1000.0;
    let ticks = (args.seconds / tick).ceil();
    if ticks > MAX_TICKS as f64 {
        anyhow::bail!(
            "--seconds {} at --tick-ms {} needs more than {MAX_TICKS} ticks",
            args.seconds,
            args.tick_ms
        );
    }
    let ticks = ticks as u64;

    let source = load_patch(&args.patch)?;
    let mut session = GraphSession::open(KindRegistry::new());
    let report = load_str(&mut session, &source.json)?;

    println!("{}", source.label);
    print_report(&report);

    if args.start
        && !session.is_playing()
        && let Err(failure) = session.start()
    {
        println!("  {failure}");
        for (id, error) in &failure.failures {
            println!("    {id}: {error}");
        }
    }

    if !session.is_playing() {
        println!("Patch is stopped. Pass --start to play it.");
        return Ok(());
    }

    let mut delivered = 0;
    for _ in 0..ticks {
        delivered += session.advance(tick);
        if args.realtime {
            std::thread::sleep(Duration::from_millis(args.tick_ms));
        }
    }
    tracing::info!(ticks, delivered, "clock finished");

    println!();
    println!("After {:.2} s ({delivered} events delivered):", ticks as f64 * tick);
    for (id, _, module) in session.registry().iter() {
        let state = if module.is_playing() { "playing" } else { "stopped" };
        println!(
            "  {:12} {:12} {:8} {}",
            id.as_str(),
            module.kind(),
            state,
            live_state(module)
        );
    }

    session.close();
    Ok(())
}

/// Read-only parameters, which carry what a module is doing right now.
fn live_state(module: &dyn Module) -> String {
    (0..module.param_count())
        .filter_map(|i| {
            let info = module.param_info(i)?;
            if info.is_writable() {
                return None;
            }
            let value = module.get_param(i)?;
            Some(format!("{}={}", info.name, format_value(&value)))
        })
        .collect::<Vec<_>>()
        .join(" ")
}
