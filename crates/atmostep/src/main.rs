use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use atmo_core::io::frame::make_frame;
use atmo_core::io::seed::{build_world, Seed};
use atmo_core::tick_once;
use clap::Parser;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(
    name = "atmostep",
    about = "Batch runner emitting NDJSON atmosphere frames"
)]
struct Args {
    /// Path to the seed JSON document.
    #[arg(long = "seed-file", value_name = "PATH")]
    seed_file: PathBuf,

    /// Override the world seed used when building the initial world state.
    #[arg(long, value_name = "NUMBER")]
    seed: Option<u64>,

    /// Number of ticks to execute.
    #[arg(long)]
    ticks: u64,

    /// Output NDJSON file path.
    #[arg(long)]
    out: PathBuf,

    /// Include every cell's state in each frame.
    #[arg(long = "emit-cells")]
    emit_cells: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let seed = Seed::load_from_path(&args.seed_file)
        .with_context(|| format!("failed to read seed {:?}", args.seed_file))?;
    let mut world = build_world(&seed, args.seed)
        .with_context(|| format!("failed to build world from seed {}", seed.name))?;
    info!(
        seed = %seed.name,
        world_seed = world.seed,
        width = world.width(),
        height = world.height(),
        ticks = args.ticks,
        "starting atmostep"
    );

    let frame_file =
        File::create(&args.out).with_context(|| format!("failed to create {:?}", args.out))?;
    let mut frame_writer = BufWriter::new(frame_file);

    let mut dropped_total = 0usize;
    for _ in 0..args.ticks {
        let next_tick = world.tick + 1;
        let stats = tick_once(&mut world, next_tick)?;
        dropped_total += stats.dropped;
        debug!(tick = next_tick, dropped = stats.dropped, "tick complete");

        let frame = make_frame(&world, stats, args.emit_cells);
        let line = frame.to_ndjson()?;
        frame_writer.write_all(line.as_bytes())?;
    }

    frame_writer.flush()?;
    info!(
        ticks = world.tick,
        dropped = dropped_total,
        out = %args.out.display(),
        "atmostep finished"
    );

    Ok(())
}
