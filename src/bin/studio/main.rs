//! studio - plays a demo pattern through the synthesis engine
//!
//! Run with: cargo run --bin studio -- --bars 8 --instrument "grand piano"

mod player;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::WrapErr;
use player::{Pattern, PatternPlayer};
use studio_synth::Engine;

#[derive(Debug, Parser)]
#[command(name = "studio", about = "Procedural instrument and drum demo")]
struct Args {
    /// Bars of the pattern to play
    #[arg(long, default_value_t = 4)]
    bars: usize,

    /// Tempo in beats per minute
    #[arg(long, default_value_t = 120.0)]
    bpm: f64,

    /// Instrument for the melody line
    #[arg(long, default_value = "piano")]
    instrument: String,

    /// Master volume, 0..1
    #[arg(long, default_value_t = 0.3)]
    volume: f32,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let engine = Arc::new(Engine::new());
    engine
        .initialize()
        .await
        .wrap_err("failed to open the audio output")?;
    engine.set_master_volume(args.volume);

    println!("=== studio ===");
    println!("Sample rate: {} Hz", engine.sample_rate().unwrap_or_default());
    println!("BPM: {}", args.bpm);
    println!("Melody: {}", args.instrument);
    println!("Bars: {}", args.bars);
    println!();

    let pattern = Pattern::demo(args.instrument);
    let player = PatternPlayer::new(Arc::clone(&engine), pattern, args.bpm);
    let played = player.spawn(args.bars).join().await;

    // Let the last notes and the reverb ring out.
    tokio::time::sleep(Duration::from_secs(2)).await;
    engine.stop_all_instruments();
    tokio::time::sleep(Duration::from_millis(50)).await;

    println!("Played {played} steps");
    Ok(())
}
