//! Mix Fix Player - synchronized multi-track audio playback
//!
//! This is the main entry point for the terminal application. It:
//! 1. Loads the player configuration
//! 2. Opens the default audio device (or falls back to silent outputs)
//! 3. Spawns the stdin control thread
//! 4. Runs the engine control loop until quit
//!
//! ## Command line flags
//!
//! - `--init-config`: Write the default config file and exit
//! - Any other arguments are audio files loaded as tracks at startup

mod app;
mod config;
mod output;
mod ui;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Result;

use mixfix_core::engine::{command_channel, PlaybackEngine};
use mixfix_core::output::OutputFactory;
use output::{NullOutputFactory, RodioOutputFactory};

fn main() -> Result<()> {
    // Initialize logger - set RUST_LOG=debug for verbose output
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    log::info!("mixfix-player starting up");

    let mut paths: Vec<PathBuf> = Vec::new();
    let mut init_config = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--help" | "-h" => {
                print_usage();
                return Ok(());
            }
            "--init-config" => init_config = true,
            _ => paths.push(PathBuf::from(arg)),
        }
    }

    let config_path = config::default_config_path();
    if init_config {
        config::save_config(&config::PlayerConfig::default(), &config_path)?;
        println!("Wrote default config to {}", config_path.display());
        return Ok(());
    }
    let player_config = config::load_config(&config_path);

    // Initialize Rayon before any decode jobs are queued, so pool setup
    // never adds latency to the first track load
    rayon::ThreadPoolBuilder::new()
        .num_threads(4) // Enough parallel decodes for a typical session
        .thread_name(|i| format!("rayon-decode-{}", i))
        .build_global()
        .expect("Failed to initialize Rayon thread pool");
    log::info!("Rayon thread pool initialized with 4 threads");

    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                       Mix Fix Player                         ║");
    println!("║              synchronized multi-track playback               ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    // Try to open the default audio device; keep the player usable without one
    let factory: Box<dyn OutputFactory> = match RodioOutputFactory::open_default() {
        Ok(factory) => {
            println!("Audio output ready (one sink per track)");
            Box::new(factory)
        }
        Err(e) => {
            eprintln!("Warning: Could not open an audio output device: {:#}", e);
            eprintln!("Running in silent mode (loading and analysis only)");
            eprintln!();
            Box::new(NullOutputFactory)
        }
    };

    let mut engine = PlaybackEngine::new(factory, player_config.display.envelope_blocks);
    engine.set_master_volume(player_config.audio.master_volume);

    if !paths.is_empty() {
        engine.add_tracks(paths);
    }

    let (producer, consumer) = command_channel();
    let rows: app::TrackRows = Arc::new(Mutex::new(Vec::new()));
    let input = app::spawn_input_thread(producer, rows.clone());

    println!("Type 'help' for commands.");
    app::run(engine, consumer, rows, &player_config)?;

    let _ = input.join();
    log::info!("mixfix-player exited cleanly");
    Ok(())
}

fn print_usage() {
    println!("Usage: mixfix-player [OPTIONS] [FILES]...");
    println!();
    println!("Options:");
    println!("  --init-config    write the default config file and exit");
    println!("  -h, --help       show this help");
    println!();
    println!("Files given on the command line are loaded as tracks at startup.");
}
