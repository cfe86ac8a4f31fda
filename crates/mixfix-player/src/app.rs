//! Control loop and command parsing
//!
//! The input thread reads stdin lines, parses them into engine commands,
//! and pushes them onto the lock-free queue. The control loop drains the
//! queue, pumps the engine, and prints load and playback notifications.

use std::io::BufRead;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use anyhow::Result;

use mixfix_core::engine::{EngineCommand, PlaybackEngine, TrackEvent};
use mixfix_core::{format_time, TrackId};
use mixfix_widgets::WaveformConfig;

use crate::config::PlayerConfig;
use crate::ui;

/// Loop cadence; sinks are polled for position and end-of-track at this rate
const TICK_INTERVAL: Duration = Duration::from_millis(50);

/// Current track rows, shared with the input thread so 1-based track
/// numbers typed by the user resolve to ids
pub type TrackRows = Arc<Mutex<Vec<TrackId>>>;

const HELP: &str = "\
Commands:
  add <path>...     load audio files as new tracks
  play              start every ready track from the master position
  stop              stop all tracks
  seek <seconds>    move the master position
  vol <0..1>        set the master volume (applies to every track)
  tvol <n> <0..1>   set track n's volume
  nudge <n> <d>     adjust track n's volume by a delta
  sync <n>          toggle whether track n follows the master clock
  rm <n>            remove track n
  tracks            show master and track status
  quit              exit";

/// Parse one control line
///
/// Track arguments are 1-based row numbers as printed by `tracks`.
/// Returns `Ok(None)` for blank lines.
pub fn parse_command(line: &str, rows: &[TrackId]) -> Result<Option<EngineCommand>, String> {
    let mut parts = line.split_whitespace();
    let Some(verb) = parts.next() else {
        return Ok(None);
    };

    let command = match verb {
        "add" => {
            let paths: Vec<PathBuf> = parts.map(PathBuf::from).collect();
            if paths.is_empty() {
                return Err("Usage: add <path>...".to_string());
            }
            EngineCommand::AddTracks(paths)
        }
        "play" => EngineCommand::PlayAll,
        "stop" => EngineCommand::StopAll,
        "seek" => EngineCommand::SetMasterPosition(parse_number(parts.next(), "seek <seconds>")?),
        "vol" => EngineCommand::SetMasterVolume(parse_number(parts.next(), "vol <0..1>")?),
        "tvol" => {
            let track_id = resolve_row(parts.next(), rows)?;
            let volume = parse_number(parts.next(), "tvol <n> <0..1>")?;
            EngineCommand::SetTrackVolume { track_id, volume }
        }
        "nudge" => {
            let track_id = resolve_row(parts.next(), rows)?;
            let delta = parse_number(parts.next(), "nudge <n> <delta>")?;
            EngineCommand::AdjustTrackVolume { track_id, delta }
        }
        "sync" => EngineCommand::ToggleSynchronization(resolve_row(parts.next(), rows)?),
        "rm" => EngineCommand::RemoveTrack(resolve_row(parts.next(), rows)?),
        "tracks" | "status" => EngineCommand::ShowStatus,
        "quit" | "exit" => EngineCommand::Quit,
        other => return Err(format!("Unknown command: {} (try 'help')", other)),
    };

    Ok(Some(command))
}

fn parse_number<T: std::str::FromStr>(arg: Option<&str>, usage: &str) -> Result<T, String> {
    arg.and_then(|a| a.parse().ok())
        .ok_or_else(|| format!("Usage: {}", usage))
}

fn resolve_row(arg: Option<&str>, rows: &[TrackId]) -> Result<TrackId, String> {
    let number: usize = arg
        .and_then(|a| a.parse().ok())
        .ok_or_else(|| "Expected a track number (see 'tracks')".to_string())?;
    number
        .checked_sub(1)
        .and_then(|i| rows.get(i))
        .copied()
        .ok_or_else(|| format!("No track {}", number))
}

/// Spawn the stdin reader thread
///
/// Parsed commands go over the lock-free queue. The thread exits after a
/// quit command or on EOF, pushing Quit so the control loop follows.
pub fn spawn_input_thread(
    mut commands: rtrb::Producer<EngineCommand>,
    rows: TrackRows,
) -> thread::JoinHandle<()> {
    thread::Builder::new()
        .name("control-input".to_string())
        .spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                let trimmed = line.trim();
                if trimmed == "help" {
                    println!("{}", HELP);
                    continue;
                }

                let current = rows.lock().map(|rows| rows.clone()).unwrap_or_default();
                match parse_command(trimmed, &current) {
                    Ok(Some(EngineCommand::Quit)) => {
                        let _ = commands.push(EngineCommand::Quit);
                        return;
                    }
                    Ok(Some(command)) => {
                        if let Err(rtrb::PushError::Full(_)) = commands.push(command) {
                            log::warn!("Command queue full, dropping input");
                        }
                    }
                    Ok(None) => {}
                    Err(message) => eprintln!("{}", message),
                }
            }
            // Stdin closed; shut the control loop down too
            let _ = commands.push(EngineCommand::Quit);
        })
        .expect("Failed to spawn control input thread")
}

/// Run the control loop until a quit command arrives
pub fn run(
    mut engine: PlaybackEngine,
    mut commands: rtrb::Consumer<EngineCommand>,
    rows: TrackRows,
    config: &PlayerConfig,
) -> Result<()> {
    let waveform = config.display.waveform_config();
    let columns = config.display.strip_columns;

    'control: loop {
        // Commands are drained in arrival order before the engine ticks
        while let Ok(command) = commands.pop() {
            match command {
                EngineCommand::AddTracks(paths) => {
                    engine.add_tracks(paths);
                }
                EngineCommand::RemoveTrack(id) => engine.remove_track(id),
                EngineCommand::PlayAll => engine.play_all(),
                EngineCommand::StopAll => engine.stop_all(),
                EngineCommand::SetMasterVolume(volume) => engine.set_master_volume(volume),
                EngineCommand::SetMasterPosition(position) => engine.set_master_position(position),
                EngineCommand::SetTrackVolume { track_id, volume } => {
                    engine.set_track_volume(track_id, volume)
                }
                EngineCommand::AdjustTrackVolume { track_id, delta } => {
                    engine.adjust_track_volume(track_id, delta)
                }
                EngineCommand::ToggleSynchronization(track_id) => {
                    engine.toggle_synchronization(track_id)
                }
                EngineCommand::ShowStatus => print_status(&engine, &waveform, columns),
                EngineCommand::Quit => break 'control,
            }
        }

        for (id, event) in engine.poll() {
            announce(&engine, id, event);
        }

        publish_rows(&engine, &rows);

        thread::sleep(TICK_INTERVAL);
    }

    log::info!("Control loop exiting");
    Ok(())
}

/// Print one line for a track event
fn announce(engine: &PlaybackEngine, id: TrackId, event: TrackEvent) {
    let name = engine
        .track(id)
        .map(|track| track.name().to_string())
        .unwrap_or_else(|| id.to_string());

    match event {
        TrackEvent::DurationChanged(duration) => {
            println!("Loaded {} ({})", name, format_time(duration));
        }
        TrackEvent::PlaybackEnded => println!("{} finished", name),
        TrackEvent::LoadFailed(message) => println!("{} failed: {}", name, message),
    }
}

fn print_status(engine: &PlaybackEngine, waveform: &WaveformConfig, columns: usize) {
    println!("{}", ui::master_row(engine.master()));
    for (i, track) in engine.tracks().iter().enumerate() {
        println!("{}", ui::track_row(i + 1, track, waveform, columns));
    }
    if engine.tracks().is_empty() {
        println!("(no tracks - use 'add <path>' to load audio)");
    }
}

fn publish_rows(engine: &PlaybackEngine, rows: &TrackRows) {
    if let Ok(mut rows) = rows.lock() {
        rows.clear();
        rows.extend(engine.tracks().iter().map(|track| track.id()));
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn two_rows() -> Vec<TrackId> {
        vec![TrackId(7), TrackId(9)]
    }

    #[test]
    fn test_parse_transport_verbs() {
        assert_eq!(parse_command("play", &[]), Ok(Some(EngineCommand::PlayAll)));
        assert_eq!(parse_command("stop", &[]), Ok(Some(EngineCommand::StopAll)));
        assert_eq!(parse_command("quit", &[]), Ok(Some(EngineCommand::Quit)));
    }

    #[test]
    fn test_parse_add_paths() {
        let parsed = parse_command("add /music/a.mp3 /music/b.wav", &[]);
        assert_eq!(
            parsed,
            Ok(Some(EngineCommand::AddTracks(vec![
                PathBuf::from("/music/a.mp3"),
                PathBuf::from("/music/b.wav"),
            ])))
        );
    }

    #[test]
    fn test_parse_add_requires_path() {
        assert!(parse_command("add", &[]).is_err());
    }

    #[test]
    fn test_parse_seek_and_volume() {
        assert_eq!(
            parse_command("seek 12.5", &[]),
            Ok(Some(EngineCommand::SetMasterPosition(12.5)))
        );
        assert_eq!(
            parse_command("vol 0.8", &[]),
            Ok(Some(EngineCommand::SetMasterVolume(0.8)))
        );
        assert!(parse_command("seek twelve", &[]).is_err());
    }

    #[test]
    fn test_parse_track_commands_resolve_rows() {
        let rows = two_rows();
        assert_eq!(
            parse_command("tvol 2 0.5", &rows),
            Ok(Some(EngineCommand::SetTrackVolume {
                track_id: TrackId(9),
                volume: 0.5,
            }))
        );
        assert_eq!(
            parse_command("sync 1", &rows),
            Ok(Some(EngineCommand::ToggleSynchronization(TrackId(7))))
        );
        assert_eq!(
            parse_command("nudge 1 -0.1", &rows),
            Ok(Some(EngineCommand::AdjustTrackVolume {
                track_id: TrackId(7),
                delta: -0.1,
            }))
        );
    }

    #[test]
    fn test_parse_rejects_bad_row_numbers() {
        let rows = two_rows();
        assert!(parse_command("rm 3", &rows).is_err());
        assert!(parse_command("rm 0", &rows).is_err());
        assert!(parse_command("rm x", &rows).is_err());
    }

    #[test]
    fn test_parse_blank_line_is_noop() {
        assert_eq!(parse_command("", &[]), Ok(None));
        assert_eq!(parse_command("   ", &[]), Ok(None));
    }

    #[test]
    fn test_parse_unknown_command() {
        let parsed = parse_command("warp 9", &[]);
        assert!(parsed.unwrap_err().contains("Unknown command"));
    }
}
