//! Playback engine - master state, track transports, command queue
//!
//! This module contains the synchronization core of the player:
//! - Track: one transport per audio source with its own sink and sync flag
//! - PlaybackEngine: master clock fanning commands out to every track
//! - EngineCommand: control-surface commands over a bounded SPSC queue

mod command;
mod engine;
mod track;

pub use command::*;
pub use engine::*;
pub use track::*;
