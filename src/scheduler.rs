//! Playback scheduler: keeps the player fed with station tracks.
//!
//! `Scheduler` is the state machine over `Stopped`, `Playing` and `Paused`;
//! `SchedulerHandle` runs it on a dedicated thread and takes commands from
//! the terminal UI and MPRIS.

mod handle;
mod machine;
mod thread;
mod types;

pub use handle::SchedulerHandle;
pub use machine::Scheduler;
pub use types::{PlaybackHandle, PlaybackInfo, PlaybackState, SchedulerCmd};
