//! Application module: exposes the app model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the latest playback
//! snapshot published by the scheduler.

mod model;

pub use model::*;
