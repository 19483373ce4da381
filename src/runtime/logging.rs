use std::fs::{self, File};
use std::path::{Path, PathBuf};

use env_logger::{Env, Target};

use crate::config::{self, LogSettings};

/// Route `log` output to a file so it never draws over the TUI.
///
/// `RUST_LOG` wins over `log.level`. Returns the log file in use, or `None`
/// when it could not be created (logging is then discarded).
pub fn init_logging(settings: &LogSettings) -> Option<PathBuf> {
    let path = settings.file.clone().or_else(config::default_log_path);
    let file = path.as_deref().and_then(open_log_file);

    let (target, in_use) = match file {
        Some(f) => (Target::Pipe(Box::new(f)), path),
        None => (Target::Pipe(Box::new(std::io::sink())), None),
    };

    let _ = env_logger::Builder::from_env(Env::default().default_filter_or(settings.level.as_str()))
        .target(target)
        .format_timestamp_millis()
        .try_init();

    in_use
}

fn open_log_file(path: &Path) -> Option<File> {
    if let Some(dir) = path.parent() {
        let _ = fs::create_dir_all(dir);
    }
    match File::create(path) {
        Ok(f) => Some(f),
        Err(e) => {
            eprintln!("tapehead: cannot open log file {}: {e}", path.display());
            None
        }
    }
}
