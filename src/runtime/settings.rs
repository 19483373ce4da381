use crate::config;

/// Load settings, falling back to defaults. A broken config file should not
/// keep the station off the air.
pub fn load_settings() -> config::Settings {
    match config::Settings::load() {
        Ok(s) => {
            if let Err(msg) = s.validate() {
                eprintln!("tapehead: invalid config, using defaults: {msg}");
                config::Settings::default()
            } else {
                s
            }
        }
        Err(e) => {
            eprintln!("tapehead: failed to load config, using defaults: {e}");
            config::Settings::default()
        }
    }
}
