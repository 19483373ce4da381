use super::load::{default_config_path, default_log_path, resolve_config_path};
use super::schema::*;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|e| e.into_inner())
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_tapehead_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("TAPEHEAD_CONFIG_PATH", "/tmp/tapehead-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/tapehead-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("tapehead")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("tapehead")
            .join("config.toml")
    );
}

#[test]
fn default_log_path_uses_xdg_state_home_then_local_state() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_STATE_HOME", "/tmp/xdg-state");
    assert_eq!(
        default_log_path().unwrap(),
        std::path::PathBuf::from("/tmp/xdg-state/tapehead/tapehead.log")
    );

    let _g2 = EnvGuard::remove("XDG_STATE_HOME");
    let _g3 = EnvGuard::set("HOME", "/tmp/home-dir");
    assert_eq!(
        default_log_path().unwrap(),
        std::path::PathBuf::from("/tmp/home-dir/.local/state/tapehead/tapehead.log")
    );
}

#[test]
fn defaults_match_the_vlc_rc_interface() {
    let s = Settings::default();
    assert_eq!(s.player.executable, "vlc");
    assert_eq!(s.player.args, vec!["-Irc".to_string(), "--quiet".to_string()]);
    assert_eq!(s.player.banner_lines, 2);
    assert_eq!(s.scheduler.retry_count, 10);
    assert_eq!(s.scheduler.retry_delay_ms, 200);
    assert!(s.validate().is_ok());
}

#[test]
fn validate_rejects_zero_retry_budget_and_empty_executable() {
    let mut s = Settings::default();
    s.scheduler.retry_count = 0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.player.executable = "  ".to_string();
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.player.response_timeout_ms = 0;
    assert!(s.validate().is_err());
}

#[test]
fn settings_load_from_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[player]
executable = "cvlc"
args = ["-Irc"]
banner_lines = 1
response_timeout_ms = 250

[scheduler]
retry_count = 3
retry_delay_ms = 50
advance_margin_ms = 100

[station]
shuffle = false
repeat = false
extensions = ["mp3"]
max_depth = 2

[controls]
seek_seconds = 30

[ui]
header_text = "hello"
now_playing_fields = ["title", "genre"]
now_playing_separator = " | "

[log]
level = "debug"
file = "/tmp/tapehead-test.log"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("TAPEHEAD_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("TAPEHEAD__SCHEDULER__RETRY_COUNT");

    let s = Settings::load().unwrap();
    assert_eq!(s.player.executable, "cvlc");
    assert_eq!(s.player.args, vec!["-Irc".to_string()]);
    assert_eq!(s.player.banner_lines, 1);
    assert_eq!(s.player.response_timeout_ms, 250);
    assert_eq!(s.player.shutdown_grace_ms, 500);
    assert_eq!(s.scheduler.retry_count, 3);
    assert_eq!(s.scheduler.retry_delay_ms, 50);
    assert_eq!(s.scheduler.advance_margin_ms, 100);
    assert!(!s.station.shuffle);
    assert!(!s.station.repeat);
    assert_eq!(s.station.extensions, vec!["mp3".to_string()]);
    assert_eq!(s.station.max_depth, Some(2));
    assert_eq!(s.controls.seek_seconds, 30);
    assert_eq!(s.ui.header_text, "hello");
    assert_eq!(
        s.ui.now_playing_fields,
        vec![TrackField::Title, TrackField::Genre]
    );
    assert_eq!(s.ui.now_playing_separator, " | ");
    assert_eq!(s.log.level, "debug");
    assert_eq!(
        s.log.file,
        Some(std::path::PathBuf::from("/tmp/tapehead-test.log"))
    );
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[scheduler]
retry_count = 4
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("TAPEHEAD_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("TAPEHEAD__SCHEDULER__RETRY_COUNT", "7");

    let s = Settings::load().unwrap();
    assert_eq!(s.scheduler.retry_count, 7);
}
