// Process configuration: IPC directory and poll interval. Environment
// variables take precedence over an optional on-disk override file,
// which in turn overrides the built-in defaults. Hand-rolled key=value
// parsing (no serde), eprintln!-reported failures, defaults on any error.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_DIR: &str = "mednafen_debug";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 10;

#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding `mednafen_action.txt`, `mednafen_ack.txt`, and
    /// `watchpoint_hits.txt`.
    pub base_dir: PathBuf,
    /// Spin-wait interval for the frame and instruction pause loops
    /// (roughly 10ms by default), configurable for test determinism.
    pub poll_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from(DEFAULT_BASE_DIR),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }
}

impl Config {
    /// Path to the on-disk override file, if a config directory can be
    /// determined for this platform.
    pub fn config_path() -> Option<PathBuf> {
        config_dir().map(|d| d.join("config.txt"))
    }

    /// Load configuration: defaults, then the on-disk override file (if
    /// present), then environment variables, each layer overriding the
    /// last. Never fails; any parse error is reported to stderr and the
    /// offending value is skipped.
    pub fn load() -> Self {
        let mut config = Self::default();

        if let Some(path) = Self::config_path() {
            if path.exists() {
                match std::fs::read_to_string(&path) {
                    Ok(content) => config.apply_file(&content),
                    Err(e) => eprintln!("[ss-dbgbridge] cannot read config {}: {e}", path.display()),
                }
            }
        }

        if let Ok(dir) = std::env::var("SS_DBGBRIDGE_BASE_DIR") {
            config.base_dir = PathBuf::from(dir);
        }
        if let Ok(ms) = std::env::var("SS_DBGBRIDGE_POLL_MS") {
            match ms.parse::<u64>() {
                Ok(n) => config.poll_interval = Duration::from_millis(n),
                Err(e) => eprintln!("[ss-dbgbridge] invalid SS_DBGBRIDGE_POLL_MS '{ms}': {e}"),
            }
        }

        config
    }

    fn apply_file(&mut self, content: &str) {
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, val)) = line.split_once('=') else {
                eprintln!("[ss-dbgbridge] ignoring malformed config line: {line}");
                continue;
            };
            let val = val.trim();
            match key.trim() {
                "base_dir" => self.base_dir = PathBuf::from(val),
                "poll_interval_ms" => match val.parse::<u64>() {
                    Ok(n) => self.poll_interval = Duration::from_millis(n),
                    Err(e) => eprintln!("[ss-dbgbridge] invalid poll_interval_ms '{val}': {e}"),
                },
                other => eprintln!("[ss-dbgbridge] unknown config key '{other}', ignored"),
            }
        }
    }
}

/// Platform config directory, `<platform-config-root>/ss-dbgbridge/`.
fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        let home = std::env::var("HOME").ok()?;
        Some(
            PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("ss-dbgbridge"),
        )
    }

    #[cfg(target_os = "windows")]
    {
        let appdata = std::env::var("APPDATA").ok()?;
        Some(PathBuf::from(appdata).join("ss-dbgbridge"))
    }

    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        let home = std::env::var("HOME").ok()?;
        Some(PathBuf::from(home).join(".config").join("ss-dbgbridge"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_no_file_or_env() {
        let config = Config::default();
        assert_eq!(config.base_dir, PathBuf::from(DEFAULT_BASE_DIR));
        assert_eq!(config.poll_interval, Duration::from_millis(DEFAULT_POLL_INTERVAL_MS));
    }

    #[test]
    fn file_overrides_are_applied() {
        let mut config = Config::default();
        config.apply_file("base_dir = /tmp/ipc\npoll_interval_ms = 5\n# a comment\n");
        assert_eq!(config.base_dir, PathBuf::from("/tmp/ipc"));
        assert_eq!(config.poll_interval, Duration::from_millis(5));
    }

    #[test]
    fn malformed_poll_interval_is_ignored_not_fatal() {
        let mut config = Config::default();
        config.apply_file("poll_interval_ms = not_a_number\n");
        assert_eq!(config.poll_interval, Duration::from_millis(DEFAULT_POLL_INTERVAL_MS));
    }
}
