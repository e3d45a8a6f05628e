/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to defaults if the file is missing, unreadable or invalid.
/// Board size is fixed and deliberately not part of the file.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::snake::{INITIAL_SPEED, MAX_SPEED};

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub speed: SpeedConfig,
    pub gamepad: GamepadConfig,
    pub log_file: PathBuf,
    pub log_level: log::LevelFilter,
    pub sound: bool,
    /// Where the settings came from, for the startup log line.
    pub source: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpeedConfig {
    pub initial: u32, // ticks per second at start and after restart
    pub max: u32,
}

impl Default for SpeedConfig {
    fn default() -> Self {
        SpeedConfig { initial: INITIAL_SPEED, max: MAX_SPEED }
    }
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub pause: Vec<String>,
    pub restart: Vec<String>,
    pub quit: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse error in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid setting {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    speed: TomlSpeed,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlSpeed {
    #[serde(default = "default_initial_speed")]
    initial: u32,
    #[serde(default = "default_max_speed")]
    max: u32,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_pause")]
    pause: Vec<String>,
    #[serde(default = "default_restart")]
    restart: Vec<String>,
    #[serde(default = "default_quit")]
    quit: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_log_file")]
    log_file: String,
    #[serde(default = "default_log_level")]
    log_level: String,
    #[serde(default = "default_sound")]
    sound: bool,
}

// ── Defaults ──

fn default_initial_speed() -> u32 { INITIAL_SPEED }
fn default_max_speed() -> u32 { MAX_SPEED }

fn default_pause() -> Vec<String> { vec!["Start".into()] }
fn default_restart() -> Vec<String> { vec!["A".into()] }
fn default_quit() -> Vec<String> { vec!["Select".into()] }

fn default_log_file() -> String { "snake.log".into() }
fn default_log_level() -> String { "info".into() }
fn default_sound() -> bool { true }

impl Default for TomlSpeed {
    fn default() -> Self {
        TomlSpeed {
            initial: default_initial_speed(),
            max: default_max_speed(),
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            pause: default_pause(),
            restart: default_restart(),
            quit: default_quit(),
        }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            log_file: default_log_file(),
            log_level: default_log_level(),
            sound: default_sound(),
        }
    }
}

// ── Loading ──

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            speed: SpeedConfig::default(),
            gamepad: GamepadConfig {
                pause: default_pause(),
                restart: default_restart(),
                quit: default_quit(),
            },
            log_file: PathBuf::from(default_log_file()),
            log_level: log::LevelFilter::Info,
            sound: default_sound(),
            source: None,
        }
    }
}

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Returns the config plus any problem found on the way, so the caller
    /// can log it once the logger is up.
    pub fn load() -> (Self, Option<ConfigError>) {
        for dir in candidate_dirs() {
            let path = dir.join("config.toml");
            if path.exists() {
                return match GameConfig::from_file(&path) {
                    Ok(cfg) => (cfg, None),
                    Err(e) => (GameConfig::default(), Some(e)),
                };
            }
        }
        (GameConfig::default(), None)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let parsed = toml::from_str::<TomlConfig>(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        GameConfig::from_toml(parsed, Some(path.to_path_buf()))
    }

    fn from_toml(cfg: TomlConfig, source: Option<PathBuf>) -> Result<Self, ConfigError> {
        if cfg.speed.initial == 0 {
            return Err(ConfigError::Invalid {
                key: "speed.initial",
                reason: "must be at least 1".into(),
            });
        }
        if cfg.speed.max < cfg.speed.initial {
            return Err(ConfigError::Invalid {
                key: "speed.max",
                reason: format!("{} is below speed.initial ({})", cfg.speed.max, cfg.speed.initial),
            });
        }
        let log_level = cfg.general.log_level.parse::<log::LevelFilter>().map_err(|_| {
            ConfigError::Invalid {
                key: "general.log_level",
                reason: format!("unknown level {:?}", cfg.general.log_level),
            }
        })?;

        Ok(GameConfig {
            speed: SpeedConfig {
                initial: cfg.speed.initial,
                max: cfg.speed.max,
            },
            gamepad: GamepadConfig {
                pause: cfg.gamepad.pause,
                restart: cfg.gamepad.restart,
                quit: cfg.gamepad.quit,
            },
            log_file: PathBuf::from(cfg.general.log_file),
            log_level,
            sound: cfg.general.sound,
            source,
        })
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    dirs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<GameConfig, ConfigError> {
        let cfg: TomlConfig = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: PathBuf::from("test.toml"),
            source,
        })?;
        GameConfig::from_toml(cfg, None)
    }

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = parse("").unwrap();
        assert_eq!(cfg.speed, SpeedConfig { initial: 20, max: 100 });
        assert_eq!(cfg.log_file, PathBuf::from("snake.log"));
        assert_eq!(cfg.log_level, log::LevelFilter::Info);
        assert!(cfg.sound);
        assert_eq!(cfg.gamepad.pause, vec!["Start".to_string()]);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = parse(
            r#"
            [speed]
            initial = 10

            [general]
            sound = false
            log_level = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.speed, SpeedConfig { initial: 10, max: 100 });
        assert!(!cfg.sound);
        assert_eq!(cfg.log_level, log::LevelFilter::Debug);
        assert_eq!(cfg.gamepad.quit, vec!["Select".to_string()]);
    }

    #[test]
    fn zero_speed_is_rejected() {
        let err = parse("[speed]\ninitial = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "speed.initial", .. }));
    }

    #[test]
    fn cap_below_initial_is_rejected() {
        let err = parse("[speed]\ninitial = 50\nmax = 30\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "speed.max", .. }));
    }

    #[test]
    fn unknown_log_level_is_rejected() {
        let err = parse("[general]\nlog_level = \"loud\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "general.log_level", .. }));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = parse("[speed\ninitial = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = GameConfig::from_file(Path::new("/nonexistent/dir/config.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
