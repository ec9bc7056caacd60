//! Client configuration loaded from environment variables.
//!
//! The binary layers `clap` flags over these values; the library only sees
//! the resulting `Config`.

use std::env;
use std::str::FromStr;

use crate::error::ClientError;
use crate::session::state::Phase;

const DEFAULT_ANIMATION_SPEED_MS: u64 = 400;
const DEFAULT_PHASE_DURATIONS: [i64; 5] = [30, 120, 60, 30, 10];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

impl FromStr for LogFormat {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            other => Err(ClientError::config(
                format!("CLIENT_LOG_FORMAT must be 'json' or 'pretty', got '{other}'"),
                "invalid log format",
            )),
        }
    }
}

/// Fallback phase lengths in seconds, used when the server omits `timeout`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseDurations([i64; 5]);

impl Default for PhaseDurations {
    fn default() -> Self {
        Self(DEFAULT_PHASE_DURATIONS)
    }
}

impl PhaseDurations {
    pub const fn new(seconds: [i64; 5]) -> Self {
        Self(seconds)
    }

    /// Seconds allotted to `phase`; `None` has no timer.
    pub fn for_phase(&self, phase: Phase) -> Option<i64> {
        usize::try_from(phase.code())
            .ok()
            .and_then(|idx| self.0.get(idx).copied())
    }
}

impl FromStr for PhaseDurations {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 5 {
            return Err(ClientError::config(
                format!("PHASE_DURATIONS needs 5 comma separated values, got {}", parts.len()),
                "invalid phase durations",
            ));
        }
        let mut seconds = [0i64; 5];
        for (slot, part) in seconds.iter_mut().zip(parts) {
            *slot = part.parse::<i64>().map_err(|e| {
                ClientError::config(format!("PHASE_DURATIONS value '{part}' is not a number"), e)
            })?;
        }
        Ok(Self(seconds))
    }
}

/// Centralized client configuration
#[derive(Debug, Clone)]
pub struct Config {
    // Connection
    pub server_url: String,
    pub username: String,
    pub token: String,
    pub lobby_code: String,

    // Presentation timing
    pub animation_speed_ms: u64,
    pub phase_durations: PhaseDurations,
    pub provisional_draw: bool,

    pub log_format: LogFormat,
}

impl Config {
    /// Config for in-process use (tests, embedding) without touching the
    /// environment.
    pub fn new(
        server_url: impl Into<String>,
        username: impl Into<String>,
        token: impl Into<String>,
        lobby_code: impl Into<String>,
    ) -> Self {
        Self {
            server_url: server_url.into(),
            username: username.into(),
            token: token.into(),
            lobby_code: lobby_code.into(),
            animation_speed_ms: DEFAULT_ANIMATION_SPEED_MS,
            phase_durations: PhaseDurations::default(),
            provisional_draw: false,
            log_format: LogFormat::default(),
        }
    }

    /// Load and validate all configuration from environment variables
    pub fn from_env() -> Result<Self, ClientError> {
        let server_url = required("GAME_SERVER_URL")?;
        let username = required("GAME_USERNAME")?;
        let token = required("GAME_TOKEN")?;
        let lobby_code = required("GAME_LOBBY_CODE")?;

        let animation_speed_ms = match env::var("ANIMATION_SPEED_MS") {
            Ok(raw) => raw.trim().parse::<u64>().map_err(|e| {
                ClientError::config(
                    format!("ANIMATION_SPEED_MS must be a non-negative integer, got '{raw}'"),
                    e,
                )
            })?,
            Err(_) => DEFAULT_ANIMATION_SPEED_MS,
        };

        let phase_durations = match env::var("PHASE_DURATIONS") {
            Ok(raw) => raw.parse()?,
            Err(_) => PhaseDurations::default(),
        };

        let provisional_draw = env::var("PROVISIONAL_DRAW")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let log_format = match env::var("CLIENT_LOG_FORMAT") {
            Ok(raw) => raw.parse()?,
            Err(_) => LogFormat::default(),
        };

        Ok(Config {
            server_url,
            username,
            token,
            lobby_code,
            animation_speed_ms,
            phase_durations,
            provisional_draw,
            log_format,
        })
    }
}

fn required(name: &str) -> Result<String, ClientError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ClientError::missing_env(name)),
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    const VARS: [&str; 8] = [
        "GAME_SERVER_URL",
        "GAME_USERNAME",
        "GAME_TOKEN",
        "GAME_LOBBY_CODE",
        "ANIMATION_SPEED_MS",
        "PHASE_DURATIONS",
        "PROVISIONAL_DRAW",
        "CLIENT_LOG_FORMAT",
    ];

    fn clear() {
        for name in VARS {
            env::remove_var(name);
        }
    }

    fn set_required() {
        env::set_var("GAME_SERVER_URL", "ws://localhost:8080");
        env::set_var("GAME_USERNAME", "ana");
        env::set_var("GAME_TOKEN", "token");
        env::set_var("GAME_LOBBY_CODE", "ABCD");
    }

    #[test]
    #[serial]
    fn loads_defaults_for_optional_values() {
        clear();
        set_required();

        let cfg = Config::from_env().expect("config");
        assert_eq!(cfg.lobby_code, "ABCD");
        assert_eq!(cfg.animation_speed_ms, DEFAULT_ANIMATION_SPEED_MS);
        assert_eq!(cfg.phase_durations, PhaseDurations::default());
        assert!(!cfg.provisional_draw);
        assert_eq!(cfg.log_format, LogFormat::Json);
        clear();
    }

    #[test]
    #[serial]
    fn missing_required_variable_is_config_error() {
        clear();
        set_required();
        env::remove_var("GAME_TOKEN");

        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ClientError::Config { .. }));
        assert!(err.to_string().contains("GAME_TOKEN"));
        clear();
    }

    #[test]
    #[serial]
    fn zero_animation_speed_is_accepted() {
        clear();
        set_required();
        env::set_var("ANIMATION_SPEED_MS", "0");
        env::set_var("PROVISIONAL_DRAW", "true");

        let cfg = Config::from_env().expect("config");
        assert_eq!(cfg.animation_speed_ms, 0);
        assert!(cfg.provisional_draw);
        clear();
    }

    #[test]
    #[serial]
    fn rejects_bad_numbers() {
        clear();
        set_required();
        env::set_var("ANIMATION_SPEED_MS", "fast");
        assert!(Config::from_env().is_err());

        env::remove_var("ANIMATION_SPEED_MS");
        env::set_var("PHASE_DURATIONS", "30,120");
        assert!(Config::from_env().is_err());
        clear();
    }

    #[test]
    fn phase_durations_index_by_phase_code() {
        let durations: PhaseDurations = "10, 20, 30, 40, 50".parse().expect("durations");
        assert_eq!(durations.for_phase(Phase::Blind), Some(10));
        assert_eq!(durations.for_phase(Phase::AnnounceWinner), Some(50));
        assert_eq!(durations.for_phase(Phase::None), None);
    }
}
