//! Bot configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`), each with a default.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use chrono::TimeDelta;

use crate::error::GameError;

/// Longest round the bot accepts.
pub const MAX_ROUND_DURATION: Duration = Duration::from_secs(24 * 60 * 60);

/// Default round duration.
pub const DEFAULT_ROUND_DURATION: Duration = Duration::from_secs(60);

/// Default reminder lead times, in milliseconds before the deadline.
pub const DEFAULT_LEAD_TIMES_MS: [u64; 5] = [45_000, 30_000, 15_000, 10_000, 5_000];

/// Timing of a single round.
///
/// Constructed through [`GameConfig::new`], which guarantees the lead
/// times are strictly positive, strictly shorter than the round, and
/// sorted descending without duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    round_duration: Duration,
    lead_times: Vec<Duration>,
}

impl GameConfig {
    /// Validates and builds a round configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidConfig`] if the duration is zero or
    /// longer than [`MAX_ROUND_DURATION`], or if any lead time is zero or
    /// not strictly less than the duration.
    pub fn new(round_duration: Duration, lead_times: Vec<Duration>) -> Result<Self, GameError> {
        if round_duration.is_zero() || round_duration > MAX_ROUND_DURATION {
            return Err(GameError::InvalidConfig(format!(
                "round duration must be between 1 ms and {} s, got {} ms",
                MAX_ROUND_DURATION.as_secs(),
                round_duration.as_millis()
            )));
        }
        if let Some(bad) = lead_times
            .iter()
            .find(|lead| lead.is_zero() || **lead >= round_duration)
        {
            return Err(GameError::InvalidConfig(format!(
                "lead time {} ms must be positive and below the round duration of {} ms",
                bad.as_millis(),
                round_duration.as_millis()
            )));
        }

        let mut lead_times = lead_times;
        lead_times.sort_unstable_by(|a, b| b.cmp(a));
        lead_times.dedup();

        Ok(Self {
            round_duration,
            lead_times,
        })
    }

    /// One second rounds with no reminders, for tests and non-interactive use.
    #[must_use]
    pub fn for_tests() -> Self {
        Self {
            round_duration: Duration::from_secs(1),
            lead_times: Vec::new(),
        }
    }

    /// Total time participants have to answer.
    #[must_use]
    pub const fn round_duration(&self) -> Duration {
        self.round_duration
    }

    /// Round duration as a [`TimeDelta`] for wall-clock arithmetic.
    #[must_use]
    pub fn round_duration_delta(&self) -> TimeDelta {
        // Bounded by MAX_ROUND_DURATION, so the conversion cannot overflow.
        TimeDelta::from_std(self.round_duration).unwrap_or(TimeDelta::zero())
    }

    /// Reminder lead times, longest first.
    #[must_use]
    pub fn lead_times(&self) -> &[Duration] {
        &self.lead_times
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            round_duration: DEFAULT_ROUND_DURATION,
            lead_times: DEFAULT_LEAD_TIMES_MS
                .iter()
                .map(|ms| Duration::from_millis(*ms))
                .collect(),
        }
    }
}

/// Top-level bot configuration.
///
/// Loaded once at startup via [`BotConfig::from_env`].
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:3000`).
    pub listen_addr: SocketAddr,

    /// Token the chat platform attaches to event callbacks. Verification
    /// is skipped when unset.
    pub verification_token: Option<String>,

    /// Capacity of the EventBus broadcast channel.
    pub event_bus_capacity: usize,

    /// JSON product catalog. The built-in catalog is used when unset.
    pub product_catalog_path: Option<PathBuf>,

    /// Emit logs as JSON lines instead of human-readable text.
    pub log_json: bool,

    /// Round timing.
    pub game: GameConfig,
}

impl BotConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to sensible defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` is set but cannot be parsed as
    /// a [`SocketAddr`], if `ROUND_LEAD_TIMES_MS` contains a non-numeric
    /// entry, or if the round timing fails [`GameConfig::new`] validation.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let listen_addr: SocketAddr = std::env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
            .parse()?;

        let verification_token = std::env::var("SLACK_VERIFICATION_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty());

        let event_bus_capacity = parse_env("EVENT_BUS_CAPACITY", 10_000);
        let product_catalog_path = std::env::var("PRODUCT_CATALOG_PATH")
            .ok()
            .map(PathBuf::from);
        let log_json = parse_env_bool("LOG_JSON", false);

        let round_duration = Duration::from_millis(parse_env(
            "ROUND_DURATION_MS",
            u64::try_from(DEFAULT_ROUND_DURATION.as_millis()).unwrap_or(60_000),
        ));
        let lead_times = match std::env::var("ROUND_LEAD_TIMES_MS") {
            Ok(raw) => parse_lead_times(&raw)?,
            Err(_) => DEFAULT_LEAD_TIMES_MS
                .iter()
                .map(|ms| Duration::from_millis(*ms))
                .collect(),
        };
        let game = GameConfig::new(round_duration, lead_times)?;

        Ok(Self {
            listen_addr,
            verification_token,
            event_bus_capacity,
            product_catalog_path,
            log_json,
            game,
        })
    }
}

/// Parses a comma-separated list of milliseconds. An empty string yields
/// no lead times.
fn parse_lead_times(raw: &str) -> Result<Vec<Duration>, GameError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|_| GameError::InvalidConfig(format!("invalid lead time: {s:?}")))
        })
        .collect()
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Parses an environment variable as a boolean. Accepts `"true"`, `"1"`,
/// `"false"`, `"0"` (case-insensitive). Returns `default` otherwise.
fn parse_env_bool(key: &str, default: bool) -> bool {
    match std::env::var(key).ok().as_deref() {
        Some("true") | Some("TRUE") | Some("1") => true,
        Some("false") | Some("FALSE") | Some("0") => false,
        _ => default,
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn lead_times_are_sorted_descending() {
        let Ok(cfg) = GameConfig::new(ms(60_000), vec![ms(5_000), ms(45_000), ms(15_000), ms(5_000)])
        else {
            panic!("valid config");
        };
        assert_eq!(cfg.lead_times(), &[ms(45_000), ms(15_000), ms(5_000)]);
    }

    #[test]
    fn lead_time_must_be_below_duration() {
        let result = GameConfig::new(ms(10_000), vec![ms(10_000)]);
        assert!(matches!(result, Err(GameError::InvalidConfig(_))));
    }

    #[test]
    fn zero_duration_rejected() {
        assert!(GameConfig::new(Duration::ZERO, Vec::new()).is_err());
        assert!(GameConfig::new(MAX_ROUND_DURATION + ms(1), Vec::new()).is_err());
    }

    #[test]
    fn test_profile_has_no_reminders() {
        let cfg = GameConfig::for_tests();
        assert_eq!(cfg.round_duration(), ms(1_000));
        assert!(cfg.lead_times().is_empty());
        assert_eq!(cfg.round_duration_delta(), TimeDelta::milliseconds(1_000));
    }

    #[test]
    fn default_profile_matches_constants() {
        let cfg = GameConfig::default();
        assert_eq!(cfg.round_duration(), DEFAULT_ROUND_DURATION);
        assert_eq!(cfg.lead_times().len(), DEFAULT_LEAD_TIMES_MS.len());
        assert_eq!(cfg.lead_times().first(), Some(&ms(45_000)));
    }

    #[test]
    fn parse_lead_times_accepts_list() {
        let parsed = parse_lead_times("3000, 1000,,2000").ok();
        assert_eq!(parsed, Some(vec![ms(3_000), ms(1_000), ms(2_000)]));
        assert_eq!(parse_lead_times("").ok(), Some(Vec::new()));
        assert!(parse_lead_times("soon").is_err());
    }
}
