//! Engine timing and AI configuration.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ai::registry;
use crate::domain::rules::{DISCUSSION_DURATION, LOBBY_COUNTDOWN, ROAMING_DURATION, VOTING_DURATION};
use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub roaming: Duration,
    pub discussion: Duration,
    pub voting: Duration,
    pub lobby_countdown: Duration,

    /// Roaming AI decision interval, drawn per step from `[min, max)`.
    pub ai_move_interval_min: Duration,
    pub ai_move_interval_max: Duration,
    /// Extra random delay added to each scheduled AI chat.
    pub ai_chat_jitter: Duration,
    pub ai_chat_count_min: u32,
    pub ai_chat_count_max: u32,
    /// AI votes land in `[min(lead, V/4), V - min(tail, V/4))`.
    pub ai_vote_lead: Duration,
    pub ai_vote_tail: Duration,
    /// Upper bound on any single DecisionProvider call.
    pub decision_timeout: Duration,
    /// Registered provider name used for AI seats.
    pub ai_provider: String,

    pub arena_enabled: bool,
    pub arena_start_delay: Duration,
    pub arena_cooldown: Duration,
    pub arena_poll: Duration,
    /// How long a finished lobby match stays readable before it is evicted.
    pub finished_retention: Duration,

    pub broadcast_capacity: usize,
    pub default_entry_fee: u64,
    /// Seeds the registry RNG; `None` draws from the OS.
    pub rng_seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            roaming: ROAMING_DURATION,
            discussion: DISCUSSION_DURATION,
            voting: VOTING_DURATION,
            lobby_countdown: LOBBY_COUNTDOWN,
            ai_move_interval_min: Duration::from_secs(3),
            ai_move_interval_max: Duration::from_secs(7),
            ai_chat_jitter: Duration::from_secs(3),
            ai_chat_count_min: 1,
            ai_chat_count_max: 3,
            ai_vote_lead: Duration::from_secs(2),
            ai_vote_tail: Duration::from_secs(3),
            decision_timeout: Duration::from_secs(5),
            ai_provider: "Heuristic".to_string(),
            arena_enabled: true,
            arena_start_delay: Duration::from_secs(5),
            arena_cooldown: Duration::from_secs(30),
            arena_poll: Duration::from_secs(5),
            finished_retention: Duration::from_secs(300),
            broadcast_capacity: 256,
            default_entry_fee: 0,
            rng_seed: None,
        }
    }
}

fn parse<T: FromStr>(key: &str, raw: &str) -> Result<T, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::config(format!("{key} has invalid value '{raw}'")))
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, AppError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(AppError::config(format!("{key} must be a boolean, got '{raw}'"))),
    }
}

impl EngineConfig {
    /// Defaults with a fixed seed and no arena loop.
    pub fn for_tests() -> Self {
        Self {
            arena_enabled: false,
            rng_seed: Some(0x5eed),
            ..Self::default()
        }
    }

    /// Defaults overridden by `BEANPOT_*` environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        let secs = |key: &str, slot: &mut Duration| -> Result<(), AppError> {
            if let Some(raw) = lookup(key) {
                *slot = Duration::from_secs(parse(key, &raw)?);
            }
            Ok(())
        };
        secs("BEANPOT_ROAMING_SECS", &mut cfg.roaming)?;
        secs("BEANPOT_DISCUSSION_SECS", &mut cfg.discussion)?;
        secs("BEANPOT_VOTING_SECS", &mut cfg.voting)?;
        secs("BEANPOT_LOBBY_COUNTDOWN_SECS", &mut cfg.lobby_countdown)?;
        secs("BEANPOT_ARENA_START_DELAY_SECS", &mut cfg.arena_start_delay)?;
        secs("BEANPOT_ARENA_COOLDOWN_SECS", &mut cfg.arena_cooldown)?;
        secs("BEANPOT_ARENA_POLL_SECS", &mut cfg.arena_poll)?;
        secs("BEANPOT_FINISHED_RETENTION_SECS", &mut cfg.finished_retention)?;

        let millis = |key: &str, slot: &mut Duration| -> Result<(), AppError> {
            if let Some(raw) = lookup(key) {
                *slot = Duration::from_millis(parse(key, &raw)?);
            }
            Ok(())
        };
        millis("BEANPOT_AI_MOVE_MIN_MS", &mut cfg.ai_move_interval_min)?;
        millis("BEANPOT_AI_MOVE_MAX_MS", &mut cfg.ai_move_interval_max)?;
        millis("BEANPOT_AI_CHAT_JITTER_MS", &mut cfg.ai_chat_jitter)?;
        millis("BEANPOT_AI_VOTE_LEAD_MS", &mut cfg.ai_vote_lead)?;
        millis("BEANPOT_AI_VOTE_TAIL_MS", &mut cfg.ai_vote_tail)?;
        millis("BEANPOT_DECISION_TIMEOUT_MS", &mut cfg.decision_timeout)?;

        if let Some(raw) = lookup("BEANPOT_AI_CHAT_MIN") {
            cfg.ai_chat_count_min = parse("BEANPOT_AI_CHAT_MIN", &raw)?;
        }
        if let Some(raw) = lookup("BEANPOT_AI_CHAT_MAX") {
            cfg.ai_chat_count_max = parse("BEANPOT_AI_CHAT_MAX", &raw)?;
        }
        if let Some(raw) = lookup("BEANPOT_AI_PROVIDER") {
            cfg.ai_provider = raw.trim().to_string();
        }
        if let Some(raw) = lookup("BEANPOT_ARENA_ENABLED") {
            cfg.arena_enabled = parse_bool("BEANPOT_ARENA_ENABLED", &raw)?;
        }
        if let Some(raw) = lookup("BEANPOT_BROADCAST_CAPACITY") {
            cfg.broadcast_capacity = parse("BEANPOT_BROADCAST_CAPACITY", &raw)?;
        }
        if let Some(raw) = lookup("BEANPOT_ENTRY_FEE") {
            cfg.default_entry_fee = parse("BEANPOT_ENTRY_FEE", &raw)?;
        }
        if let Some(raw) = lookup("BEANPOT_SEED") {
            cfg.rng_seed = Some(parse("BEANPOT_SEED", &raw)?);
        }

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        for (name, d) in [
            ("roaming", self.roaming),
            ("discussion", self.discussion),
            ("voting", self.voting),
            ("lobby countdown", self.lobby_countdown),
            ("decision timeout", self.decision_timeout),
            ("arena poll", self.arena_poll),
            ("AI move interval", self.ai_move_interval_min),
        ] {
            if d.is_zero() {
                return Err(AppError::config(format!("{name} duration must be non-zero")));
            }
        }
        if self.ai_move_interval_min > self.ai_move_interval_max {
            return Err(AppError::config(
                "AI move interval minimum exceeds its maximum",
            ));
        }
        if self.ai_chat_count_min > self.ai_chat_count_max {
            return Err(AppError::config("AI chat count minimum exceeds its maximum"));
        }
        if self.broadcast_capacity == 0 {
            return Err(AppError::config("broadcast capacity must be non-zero"));
        }
        if registry::by_name(&self.ai_provider).is_none() {
            return Err(AppError::config(format!(
                "unknown AI provider '{}'",
                self.ai_provider
            )));
        }
        Ok(())
    }

    /// Window inside the voting phase in which an AI vote may land.
    pub fn ai_vote_window(&self) -> (Duration, Duration) {
        let quarter = self.voting / 4;
        let start = self.ai_vote_lead.min(quarter);
        let end = self.voting.saturating_sub(self.ai_vote_tail.min(quarter));
        (start, end.max(start))
    }
}
