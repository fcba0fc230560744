use std::str::FromStr;

use crate::cooldown::CooldownPolicy;
use crate::engine::ActionPolicy;

/// Runtime settings, read from environment variables with defaults
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub bind_addr: String,
    pub checkin_reward: i64,
    pub post_cooldown_secs: i64,
    pub feed_cooldown_secs: i64,
    pub event_cooldown_secs: i64,
    pub ranking_limit: usize,
    /// Fixed seed for the outcome draws; random from the OS when unset
    pub rng_seed: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://distagram.db".to_string(),
            max_connections: 5,
            bind_addr: "0.0.0.0:3000".to_string(),
            checkin_reward: 100,
            post_cooldown_secs: 15,
            feed_cooldown_secs: 10,
            event_cooldown_secs: 300,
            ranking_limit: 5,
            rng_seed: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; unparseable values fall back to
    /// the default
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        fn parsed<T: FromStr>(raw: Option<String>, default: T) -> T {
            raw.and_then(|s| s.trim().parse().ok()).unwrap_or(default)
        }

        Self {
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            max_connections: parsed(lookup("DATABASE_MAX_CONNECTIONS"), defaults.max_connections),
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            checkin_reward: parsed(lookup("CHECKIN_REWARD"), defaults.checkin_reward),
            post_cooldown_secs: parsed(lookup("POST_COOLDOWN_SECS"), defaults.post_cooldown_secs),
            feed_cooldown_secs: parsed(lookup("FEED_COOLDOWN_SECS"), defaults.feed_cooldown_secs),
            event_cooldown_secs: parsed(
                lookup("EVENT_COOLDOWN_SECS"),
                defaults.event_cooldown_secs,
            ),
            ranking_limit: parsed(lookup("RANKING_LIMIT"), defaults.ranking_limit),
            rng_seed: lookup("RNG_SEED").and_then(|s| s.trim().parse().ok()),
        }
    }

    pub fn action_policy(&self) -> ActionPolicy {
        ActionPolicy {
            post: CooldownPolicy::rolling_secs(self.post_cooldown_secs),
            feed: CooldownPolicy::rolling_secs(self.feed_cooldown_secs),
            event: CooldownPolicy::rolling_secs(self.event_cooldown_secs),
            checkin: CooldownPolicy::CalendarDay,
            checkin_reward: self.checkin_reward,
        }
    }
}
