use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::title::Title;
use crate::cooldown::{format_timestamp, CooldownPolicy};
use crate::outcome::{OutcomeEffect, StatDelta};
use crate::user::UserRecord;

/// A gated user action
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ActionKind {
    Post,
    Feed,
    Event,
    CheckIn,
}

impl ActionKind {
    /// Raw stored timestamp of the last time this action succeeded
    pub fn last_time<'a>(&self, record: &'a UserRecord) -> Option<&'a str> {
        match self {
            ActionKind::Post => record.last_post_time.as_deref(),
            ActionKind::Feed => record.last_feed_time.as_deref(),
            ActionKind::Event => record.last_event_time.as_deref(),
            ActionKind::CheckIn => record.last_checkin_time.as_deref(),
        }
    }

    pub fn stamp(&self, record: &mut UserRecord, now: NaiveDateTime) {
        let stamped = Some(format_timestamp(now));
        match self {
            ActionKind::Post => record.last_post_time = stamped,
            ActionKind::Feed => record.last_feed_time = stamped,
            ActionKind::Event => record.last_event_time = stamped,
            ActionKind::CheckIn => record.last_checkin_time = stamped,
        }
    }
}

/// Cooldown per action kind plus the fixed check-in reward
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionPolicy {
    pub post: CooldownPolicy,
    pub feed: CooldownPolicy,
    pub event: CooldownPolicy,
    pub checkin: CooldownPolicy,
    pub checkin_reward: i64,
}

impl Default for ActionPolicy {
    fn default() -> Self {
        Self {
            post: CooldownPolicy::Rolling(Duration::seconds(15)),
            feed: CooldownPolicy::Rolling(Duration::seconds(10)),
            event: CooldownPolicy::Rolling(Duration::minutes(5)),
            checkin: CooldownPolicy::CalendarDay,
            checkin_reward: 100,
        }
    }
}

impl ActionPolicy {
    /// No cooldown on anything; handy when a test wants to repeat actions
    pub fn unlimited() -> Self {
        Self {
            post: CooldownPolicy::Unlimited,
            feed: CooldownPolicy::Unlimited,
            event: CooldownPolicy::Unlimited,
            checkin: CooldownPolicy::Unlimited,
            ..Self::default()
        }
    }

    pub fn cooldown_for(&self, kind: ActionKind) -> CooldownPolicy {
        match kind {
            ActionKind::Post => self.post,
            ActionKind::Feed => self.feed,
            ActionKind::Event => self.event,
            ActionKind::CheckIn => self.checkin,
        }
    }
}

/// Result of a successful action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub kind: ActionKind,
    pub label: String,
    pub flavor: Option<String>,
    /// Delta that was added, or `Reset` when the four stats were zeroed
    pub effect: OutcomeEffect,
    /// Record as persisted
    pub record: UserRecord,
    pub title: Title,
    pub performed_at: NaiveDateTime,
}

impl ActionOutcome {
    /// Human-readable summary for the caller to render
    pub fn message(&self) -> String {
        let mut lines = vec![self.label.clone()];
        if let Some(flavor) = &self.flavor {
            lines.push(format!("(cause: {flavor})"));
        }

        match (self.kind, self.effect) {
            (ActionKind::Feed, _) => {
                let r = &self.record;
                lines.push(format!(
                    "{}: {} followers / {} following / {} likes / {} hates",
                    r.display_name, r.follower, r.following, r.like, r.hate
                ));
                lines.push(format!("Title: {}", self.title));
            }
            (ActionKind::CheckIn, OutcomeEffect::Delta(delta)) => {
                lines.push(format!("Reward: {}", delta.balance));
                lines.push(format!("Balance: {}", self.record.balance));
            }
            (_, OutcomeEffect::Reset) => {
                lines.push("Followers, following, likes and hates were all reset to 0".to_string());
            }
            (_, OutcomeEffect::Delta(delta)) => lines.push(describe_delta(&delta)),
        }

        lines.join("\n")
    }
}

/// "+10 followers / +30 likes", or "no change"
pub fn describe_delta(delta: &StatDelta) -> String {
    let parts: Vec<String> = [
        (delta.follower, "followers"),
        (delta.following, "following"),
        (delta.like, "likes"),
        (delta.hate, "hates"),
        (delta.balance, "balance"),
    ]
    .into_iter()
    .filter(|(value, _)| *value != 0)
    .map(|(value, name)| format!("{value:+} {name}"))
    .collect();

    if parts.is_empty() {
        "no change".to_string()
    } else {
        parts.join(" / ")
    }
}
