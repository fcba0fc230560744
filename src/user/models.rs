use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Database model for the users table
///
/// Cooldown timestamps are kept exactly as stored (`%Y-%m-%d %H:%M:%S` text)
/// so that a corrupted value can be detected and ignored at read time
/// instead of failing the whole row.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct UserRecord {
    pub user_id: String,
    pub display_name: String,
    pub follower: i64,
    pub following: i64,
    pub like: i64,
    pub hate: i64,
    pub balance: i64,
    pub last_post_time: Option<String>,
    pub last_feed_time: Option<String>,
    pub last_event_time: Option<String>,
    pub last_checkin_time: Option<String>,
}

impl UserRecord {
    /// Creates a freshly registered record: every counter zero, no cooldowns
    pub fn new(user_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            display_name: display_name.into(),
            follower: 0,
            following: 0,
            like: 0,
            hate: 0,
            balance: 0,
            last_post_time: None,
            last_feed_time: None,
            last_event_time: None,
            last_checkin_time: None,
        }
    }

    /// Sets follower, following, like and hate to exactly zero.
    /// Balance and cooldown timestamps are untouched.
    pub fn reset_stats(&mut self) {
        self.follower = 0;
        self.following = 0;
        self.like = 0;
        self.hate = 0;
    }

    pub fn value_of(&self, key: SortKey) -> i64 {
        match key {
            SortKey::Balance => self.balance,
            SortKey::Follower => self.follower,
            SortKey::Like => self.like,
            SortKey::Hate => self.hate,
        }
    }
}

/// Column a ranking query orders by (always descending)
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SortKey {
    Balance,
    Follower,
    Like,
    Hate,
}

impl SortKey {
    /// Quoted SQL column name; `like` is a keyword in SQLite
    pub fn column(&self) -> &'static str {
        match self {
            SortKey::Balance => "balance",
            SortKey::Follower => "follower",
            SortKey::Like => "\"like\"",
            SortKey::Hate => "hate",
        }
    }
}
