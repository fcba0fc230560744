use rand::distr::{weighted::WeightedIndex, Distribution};
use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::errors::OutcomeTableError;
use crate::user::UserRecord;

/// Signed change to each counter of a record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatDelta {
    pub follower: i64,
    pub following: i64,
    pub like: i64,
    pub hate: i64,
    pub balance: i64,
}

impl StatDelta {
    pub fn stats(follower: i64, following: i64, like: i64, hate: i64) -> Self {
        Self {
            follower,
            following,
            like,
            hate,
            balance: 0,
        }
    }

    pub fn balance(amount: i64) -> Self {
        Self {
            balance: amount,
            ..Self::default()
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }

    /// Adds every field; no floor or ceiling is applied. `None` if any
    /// counter would leave the `i64` range, in which case nothing changes.
    pub fn applied_to(&self, record: &UserRecord) -> Option<UserRecord> {
        Some(UserRecord {
            follower: record.follower.checked_add(self.follower)?,
            following: record.following.checked_add(self.following)?,
            like: record.like.checked_add(self.like)?,
            hate: record.hate.checked_add(self.hate)?,
            balance: record.balance.checked_add(self.balance)?,
            ..record.clone()
        })
    }
}

/// What drawing an outcome does to a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutcomeEffect {
    Delta(StatDelta),
    /// Sets follower, following, like and hate to exactly zero. Applied as an
    /// absolute write, never as deltas computed from possibly stale values.
    Reset,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutcomeEntry {
    pub label: String,
    pub effect: OutcomeEffect,
    /// Relative selection probability
    pub weight: f64,
    /// Cosmetic causes; one is picked uniformly after the entry is drawn
    pub flavors: Vec<String>,
}

impl OutcomeEntry {
    pub fn delta(label: impl Into<String>, delta: StatDelta, weight: f64) -> Self {
        Self {
            label: label.into(),
            effect: OutcomeEffect::Delta(delta),
            weight,
            flavors: Vec::new(),
        }
    }

    pub fn reset(label: impl Into<String>, weight: f64) -> Self {
        Self {
            label: label.into(),
            effect: OutcomeEffect::Reset,
            weight,
            flavors: Vec::new(),
        }
    }

    pub fn with_flavors(mut self, flavors: &[&str]) -> Self {
        self.flavors = flavors.iter().map(|f| f.to_string()).collect();
        self
    }
}

/// Result of one draw
#[derive(Debug, Clone, Copy)]
pub struct Draw<'a> {
    pub entry: &'a OutcomeEntry,
    pub flavor: Option<&'a str>,
}

/// Immutable weighted table of outcomes. Entry `i` is drawn with probability
/// `weight_i / sum(weights)`.
#[derive(Debug, Clone)]
pub struct OutcomeTable {
    entries: Vec<OutcomeEntry>,
    index: WeightedIndex<f64>,
}

impl OutcomeTable {
    pub fn new(entries: Vec<OutcomeEntry>) -> Result<Self, OutcomeTableError> {
        if entries.is_empty() {
            return Err(OutcomeTableError::Empty);
        }

        if let Some(bad) = entries
            .iter()
            .find(|e| !e.weight.is_finite() || e.weight < 0.0)
        {
            return Err(OutcomeTableError::InvalidWeight {
                label: bad.label.clone(),
                weight: bad.weight,
            });
        }

        if entries.iter().map(|e| e.weight).sum::<f64>() <= 0.0 {
            return Err(OutcomeTableError::ZeroTotalWeight);
        }

        let index = WeightedIndex::new(entries.iter().map(|e| e.weight))
            .map_err(|e| OutcomeTableError::Sampler(e.to_string()))?;

        Ok(Self { entries, index })
    }

    /// Same weight for every entry
    pub fn uniform(entries: Vec<OutcomeEntry>) -> Result<Self, OutcomeTableError> {
        Self::new(
            entries
                .into_iter()
                .map(|entry| OutcomeEntry {
                    weight: 1.0,
                    ..entry
                })
                .collect(),
        )
    }

    pub fn entries(&self) -> &[OutcomeEntry] {
        &self.entries
    }

    /// Picks one entry with a single weighted draw, then a flavor if it has any
    pub fn select<R: Rng + ?Sized>(&self, rng: &mut R) -> Draw<'_> {
        let entry = &self.entries[self.index.sample(rng)];
        let flavor = entry.flavors.choose(rng).map(String::as_str);
        Draw { entry, flavor }
    }
}
