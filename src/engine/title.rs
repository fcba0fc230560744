use serde::{Deserialize, Serialize};

use crate::user::UserRecord;

/// Badge shown on a user's feed. Follower tiers win over hate tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "snake_case")]
pub enum Title {
    #[strum(to_string = "Celebrity")]
    Celebrity,
    #[strum(to_string = "Influencer")]
    Influencer,
    #[strum(to_string = "Rising Star")]
    RisingStar,
    #[strum(to_string = "Hate Magnet")]
    HateMagnet,
    #[strum(to_string = "Dark Knight")]
    DarkKnight,
    #[strum(to_string = "Bearer of Misery")]
    BearerOfMisery,
    #[strum(to_string = "Ordinary")]
    Ordinary,
}

impl Title {
    pub fn for_record(record: &UserRecord) -> Self {
        match (record.follower, record.hate) {
            (f, _) if f >= 10_000 => Title::Celebrity,
            (f, _) if f >= 5_000 => Title::Influencer,
            (f, _) if f >= 1_000 => Title::RisingStar,
            (_, h) if h >= 10_000 => Title::HateMagnet,
            (_, h) if h >= 5_000 => Title::DarkKnight,
            (_, h) if h >= 1_000 => Title::BearerOfMisery,
            _ => Title::Ordinary,
        }
    }
}
