use super::{
    errors::OutcomeTableError,
    table::{OutcomeEntry, OutcomeTable, StatDelta},
};

pub const POST_VIRAL: &str = "Your post rode the algorithm!";
pub const POST_BACKLASH: &str = "That post was a little controversial...";
pub const POST_IGNORED: &str = "Your post didn't catch anyone's eye...";

pub const EVENT_ACCOUNT_HACKED: &str = "Your account got hacked";
pub const EVENT_NOTHING: &str = "Nothing happened";

const VIRAL_CAUSES: &[&str] = &[
    "a great post-workout photo",
    "a moody shot from an aesthetic cafe",
    "honestly, just your looks",
    "the hashtag strategy paid off",
    "a story-share giveaway blew it up",
];

const BACKLASH_CAUSES: &[&str] = &[
    "a heartfelt caption read as attention seeking",
    "an offhand remark set people off",
    "way too much photo editing",
    "you touched on politics",
    "it looked like an annoying ad",
];

const IGNORED_CAUSES: &[&str] = &[
    "for some reason everyone skipped this one",
    "the algorithm abandoned you",
    "bad upload timing",
    "posting too often wore people out",
    "the vibes were only felt by you",
];

/// Posts pick positive, negative or neutral with equal chance; the cause is
/// cosmetic and never changes the numbers.
pub fn post_table() -> Result<OutcomeTable, OutcomeTableError> {
    OutcomeTable::uniform(vec![
        OutcomeEntry::delta(POST_VIRAL, StatDelta::stats(10, 0, 30, 0), 1.0)
            .with_flavors(VIRAL_CAUSES),
        OutcomeEntry::delta(POST_BACKLASH, StatDelta::stats(-10, 0, 0, 30), 1.0)
            .with_flavors(BACKLASH_CAUSES),
        OutcomeEntry::delta(POST_IGNORED, StatDelta::default(), 1.0)
            .with_flavors(IGNORED_CAUSES),
    ])
}

pub fn event_table() -> Result<OutcomeTable, OutcomeTableError> {
    OutcomeTable::new(vec![
        OutcomeEntry::delta(
            "You appeared on a TV show!",
            StatDelta::stats(1000, 0, 1000, 0),
            0.1,
        ),
        OutcomeEntry::delta(
            "You fell for a buy-followers scheme...",
            StatDelta::stats(200, 0, 0, 100),
            5.0,
        ),
        OutcomeEntry::delta(
            "You got hacked (following list)",
            StatDelta::stats(-50, 200, 100, 0),
            5.0,
        ),
        OutcomeEntry::delta(
            "Your reel blew up!",
            StatDelta::stats(100, 0, 500, 0),
            10.0,
        ),
        OutcomeEntry::reset(EVENT_ACCOUNT_HACKED, 0.1),
        OutcomeEntry::delta(
            "You signed with an agency!",
            StatDelta::stats(500, 0, 500, 0),
            0.4,
        ),
        OutcomeEntry::delta(
            "You cleaned up your following list!",
            StatDelta::stats(0, -100, 0, 50),
            0.4,
        ),
        OutcomeEntry::delta(
            "You posted hate speech...",
            StatDelta::stats(-200, 0, 0, 500),
            4.5,
        ),
        OutcomeEntry::delta(
            "You posted a donation photo!",
            StatDelta::stats(200, 0, 1000, 0),
            4.5,
        ),
        OutcomeEntry::delta("A small bump", StatDelta::stats(1, 0, 1, 0), 45.0),
        OutcomeEntry::delta(EVENT_NOTHING, StatDelta::default(), 45.0),
    ])
}

/// The tables the action engine draws from
#[derive(Debug, Clone)]
pub struct OutcomeCatalog {
    pub post: OutcomeTable,
    pub event: OutcomeTable,
}

impl OutcomeCatalog {
    pub fn new(post: OutcomeTable, event: OutcomeTable) -> Self {
        Self { post, event }
    }

    pub fn standard() -> Result<Self, OutcomeTableError> {
        Ok(Self::new(post_table()?, event_table()?))
    }
}
