pub mod auth;
pub mod board;
pub mod client;
pub mod error;
pub mod firestore;
pub mod game_of_week;
pub mod league;
pub mod live;
pub mod matchup;
pub mod memory;
pub mod normalize;
pub mod records;
pub mod retry;
pub mod standings;
pub mod ticker;
pub mod window;

pub use error::{StoreError, StoreResult};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Domain types, independent of the document-store wire format
// ---------------------------------------------------------------------------

/// A team as seeded into the store. Records are always recomputed from games.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Team {
    pub id: String,
    pub name: String,
    pub division: String,
}

impl Team {
    pub fn key(&self) -> TeamKey {
        TeamKey::new(&self.division, &self.name)
    }
}

/// Team names repeat across divisions; (division, name) is the real identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TeamKey {
    pub division: String,
    pub name: String,
}

impl TeamKey {
    pub fn new(division: &str, name: &str) -> Self {
        Self {
            division: division.trim().to_owned(),
            name: name.trim().to_owned(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Game {
    pub id: String,
    pub division: String,
    pub home: Option<String>, // None = TBD bracket slot
    pub away: Option<String>,
    pub status: GameStatus,
    pub score: Option<(u32, u32)>, // (home, away)
    pub scheduled_for: Option<DateTime<Utc>>,
    pub time_label: Option<String>, // "8:00 AM" as entered by the scorekeeper
    pub court: Option<String>,
    pub kind: GameKind,
    pub season: Option<String>,
    pub game_number: Option<u32>,
    pub period: Option<String>,
    pub clock: Option<String>,
}

impl Game {
    pub fn is_live(&self) -> bool {
        self.status == GameStatus::InProgress
    }

    pub fn is_completed(&self) -> bool {
        self.status == GameStatus::Completed
    }

    pub fn home_label(&self) -> &str {
        self.home.as_deref().unwrap_or(TBD)
    }

    pub fn away_label(&self) -> &str {
        self.away.as_deref().unwrap_or(TBD)
    }

    pub fn total_points(&self) -> Option<u64> {
        self.score.map(|(h, a)| u64::from(h) + u64::from(a))
    }

    pub fn margin(&self) -> Option<u32> {
        self.score.map(|(h, a)| h.abs_diff(a))
    }

    /// Winner and loser names for a decided game; `None` for ties or missing scores.
    pub fn decision(&self) -> Option<(&str, &str)> {
        let (h, a) = self.score?;
        let home = self.home.as_deref()?;
        let away = self.away.as_deref()?;
        match h.cmp(&a) {
            std::cmp::Ordering::Greater => Some((home, away)),
            std::cmp::Ordering::Less => Some((away, home)),
            std::cmp::Ordering::Equal => None,
        }
    }
}

pub const TBD: &str = "TBD";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    #[default]
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
    Postponed,
}

impl GameStatus {
    pub fn label(&self) -> &'static str {
        match self {
            GameStatus::Scheduled => "Scheduled",
            GameStatus::InProgress => "Live",
            GameStatus::Completed => "Final",
            GameStatus::Cancelled => "Cancelled",
            GameStatus::Postponed => "Postponed",
        }
    }

    /// No further score changes are expected.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            GameStatus::Completed | GameStatus::Cancelled | GameStatus::Postponed
        )
    }

    /// Raw strings the store may hold for this state. The first entry is canonical.
    pub fn synonyms(&self) -> &'static [&'static str] {
        match self {
            GameStatus::Scheduled => &["scheduled", "upcoming", "pending"],
            GameStatus::InProgress => &["in_progress", "in-progress", "live", "halftime"],
            GameStatus::Completed => &["completed", "final", "finished", "complete"],
            GameStatus::Cancelled => &["cancelled", "canceled"],
            GameStatus::Postponed => &["postponed", "suspended"],
        }
    }

    pub const ALL: [GameStatus; 5] = [
        GameStatus::Scheduled,
        GameStatus::InProgress,
        GameStatus::Completed,
        GameStatus::Cancelled,
        GameStatus::Postponed,
    ];
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GameKind {
    #[default]
    Regular,
    PoolPlay,
    Bracket,
    Championship,
}

impl GameKind {
    pub fn label(&self) -> &'static str {
        match self {
            GameKind::Regular => "Game",
            GameKind::PoolPlay => "Pool Play",
            GameKind::Bracket => "Bracket",
            GameKind::Championship => "Championship",
        }
    }
}

/// Signed-in user as stored in the `users` collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserProfile {
    pub uid: String,
    pub email: Option<String>,
    pub role: Option<String>,
    pub display_name: String,
    pub team_id: Option<String>,
    pub team_name: Option<String>,
}
