use crate::retry::RetryPolicy;
use crate::window::LeagueZone;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

// ---------------------------------------------------------------------------
// League configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeagueConfig {
    pub name: String,
    /// Only games tagged with this season are aggregated. `None` takes everything.
    pub season: Option<String>,
    pub season_start: Option<NaiveDate>,
    pub divisions: Vec<DivisionConfig>,
    /// Featured-matchup search order. Divisions not listed follow in the order first seen.
    pub division_priority: Vec<String>,
    pub pinned_matchups: Vec<PinnedMatchup>,
    /// Game of the Week date. Defaults to the most recent Saturday.
    pub featured_date: Option<NaiveDate>,
    pub refresh_secs: u64,
    pub live_poll_secs: u64,
    /// League clock as minutes east of UTC, e.g. `-420` for Arizona. `None` uses the local zone.
    pub utc_offset_minutes: Option<i32>,
    pub retry: RetryPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DivisionConfig {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub short_name: Option<String>,
    /// Added to the excitement score of games in this division.
    #[serde(default)]
    pub bonus: f64,
}

/// Rivalry override: any game between the two named teams gets `bonus` extra excitement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinnedMatchup {
    pub first: String,
    pub second: String,
    pub bonus: f64,
}

impl PinnedMatchup {
    /// Case-insensitive substring match on both names, in either order.
    pub fn matches(&self, a: &str, b: &str) -> bool {
        let hit = |needle: &str, hay: &str| {
            !needle.trim().is_empty() && hay.to_lowercase().contains(&needle.trim().to_lowercase())
        };
        (hit(&self.first, a) && hit(&self.second, b)) || (hit(&self.first, b) && hit(&self.second, a))
    }
}

impl Default for LeagueConfig {
    fn default() -> Self {
        let division = |name: &str, slug: &str, bonus: f64| DivisionConfig {
            name: name.to_owned(),
            slug: slug.to_owned(),
            short_name: None,
            bonus,
        };
        Self {
            name: "Hoops League".to_owned(),
            season: None,
            season_start: None,
            divisions: vec![
                division("10U (5th)", "10u", 0.0),
                division("11U (5th)", "11u", 0.0),
                division("12U (6th)", "12u", 0.0),
                division("13U (7th)", "13u", 15.0),
                division("14U (8th)", "14u", 20.0),
            ],
            division_priority: ["14U (8th)", "13U (7th)", "12U (6th)", "11U (5th)", "10U (5th)"]
                .map(str::to_owned)
                .to_vec(),
            pinned_matchups: Vec::new(),
            featured_date: None,
            refresh_secs: 60,
            live_poll_secs: 15,
            utc_offset_minutes: None,
            retry: RetryPolicy::default(),
        }
    }
}

impl LeagueConfig {
    pub fn zone(&self) -> LeagueZone {
        LeagueZone::from_offset_minutes(self.utc_offset_minutes)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound {
                    path: path.to_owned(),
                }
            } else {
                ConfigError::Io {
                    path: path.to_owned(),
                    source,
                }
            }
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })
    }

    pub fn division(&self, name: &str) -> Option<&DivisionConfig> {
        let name = name.trim();
        self.divisions
            .iter()
            .find(|d| d.name.eq_ignore_ascii_case(name))
    }

    /// Accepts `all`, a slug (`14u`) or a full division name.
    pub fn resolve_scope(&self, input: &str) -> DivisionScope {
        let input = input.trim();
        if input.is_empty() || input.eq_ignore_ascii_case("all") {
            return DivisionScope::All;
        }
        let name = self
            .divisions
            .iter()
            .find(|d| d.slug.eq_ignore_ascii_case(input) || d.name.eq_ignore_ascii_case(input))
            .map(|d| d.name.clone())
            .unwrap_or_else(|| input.to_owned());
        DivisionScope::Division(name)
    }

    /// Compact label for tight spaces: configured short name, else the leading `NNU` token,
    /// else the first word.
    pub fn short_label(&self, division: &str) -> String {
        if let Some(short) = self.division(division).and_then(|d| d.short_name.clone()) {
            return short;
        }
        let first = division.split_whitespace().next().unwrap_or_default();
        let digits = first.chars().take_while(char::is_ascii_digit).count();
        if digits > 0 && first[digits..].to_ascii_uppercase().starts_with('U') {
            return first[..=digits].to_ascii_uppercase();
        }
        first.to_owned()
    }

    pub fn division_bonus(&self, division: &str) -> f64 {
        self.division(division).map(|d| d.bonus).unwrap_or(0.0)
    }

    pub fn priority_index(&self, division: &str) -> Option<usize> {
        let division = division.trim();
        self.division_priority
            .iter()
            .position(|d| d.eq_ignore_ascii_case(division))
    }

    /// Divisions in selector order: configured priority first, then the rest as first seen.
    pub fn ordered_divisions<'a>(&self, seen: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        let mut rest: Vec<String> = Vec::new();
        let seen: Vec<&str> = seen.into_iter().collect();
        for p in &self.division_priority {
            if seen.iter().any(|s| s.trim().eq_ignore_ascii_case(p)) {
                out.push(p.clone());
            }
        }
        for s in seen {
            let s = s.trim();
            if self.priority_index(s).is_none() && !rest.iter().any(|r| r == s) {
                rest.push(s.to_owned());
            }
        }
        out.extend(rest);
        out
    }
}

// ---------------------------------------------------------------------------
// Scope and per-pass context
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DivisionScope {
    #[default]
    All,
    Division(String),
}

impl DivisionScope {
    pub fn contains(&self, division: &str) -> bool {
        match self {
            DivisionScope::All => true,
            DivisionScope::Division(d) => d.trim().eq_ignore_ascii_case(division.trim()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            DivisionScope::All => "All Divisions",
            DivisionScope::Division(d) => d,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            DivisionScope::All => None,
            DivisionScope::Division(d) => Some(d),
        }
    }

    /// Step through `All` and each configured division in order.
    pub fn cycle(&self, config: &LeagueConfig) -> DivisionScope {
        let names: Vec<&str> = config.divisions.iter().map(|d| d.name.as_str()).collect();
        match self {
            DivisionScope::All => names
                .first()
                .map(|n| DivisionScope::Division((*n).to_owned()))
                .unwrap_or_default(),
            DivisionScope::Division(current) => names
                .iter()
                .position(|n| n.eq_ignore_ascii_case(current))
                .and_then(|i| names.get(i + 1))
                .map(|n| DivisionScope::Division((*n).to_owned()))
                .unwrap_or_default(),
        }
    }
}

/// Everything one aggregation pass needs, passed explicitly.
#[derive(Debug, Clone)]
pub struct LeagueContext {
    pub config: LeagueConfig,
    pub scope: DivisionScope,
    pub today: NaiveDate,
}

impl LeagueContext {
    pub fn new(config: LeagueConfig, scope: DivisionScope, today: NaiveDate) -> Self {
        Self { config, scope, today }
    }

    pub fn featured_date(&self) -> NaiveDate {
        self.config
            .featured_date
            .unwrap_or_else(|| crate::window::most_recent_saturday(self.today))
    }
}
