//! Ingestion: raw store documents → canonical `Team` / `Game` / `UserProfile`.
//!
//! Every legacy field alias and status synonym is handled here and nowhere else.

use crate::firestore::{Document, Value};
use crate::{Game, GameKind, GameStatus, TBD, Team, UserProfile};
use log::{debug, warn};
use std::collections::BTreeMap;

const HOME_NAME_FIELDS: [&str; 3] = ["homeTeam", "team1", "homeTeamName"];
const AWAY_NAME_FIELDS: [&str; 3] = ["awayTeam", "team2", "awayTeamName"];
const HOME_SCORE_FIELDS: [&str; 2] = ["score1", "homeScore"];
const AWAY_SCORE_FIELDS: [&str; 2] = ["score2", "awayScore"];

type Fields = BTreeMap<String, Value>;

/// Map a `teams` document. Documents without a usable name are dropped.
pub fn team_from_document(doc: &Document) -> Option<Team> {
    let name = first_string(&doc.fields, &["name", "teamName"]);
    let Some(name) = name else {
        warn!("team document {} has no name, skipping", doc.id());
        return None;
    };
    Some(Team {
        id: doc.id().to_owned(),
        name,
        division: first_string(&doc.fields, &["division"]).unwrap_or_default(),
    })
}

pub fn game_from_document(doc: &Document) -> Game {
    let fields = &doc.fields;

    let status = match first_string(fields, &["status"]) {
        Some(raw) => parse_status(&raw),
        None => GameStatus::Scheduled,
    };

    Game {
        id: doc.id().to_owned(),
        division: first_string(fields, &["division"]).unwrap_or_default(),
        home: side_name(fields, &HOME_NAME_FIELDS),
        away: side_name(fields, &AWAY_NAME_FIELDS),
        status,
        score: score_pair(fields),
        scheduled_for: ["scheduledFor", "date"]
            .iter()
            .find_map(|k| fields.get(*k).and_then(Value::as_timestamp)),
        time_label: first_string(fields, &["time"]),
        court: first_string(fields, &["court", "location"]),
        kind: first_string(fields, &["gameType"])
            .map(|s| parse_kind(&s))
            .unwrap_or_default(),
        season: fields.get("season").and_then(text_of),
        game_number: fields
            .get("gameNumber")
            .and_then(Value::as_i64)
            .and_then(|n| u32::try_from(n).ok()),
        period: fields.get("quarter").and_then(text_of),
        clock: first_string(fields, &["timeRemaining"]),
    }
}

pub fn user_profile_from_document(doc: &Document) -> UserProfile {
    let fields = &doc.fields;
    let email = first_string(fields, &["email"]);
    let display_name = first_string(fields, &["displayName"])
        .or_else(|| {
            email
                .as_deref()
                .and_then(|e| e.split('@').next())
                .filter(|local| !local.is_empty())
                .map(str::to_owned)
        })
        .unwrap_or_else(|| "User".to_owned());

    UserProfile {
        uid: doc.id().to_owned(),
        email,
        role: first_string(fields, &["role"]).map(|r| r.to_ascii_lowercase()),
        display_name,
        team_id: first_string(fields, &["teamId"]),
        team_name: first_string(fields, &["teamName"]),
    }
}

/// Collapse the status strings found in the wild onto the closed set.
pub fn parse_status(raw: &str) -> GameStatus {
    let needle = raw.trim().to_ascii_lowercase();
    GameStatus::ALL
        .into_iter()
        .find(|s| s.synonyms().contains(&needle.as_str()))
        .unwrap_or_else(|| {
            debug!("unknown game status {raw:?}, treating as scheduled");
            GameStatus::Scheduled
        })
}

fn parse_kind(raw: &str) -> GameKind {
    match raw.trim().to_ascii_lowercase().as_str() {
        "pool play" | "pool" => GameKind::PoolPlay,
        "bracket" | "playoff" => GameKind::Bracket,
        "championship" | "final" => GameKind::Championship,
        _ => GameKind::Regular,
    }
}

/// First alias holding a real team name. A side is either a plain string or a map with `name`.
fn side_name(fields: &Fields, aliases: &[&str]) -> Option<String> {
    aliases.iter().find_map(|key| {
        let value = fields.get(*key)?;
        let name = match value {
            Value::StringValue(s) => s.trim().to_owned(),
            other => other.as_map()?.get("name")?.as_str()?.trim().to_owned(),
        };
        (!name.is_empty() && !name.eq_ignore_ascii_case(TBD)).then_some(name)
    })
}

/// Both sides missing means no score at all; one missing side is backfilled with zero.
fn score_pair(fields: &Fields) -> Option<(u32, u32)> {
    let read = |aliases: &[&str]| {
        aliases
            .iter()
            .find_map(|k| fields.get(*k).and_then(Value::as_i64))
            .map(|n| n.clamp(0, i64::from(u32::MAX)) as u32)
    };
    match (read(&HOME_SCORE_FIELDS[..]), read(&AWAY_SCORE_FIELDS[..])) {
        (None, None) => None,
        (home, away) => Some((home.unwrap_or(0), away.unwrap_or(0))),
    }
}

fn first_string(fields: &Fields, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| {
        fields
            .get(*k)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
    })
}

fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::StringValue(s) if !s.trim().is_empty() => Some(s.trim().to_owned()),
        Value::IntegerValue(s) => Some(s.clone()),
        Value::DoubleValue(d) => Some(d.to_string()),
        _ => None,
    }
}
