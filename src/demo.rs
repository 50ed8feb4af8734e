//! Built-in sample league for `--demo`, plus a fake scorekeeper that keeps its live game moving.

use chrono::{DateTime, Duration as Days, NaiveDate, Utc};
use league_api::memory::InMemoryStore;
use league_api::window::{LeagueZone, most_recent_saturday};
use league_api::{Game, GameKind, GameStatus, Team, UserProfile};
use log::info;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::time::Duration;

const U10: &str = "10U (5th)";
const U12: &str = "12U (6th)";
const U14: &str = "14U (8th)";

pub const DEMO_COACH_UID: &str = "demo-coach";
pub const DEMO_ADMIN_UID: &str = "demo-admin";

const TEAMS: [(&str, &str); 11] = [
    (U14, "Blue Chip"),
    (U14, "Hoop Dreams"),
    (U14, "AZ Rise PJ"),
    (U14, "Desert Storm"),
    (U12, "Wolves"),
    (U12, "ReZ Fire"),
    (U12, "Hawks"),
    (U12, "Suns Elite"),
    (U10, "Lil Ballers"),
    (U10, "Mesa Magic"),
    (U10, "Rim Rockers"),
];

const QUARTER_SECS: u32 = 8 * 60;
const LAST_QUARTER: u32 = 4;

pub fn league(today: NaiveDate) -> InMemoryStore {
    let saturday = most_recent_saturday(today);
    let earlier = saturday - Days::days(7);
    let next = saturday + Days::days(7);

    let teams = TEAMS
        .iter()
        .enumerate()
        .map(|(i, (division, name))| Team {
            id: format!("t{}", i + 1),
            name: (*name).to_owned(),
            division: (*division).to_owned(),
        })
        .collect();

    let games = vec![
        finished("g1", U14, "Blue Chip", "Desert Storm", at(earlier, 9, 0), (58, 41)),
        finished("g2", U14, "Hoop Dreams", "AZ Rise PJ", at(earlier, 10, 15), (47, 45)),
        finished("g3", U14, "Blue Chip", "AZ Rise PJ", at(saturday, 9, 0), (51, 49)),
        finished("g4", U14, "Hoop Dreams", "Desert Storm", at(saturday, 10, 15), (62, 38)),
        finished("g5", U12, "Wolves", "ReZ Fire", at(earlier, 11, 30), (32, 28)),
        finished("g6", U12, "Hawks", "Suns Elite", at(earlier, 12, 45), (40, 30)),
        finished("g7", U12, "Wolves", "Hawks", at(saturday, 11, 30), (36, 35)),
        finished("g8", U12, "ReZ Fire", "Suns Elite", at(saturday, 12, 45), (44, 44)),
        finished("g9", U10, "Lil Ballers", "Mesa Magic", at(saturday, 8, 0), (22, 18)),
        finished("g10", U10, "Rim Rockers", "Mesa Magic", at(earlier, 8, 0), (30, 12)),
        Game {
            status: GameStatus::InProgress,
            score: Some((12, 14)),
            period: Some("2".into()),
            clock: Some("4:10".into()),
            ..scheduled("g11", U10, "Lil Ballers", "Rim Rockers", at(today, 14, 0))
        },
        scheduled("g12", U14, "Blue Chip", "Hoop Dreams", at(next, 9, 0)),
        scheduled("g13", U12, "Wolves", "Suns Elite", at(next, 11, 30)),
        scheduled("g14", U12, "Hawks", "ReZ Fire", at(next, 12, 45)),
        Game {
            away: None,
            kind: GameKind::Bracket,
            ..scheduled("g15", U10, "Mesa Magic", "", at(next, 8, 0))
        },
    ];

    InMemoryStore::new(teams, games)
        .with_user(UserProfile {
            uid: DEMO_COACH_UID.into(),
            email: Some("coach@example.com".into()),
            role: Some("coach".into()),
            display_name: "Demo Coach".into(),
            team_id: Some("t5".into()),
            team_name: Some("Wolves".into()),
        })
        .with_user(UserProfile {
            uid: DEMO_ADMIN_UID.into(),
            role: Some("admin".into()),
            display_name: "Demo Admin".into(),
            ..Default::default()
        })
}

/// Local wall-clock time on `date`, so the sample schedule reads naturally in any zone.
fn at(date: NaiveDate, hour: u32, minute: u32) -> Option<DateTime<Utc>> {
    let offset = Days::hours(i64::from(hour)) + Days::minutes(i64::from(minute));
    Some(LeagueZone::Local.start_of(date) + offset)
}

fn scheduled(id: &str, division: &str, home: &str, away: &str, when: Option<DateTime<Utc>>) -> Game {
    let court = if division == U14 { "Court 1" } else { "Court 2" };
    Game {
        id: id.into(),
        division: division.into(),
        home: Some(home.into()),
        away: Some(away.into()),
        scheduled_for: when,
        time_label: when.map(|t| LeagueZone::Local.wall_clock(t).format("%-I:%M %p").to_string()),
        court: Some(court.into()),
        season: Some("Winter".into()),
        ..Default::default()
    }
}

fn finished(
    id: &str,
    division: &str,
    home: &str,
    away: &str,
    when: Option<DateTime<Utc>>,
    score: (u32, u32),
) -> Game {
    Game {
        status: GameStatus::Completed,
        score: Some(score),
        ..scheduled(id, division, home, away, when)
    }
}

// ---------------------------------------------------------------------------
// Fake scorekeeper
// ---------------------------------------------------------------------------

/// Every `every`, move each live demo game forward one possession.
pub async fn run_scorer(store: InMemoryStore, every: Duration) {
    let mut rng = StdRng::from_entropy();
    let mut interval = tokio::time::interval(every);
    interval.tick().await;

    loop {
        interval.tick().await;
        for mut game in store.games().into_iter().filter(Game::is_live) {
            advance(&mut game, &mut rng);
            if game.status == GameStatus::Completed {
                info!("demo game {} went final", game.id);
            }
            store.upsert_game(game);
        }
    }
}

/// One possession: a basket for a random side and time off the clock. Ends the quarter at
/// 0:00 and the game after the last quarter.
pub fn advance(game: &mut Game, rng: &mut dyn RngCore) {
    let (mut home, mut away) = game.score.unwrap_or_default();
    let points = 2 + rng.next_u32() % 2;
    if rng.next_u32() % 2 == 0 {
        home = home.saturating_add(points);
    } else {
        away = away.saturating_add(points);
    }
    game.score = Some((home, away));

    let mut period = game.period.as_deref().and_then(|p| p.parse::<u32>().ok()).unwrap_or(1);
    let left = game.clock.as_deref().and_then(parse_clock).unwrap_or(QUARTER_SECS);
    let mut left = left.saturating_sub(30 + rng.next_u32() % 30);

    if left == 0 {
        if period >= LAST_QUARTER && home != away {
            game.status = GameStatus::Completed;
            game.period = None;
            game.clock = None;
            return;
        }
        period += 1;
        left = QUARTER_SECS;
    }
    game.period = Some(period.to_string());
    game.clock = Some(format!("{}:{:02}", left / 60, left % 60));
}

fn parse_clock(clock: &str) -> Option<u32> {
    let (m, s) = clock.trim().split_once(':')?;
    m.parse::<u32>().ok()?.checked_mul(60)?.checked_add(s.parse::<u32>().ok()?)
}
