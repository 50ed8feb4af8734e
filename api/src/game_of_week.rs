//! Game of the Week: score finished games for excitement and narrate the winner.

use crate::league::LeagueConfig;
use crate::records::{RecordBook, TeamRecord};
use crate::window::TimeWindow;
use crate::{Game, GameStatus};
use chrono::NaiveDate;
use log::debug;
use rand::RngCore;

const CLOSE_GAME_CEILING: f64 = 30.0;
const UNDEFEATED_BONUS: f64 = 40.0;
const PER_WIN_BONUS: f64 = 10.0;

/// Margin under which a game counts as a nail-biter.
const NAIL_BITER_MARGIN: u32 = 10;
/// Margin over which a game counts as a blowout.
const BLOWOUT_MARGIN: u32 = 30;
const HIGH_SCORING_TOTAL: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Narrative {
    DominantUnbeaten,
    NailBiterUnbeaten,
    SolidUnbeaten,
    Tie,
    NailBiter,
    HighScoring,
    Blowout,
    Standard,
}

impl Narrative {
    pub fn label(&self) -> &'static str {
        match self {
            Narrative::DominantUnbeaten => "Perfect and Dominant",
            Narrative::NailBiterUnbeaten => "Unbeaten Survives",
            Narrative::SolidUnbeaten => "Still Perfect",
            Narrative::Tie => "Dead Even",
            Narrative::NailBiter => "Nail-Biter",
            Narrative::HighScoring => "Shootout",
            Narrative::Blowout => "Statement Win",
            Narrative::Standard => "Game of the Week",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameOfWeekPick {
    pub game: Game,
    pub excitement: f64,
    pub narrative: Narrative,
    pub summary: String,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GameOfWeek {
    Featured(GameOfWeekPick),
    NoGames,
    Unavailable,
}

/// Weighted excitement for a finished game, using each side's current record.
/// `None` when the game has no usable score or an unresolved side.
pub fn excitement_score(game: &Game, book: &RecordBook, config: &LeagueConfig) -> Option<f64> {
    let (home_pts, away_pts) = game.score?;
    let home = game.home.as_deref()?;
    let away = game.away.as_deref()?;

    let margin = f64::from(home_pts.abs_diff(away_pts));
    let total = f64::from(home_pts) + f64::from(away_pts);

    let mut score = (CLOSE_GAME_CEILING - margin).max(0.0) * 2.0 + total * 0.5;

    for name in [home, away] {
        let record = side_record(book, &game.division, name);
        if record.is_undefeated() {
            score += UNDEFEATED_BONUS;
        }
        score += PER_WIN_BONUS * f64::from(record.wins);
    }

    score += config.division_bonus(&game.division);
    score += config
        .pinned_matchups
        .iter()
        .filter(|p| p.matches(home, away))
        .map(|p| p.bonus)
        .sum::<f64>();

    Some(score)
}

/// Highest excitement among completed games on `date`, widening to that week when the day
/// itself has none. Equal scores keep the earliest game.
pub fn pick_game_of_week(
    games: &[Game],
    book: &RecordBook,
    config: &LeagueConfig,
    date: NaiveDate,
    rng: &mut dyn RngCore,
) -> GameOfWeek {
    let day = TimeWindow::day(date, config.zone());
    let week = TimeWindow::week_of(date, config.zone());

    let best = best_in(games, book, config, &day).or_else(|| {
        debug!("no completed games on {date}, widening to the week");
        best_in(games, book, config, &week)
    });

    let Some((game, excitement)) = best else {
        return GameOfWeek::NoGames;
    };

    let narrative = classify(game, book);
    let summary = summarize(game, narrative, rng);
    GameOfWeek::Featured(GameOfWeekPick {
        game: game.clone(),
        excitement,
        narrative,
        summary,
        date,
    })
}

fn best_in<'a>(
    games: &'a [Game],
    book: &RecordBook,
    config: &LeagueConfig,
    window: &TimeWindow,
) -> Option<(&'a Game, f64)> {
    let mut best: Option<(&Game, f64)> = None;
    for game in games {
        if game.status != GameStatus::Completed || game.score == Some((0, 0)) {
            continue;
        }
        if !game.scheduled_for.is_some_and(|at| window.contains(at)) {
            continue;
        }
        let Some(score) = excitement_score(game, book, config) else {
            continue;
        };
        if best.is_none_or(|(_, top)| score > top) {
            best = Some((game, score));
        }
    }
    best
}

fn side_record(book: &RecordBook, division: &str, name: &str) -> TeamRecord {
    book.resolve(division, name)
        .map(|i| book.entries()[i].record)
        .unwrap_or_default()
}

pub fn classify(game: &Game, book: &RecordBook) -> Narrative {
    let (Some(margin), Some(total)) = (game.margin(), game.total_points()) else {
        return Narrative::Standard;
    };
    if margin == 0 {
        return Narrative::Tie;
    }

    let winner_unbeaten = game
        .decision()
        .map(|(winner, _)| side_record(book, &game.division, winner))
        .is_some_and(|r| r.is_undefeated() && r.wins > 1);

    if winner_unbeaten {
        return if margin > BLOWOUT_MARGIN {
            Narrative::DominantUnbeaten
        } else if margin < NAIL_BITER_MARGIN {
            Narrative::NailBiterUnbeaten
        } else {
            Narrative::SolidUnbeaten
        };
    }

    if margin < NAIL_BITER_MARGIN {
        Narrative::NailBiter
    } else if total > HIGH_SCORING_TOTAL {
        Narrative::HighScoring
    } else if margin > BLOWOUT_MARGIN {
        Narrative::Blowout
    } else {
        Narrative::Standard
    }
}

fn summarize(game: &Game, narrative: Narrative, rng: &mut dyn RngCore) -> String {
    let (h, a) = game.score.unwrap_or_default();
    let (winner, loser) = game
        .decision()
        .unwrap_or((game.home_label(), game.away_label()));
    let (high, low) = (h.max(a), h.min(a));
    let margin = high - low;
    let total = u64::from(h) + u64::from(a);

    let options: Vec<String> = match narrative {
        Narrative::DominantUnbeaten => vec![
            format!("{winner} stayed perfect in style, burying {loser} {high}-{low}."),
            format!("Still unbeaten and not slowing down: {winner} rolled past {loser} by {margin}."),
        ],
        Narrative::NailBiterUnbeaten => vec![
            format!("{winner} survived a scare to stay unbeaten, edging {loser} {high}-{low}."),
            format!("The perfect season nearly ended, but {winner} held on against {loser} by {margin}."),
        ],
        Narrative::SolidUnbeaten => vec![format!(
            "{winner} kept the unbeaten run alive with a {high}-{low} win over {loser}."
        )],
        Narrative::Tie => vec![format!(
            "Nobody blinked: {} and {} finished level at {h}-{a}.",
            game.home_label(),
            game.away_label()
        )],
        Narrative::NailBiter => vec![
            format!("{winner} outlasted {loser} {high}-{low} in a game that went down to the wire."),
            format!("Just {margin} points separated them at the horn, with {winner} edging {loser}."),
            format!("A thriller from start to finish: {winner} {high}, {loser} {low}."),
        ],
        Narrative::HighScoring => vec![
            format!("The nets got a workout as {winner} beat {loser} {high}-{low}, {total} points in all."),
            format!("Offense ruled the day: {winner} topped {loser} in a {total}-point shootout."),
        ],
        Narrative::Blowout => vec![format!(
            "{winner} made a statement, handling {loser} {high}-{low}."
        )],
        Narrative::Standard => vec![format!("{winner} took care of {loser}, {high}-{low}.")],
    };
    options[rng.next_u32() as usize % options.len()].clone()
}
