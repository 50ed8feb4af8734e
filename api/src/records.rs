//! Record Calculator: fold completed games into per-team tallies.

use crate::{Game, GameStatus, Team, TeamKey};
use log::{debug, warn};
use std::cmp::Ordering;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TeamRecord {
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub points_for: u64,
    pub points_against: u64,
}

impl TeamRecord {
    pub fn games_played(&self) -> u32 {
        self.wins + self.losses + self.ties
    }

    pub fn point_differential(&self) -> i64 {
        self.points_for as i64 - self.points_against as i64
    }

    /// wins / (wins + losses); ties stay out of the denominator. 0.0 before any decision.
    pub fn win_percentage(&self) -> f64 {
        let decided = self.wins + self.losses;
        if decided == 0 {
            0.0
        } else {
            f64::from(self.wins) / f64::from(decided)
        }
    }

    pub fn is_undefeated(&self) -> bool {
        self.wins > 0 && self.losses == 0
    }

    pub fn points_per_game(&self) -> f64 {
        match self.games_played() {
            0 => 0.0,
            n => self.points_for as f64 / f64::from(n),
        }
    }

    /// Exact win-percentage comparison without going through floats.
    pub fn cmp_win_percentage(&self, other: &TeamRecord) -> Ordering {
        match (self.wins + self.losses, other.wins + other.losses) {
            (0, 0) => return Ordering::Equal,
            (0, _) => return 0.cmp(&other.wins),
            (_, 0) => return self.wins.cmp(&0),
            _ => {}
        }
        let lhs = u64::from(self.wins) * u64::from(other.wins + other.losses);
        let rhs = u64::from(other.wins) * u64::from(self.wins + self.losses);
        lhs.cmp(&rhs)
    }

    /// "3-1" or "3-1-1" when ties exist.
    pub fn summary(&self) -> String {
        if self.ties > 0 {
            format!("{}-{}-{}", self.wins, self.losses, self.ties)
        } else {
            format!("{}-{}", self.wins, self.losses)
        }
    }

    fn add_points(&mut self, scored: u32, allowed: u32) {
        self.points_for += u64::from(scored);
        self.points_against += u64::from(allowed);
    }
}

/// What the calculator skipped and why.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub counted: usize,
    pub ties: usize,
    /// Game sides naming a team that is not in the known set.
    pub unresolved: usize,
    /// Completed games with no score fields at all.
    pub malformed: usize,
    /// Completed games left at 0–0, treated as unplayed.
    pub placeholders: usize,
}

#[derive(Debug, Clone)]
pub struct RecordEntry {
    pub team: Team,
    pub record: TeamRecord,
}

/// Per-team records in the order teams were supplied.
#[derive(Debug, Clone, Default)]
pub struct RecordBook {
    entries: Vec<RecordEntry>,
    by_key: HashMap<(String, String), usize>,
    by_name: HashMap<String, Vec<usize>>,
    report: IngestReport,
}

impl RecordBook {
    /// Zeroed records for every known team. A repeated (division, name) keeps the first.
    pub fn new(teams: &[Team]) -> Self {
        let mut book = RecordBook::default();
        for team in teams {
            let key = lookup_key(&team.division, &team.name);
            if book.by_key.contains_key(&key) {
                debug!("duplicate team {} in {}, keeping the first", team.name, team.division);
                continue;
            }
            let idx = book.entries.len();
            book.by_name.entry(key.1.clone()).or_default().push(idx);
            book.by_key.insert(key, idx);
            book.entries.push(RecordEntry {
                team: team.clone(),
                record: TeamRecord::default(),
            });
        }
        book
    }

    /// (division, name) first. A game without a division falls back to a name that is unique
    /// across the league.
    pub fn resolve(&self, division: &str, name: &str) -> Option<usize> {
        let key = lookup_key(division, name);
        if let Some(&idx) = self.by_key.get(&key) {
            return Some(idx);
        }
        if key.0.is_empty() {
            if let Some([only]) = self.by_name.get(&key.1).map(Vec::as_slice) {
                return Some(*only);
            }
        }
        None
    }

    pub fn get(&self, key: &TeamKey) -> Option<&TeamRecord> {
        self.resolve(&key.division, &key.name)
            .map(|i| &self.entries[i].record)
    }

    pub fn entries(&self) -> &[RecordEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn report(&self) -> IngestReport {
        self.report
    }

    fn apply(&mut self, game: &Game) {
        if game.status != GameStatus::Completed {
            return;
        }
        let Some((home_pts, away_pts)) = game.score else {
            warn!("completed game {} has no score fields, skipping", game.id);
            self.report.malformed += 1;
            return;
        };
        if home_pts == 0 && away_pts == 0 {
            debug!("completed game {} is 0-0, treating as unplayed", game.id);
            self.report.placeholders += 1;
            return;
        }

        let home = self.side(game, game.home.as_deref());
        let away = self.side(game, game.away.as_deref());
        if home.is_none() && away.is_none() {
            return;
        }
        self.report.counted += 1;

        if let Some(i) = home {
            self.entries[i].record.add_points(home_pts, away_pts);
        }
        if let Some(i) = away {
            self.entries[i].record.add_points(away_pts, home_pts);
        }

        match home_pts.cmp(&away_pts) {
            Ordering::Greater => {
                self.bump(home, |r| r.wins += 1);
                self.bump(away, |r| r.losses += 1);
            }
            Ordering::Less => {
                self.bump(away, |r| r.wins += 1);
                self.bump(home, |r| r.losses += 1);
            }
            Ordering::Equal => {
                self.report.ties += 1;
                self.bump(home, |r| r.ties += 1);
                self.bump(away, |r| r.ties += 1);
            }
        }
    }

    fn side(&mut self, game: &Game, name: Option<&str>) -> Option<usize> {
        let resolved = name.and_then(|n| self.resolve(&game.division, n));
        if resolved.is_none() {
            warn!(
                "game {}: team {:?} not found in {:?}, skipping that side",
                game.id,
                name.unwrap_or(crate::TBD),
                game.division
            );
            self.report.unresolved += 1;
        }
        resolved
    }

    fn bump(&mut self, idx: Option<usize>, f: impl FnOnce(&mut TeamRecord)) {
        if let Some(i) = idx {
            f(&mut self.entries[i].record);
        }
    }
}

/// Zero every known team, then fold in each completed game once.
pub fn calculate_records(teams: &[Team], games: &[Game]) -> RecordBook {
    let mut book = RecordBook::new(teams);
    for game in games {
        book.apply(game);
    }
    book
}

fn lookup_key(division: &str, name: &str) -> (String, String) {
    (
        division.trim().to_lowercase(),
        name.trim().to_lowercase(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEN_U: &str = "10U (5th)";

    fn team(name: &str, division: &str) -> Team {
        Team {
            id: name.to_lowercase().replace(' ', "-"),
            name: name.into(),
            division: division.into(),
        }
    }

    fn game(home: &str, away: &str, score: Option<(u32, u32)>) -> Game {
        Game {
            id: format!("{home}-{away}"),
            division: TEN_U.into(),
            home: Some(home.into()),
            away: Some(away.into()),
            status: GameStatus::Completed,
            score,
            ..Default::default()
        }
    }

    fn rec<'a>(book: &'a RecordBook, name: &str) -> &'a TeamRecord {
        book.get(&TeamKey::new(TEN_U, name)).unwrap()
    }

    #[test]
    fn single_result_updates_both_sides() {
        let teams = [team("Wolves", TEN_U), team("ReZ Fire", TEN_U)];
        let book = calculate_records(&teams, &[game("Wolves", "ReZ Fire", Some((32, 28)))]);

        let wolves = rec(&book, "Wolves");
        assert_eq!((wolves.wins, wolves.losses), (1, 0));
        assert_eq!((wolves.points_for, wolves.points_against), (32, 28));
        assert_eq!(wolves.point_differential(), 4);

        let fire = rec(&book, "ReZ Fire");
        assert_eq!((fire.wins, fire.losses), (0, 1));
        assert_eq!((fire.points_for, fire.points_against), (28, 32));
        assert_eq!(fire.point_differential(), -4);
    }

    #[test]
    fn only_completed_games_count() {
        let teams = [team("A", TEN_U), team("B", TEN_U)];
        let mut live = game("A", "B", Some((10, 8)));
        live.status = GameStatus::InProgress;
        let mut cancelled = game("A", "B", Some((20, 0)));
        cancelled.status = GameStatus::Cancelled;
        let book = calculate_records(&teams, &[live, cancelled]);
        assert_eq!(*rec(&book, "A"), TeamRecord::default());
        assert_eq!(book.report().counted, 0);
    }

    #[test]
    fn ties_go_to_their_own_column() {
        let teams = [team("A", TEN_U), team("B", TEN_U)];
        let book = calculate_records(&teams, &[game("A", "B", Some((40, 40)))]);
        let a = rec(&book, "A");
        assert_eq!((a.wins, a.losses, a.ties), (0, 0, 1));
        assert_eq!(a.points_for, 40);
        assert_eq!(a.win_percentage(), 0.0);
        assert_eq!(a.summary(), "0-0-1");
        assert_eq!(book.report().ties, 1);
    }

    #[test]
    fn zero_zero_and_scoreless_finals_are_skipped() {
        let teams = [team("A", TEN_U), team("B", TEN_U)];
        let book = calculate_records(
            &teams,
            &[game("A", "B", Some((0, 0))), game("A", "B", None)],
        );
        assert_eq!(*rec(&book, "A"), TeamRecord::default());
        let report = book.report();
        assert_eq!(report.placeholders, 1);
        assert_eq!(report.malformed, 1);
        assert_eq!(report.counted, 0);
    }

    #[test]
    fn backfilled_missing_score_is_decisive() {
        let teams = [team("A", TEN_U), team("B", TEN_U)];
        let book = calculate_records(&teams, &[game("A", "B", Some((40, 0)))]);
        assert_eq!(rec(&book, "A").wins, 1);
        assert_eq!(rec(&book, "B").losses, 1);
    }

    #[test]
    fn unknown_side_is_ignored_without_phantom_team() {
        let teams = [team("A", TEN_U)];
        let mut tbd = game("A", "B", Some((30, 20)));
        tbd.away = None;
        let book = calculate_records(&teams, &[game("A", "Ghosts", Some((30, 35))), tbd]);
        assert_eq!(book.len(), 1);
        let a = rec(&book, "A");
        assert_eq!((a.wins, a.losses), (1, 1));
        assert_eq!(a.points_for, 60);
        assert_eq!(book.report().unresolved, 2);
        assert_eq!(book.report().counted, 2);
    }

    #[test]
    fn same_name_in_two_divisions_stays_separate() {
        let teams = [team("Wolves", TEN_U), team("Wolves", "14U (8th)"), team("B", TEN_U)];
        let book = calculate_records(&teams, &[game("Wolves", "B", Some((50, 10)))]);
        assert_eq!(rec(&book, "Wolves").wins, 1);
        assert_eq!(book.get(&TeamKey::new("14U (8th)", "Wolves")).unwrap().wins, 0);
    }

    #[test]
    fn missing_division_falls_back_to_unique_name() {
        let teams = [team("Wolves", TEN_U), team("Hawks", TEN_U)];
        let mut g = game("wolves", "HAWKS", Some((41, 39)));
        g.division = String::new();
        let book = calculate_records(&teams, &[g]);
        assert_eq!(rec(&book, "Wolves").wins, 1);
        assert_eq!(rec(&book, "Hawks").losses, 1);
    }

    #[test]
    fn wins_sum_to_decisive_games() {
        let teams = [team("A", TEN_U), team("B", TEN_U), team("C", TEN_U)];
        let games = [
            game("A", "B", Some((30, 20))),
            game("B", "C", Some((25, 25))),
            game("C", "A", Some((44, 43))),
            game("A", "C", Some((12, 40))),
        ];
        let book = calculate_records(&teams, &games);
        let wins: u32 = book.entries().iter().map(|e| e.record.wins).sum();
        let losses: u32 = book.entries().iter().map(|e| e.record.losses).sum();
        assert_eq!(wins, 3);
        assert_eq!(losses, 3);
    }

    #[test]
    fn recalculation_is_idempotent() {
        let teams = [team("A", TEN_U), team("B", TEN_U)];
        let games = [game("A", "B", Some((30, 20))), game("B", "A", Some((31, 29)))];
        let first = calculate_records(&teams, &games);
        let second = calculate_records(&teams, &games);
        for (x, y) in first.entries().iter().zip(second.entries()) {
            assert_eq!(x.record, y.record);
        }
        assert_eq!(rec(&first, "A").games_played(), 2);
    }

    #[test]
    fn win_percentage_comparison_is_exact() {
        let two_of_three = TeamRecord { wins: 2, losses: 1, ..Default::default() };
        let four_of_six = TeamRecord { wins: 4, losses: 2, ..Default::default() };
        let fresh = TeamRecord::default();
        assert_eq!(two_of_three.cmp_win_percentage(&four_of_six), Ordering::Equal);
        assert_eq!(two_of_three.cmp_win_percentage(&fresh), Ordering::Greater);
        assert_eq!(fresh.cmp_win_percentage(&fresh), Ordering::Equal);
    }

    #[test]
    fn undefeated_requires_a_win() {
        assert!(!TeamRecord::default().is_undefeated());
        assert!(TeamRecord { wins: 1, ..Default::default() }.is_undefeated());
        assert!(!TeamRecord { wins: 3, losses: 1, ..Default::default() }.is_undefeated());
    }
}
