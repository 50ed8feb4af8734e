//! Ranking Engine: order records into 1-based standings rows.

use crate::Team;
use crate::league::{DivisionScope, LeagueConfig};
use crate::records::{RecordBook, TeamRecord};

#[derive(Debug, Clone, PartialEq)]
pub struct StandingsRow {
    pub rank: usize,
    pub team: Team,
    pub record: TeamRecord,
}

impl StandingsRow {
    pub fn win_percentage(&self) -> f64 {
        self.record.win_percentage()
    }

    pub fn point_differential(&self) -> i64 {
        self.record.point_differential()
    }

    pub fn pct_label(&self) -> String {
        format!("{:.3}", self.win_percentage())
    }

    pub fn diff_label(&self) -> String {
        match self.point_differential() {
            d if d > 0 => format!("+{d}"),
            d => d.to_string(),
        }
    }
}

/// Win percentage, then point differential, both descending. Equal keys keep input order.
pub fn rank_standings(book: &RecordBook, scope: &DivisionScope) -> Vec<StandingsRow> {
    let mut rows: Vec<StandingsRow> = book
        .entries()
        .iter()
        .filter(|e| scope.contains(&e.team.division))
        .map(|e| StandingsRow {
            rank: 0,
            team: e.team.clone(),
            record: e.record,
        })
        .collect();

    rows.sort_by(|a, b| {
        b.record
            .cmp_win_percentage(&a.record)
            .then_with(|| b.point_differential().cmp(&a.point_differential()))
    });

    for (i, row) in rows.iter_mut().enumerate() {
        row.rank = i + 1;
    }
    rows
}

/// One ranked table per division, in the configured priority order.
pub fn standings_by_division(
    book: &RecordBook,
    config: &LeagueConfig,
) -> Vec<(String, Vec<StandingsRow>)> {
    let divisions = config.ordered_divisions(book.entries().iter().map(|e| e.team.division.as_str()));
    divisions
        .into_iter()
        .map(|d| {
            let rows = rank_standings(book, &DivisionScope::Division(d.clone()));
            (d, rows)
        })
        .filter(|(_, rows)| !rows.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::calculate_records;
    use crate::{Game, GameStatus};

    const TEN_U: &str = "10U (5th)";

    fn team(name: &str, division: &str) -> Team {
        Team {
            id: name.into(),
            name: name.into(),
            division: division.into(),
        }
    }

    fn result(home: &str, away: &str, h: u32, a: u32) -> Game {
        Game {
            id: format!("{home}-{away}-{h}"),
            division: TEN_U.into(),
            home: Some(home.into()),
            away: Some(away.into()),
            status: GameStatus::Completed,
            score: Some((h, a)),
            ..Default::default()
        }
    }

    fn names(rows: &[StandingsRow]) -> Vec<&str> {
        rows.iter().map(|r| r.team.name.as_str()).collect()
    }

    #[test]
    fn winner_ranks_first() {
        let teams = [team("ReZ Fire", TEN_U), team("Wolves", TEN_U)];
        let book = calculate_records(&teams, &[result("Wolves", "ReZ Fire", 32, 28)]);
        let rows = rank_standings(&book, &DivisionScope::All);
        assert_eq!(names(&rows), vec!["Wolves", "ReZ Fire"]);
        assert_eq!(rows[0].rank, 1);
        assert_eq!(rows[0].pct_label(), "1.000");
        assert_eq!(rows[0].diff_label(), "+4");
        assert_eq!(rows[1].diff_label(), "-4");
    }

    #[test]
    fn no_games_keeps_input_order() {
        let teams = [team("C", TEN_U), team("A", TEN_U), team("B", TEN_U)];
        let book = calculate_records(&teams, &[]);
        let rows = rank_standings(&book, &DivisionScope::Division(TEN_U.into()));
        assert_eq!(names(&rows), vec!["C", "A", "B"]);
        assert_eq!(rows.iter().map(|r| r.rank).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(rows.iter().all(|r| r.pct_label() == "0.000"));
    }

    #[test]
    fn differential_breaks_percentage_ties() {
        let teams = [team("A", TEN_U), team("B", TEN_U), team("C", TEN_U), team("D", TEN_U)];
        let games = [
            result("A", "C", 30, 28),
            result("B", "D", 50, 20),
        ];
        let book = calculate_records(&teams, &games);
        let rows = rank_standings(&book, &DivisionScope::All);
        assert_eq!(names(&rows), vec!["B", "A", "C", "D"]);
    }

    #[test]
    fn equal_keys_get_consecutive_ranks() {
        let teams = [team("A", TEN_U), team("B", TEN_U), team("C", TEN_U), team("D", TEN_U)];
        let games = [result("A", "C", 30, 20), result("B", "D", 30, 20)];
        let book = calculate_records(&teams, &games);
        let rows = rank_standings(&book, &DivisionScope::All);
        assert_eq!(names(&rows), vec!["A", "B", "C", "D"]);
        assert_eq!(rows[1].rank, 2);

        // Swapping the tied pair leaves everyone else in place.
        let swapped = [team("B", TEN_U), team("A", TEN_U), team("C", TEN_U), team("D", TEN_U)];
        let book = calculate_records(&swapped, &games);
        let rows = rank_standings(&book, &DivisionScope::All);
        assert_eq!(names(&rows), vec!["B", "A", "C", "D"]);
    }

    #[test]
    fn scope_filters_teams() {
        let teams = [team("A", TEN_U), team("X", "14U (8th)")];
        let book = calculate_records(&teams, &[]);
        let rows = rank_standings(&book, &DivisionScope::Division("14u (8th)".into()));
        assert_eq!(names(&rows), vec!["X"]);
        assert!(rank_standings(&book, &DivisionScope::Division("Adult".into())).is_empty());
    }

    #[test]
    fn empty_book_gives_empty_standings() {
        let book = calculate_records(&[], &[]);
        assert!(rank_standings(&book, &DivisionScope::All).is_empty());
    }

    #[test]
    fn grouped_standings_follow_priority() {
        let teams = [team("A", TEN_U), team("X", "14U (8th)"), team("Y", "14U (8th)")];
        let book = calculate_records(&teams, &[]);
        let grouped = standings_by_division(&book, &LeagueConfig::default());
        let order: Vec<&str> = grouped.iter().map(|(d, _)| d.as_str()).collect();
        assert_eq!(order, vec!["14U (8th)", TEN_U]);
        assert_eq!(grouped[0].1.len(), 2);
    }
}
