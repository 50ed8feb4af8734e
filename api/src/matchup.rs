//! Matchup Selector: the forward-looking featured pairing.

use crate::league::{DivisionScope, LeagueConfig};
use crate::records::{RecordBook, TeamRecord};
use crate::{Game, GameStatus, Team};
use rand::RngCore;
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq)]
pub struct Contender {
    pub team: Team,
    pub record: TeamRecord,
}

/// Which rung of the fallback ladder produced the pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpotlightTier {
    SameDivisionUndefeated,
    Undefeated,
    UndefeatedVsContender,
}

impl SpotlightTier {
    pub fn headline(&self) -> &'static str {
        match self {
            SpotlightTier::SameDivisionUndefeated => "Undefeated Showdown",
            SpotlightTier::Undefeated => "Battle of the Unbeaten",
            SpotlightTier::UndefeatedVsContender => "Can Anyone Stop Them?",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeaturedMatchup {
    pub first: Contender,
    pub second: Contender,
    pub tier: SpotlightTier,
    pub story: String,
    /// Next scheduled meeting between the two, when one is on the books.
    pub upcoming: Option<Game>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Spotlight {
    Featured(FeaturedMatchup),
    /// Data loaded, but nobody is undefeated.
    NoFeaturedMatchup,
    /// The store could not be read.
    Unavailable,
}

/// Walk the ladder: same-division unbeaten pair, any unbeaten pair, unbeaten vs best
/// contender, then nothing.
pub fn select_matchup(
    book: &RecordBook,
    scope: &DivisionScope,
    config: &LeagueConfig,
    games: &[Game],
    rng: &mut dyn RngCore,
) -> Spotlight {
    let pool: Vec<Contender> = book
        .entries()
        .iter()
        .filter(|e| scope.contains(&e.team.division))
        .map(|e| Contender {
            team: e.team.clone(),
            record: e.record,
        })
        .collect();

    let undefeated: Vec<&Contender> = pool.iter().filter(|c| c.record.is_undefeated()).collect();
    let divisions = config.ordered_divisions(undefeated.iter().map(|c| c.team.division.as_str()));

    let picked = same_division_pair(&undefeated, &divisions)
        .map(|(a, b)| (a, b, SpotlightTier::SameDivisionUndefeated))
        .or_else(|| any_undefeated_pair(&undefeated, &divisions).map(|(a, b)| (a, b, SpotlightTier::Undefeated)))
        .or_else(|| {
            undefeated_vs_contender(&undefeated, &pool)
                .map(|(a, b)| (a, b, SpotlightTier::UndefeatedVsContender))
        });

    match picked {
        Some((first, second, tier)) => {
            let story = matchup_story(first, second, tier, rng);
            let upcoming = next_meeting(games, &first.team, &second.team);
            Spotlight::Featured(FeaturedMatchup {
                first: first.clone(),
                second: second.clone(),
                tier,
                story,
                upcoming,
            })
        }
        None => Spotlight::NoFeaturedMatchup,
    }
}

fn by_points_for(a: &&Contender, b: &&Contender) -> Ordering {
    b.record.points_for.cmp(&a.record.points_for)
}

fn same_division_pair<'a>(
    undefeated: &[&'a Contender],
    divisions: &[String],
) -> Option<(&'a Contender, &'a Contender)> {
    divisions.iter().find_map(|division| {
        let mut in_div: Vec<&Contender> = undefeated
            .iter()
            .copied()
            .filter(|c| c.team.division.trim().eq_ignore_ascii_case(division))
            .collect();
        in_div.sort_by(by_points_for);
        match in_div.as_slice() {
            [a, b, ..] => Some((*a, *b)),
            _ => None,
        }
    })
}

fn any_undefeated_pair<'a>(
    undefeated: &[&'a Contender],
    divisions: &[String],
) -> Option<(&'a Contender, &'a Contender)> {
    let rank = |c: &Contender| {
        divisions
            .iter()
            .position(|d| c.team.division.trim().eq_ignore_ascii_case(d))
            .unwrap_or(usize::MAX)
    };
    let mut all = undefeated.to_vec();
    all.sort_by(|a, b| rank(*a).cmp(&rank(*b)).then_with(|| by_points_for(a, b)));
    match all.as_slice() {
        [a, b, ..] => Some((*a, *b)),
        _ => None,
    }
}

fn undefeated_vs_contender<'a>(
    undefeated: &[&'a Contender],
    pool: &'a [Contender],
) -> Option<(&'a Contender, &'a Contender)> {
    let leader = *undefeated.first()?;
    let challenger = pool
        .iter()
        .filter(|c| c.team.key() != leader.team.key() && c.record.wins > 0)
        .min_by(|a, b| {
            b.record
                .cmp_win_percentage(&a.record)
                .then_with(|| b.record.points_for.cmp(&a.record.points_for))
        })?;
    Some((leader, challenger))
}

fn next_meeting(games: &[Game], a: &Team, b: &Team) -> Option<Game> {
    let is = |side: Option<&str>, t: &Team| side.is_some_and(|s| s.trim().eq_ignore_ascii_case(t.name.trim()));
    games
        .iter()
        .filter(|g| g.status == GameStatus::Scheduled)
        .find(|g| {
            (is(g.home.as_deref(), a) && is(g.away.as_deref(), b))
                || (is(g.home.as_deref(), b) && is(g.away.as_deref(), a))
        })
        .cloned()
}

// ---------------------------------------------------------------------------
// Narrative
// ---------------------------------------------------------------------------

fn matchup_story(a: &Contender, b: &Contender, tier: SpotlightTier, rng: &mut dyn RngCore) -> String {
    let (an, bn) = (&a.team.name, &b.team.name);
    let (ar, br) = (a.record.summary(), b.record.summary());
    let same_division = a.team.division.trim().eq_ignore_ascii_case(b.team.division.trim());
    let division = &a.team.division;

    match (tier, same_division) {
        (SpotlightTier::UndefeatedVsContender, true) => format!(
            "{an} is still perfect at {ar}. {bn} ({br}) is the best shot anyone in {division} has at changing that."
        ),
        (SpotlightTier::UndefeatedVsContender, false) => format!(
            "{an} is still perfect at {ar}. {bn} ({br}, {}) owns the next-best record in the league.",
            b.team.division
        ),
        (_, true) => {
            let stories = [
                format!("{an} ({ar}) and {bn} ({br}) are the last two unbeaten teams in {division}. Something has to give."),
                format!(
                    "{an} is putting up {:.1} points a game and {bn} answers with {:.1}. Only one of them stays perfect.",
                    a.record.points_per_game(),
                    b.record.points_per_game()
                ),
                format!("Two perfect records collide in {division}: {an} at {ar} against {bn} at {br}."),
            ];
            stories[rng.next_u32() as usize % stories.len()].clone()
        }
        (_, false) => format!(
            "{an} ({}) and {bn} ({}) have yet to lose. Two divisions, two perfect records: {ar} and {br}.",
            a.team.division, b.team.division
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::calculate_records;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const EIGHTH: &str = "14U (8th)";
    const SEVENTH: &str = "13U (7th)";

    fn team(name: &str, division: &str) -> Team {
        Team {
            id: name.into(),
            name: name.into(),
            division: division.into(),
        }
    }

    fn result(division: &str, home: &str, away: &str, h: u32, a: u32) -> Game {
        Game {
            id: format!("{home}-{away}-{h}-{a}"),
            division: division.into(),
            home: Some(home.into()),
            away: Some(away.into()),
            status: GameStatus::Completed,
            score: Some((h, a)),
            ..Default::default()
        }
    }

    fn featured(spotlight: Spotlight) -> FeaturedMatchup {
        match spotlight {
            Spotlight::Featured(m) => m,
            other => panic!("expected a featured matchup, got {other:?}"),
        }
    }

    fn pick(teams: &[Team], games: &[Game]) -> Spotlight {
        let book = calculate_records(teams, games);
        let mut rng = StdRng::seed_from_u64(42);
        select_matchup(&book, &DivisionScope::All, &LeagueConfig::default(), games, &mut rng)
    }

    #[test]
    fn same_division_unbeaten_pair_ordered_by_points_for() {
        // Team A 3-0 with 150 PF, Team B 2-0 with 140 PF.
        let teams = [team("Team B", EIGHTH), team("Team A", EIGHTH), team("Filler", EIGHTH)];
        let games = [
            result(EIGHTH, "Team A", "Filler", 50, 10),
            result(EIGHTH, "Team A", "Filler", 50, 10),
            result(EIGHTH, "Team A", "Filler", 50, 10),
            result(EIGHTH, "Team B", "Filler", 70, 10),
            result(EIGHTH, "Team B", "Filler", 70, 10),
        ];
        let m = featured(pick(&teams, &games));
        assert_eq!(m.tier, SpotlightTier::SameDivisionUndefeated);
        assert_eq!(m.first.team.name, "Team A");
        assert_eq!(m.second.team.name, "Team B");
        assert!(!m.story.is_empty());
    }

    #[test]
    fn higher_priority_division_wins_the_same_division_search() {
        let teams = [
            team("S1", SEVENTH),
            team("S2", SEVENTH),
            team("E1", EIGHTH),
            team("E2", EIGHTH),
            team("Filler", SEVENTH),
            team("Filler8", EIGHTH),
        ];
        let games = [
            result(SEVENTH, "S1", "Filler", 90, 10),
            result(SEVENTH, "S2", "Filler", 90, 10),
            result(EIGHTH, "E1", "Filler8", 30, 10),
            result(EIGHTH, "E2", "Filler8", 30, 20),
        ];
        let m = featured(pick(&teams, &games));
        assert_eq!(m.first.team.division, EIGHTH);
        assert_eq!(m.second.team.division, EIGHTH);
    }

    #[test]
    fn cross_division_unbeaten_pair_uses_priority_then_points() {
        let teams = [
            team("Low", "10U (5th)"),
            team("High", EIGHTH),
            team("Mid", SEVENTH),
            team("F1", "10U (5th)"),
            team("F2", EIGHTH),
            team("F3", SEVENTH),
        ];
        let games = [
            result("10U (5th)", "Low", "F1", 99, 10),
            result(EIGHTH, "High", "F2", 30, 10),
            result(SEVENTH, "Mid", "F3", 40, 10),
        ];
        let m = featured(pick(&teams, &games));
        assert_eq!(m.tier, SpotlightTier::Undefeated);
        assert_eq!(m.first.team.name, "High");
        assert_eq!(m.second.team.name, "Mid");
    }

    #[test]
    fn lone_unbeaten_team_meets_best_contender() {
        let teams = [team("Perfect", EIGHTH), team("Good", EIGHTH), team("Okay", EIGHTH), team("Bad", EIGHTH)];
        let games = [
            result(EIGHTH, "Perfect", "Good", 40, 30),
            result(EIGHTH, "Good", "Bad", 40, 30),
            result(EIGHTH, "Good", "Okay", 40, 30),
            result(EIGHTH, "Okay", "Bad", 50, 30),
            result(EIGHTH, "Perfect", "Okay", 40, 39),
        ];
        let m = featured(pick(&teams, &games));
        assert_eq!(m.tier, SpotlightTier::UndefeatedVsContender);
        assert_eq!(m.first.team.name, "Perfect");
        assert_eq!(m.second.team.name, "Good");
        assert!(m.story.contains("Perfect"));
    }

    #[test]
    fn nobody_unbeaten_means_no_featured_matchup() {
        let teams = [team("A", EIGHTH), team("B", EIGHTH)];
        let games = [result(EIGHTH, "A", "B", 40, 30), result(EIGHTH, "B", "A", 40, 30)];
        assert_eq!(pick(&teams, &games), Spotlight::NoFeaturedMatchup);
        assert_eq!(pick(&teams, &[]), Spotlight::NoFeaturedMatchup);
        assert_ne!(pick(&teams, &[]), Spotlight::Unavailable);
    }

    #[test]
    fn scheduled_meeting_is_attached() {
        let teams = [team("A", EIGHTH), team("B", EIGHTH), team("F", EIGHTH)];
        let mut upcoming = result(EIGHTH, "b", "a", 0, 0);
        upcoming.status = GameStatus::Scheduled;
        upcoming.score = None;
        let games = [
            result(EIGHTH, "A", "F", 40, 30),
            result(EIGHTH, "B", "F", 40, 30),
            upcoming.clone(),
        ];
        let m = featured(pick(&teams, &games));
        assert_eq!(m.upcoming, Some(upcoming));
    }

    #[test]
    fn story_choice_is_reproducible_with_a_seed() {
        let teams = [team("A", EIGHTH), team("B", EIGHTH), team("F", EIGHTH)];
        let games = [result(EIGHTH, "A", "F", 40, 30), result(EIGHTH, "B", "F", 40, 30)];
        let first = featured(pick(&teams, &games)).story;
        let second = featured(pick(&teams, &games)).story;
        assert_eq!(first, second);
    }

    #[test]
    fn scope_limits_the_pool() {
        let teams = [team("A", EIGHTH), team("B", EIGHTH), team("F", EIGHTH)];
        let games = [result(EIGHTH, "A", "F", 40, 30), result(EIGHTH, "B", "F", 40, 30)];
        let book = calculate_records(&teams, &games);
        let mut rng = StdRng::seed_from_u64(7);
        let scoped = select_matchup(
            &book,
            &DivisionScope::Division(SEVENTH.into()),
            &LeagueConfig::default(),
            &games,
            &mut rng,
        );
        assert_eq!(scoped, Spotlight::NoFeaturedMatchup);
    }
}
