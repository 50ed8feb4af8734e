//! Plain-text board for `--print`.

use league_api::board::{BoardSnapshot, DataState};
use league_api::game_of_week::GameOfWeek;
use league_api::league::LeagueConfig;
use league_api::matchup::Spotlight;
use league_api::ticker::ticker_line;
use std::fmt::Write;

pub fn render_board(board: &BoardSnapshot, config: &LeagueConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} | {}", config.name, board.scope.label());

    match &board.state {
        DataState::Unavailable(reason) => {
            let _ = writeln!(out, "\nLeague data unavailable: {reason}");
            return out;
        }
        DataState::Empty => {
            let _ = writeln!(out, "\nNo teams or games yet.");
            return out;
        }
        DataState::Ready => {}
    }

    for (division, rows) in &board.standings {
        let _ = writeln!(out, "\n{division}");
        let _ = writeln!(
            out,
            "{:>3}  {:<24} {:>3} {:>3} {:>3} {:>6} {:>6}",
            "#", "Team", "W", "L", "T", "PCT", "DIFF"
        );
        for row in rows {
            let r = &row.record;
            let _ = writeln!(
                out,
                "{:>3}  {:<24} {:>3} {:>3} {:>3} {:>6} {:>6}",
                row.rank,
                row.team.name,
                r.wins,
                r.losses,
                r.ties,
                row.pct_label(),
                row.diff_label()
            );
        }
    }

    let _ = writeln!(out, "\nSpotlight");
    match &board.spotlight {
        Spotlight::Featured(m) => {
            let _ = writeln!(out, "  {}", m.tier.headline());
            let _ = writeln!(
                out,
                "  {} ({}) vs {} ({})",
                m.first.team.name,
                m.first.record.summary(),
                m.second.team.name,
                m.second.record.summary()
            );
            let _ = writeln!(out, "  {}", m.story);
        }
        Spotlight::NoFeaturedMatchup => {
            let _ = writeln!(out, "  No featured matchup: no unbeaten teams.");
        }
        Spotlight::Unavailable => {
            let _ = writeln!(out, "  Unavailable.");
        }
    }

    let _ = writeln!(out, "\nGame of the Week");
    match &board.game_of_week {
        GameOfWeek::Featured(pick) => {
            let g = &pick.game;
            let (h, a) = g.score.unwrap_or_default();
            let _ = writeln!(out, "  {}", pick.narrative.label());
            let _ = writeln!(out, "  {} {h} - {a} {}", g.home_label(), g.away_label());
            let _ = writeln!(out, "  {}", pick.summary);
        }
        GameOfWeek::NoGames => {
            let _ = writeln!(out, "  No completed games this week.");
        }
        GameOfWeek::Unavailable => {
            let _ = writeln!(out, "  Unavailable.");
        }
    }

    let _ = writeln!(out, "\n{}", ticker_line(&board.ticker, &board.scope));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo;
    use chrono::NaiveDate;
    use league_api::board::load_board;
    use league_api::league::{DivisionScope, LeagueContext};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[tokio::test]
    async fn prints_every_section() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 20).unwrap();
        let ctx = LeagueContext::new(LeagueConfig::default(), DivisionScope::All, today);
        let board = load_board(&demo::league(today), &ctx, &mut StdRng::seed_from_u64(4)).await;
        let text = render_board(&board, &ctx.config);

        assert!(text.starts_with("Hoops League | All Divisions"));
        assert!(text.contains("14U (8th)"));
        assert!(text.contains("Undefeated Showdown"));
        assert!(text.contains("Blue Chip (2-0)"));
        assert!(text.contains("Hoop Dreams (2-0)"));
        assert!(text.contains("Game of the Week"));
        assert!(text.contains("LIVE | 10U"));
    }

    #[test]
    fn unavailable_board_says_so() {
        let board = BoardSnapshot::unavailable(DivisionScope::All, "connection refused".into());
        let text = render_board(&board, &LeagueConfig::default());
        assert!(text.contains("League data unavailable: connection refused"));
        assert!(!text.contains("Spotlight"));
    }
}
