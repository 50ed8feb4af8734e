use crate::league::{DivisionScope, LeagueConfig};
use crate::{Game, GameStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickerKind {
    Upcoming,
    Live,
    Final,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickerItem {
    pub game_id: String,
    pub kind: TickerKind,
    pub text: String,
}

pub const TICKER_SEPARATOR: &str = "   •   ";

/// Scoreboard crawl for the scope, ordered by scheduled time. Unscheduled games go last.
pub fn build_ticker(games: &[Game], scope: &DivisionScope, config: &LeagueConfig) -> Vec<TickerItem> {
    let mut in_scope: Vec<&Game> = games.iter().filter(|g| scope.contains(&g.division)).collect();
    in_scope.sort_by_key(|g| (g.scheduled_for.is_none(), g.scheduled_for));
    in_scope
        .into_iter()
        .filter_map(|g| ticker_item(g, config))
        .collect()
}

/// Single crawl entry. Cancelled and postponed games are left off.
pub fn ticker_item(game: &Game, config: &LeagueConfig) -> Option<TickerItem> {
    let div = config.short_label(&game.division);
    let (home, away) = (game.home_label(), game.away_label());
    let (kind, text) = match game.status {
        GameStatus::Scheduled => {
            let time = game
                .time_label
                .clone()
                .or_else(|| {
                    game.scheduled_for
                        .map(|at| config.zone().wall_clock(at).format("%-I:%M %p").to_string())
                })
                .unwrap_or_else(|| crate::TBD.to_owned());
            let text = match &game.court {
                Some(court) => format!("{time} | {court} | {div}: {home} vs {away}"),
                None => format!("{time} | {div}: {home} vs {away}"),
            };
            (TickerKind::Upcoming, text)
        }
        GameStatus::InProgress => {
            let (h, a) = game.score.unwrap_or_default();
            let mut text = format!("LIVE | {div}: {home} {h} - {away} {a}");
            if let Some(period) = &game.period {
                text.push_str(&format!(" | Q{period}"));
                if let Some(clock) = &game.clock {
                    text.push_str(&format!(" {clock}"));
                }
            }
            (TickerKind::Live, text)
        }
        GameStatus::Completed => {
            let (h, a) = game.score.unwrap_or_default();
            (TickerKind::Final, format!("FINAL | {div}: {home} {h} - {away} {a}"))
        }
        GameStatus::Cancelled | GameStatus::Postponed => return None,
    };
    Some(TickerItem {
        game_id: game.id.clone(),
        kind,
        text,
    })
}

pub fn fallback_message(scope: &DivisionScope) -> String {
    match scope {
        DivisionScope::All => "Schedule coming soon. Check back for game times and scores.".to_owned(),
        DivisionScope::Division(d) => format!("{d} schedule coming soon. Check back for game times and scores."),
    }
}

/// The whole crawl as one line.
pub fn ticker_line(items: &[TickerItem], scope: &DivisionScope) -> String {
    if items.is_empty() {
        return fallback_message(scope);
    }
    items
        .iter()
        .map(|i| i.text.as_str())
        .collect::<Vec<_>>()
        .join(TICKER_SEPARATOR)
}
