//! One aggregation pass: read teams and games, then reduce them into everything the board shows.

use crate::client::{GameQuery, LeagueStore};
use crate::game_of_week::{GameOfWeek, pick_game_of_week};
use crate::league::{DivisionScope, LeagueConfig, LeagueContext};
use crate::matchup::{Spotlight, select_matchup};
use crate::records::{IngestReport, calculate_records};
use crate::standings::{StandingsRow, rank_standings, standings_by_division};
use crate::ticker::{TickerItem, build_ticker, ticker_item};
use crate::window::{TimeWindow, week_number};
use crate::{Game, StoreResult, Team};
use chrono::{DateTime, Utc};
use futures_util::future::join;
use log::{info, warn};
use rand::RngCore;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataState {
    Ready,
    /// The store answered, but there is nothing to show yet.
    Empty,
    /// The store could not be read. Carries the reason for the log pane.
    Unavailable(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuickStats {
    pub teams: usize,
    /// Season week of `today`, when the league has a season start.
    pub week: Option<u32>,
    pub games_this_week: usize,
    pub completed: usize,
    pub live: usize,
}

#[derive(Debug, Clone)]
pub struct BoardSnapshot {
    pub scope: DivisionScope,
    pub state: DataState,
    /// Ranked tables, one per division in scope.
    pub standings: Vec<(String, Vec<StandingsRow>)>,
    pub schedule: Vec<Game>,
    pub ticker: Vec<TickerItem>,
    pub spotlight: Spotlight,
    pub game_of_week: GameOfWeek,
    pub stats: QuickStats,
    pub report: IngestReport,
    pub loaded_at: DateTime<Utc>,
}

impl BoardSnapshot {
    pub fn unavailable(scope: DivisionScope, reason: String) -> Self {
        Self {
            scope,
            state: DataState::Unavailable(reason),
            standings: Vec::new(),
            schedule: Vec::new(),
            ticker: Vec::new(),
            spotlight: Spotlight::Unavailable,
            game_of_week: GameOfWeek::Unavailable,
            stats: QuickStats::default(),
            report: IngestReport::default(),
            loaded_at: Utc::now(),
        }
    }

    pub fn live_games(&self) -> impl Iterator<Item = &Game> {
        self.schedule.iter().filter(|g| g.is_live())
    }
}

/// Both collections are read before any reduction starts, so a pass never mixes snapshots.
/// Read failures degrade to an unavailable board instead of an error.
pub async fn load_board<S: LeagueStore>(
    store: &S,
    ctx: &LeagueContext,
    rng: &mut (dyn RngCore + Send),
) -> BoardSnapshot {
    match fetch_league(store, ctx).await {
        Ok((teams, games)) => build_board(&teams, games, ctx, rng),
        Err(e) => {
            warn!("league data unavailable: {e}");
            BoardSnapshot::unavailable(ctx.scope.clone(), e.to_string())
        }
    }
}

pub async fn fetch_league<S: LeagueStore>(store: &S, ctx: &LeagueContext) -> StoreResult<(Vec<Team>, Vec<Game>)> {
    let query = GameQuery::new(ctx.scope.clone()).for_season(ctx.config.season.clone());
    let (teams, games) = join(store.fetch_teams(&ctx.scope), store.fetch_games(&query)).await;
    Ok((teams?, games?))
}

pub fn build_board(
    teams: &[Team],
    games: Vec<Game>,
    ctx: &LeagueContext,
    rng: &mut dyn RngCore,
) -> BoardSnapshot {
    let config = &ctx.config;
    let state = if teams.is_empty() && games.is_empty() {
        DataState::Empty
    } else {
        DataState::Ready
    };

    let book = calculate_records(teams, &games);
    let standings = match &ctx.scope {
        DivisionScope::All => standings_by_division(&book, config),
        DivisionScope::Division(d) => vec![(d.clone(), rank_standings(&book, &ctx.scope))],
    };

    let spotlight = select_matchup(&book, &ctx.scope, config, &games, rng);
    let game_of_week = pick_game_of_week(&games, &book, config, ctx.featured_date(), rng);
    let ticker = build_ticker(&games, &ctx.scope, config);

    let week = TimeWindow::week_of(ctx.today, config.zone());
    let stats = QuickStats {
        teams: book.len(),
        week: config.season_start.map(|start| week_number(start, ctx.today)),
        games_this_week: games
            .iter()
            .filter(|g| g.scheduled_for.is_some_and(|at| week.contains(at)))
            .count(),
        completed: games.iter().filter(|g| g.is_completed()).count(),
        live: games.iter().filter(|g| g.is_live()).count(),
    };

    let report = book.report();
    info!(
        "board for {}: {} teams, {} games, {} counted, {} unresolved, {} malformed",
        ctx.scope.label(),
        stats.teams,
        games.len(),
        report.counted,
        report.unresolved,
        report.malformed
    );

    BoardSnapshot {
        scope: ctx.scope.clone(),
        state,
        standings,
        schedule: games,
        ticker,
        spotlight,
        game_of_week,
        stats,
        report,
        loaded_at: Utc::now(),
    }
}

/// Patch one game's schedule row and ticker entry from a live update. Standings are left
/// alone until the next full pass. Returns false when the game is not on this board.
pub fn apply_live_update(snapshot: &mut BoardSnapshot, game: Game, config: &LeagueConfig) -> bool {
    let Some(row) = snapshot.schedule.iter_mut().find(|g| g.id == game.id) else {
        return false;
    };
    let item = ticker_item(&game, config);
    *row = game;

    let id = &row.id;
    match (snapshot.ticker.iter().position(|t| &t.game_id == id), item) {
        (Some(i), Some(item)) => snapshot.ticker[i] = item,
        (Some(i), None) => {
            snapshot.ticker.remove(i);
        }
        (None, Some(item)) => snapshot.ticker.push(item),
        (None, None) => {}
    }
    true
}

// ---------------------------------------------------------------------------
// Stale-pass detection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassTicket(u64);

/// Last trigger wins: every new pass invalidates the tickets handed out before it.
#[derive(Debug, Clone, Default)]
pub struct PassTracker {
    latest: Arc<AtomicU64>,
}

impl PassTracker {
    pub fn begin(&self) -> PassTicket {
        PassTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: PassTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}
