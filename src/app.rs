use crate::state::app_settings::AppSettings;
use crate::state::app_state::AppState;
use league_api::board::{BoardSnapshot, DataState, apply_live_update};
use league_api::league::DivisionScope;
use league_api::{Game, GameStatus};
use log::{info, warn};

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum MenuItem {
    #[default]
    Standings,
    Schedule,
    Spotlight,
    GameOfWeek,
    Help,
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
}

impl App {
    pub fn new(settings: AppSettings) -> Self {
        let app = Self {
            state: AppState::new(settings.initial_scope()),
            settings,
        };

        if let Some(level) = app.settings.log_level {
            log::set_max_level(level);
            tui_logger::set_default_level(level);
        }

        app
    }

    // -----------------------------------------------------------------------
    // Network response handlers, called from main_ui_loop
    // -----------------------------------------------------------------------

    /// An unreadable store keeps the last good board for the same scope on screen and
    /// reports the failure instead.
    pub fn on_board_loaded(&mut self, snapshot: BoardSnapshot) {
        if let DataState::Unavailable(reason) = &snapshot.state {
            self.state.last_error = Some(reason.clone());
            let keep_previous = self.state.board.as_ref().is_some_and(|b| {
                b.scope == snapshot.scope && !matches!(b.state, DataState::Unavailable(_))
            });
            if keep_previous {
                warn!("refresh failed, keeping the last board for {}", snapshot.scope.label());
                return;
            }
        } else {
            self.state.last_error = None;
        }

        let scope_changed = self.state.board.as_ref().is_none_or(|b| b.scope != snapshot.scope);
        if scope_changed {
            self.state.standings_scroll = 0;
            self.state.schedule_scroll = 0;
            self.state.ticker.reset();
        }
        self.state.board = Some(snapshot);
    }

    /// Returns true when the game just reached a terminal status, which means the
    /// standings need a full reload.
    pub fn on_game_updated(&mut self, game: Game) -> bool {
        let Some(board) = self.state.board.as_mut() else {
            return false;
        };
        let was_terminal = board
            .schedule
            .iter()
            .find(|g| g.id == game.id)
            .is_some_and(|g| g.status.is_terminal());
        let now_terminal = game.status.is_terminal();
        if game.status == GameStatus::Completed && !was_terminal {
            let (h, a) = game.score.unwrap_or_default();
            info!("final: {} {h} - {} {a}", game.home_label(), game.away_label());
        }
        apply_live_update(board, game, &self.settings.league) && now_terminal && !was_terminal
    }

    pub fn live_game_ids(&self) -> Vec<String> {
        self.state
            .board
            .as_ref()
            .map(|b| b.live_games().map(|g| g.id.clone()).collect())
            .unwrap_or_default()
    }

    // -----------------------------------------------------------------------
    // Tab management
    // -----------------------------------------------------------------------

    pub fn update_tab(&mut self, next: MenuItem) {
        if self.state.active_tab == next {
            return;
        }
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;
    }

    pub fn exit_help(&mut self) {
        if self.state.active_tab == MenuItem::Help {
            self.state.active_tab = self.state.previous_tab;
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }

    // -----------------------------------------------------------------------
    // Scope and scrolling
    // -----------------------------------------------------------------------

    /// Move to the next division (or back to all of them) and return the new scope.
    pub fn cycle_scope(&mut self) -> DivisionScope {
        self.state.scope = self.state.scope.cycle(&self.settings.league);
        self.state.scope.clone()
    }

    pub fn scroll_down(&mut self) {
        match self.state.active_tab {
            MenuItem::Standings => self.state.standings_scroll = self.state.standings_scroll.saturating_add(1),
            MenuItem::Schedule => self.state.schedule_scroll = self.state.schedule_scroll.saturating_add(1),
            _ => {}
        }
    }

    pub fn scroll_up(&mut self) {
        match self.state.active_tab {
            MenuItem::Standings => self.state.standings_scroll = self.state.standings_scroll.saturating_sub(1),
            MenuItem::Schedule => self.state.schedule_scroll = self.state.schedule_scroll.saturating_sub(1),
            _ => {}
        }
    }

    // -----------------------------------------------------------------------
    // Animation tick, called every 80ms from AnimationTick event
    // -----------------------------------------------------------------------

    pub fn advance_animation(&mut self) {
        self.state.ticker.advance();
    }
}
