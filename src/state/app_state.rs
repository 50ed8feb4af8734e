use crate::app::MenuItem;
use league_api::board::BoardSnapshot;
use league_api::league::DivisionScope;
use league_api::ticker::ticker_line;

// ---------------------------------------------------------------------------
// Ticker crawl state
// ---------------------------------------------------------------------------

/// Scroll position of the bottom crawl. Advances one column every `STEP_TICKS` animation ticks.
#[derive(Debug, Default)]
pub struct TickerState {
    pub offset: usize,
    tick: u64,
}

const STEP_TICKS: u64 = 2;
const GAP: &str = "      ";

impl TickerState {
    pub fn advance(&mut self) {
        self.tick = self.tick.wrapping_add(1);
        if self.tick % STEP_TICKS == 0 {
            self.offset = self.offset.wrapping_add(1);
        }
    }

    pub fn reset(&mut self) {
        self.offset = 0;
    }

    /// Window of `width` columns into the looping crawl text. Text that fits is not scrolled.
    pub fn visible(&self, text: &str, width: usize) -> String {
        let len = text.chars().count();
        if len <= width {
            return text.to_owned();
        }
        let looped: Vec<char> = text.chars().chain(GAP.chars()).collect();
        let start = self.offset % looped.len();
        looped.iter().cycle().skip(start).take(width).collect()
    }
}

// ---------------------------------------------------------------------------
// Root app state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub show_logs: bool,
    pub last_error: Option<String>,
    pub scope: DivisionScope,
    pub board: Option<BoardSnapshot>,
    pub standings_scroll: u16,
    pub schedule_scroll: u16,
    pub ticker: TickerState,
}

impl AppState {
    pub fn new(scope: DivisionScope) -> Self {
        Self {
            scope,
            ..Self::default()
        }
    }

    pub fn ticker_text(&self) -> String {
        match &self.board {
            Some(board) => ticker_line(&board.ticker, &board.scope),
            None => ticker_line(&[], &self.scope),
        }
    }
}
