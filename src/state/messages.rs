use crate::state::network::LoadingState;
use crossterm::event::KeyEvent;
use league_api::Game;
use league_api::board::{BoardSnapshot, PassTicket};
use league_api::league::DivisionScope;

#[derive(Debug, Clone)]
pub enum NetworkRequest {
    LoadBoard { scope: DivisionScope, ticket: PassTicket },
    /// Reload whatever scope was loaded last.
    Refresh { ticket: PassTicket },
}

#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged { loading_state: LoadingState },
    BoardLoaded { ticket: PassTicket, snapshot: Box<BoardSnapshot> },
    /// A single game changed on its live feed.
    GameUpdated { game: Game },
}

#[derive(Debug, Clone)]
pub enum LiveCommand {
    /// Replace the watched set with these game ids.
    Watch(Vec<String>),
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
    AnimationTick,
}
