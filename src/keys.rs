use crate::app::{App, MenuItem};
use crate::state::messages::NetworkRequest;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use league_api::board::PassTracker;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

pub async fn handle_key_bindings(
    key_event: KeyEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
    tracker: &PassTracker,
) {
    let mut guard = app.lock().await;

    match (guard.state.active_tab, key_event.code, key_event.modifiers) {
        // Quit
        (_, Char('q'), _) | (_, Char('c'), KeyModifiers::CONTROL) => {
            crate::cleanup_terminal();
            std::process::exit(0);
        }

        // Tab switching
        (_, Char('1'), _) => guard.update_tab(MenuItem::Standings),
        (_, Char('2'), _) => guard.update_tab(MenuItem::Schedule),
        (_, Char('3'), _) => guard.update_tab(MenuItem::Spotlight),
        (_, Char('4'), _) => guard.update_tab(MenuItem::GameOfWeek),
        (_, Char('?'), _) => guard.update_tab(MenuItem::Help),
        (MenuItem::Help, KeyCode::Esc, _) => guard.exit_help(),

        // Division scope and reloads. Every trigger starts a new pass; older ones are dropped.
        (_, Char('d'), _) => {
            let scope = guard.cycle_scope();
            drop(guard);
            let ticket = tracker.begin();
            let _ = network_requests
                .send(NetworkRequest::LoadBoard { scope, ticket })
                .await;
        }
        (_, Char('r'), _) => {
            let scope = guard.state.scope.clone();
            drop(guard);
            let ticket = tracker.begin();
            let _ = network_requests
                .send(NetworkRequest::LoadBoard { scope, ticket })
                .await;
        }

        // Scrolling
        (_, Char('j') | KeyCode::Down, _) => guard.scroll_down(),
        (_, Char('k') | KeyCode::Up, _) => guard.scroll_up(),

        // Global
        (_, Char('f'), _) => guard.toggle_full_screen(),
        (_, Char('"'), _) => guard.toggle_show_logs(),

        _ => {}
    }
}
