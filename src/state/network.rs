use crate::state::messages::{NetworkRequest, NetworkResponse};
use crate::store::Backend;
use league_api::board::{BoardSnapshot, DataState, PassTracker, load_board};
use league_api::league::{DivisionScope, LeagueConfig, LeagueContext};
use log::{debug, error};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
pub const ERROR_CHAR: char = '!';

#[derive(Debug, Copy, Clone)]
pub struct LoadingState {
    pub is_loading: bool,
    pub spinner_char: char,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self { is_loading: false, spinner_char: ' ' }
    }
}

pub struct NetworkWorker {
    store: Backend,
    config: LeagueConfig,
    tracker: PassTracker,
    scope: DivisionScope,
    rng: StdRng,
    requests: mpsc::Receiver<NetworkRequest>,
    responses: mpsc::Sender<NetworkResponse>,
    is_loading: Arc<AtomicBool>,
}

impl NetworkWorker {
    pub fn new(
        store: Backend,
        config: LeagueConfig,
        tracker: PassTracker,
        requests: mpsc::Receiver<NetworkRequest>,
        responses: mpsc::Sender<NetworkResponse>,
    ) -> Self {
        Self {
            store,
            config,
            tracker,
            scope: DivisionScope::All,
            rng: StdRng::from_entropy(),
            requests,
            responses,
            is_loading: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            // The scope sticks even when the load itself is superseded, so a
            // refresh queued behind a scope change loads the new scope.
            let ticket = match request {
                NetworkRequest::LoadBoard { scope, ticket } => {
                    self.scope = scope;
                    ticket
                }
                NetworkRequest::Refresh { ticket } => ticket,
            };
            let scope = self.scope.clone();
            // A newer trigger is already queued behind this one.
            if !self.tracker.is_current(ticket) {
                debug!("skipping superseded load for {}", scope.label());
                continue;
            }

            self.start_loading_animation().await;
            let snapshot = self.handle_load_board(scope).await;
            let ok = !matches!(snapshot.state, DataState::Unavailable(_));
            debug!("board load complete");
            self.stop_loading_animation(ok).await;

            let response = NetworkResponse::BoardLoaded {
                ticket,
                snapshot: Box::new(snapshot),
            };
            if let Err(e) = self.responses.send(response).await {
                error!("Failed to send network response: {e}");
                break;
            }
        }
    }

    async fn handle_load_board(&mut self, scope: DivisionScope) -> BoardSnapshot {
        debug!("loading board for {}", scope.label());
        let ctx = LeagueContext::new(self.config.clone(), scope, self.config.zone().today());
        load_board(&self.store, &ctx, &mut self.rng).await
    }

    async fn start_loading_animation(&self) {
        self.is_loading.store(true, Ordering::Relaxed);

        let mut loading_state =
            LoadingState { is_loading: true, spinner_char: SPINNER_CHARS[0] };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged { loading_state })
            .await;

        let responses = self.responses.clone();
        let is_loading = self.is_loading.clone();

        tokio::spawn(async move {
            let mut spinner_index = 1;
            let mut interval = tokio::time::interval(Duration::from_millis(33));
            loop {
                interval.tick().await;
                if !is_loading.load(Ordering::Relaxed) {
                    break;
                }
                loading_state.spinner_char = SPINNER_CHARS[spinner_index];
                spinner_index = (spinner_index + 1) % SPINNER_CHARS.len();
                let _ = responses
                    .send(NetworkResponse::LoadingStateChanged { loading_state })
                    .await;
            }
        });
    }

    async fn stop_loading_animation(&self, is_ok: bool) {
        self.is_loading.store(false, Ordering::Relaxed);
        tokio::time::sleep(Duration::from_millis(15)).await;

        let spinner_char = if is_ok { ' ' } else { ERROR_CHAR };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged {
                loading_state: LoadingState { is_loading: false, spinner_char },
            })
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo;
    use chrono::NaiveDate;

    fn worker() -> (NetworkWorker, mpsc::Sender<NetworkRequest>, mpsc::Receiver<NetworkResponse>, PassTracker) {
        let (req_tx, req_rx) = mpsc::channel(8);
        let (resp_tx, resp_rx) = mpsc::channel(64);
        let tracker = PassTracker::default();
        let today = NaiveDate::from_ymd_opt(2025, 1, 20).unwrap();
        let store = Backend::Demo(demo::league(today));
        let w = NetworkWorker::new(store, LeagueConfig::default(), tracker.clone(), req_rx, resp_tx);
        (w, req_tx, resp_rx, tracker)
    }

    async fn next_board(rx: &mut mpsc::Receiver<NetworkResponse>) -> Option<(league_api::board::PassTicket, Box<BoardSnapshot>)> {
        while let Some(resp) = rx.recv().await {
            if let NetworkResponse::BoardLoaded { ticket, snapshot } = resp {
                return Some((ticket, snapshot));
            }
        }
        None
    }

    #[tokio::test]
    async fn superseded_requests_are_skipped() {
        let (w, tx, mut rx, tracker) = worker();
        let stale = tracker.begin();
        let fresh = tracker.begin();
        tx.send(NetworkRequest::LoadBoard { scope: DivisionScope::All, ticket: stale }).await.unwrap();
        tx.send(NetworkRequest::LoadBoard {
            scope: DivisionScope::Division("14U (8th)".into()),
            ticket: fresh,
        })
        .await
        .unwrap();
        drop(tx);
        tokio::spawn(w.run());

        let (ticket, snapshot) = next_board(&mut rx).await.unwrap();
        assert_eq!(ticket, fresh);
        assert_eq!(snapshot.scope, DivisionScope::Division("14U (8th)".into()));
        assert!(next_board(&mut rx).await.is_none());
    }

    #[tokio::test]
    async fn refresh_behind_a_skipped_scope_change_keeps_the_new_scope() {
        let (w, tx, mut rx, tracker) = worker();
        let scope = DivisionScope::Division("14U (8th)".into());
        let change = tracker.begin();
        let refresh = tracker.begin();
        tx.send(NetworkRequest::LoadBoard { scope: scope.clone(), ticket: change }).await.unwrap();
        tx.send(NetworkRequest::Refresh { ticket: refresh }).await.unwrap();
        drop(tx);
        tokio::spawn(w.run());

        let (ticket, snapshot) = next_board(&mut rx).await.unwrap();
        assert_eq!(ticket, refresh);
        assert!(tracker.is_current(ticket));
        assert_eq!(snapshot.scope, scope);
        assert!(next_board(&mut rx).await.is_none());
    }

    #[tokio::test]
    async fn refresh_reuses_the_last_scope() {
        let (w, tx, mut rx, tracker) = worker();
        tokio::spawn(w.run());

        let scope = DivisionScope::Division("12U (6th)".into());
        tx.send(NetworkRequest::LoadBoard { scope: scope.clone(), ticket: tracker.begin() }).await.unwrap();
        next_board(&mut rx).await.unwrap();

        tx.send(NetworkRequest::Refresh { ticket: tracker.begin() }).await.unwrap();
        let (_, snapshot) = next_board(&mut rx).await.unwrap();
        assert_eq!(snapshot.scope, scope);
    }
}
