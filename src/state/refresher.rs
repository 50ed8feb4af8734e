use crate::state::messages::NetworkRequest;
use league_api::board::PassTracker;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::interval;

/// Reload the board every `refresh_secs` so finals and schedule edits show up
/// without a keypress. Each reload is a new pass and supersedes any pending one.
pub struct PeriodicRefresher {
    network_requests: mpsc::Sender<NetworkRequest>,
    tracker: PassTracker,
    every: Duration,
}

impl PeriodicRefresher {
    pub fn new(network_requests: mpsc::Sender<NetworkRequest>, tracker: PassTracker, every: Duration) -> Self {
        Self { network_requests, tracker, every }
    }

    pub async fn run(self) {
        let mut board_interval = interval(self.every);
        // Skip the immediate first tick so startup loading isn't double-triggered.
        board_interval.tick().await;

        loop {
            board_interval.tick().await;
            let ticket = self.tracker.begin();
            if self
                .network_requests
                .send(NetworkRequest::Refresh { ticket })
                .await
                .is_err()
            {
                break;
            }
        }
    }
}
