use crate::state::messages::{LiveCommand, NetworkResponse};
use crate::store::Backend;
use futures_util::StreamExt;
use league_api::live::subscribe_to_game;
use log::debug;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Keeps one live feed per in-progress game on the current board and forwards every
/// change to the UI loop. A new `Watch` drops the feeds that are no longer wanted.
pub struct LiveWorker {
    pub store: Backend,
    pub every: Duration,
    pub commands: mpsc::Receiver<LiveCommand>,
    pub responses: mpsc::Sender<NetworkResponse>,
}

impl LiveWorker {
    pub async fn run(mut self) {
        let mut feeds: Vec<(String, JoinHandle<()>)> = Vec::new();

        while let Some(command) = self.commands.recv().await {
            let LiveCommand::Watch(ids) = command;

            feeds.retain(|(id, handle)| {
                let keep = ids.contains(id) && !handle.is_finished();
                if !keep {
                    handle.abort();
                }
                keep
            });

            for id in ids {
                if feeds.iter().any(|(watched, _)| *watched == id) {
                    continue;
                }
                debug!("watching game {id}");
                let handle = tokio::spawn(forward(
                    self.store.clone(),
                    id.clone(),
                    self.every,
                    self.responses.clone(),
                ));
                feeds.push((id, handle));
            }
        }

        for (_, handle) in feeds {
            handle.abort();
        }
    }
}

async fn forward(store: Backend, id: String, every: Duration, responses: mpsc::Sender<NetworkResponse>) {
    let mut updates = Box::pin(subscribe_to_game(store, id, every));
    while let Some(game) = updates.next().await {
        if responses.send(NetworkResponse::GameUpdated { game }).await.is_err() {
            break;
        }
    }
}
