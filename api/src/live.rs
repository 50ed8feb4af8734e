use crate::client::LeagueStore;
use crate::{Game, StoreError};
use futures_util::Stream;
use futures_util::stream;
use log::{debug, warn};
use std::time::Duration;

struct Watch<S> {
    store: S,
    id: String,
    every: Duration,
    last: Option<Game>,
    started: bool,
    finished: bool,
}

/// Live feed for one game. Polls the store every `every` and yields the game each time it
/// changes, starting with its current state. Ends after yielding a terminal status, or when
/// the game disappears. Transient read failures are logged and polling continues.
pub fn subscribe_to_game<S>(store: S, id: impl Into<String>, every: Duration) -> impl Stream<Item = Game> + Send
where
    S: LeagueStore + 'static,
{
    let watch = Watch {
        store,
        id: id.into(),
        every,
        last: None,
        started: false,
        finished: false,
    };

    stream::unfold(watch, |mut w| async move {
        if w.finished {
            return None;
        }
        loop {
            if w.started {
                tokio::time::sleep(w.every).await;
            }
            w.started = true;

            match w.store.fetch_game(&w.id).await {
                Ok(game) if w.last.as_ref() == Some(&game) => continue,
                Ok(game) => {
                    debug!("game {} changed: {:?} {:?}", w.id, game.status, game.score);
                    w.finished = game.status.is_terminal();
                    w.last = Some(game.clone());
                    return Some((game, w));
                }
                Err(StoreError::NotFound(_)) => {
                    warn!("game {} no longer exists, closing its live feed", w.id);
                    return None;
                }
                Err(e) => warn!("live read for game {} failed: {e}", w.id),
            }
        }
    })
}
