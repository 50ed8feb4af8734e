use crate::client::{GameQuery, LeagueStore};
use crate::league::DivisionScope;
use crate::{Game, StoreError, StoreResult, Team, UserProfile};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// `LeagueStore` over in-process vectors. Clones share state, so a test (or the demo
/// ticker) can change a game while a subscriber is polling it.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    teams: Vec<Team>,
    games: Vec<Game>,
    users: Vec<UserProfile>,
    unavailable: bool,
    profile_denials: u32,
    reads: u32,
}

impl InMemoryStore {
    pub fn new(teams: Vec<Team>, games: Vec<Game>) -> Self {
        let store = Self::default();
        {
            let mut inner = store.lock();
            inner.teams = teams;
            inner.games = games;
        }
        store
    }

    pub fn with_user(self, profile: UserProfile) -> Self {
        self.lock().users.push(profile);
        self
    }

    /// Every read fails until switched back.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.lock().unavailable = unavailable;
    }

    /// The next `n` profile reads answer permission-denied, like a fresh sign-in whose
    /// token has not reached the store yet.
    pub fn deny_profile_reads(&self, n: u32) {
        self.lock().profile_denials = n;
    }

    /// Replace the game with the same id, or add it.
    pub fn upsert_game(&self, game: Game) {
        let mut inner = self.lock();
        match inner.games.iter_mut().find(|g| g.id == game.id) {
            Some(existing) => *existing = game,
            None => inner.games.push(game),
        }
    }

    pub fn games(&self) -> Vec<Game> {
        self.lock().games.clone()
    }

    pub fn reads(&self) -> u32 {
        self.lock().reads
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin_read(&self, what: &str) -> StoreResult<MutexGuard<'_, Inner>> {
        let mut inner = self.lock();
        inner.reads += 1;
        if inner.unavailable {
            return Err(StoreError::Api {
                url: format!("memory://{what}"),
                status: 503,
                message: "store unavailable".to_owned(),
            });
        }
        Ok(inner)
    }
}

impl LeagueStore for InMemoryStore {
    async fn fetch_teams(&self, scope: &DivisionScope) -> StoreResult<Vec<Team>> {
        let inner = self.begin_read("teams")?;
        Ok(inner
            .teams
            .iter()
            .filter(|t| scope.contains(&t.division))
            .cloned()
            .collect())
    }

    async fn fetch_games(&self, query: &GameQuery) -> StoreResult<Vec<Game>> {
        let inner = self.begin_read("games")?;
        Ok(query.apply(inner.games.iter().cloned()))
    }

    async fn fetch_game(&self, id: &str) -> StoreResult<Game> {
        let inner = self.begin_read("games")?;
        inner
            .games
            .iter()
            .find(|g| g.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("memory://games/{id}")))
    }

    async fn fetch_user_profile(&self, uid: &str) -> StoreResult<UserProfile> {
        let mut inner = self.begin_read("users")?;
        if inner.profile_denials > 0 {
            inner.profile_denials -= 1;
            return Err(StoreError::PermissionDenied {
                url: format!("memory://users/{uid}"),
            });
        }
        inner
            .users
            .iter()
            .find(|u| u.uid == uid)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("memory://users/{uid}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GameStatus;

    fn store() -> InMemoryStore {
        InMemoryStore::new(
            vec![
                Team { id: "w".into(), name: "Wolves".into(), division: "10U (5th)".into() },
                Team { id: "b".into(), name: "Ballers".into(), division: "14U (8th)".into() },
            ],
            vec![Game { id: "g1".into(), division: "10U (5th)".into(), ..Default::default() }],
        )
    }

    #[tokio::test]
    async fn reads_respect_scope() {
        let s = store();
        let teams = s.fetch_teams(&DivisionScope::Division("14U (8th)".into())).await.unwrap();
        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0].name, "Ballers");
        assert_eq!(s.reads(), 1);
    }

    #[tokio::test]
    async fn unavailable_store_fails_every_read() {
        let s = store();
        s.set_unavailable(true);
        assert!(s.fetch_teams(&DivisionScope::All).await.is_err());
        assert!(s.fetch_games(&GameQuery::default()).await.is_err());
        s.set_unavailable(false);
        assert!(s.fetch_games(&GameQuery::default()).await.is_ok());
    }

    #[tokio::test]
    async fn upsert_replaces_in_place() {
        let s = store();
        let shared = s.clone();
        shared.upsert_game(Game {
            id: "g1".into(),
            status: GameStatus::InProgress,
            ..Default::default()
        });
        assert_eq!(s.fetch_game("g1").await.unwrap().status, GameStatus::InProgress);
        assert_eq!(s.games().len(), 1);
        assert!(matches!(s.fetch_game("zzz").await, Err(StoreError::NotFound(_))));
    }
}
