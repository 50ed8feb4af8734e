use crate::demo;
use anyhow::anyhow;
use chrono::NaiveDate;
use league_api::client::{FirestoreClient, GameQuery, LeagueStore, StoreConfig};
use league_api::league::DivisionScope;
use league_api::memory::InMemoryStore;
use league_api::{Game, StoreResult, Team, UserProfile};

/// Where league data comes from for this run.
#[derive(Debug, Clone)]
pub enum Backend {
    Remote(FirestoreClient),
    Demo(InMemoryStore),
}

impl Backend {
    pub fn connect(demo_mode: bool, today: NaiveDate) -> anyhow::Result<Self> {
        if demo_mode {
            return Ok(Backend::Demo(demo::league(today)));
        }
        let config = StoreConfig::from_env()
            .ok_or_else(|| anyhow!("HOOPS_PROJECT_ID is not set (run with --demo for a sample league)"))?;
        Ok(Backend::Remote(FirestoreClient::new(config)))
    }

    pub fn demo_store(&self) -> Option<&InMemoryStore> {
        match self {
            Backend::Demo(store) => Some(store),
            Backend::Remote(_) => None,
        }
    }
}

impl LeagueStore for Backend {
    async fn fetch_teams(&self, scope: &DivisionScope) -> StoreResult<Vec<Team>> {
        match self {
            Backend::Remote(client) => client.fetch_teams(scope).await,
            Backend::Demo(store) => store.fetch_teams(scope).await,
        }
    }

    async fn fetch_games(&self, query: &GameQuery) -> StoreResult<Vec<Game>> {
        match self {
            Backend::Remote(client) => client.fetch_games(query).await,
            Backend::Demo(store) => store.fetch_games(query).await,
        }
    }

    async fn fetch_game(&self, id: &str) -> StoreResult<Game> {
        match self {
            Backend::Remote(client) => client.fetch_game(id).await,
            Backend::Demo(store) => store.fetch_game(id).await,
        }
    }

    async fn fetch_user_profile(&self, uid: &str) -> StoreResult<UserProfile> {
        match self {
            Backend::Remote(client) => client.fetch_user_profile(uid).await,
            Backend::Demo(store) => store.fetch_user_profile(uid).await,
        }
    }
}
