use crate::firestore::{
    Document, ErrorEnvelope, FieldOp, RunQueryRequest, RunQueryResponseItem, StructuredQuery, Value,
};
use crate::league::DivisionScope;
use crate::normalize::{game_from_document, team_from_document, user_profile_from_document};
use crate::window::TimeWindow;
use crate::{Game, GameStatus, StoreError, StoreResult, Team, UserProfile};
use log::debug;
use reqwest::{Client, RequestBuilder};
use std::future::Future;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://firestore.googleapis.com";
const DEFAULT_DATABASE: &str = "(default)";

// ---------------------------------------------------------------------------
// Store boundary
// ---------------------------------------------------------------------------

/// Filters for a games read. Empty `statuses` means any status.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameQuery {
    pub scope: DivisionScope,
    pub statuses: Vec<GameStatus>,
    pub window: Option<TimeWindow>,
    pub season: Option<String>,
    pub limit: Option<usize>,
}

impl GameQuery {
    pub fn new(scope: DivisionScope) -> Self {
        Self {
            scope,
            ..Default::default()
        }
    }

    pub fn with_status(mut self, status: GameStatus) -> Self {
        self.statuses.push(status);
        self
    }

    pub fn for_season(mut self, season: Option<String>) -> Self {
        self.season = season;
        self
    }

    pub fn matches(&self, game: &Game) -> bool {
        self.scope.contains(&game.division)
            && (self.statuses.is_empty() || self.statuses.contains(&game.status))
            && self
                .window
                .is_none_or(|w| game.scheduled_for.is_some_and(|at| w.contains(at)))
            && self.season.as_deref().is_none_or(|s| {
                game.season
                    .as_deref()
                    .is_some_and(|gs| gs.trim().eq_ignore_ascii_case(s.trim()))
            })
    }

    /// Client-side half of every read: filter, order by scheduled time (unscheduled last), cap.
    pub fn apply(&self, games: impl IntoIterator<Item = Game>) -> Vec<Game> {
        let mut out: Vec<Game> = games.into_iter().filter(|g| self.matches(g)).collect();
        out.sort_by_key(|g| (g.scheduled_for.is_none(), g.scheduled_for));
        if let Some(limit) = self.limit {
            out.truncate(limit);
        }
        out
    }
}

/// Read-only access to league data. Every read returns normalized domain types.
pub trait LeagueStore: Send + Sync {
    fn fetch_teams(&self, scope: &DivisionScope) -> impl Future<Output = StoreResult<Vec<Team>>> + Send;

    fn fetch_games(&self, query: &GameQuery) -> impl Future<Output = StoreResult<Vec<Game>>> + Send;

    fn fetch_game(&self, id: &str) -> impl Future<Output = StoreResult<Game>> + Send;

    fn fetch_user_profile(&self, uid: &str) -> impl Future<Output = StoreResult<UserProfile>> + Send;
}

// ---------------------------------------------------------------------------
// Document-store REST client
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub base_url: String,
    pub project_id: String,
    pub database: String,
    pub api_key: Option<String>,
    /// Bearer token issued by the auth provider for the signed-in user.
    pub id_token: Option<String>,
    pub timeout: Duration,
}

impl StoreConfig {
    pub fn new(project_id: &str) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            project_id: project_id.to_owned(),
            database: DEFAULT_DATABASE.to_owned(),
            api_key: None,
            id_token: None,
            timeout: Duration::from_secs(10),
        }
    }

    /// `HOOPS_PROJECT_ID` is required; everything else has a default.
    pub fn from_env() -> Option<Self> {
        let var = |k: &str| std::env::var(k).ok().filter(|v| !v.trim().is_empty());
        let mut config = StoreConfig::new(&var("HOOPS_PROJECT_ID")?);
        if let Some(url) = var("HOOPS_FIRESTORE_URL") {
            config.base_url = url.trim_end_matches('/').to_owned();
        }
        if let Some(db) = var("HOOPS_DATABASE") {
            config.database = db;
        }
        config.api_key = var("HOOPS_API_KEY");
        config.id_token = var("HOOPS_ID_TOKEN");
        if let Some(secs) = var("HOOPS_TIMEOUT_SECS").and_then(|s| s.parse().ok()) {
            config.timeout = Duration::from_secs(secs);
        }
        Some(config)
    }

    fn documents_url(&self) -> String {
        format!(
            "{}/v1/projects/{}/databases/{}/documents",
            self.base_url, self.project_id, self.database
        )
    }
}

#[derive(Debug, Clone)]
pub struct FirestoreClient {
    client: Client,
    config: StoreConfig,
}

impl FirestoreClient {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            client: Client::builder()
                .user_agent("hoopsboard/0.1 (terminal standings board)")
                .build()
                .unwrap_or_default(),
            config,
        }
    }

    async fn run_query(&self, query: StructuredQuery) -> StoreResult<Vec<Document>> {
        let url = format!("{}:runQuery", self.config.documents_url());
        let request = self.client.post(self.with_key(&url)).json(&RunQueryRequest {
            structured_query: query,
        });
        let items: Vec<RunQueryResponseItem> = self.send(request, &url).await?;
        Ok(items.into_iter().filter_map(|i| i.document).collect())
    }

    async fn get_document(&self, collection: &str, id: &str) -> StoreResult<Document> {
        let url = format!("{}/{collection}/{id}", self.config.documents_url());
        let request = self.client.get(self.with_key(&url));
        self.send(request, &url).await
    }

    fn with_key(&self, url: &str) -> String {
        match &self.config.api_key {
            Some(key) => format!("{url}?key={key}"),
            None => url.to_owned(),
        }
    }

    async fn send<T: serde::de::DeserializeOwned>(&self, request: RequestBuilder, url: &str) -> StoreResult<T> {
        let request = match &self.config.id_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let response = request
            .timeout(self.config.timeout)
            .send()
            .await
            .map_err(|source| StoreError::Network {
                url: url.to_owned(),
                source,
            })?;

        let status = response.status();
        if status.is_success() {
            return response.json::<T>().await.map_err(|e| StoreError::Parsing {
                url: url.to_owned(),
                message: e.to_string(),
            });
        }

        let body: ErrorEnvelope = response.json().await.unwrap_or_default();
        debug!("store error {} for {url}: {}", status.as_u16(), body.error.message);
        Err(match (status.as_u16(), body.error.status.as_str()) {
            (403, _) | (_, "PERMISSION_DENIED") => StoreError::PermissionDenied { url: url.to_owned() },
            (404, _) | (_, "NOT_FOUND") => StoreError::NotFound(url.to_owned()),
            (code, _) => StoreError::Api {
                url: url.to_owned(),
                status: code,
                message: body.error.message,
            },
        })
    }
}

/// Division and status equality are pushed to the store. Unknown or missing status strings
/// normalize to scheduled, so a query that wants scheduled games must read every status.
fn games_query(query: &GameQuery) -> StructuredQuery {
    let mut q = StructuredQuery::collection("games");
    if let Some(division) = query.scope.name() {
        q = q.and("division", FieldOp::Equal, Value::string(division));
    }
    if !query.statuses.is_empty() && !query.statuses.contains(&GameStatus::Scheduled) {
        let raw: Vec<Value> = query
            .statuses
            .iter()
            .flat_map(|s| s.synonyms().iter().map(|v| Value::string(*v)))
            .collect();
        q = q.and("status", FieldOp::In, Value::array(raw));
    }
    q
}

impl LeagueStore for FirestoreClient {
    async fn fetch_teams(&self, scope: &DivisionScope) -> StoreResult<Vec<Team>> {
        let mut q = StructuredQuery::collection("teams");
        if let Some(division) = scope.name() {
            q = q.and("division", FieldOp::Equal, Value::string(division));
        }
        let docs = self.run_query(q).await?;
        Ok(docs
            .iter()
            .filter_map(team_from_document)
            .filter(|t| scope.contains(&t.division))
            .collect())
    }

    async fn fetch_games(&self, query: &GameQuery) -> StoreResult<Vec<Game>> {
        let docs = self.run_query(games_query(query)).await?;
        Ok(query.apply(docs.iter().map(game_from_document)))
    }

    async fn fetch_game(&self, id: &str) -> StoreResult<Game> {
        let doc = self.get_document("games", id).await?;
        Ok(game_from_document(&doc))
    }

    async fn fetch_user_profile(&self, uid: &str) -> StoreResult<UserProfile> {
        let doc = self.get_document("users", uid).await?;
        Ok(user_profile_from_document(&doc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use crate::window::LeagueZone;
    use mockito::Matcher;

    const RUN_QUERY: &str = "/v1/projects/demo/databases/(default)/documents:runQuery";

    fn utc() -> LeagueZone {
        LeagueZone::from_offset_minutes(Some(0))
    }

    fn client(url: &str) -> FirestoreClient {
        let mut config = StoreConfig::new("demo");
        config.base_url = url.to_owned();
        FirestoreClient::new(config)
    }

    const GAMES_BODY: &str = r#"[
        {"document": {
            "name": "projects/demo/databases/(default)/documents/games/late",
            "fields": {
                "division": {"stringValue": "10U (5th)"},
                "homeTeam": {"stringValue": "Wolves"},
                "awayTeam": {"stringValue": "ReZ Fire"},
                "homeScore": {"integerValue": "32"},
                "awayScore": {"integerValue": "28"},
                "status": {"stringValue": "final"},
                "scheduledFor": {"timestampValue": "2025-01-18T17:00:00Z"}
            }
        }, "readTime": "2025-01-19T00:00:00Z"},
        {"document": {
            "name": "projects/demo/databases/(default)/documents/games/early",
            "fields": {
                "division": {"stringValue": "10U (5th)"},
                "team1": {"stringValue": "Hawks"},
                "team2": {"stringValue": "Wolves"},
                "score1": {"integerValue": "20"},
                "status": {"stringValue": "finished"},
                "scheduledFor": {"timestampValue": "2025-01-18T15:00:00Z"}
            }
        }},
        {"readTime": "2025-01-19T00:00:00Z"}
    ]"#;

    #[tokio::test]
    async fn games_are_queried_normalized_and_ordered() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", RUN_QUERY)
            .match_query(Matcher::Any)
            .match_body(Matcher::PartialJson(serde_json::json!({
                "structuredQuery": {
                    "from": [{"collectionId": "games"}],
                    "where": {"compositeFilter": {"op": "AND"}}
                }
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(GAMES_BODY)
            .create_async()
            .await;

        let query = GameQuery::new(DivisionScope::Division("10U (5th)".into())).with_status(GameStatus::Completed);
        let games = client(&server.url()).fetch_games(&query).await.unwrap();
        mock.assert_async().await;

        let ids: Vec<&str> = games.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, vec!["early", "late"]);
        assert_eq!(games[0].score, Some((20, 0)));
        assert_eq!(games[0].status, GameStatus::Completed);
        assert_eq!(games[1].home.as_deref(), Some("Wolves"));
    }

    #[tokio::test]
    async fn window_and_limit_apply_client_side() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", RUN_QUERY)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(GAMES_BODY)
            .create_async()
            .await;

        let day = NaiveDate::from_ymd_opt(2025, 1, 18).unwrap();
        let query = GameQuery {
            window: Some(TimeWindow::day(day, utc())),
            limit: Some(1),
            ..GameQuery::default()
        };
        let games = client(&server.url()).fetch_games(&query).await.unwrap();
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].scheduled_for, Some(Utc.with_ymd_and_hms(2025, 1, 18, 15, 0, 0).unwrap()));

        let next_day = NaiveDate::from_ymd_opt(2025, 1, 19).unwrap();
        let query = GameQuery {
            window: Some(TimeWindow::day(next_day, utc())),
            ..GameQuery::default()
        };
        assert!(client(&server.url()).fetch_games(&query).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn credentials_are_sent() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/v1/projects/demo/databases/(default)/documents/users/u1")
            .match_query(Matcher::UrlEncoded("key".into(), "k123".into()))
            .match_header("authorization", "Bearer tok")
            .with_status(200)
            .with_body(
                r#"{"name": "projects/demo/databases/(default)/documents/users/u1",
                    "fields": {"email": {"stringValue": "sk@example.com"}, "role": {"stringValue": "scorekeeper"}}}"#,
            )
            .create_async()
            .await;

        let mut config = StoreConfig::new("demo");
        config.base_url = server.url();
        config.api_key = Some("k123".into());
        config.id_token = Some("tok".into());
        let profile = FirestoreClient::new(config).fetch_user_profile("u1").await.unwrap();
        mock.assert_async().await;
        assert_eq!(profile.display_name, "sk");
        assert_eq!(profile.role.as_deref(), Some("scorekeeper"));
    }

    #[tokio::test]
    async fn store_errors_map_to_variants() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v1/projects/demo/databases/(default)/documents/users/locked")
            .match_query(Matcher::Any)
            .with_status(403)
            .with_body(r#"{"error": {"code": 403, "message": "Missing or insufficient permissions.", "status": "PERMISSION_DENIED"}}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/v1/projects/demo/databases/(default)/documents/games/nope")
            .match_query(Matcher::Any)
            .with_status(404)
            .with_body(r#"{"error": {"code": 404, "message": "not found", "status": "NOT_FOUND"}}"#)
            .create_async()
            .await;
        server
            .mock("POST", RUN_QUERY)
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body("oops")
            .create_async()
            .await;

        let c = client(&server.url());
        assert!(c.fetch_user_profile("locked").await.unwrap_err().is_permission_denied());
        assert!(matches!(c.fetch_game("nope").await, Err(StoreError::NotFound(_))));
        assert!(matches!(
            c.fetch_teams(&DivisionScope::All).await,
            Err(StoreError::Api { status: 500, .. })
        ));
    }

    #[test]
    fn scheduled_queries_read_every_status() {
        let q = games_query(&GameQuery::default().with_status(GameStatus::Scheduled));
        assert!(q.filter.is_none());
        let q = games_query(&GameQuery::default().with_status(GameStatus::InProgress));
        assert!(q.filter.is_some());
    }

    #[test]
    fn season_filter_matches_loosely() {
        let game = Game {
            season: Some("2025".into()),
            ..Default::default()
        };
        assert!(GameQuery::default().for_season(Some(" 2025".into())).matches(&game));
        assert!(!GameQuery::default().for_season(Some("2024".into())).matches(&game));
        assert!(GameQuery::default().matches(&game));
    }
}
