use chrono::{DateTime, Utc};
use catan_domain::{
    GameId, PlayerId, ServiceError, ServiceResult,
    game::{GameScore, GameSummary, PlayerPoints, ScoreRow},
    leaderboard::LeaderboardEntry,
    player::Player,
    repository::{ReportSnapshot, ScoreRepository},
};
use sqlx::{
    Pool, Sqlite,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

mod games;
mod players;
mod reports;
mod schema;

pub fn create_db_pool(db_path: &str) -> Pool<Sqlite> {
    let conn_options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_lazy_with(conn_options)
}

pub fn create_db_pool_from_env() -> Pool<Sqlite> {
    let db_path = std::env::var("CATAN_SQLITE_DB").expect("CATAN_SQLITE_DB env var not set");
    create_db_pool(&db_path)
}

/// A single-connection in-memory database. Every pool gets its own database.
pub async fn create_memory_db_pool() -> ServiceResult<Pool<Sqlite>> {
    let conn_options = SqliteConnectOptions::new()
        .in_memory(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(conn_options)
        .await
        .map_err(map_db_error)
}

pub(crate) fn map_db_error(e: sqlx::Error) -> ServiceError {
    match &e {
        sqlx::Error::Database(db_err) if db_err.message().contains("no such table") => {
            ServiceError::Uninitialized(db_err.message().to_string())
        }
        sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
            ServiceError::BadRequest(format!("unknown player: {}", db_err.message()))
        }
        _ => ServiceError::Internal(e.to_string()),
    }
}

pub(crate) fn points_from_db(points: i64) -> ServiceResult<u32> {
    u32::try_from(points)
        .map_err(|_| ServiceError::Internal(format!("invalid points value {} in database", points)))
}

pub struct SqliteScoreRepository {
    pool: Pool<Sqlite>,
}

impl SqliteScoreRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ScoreRepository for SqliteScoreRepository {
    async fn initialize(&self) -> ServiceResult<()> {
        self.create_schema_and_seed().await
    }

    async fn add_player(&self, name: &str) -> ServiceResult<()> {
        self.insert_player(name).await
    }

    async fn list_players(&self) -> ServiceResult<Vec<Player>> {
        self.fetch_players().await
    }

    async fn create_game(
        &self,
        played_at: DateTime<Utc>,
        winner: PlayerId,
        points: &[PlayerPoints],
    ) -> ServiceResult<GameId> {
        self.insert_game(played_at, winner, points).await
    }

    async fn list_games(&self) -> ServiceResult<Vec<GameSummary>> {
        self.fetch_games(true).await
    }

    async fn leaderboard(&self) -> ServiceResult<Vec<LeaderboardEntry>> {
        self.fetch_leaderboard().await
    }

    async fn game_scores(&self, game_id: GameId) -> ServiceResult<Vec<GameScore>> {
        self.fetch_game_scores(game_id).await
    }

    async fn all_scores(&self) -> ServiceResult<Vec<ScoreRow>> {
        self.fetch_all_scores().await
    }

    async fn games_with_winners(&self) -> ServiceResult<Vec<GameSummary>> {
        self.fetch_games(false).await
    }

    async fn report_snapshot(&self) -> ServiceResult<ReportSnapshot> {
        self.fetch_report_snapshot().await
    }
}
