use catan_domain::{
    GameId, PlayerId, ServiceError, ServiceResult,
    game::{GameScore, GameSummary, PlayerPoints, ScoreRow},
    leaderboard::LeaderboardEntry,
    player::Player,
    repository::{ReportSnapshot, ScoreRepository},
};
use chrono::{DateTime, Utc};
use sqlx::{
    MySql, Pool, Row,
    mysql::{MySqlConnectOptions, MySqlPoolOptions},
};

mod reports;
mod schema;

/// SQLSTATE for "base table or view not found".
const NO_SUCH_TABLE: &str = "42S02";

pub fn create_db_pool() -> Pool<MySql> {
    let db_username = std::env::var("MARIADB_USERNAME").expect("MARIADB_USERNAME env var not set");
    let db_password = std::env::var("MARIADB_PASSWORD").expect("MARIADB_PASSWORD env var not set");
    let db_host = std::env::var("MARIADB_HOST").expect("MARIADB_HOST env var not set");
    let db_port = std::env::var("MARIADB_PORT").expect("MARIADB_PORT env var not set");
    let db_database = std::env::var("MARIADB_DATABASE").expect("MARIADB_DATABASE env var not set");

    let conn_options = MySqlConnectOptions::new()
        .username(&db_username)
        .password(&db_password)
        .host(&db_host)
        .port(db_port.parse().expect("Invalid MARIADB_PORT"))
        .database(&db_database)
        .timezone(Some("+00:00".to_string()));

    MySqlPoolOptions::new()
        .max_connections(5)
        .connect_lazy_with(conn_options)
}

pub(crate) fn map_db_error(e: sqlx::Error) -> ServiceError {
    match &e {
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(NO_SUCH_TABLE) => {
            ServiceError::Uninitialized(db_err.message().to_string())
        }
        sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
            ServiceError::BadRequest(format!("unknown player: {}", db_err.message()))
        }
        _ => ServiceError::Internal(e.to_string()),
    }
}

pub(crate) fn points_from_db(points: i32) -> ServiceResult<u32> {
    u32::try_from(points)
        .map_err(|_| ServiceError::Internal(format!("invalid points value {} in database", points)))
}

pub struct MariaDbScoreRepository {
    pool: Pool<MySql>,
}

impl MariaDbScoreRepository {
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ScoreRepository for MariaDbScoreRepository {
    async fn initialize(&self) -> ServiceResult<()> {
        self.create_schema_and_seed().await
    }

    async fn add_player(&self, name: &str) -> ServiceResult<()> {
        sqlx::query("INSERT IGNORE INTO players (name) VALUES (?)")
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(())
    }

    async fn list_players(&self) -> ServiceResult<Vec<Player>> {
        let rows = sqlx::query("SELECT id, name FROM players ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;
        rows.iter()
            .map(|row| {
                Ok(Player {
                    id: PlayerId(row.try_get("id")?),
                    name: row.try_get("name")?,
                })
            })
            .collect::<sqlx::Result<Vec<Player>>>()
            .map_err(map_db_error)
    }

    async fn create_game(
        &self,
        played_at: DateTime<Utc>,
        winner: PlayerId,
        points: &[PlayerPoints],
    ) -> ServiceResult<GameId> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let inserted = sqlx::query("INSERT INTO games (played_at, winner_id) VALUES (?, ?)")
            .bind(played_at)
            .bind(winner.0)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?
            .last_insert_id();
        let game_id = i64::try_from(inserted)
            .map_err(|_| ServiceError::Internal(format!("game id {} out of range", inserted)))?;

        for entry in points {
            sqlx::query("INSERT INTO scores (game_id, player_id, points) VALUES (?, ?, ?)")
                .bind(game_id)
                .bind(entry.player_id.0)
                .bind(entry.points)
                .execute(&mut *tx)
                .await
                .map_err(map_db_error)?;
        }

        tx.commit().await.map_err(map_db_error)?;
        Ok(GameId(game_id))
    }

    async fn list_games(&self) -> ServiceResult<Vec<GameSummary>> {
        let mut conn = self.pool.acquire().await.map_err(map_db_error)?;
        reports::select_games(&mut *conn, true).await
    }

    async fn leaderboard(&self) -> ServiceResult<Vec<LeaderboardEntry>> {
        let mut conn = self.pool.acquire().await.map_err(map_db_error)?;
        reports::select_leaderboard(&mut *conn).await
    }

    async fn game_scores(&self, game_id: GameId) -> ServiceResult<Vec<GameScore>> {
        let rows = sqlx::query(
            "SELECT p.name AS player, s.points AS points
             FROM scores s
             JOIN players p ON p.id = s.player_id
             WHERE s.game_id = ?
             ORDER BY s.points DESC, p.name ASC",
        )
        .bind(game_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        rows.iter()
            .map(|row| {
                Ok(GameScore {
                    player: row.try_get("player").map_err(map_db_error)?,
                    points: points_from_db(row.try_get("points").map_err(map_db_error)?)?,
                })
            })
            .collect()
    }

    async fn all_scores(&self) -> ServiceResult<Vec<ScoreRow>> {
        let mut conn = self.pool.acquire().await.map_err(map_db_error)?;
        reports::select_all_scores(&mut *conn).await
    }

    async fn games_with_winners(&self) -> ServiceResult<Vec<GameSummary>> {
        let mut conn = self.pool.acquire().await.map_err(map_db_error)?;
        reports::select_games(&mut *conn, false).await
    }

    async fn report_snapshot(&self) -> ServiceResult<ReportSnapshot> {
        // InnoDB fixes the read view at the first read of the transaction
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;
        let leaderboard = reports::select_leaderboard(&mut *tx).await?;
        let games = reports::select_games(&mut *tx, false).await?;
        let scores = reports::select_all_scores(&mut *tx).await?;
        tx.commit().await.map_err(map_db_error)?;

        Ok(ReportSnapshot {
            leaderboard,
            games,
            scores,
        })
    }
}
