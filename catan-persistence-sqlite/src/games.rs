use catan_domain::{
    GameId, PlayerId, ServiceResult,
    game::{GameSummary, PlayerPoints},
};
use chrono::{DateTime, Utc};
use sqlx::{Row, SqliteConnection, sqlite::SqliteRow};

use crate::{SqliteScoreRepository, map_db_error};

fn game_summary_from_row(row: &SqliteRow) -> sqlx::Result<GameSummary> {
    Ok(GameSummary {
        id: GameId(row.try_get("id")?),
        played_at: row.try_get("played_at")?,
        winner: row.try_get("winner")?,
    })
}

impl SqliteScoreRepository {
    pub(crate) async fn insert_game(
        &self,
        played_at: DateTime<Utc>,
        winner: PlayerId,
        points: &[PlayerPoints],
    ) -> ServiceResult<GameId> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let game_id = sqlx::query("INSERT INTO games (played_at, winner_id) VALUES (?, ?)")
            .bind(played_at)
            .bind(winner.0)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?
            .last_insert_rowid();

        for entry in points {
            sqlx::query("INSERT INTO scores (game_id, player_id, points) VALUES (?, ?, ?)")
                .bind(game_id)
                .bind(entry.player_id.0)
                .bind(i64::from(entry.points))
                .execute(&mut *tx)
                .await
                .map_err(map_db_error)?;
        }

        tx.commit().await.map_err(map_db_error)?;
        Ok(GameId(game_id))
    }

    pub(crate) async fn fetch_games(&self, newest_first: bool) -> ServiceResult<Vec<GameSummary>> {
        let mut conn = self.pool.acquire().await.map_err(map_db_error)?;
        select_games(&mut *conn, newest_first).await
    }
}

pub(crate) async fn select_games(
    conn: &mut SqliteConnection,
    newest_first: bool,
) -> ServiceResult<Vec<GameSummary>> {
    let query = if newest_first {
        "SELECT g.id AS id, g.played_at AS played_at, p.name AS winner
         FROM games g LEFT JOIN players p ON p.id = g.winner_id
         ORDER BY g.played_at DESC, g.id DESC"
    } else {
        "SELECT g.id AS id, g.played_at AS played_at, p.name AS winner
         FROM games g LEFT JOIN players p ON p.id = g.winner_id
         ORDER BY g.played_at ASC, g.id ASC"
    };
    let rows = sqlx::query(query)
        .fetch_all(&mut *conn)
        .await
        .map_err(map_db_error)?;
    rows.iter()
        .map(game_summary_from_row)
        .collect::<sqlx::Result<Vec<_>>>()
        .map_err(map_db_error)
}
