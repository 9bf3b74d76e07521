use catan_domain::{
    GameId, PlayerId, ServiceResult,
    game::{GameScore, ScoreRow},
    leaderboard::LeaderboardEntry,
    repository::ReportSnapshot,
};
use sqlx::{Row, SqliteConnection};

use crate::{SqliteScoreRepository, games::select_games, map_db_error, points_from_db};

impl SqliteScoreRepository {
    pub(crate) async fn fetch_leaderboard(&self) -> ServiceResult<Vec<LeaderboardEntry>> {
        let mut conn = self.pool.acquire().await.map_err(map_db_error)?;
        select_leaderboard(&mut *conn).await
    }

    pub(crate) async fn fetch_game_scores(&self, game_id: GameId) -> ServiceResult<Vec<GameScore>> {
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
                let points: i64 = row.try_get("points").map_err(map_db_error)?;
                Ok(GameScore {
                    player: row.try_get("player").map_err(map_db_error)?,
                    points: points_from_db(points)?,
                })
            })
            .collect()
    }

    pub(crate) async fn fetch_all_scores(&self) -> ServiceResult<Vec<ScoreRow>> {
        let mut conn = self.pool.acquire().await.map_err(map_db_error)?;
        select_all_scores(&mut *conn).await
    }

    pub(crate) async fn fetch_report_snapshot(&self) -> ServiceResult<ReportSnapshot> {
        // all three reads see the same committed games
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;
        let leaderboard = select_leaderboard(&mut *tx).await?;
        let games = select_games(&mut *tx, false).await?;
        let scores = select_all_scores(&mut *tx).await?;
        tx.commit().await.map_err(map_db_error)?;

        Ok(ReportSnapshot {
            leaderboard,
            games,
            scores,
        })
    }
}

async fn select_leaderboard(conn: &mut SqliteConnection) -> ServiceResult<Vec<LeaderboardEntry>> {
    let rows = sqlx::query(
        "SELECT
            p.id AS player_id,
            p.name AS name,
            COALESCE(SUM(s.points), 0) AS total_points,
            COUNT(DISTINCT CASE WHEN g.winner_id = p.id THEN g.id END) AS wins,
            COUNT(DISTINCT s.game_id) AS games_played
         FROM players p
         LEFT JOIN scores s ON s.player_id = p.id
         LEFT JOIN games g ON g.id = s.game_id
         GROUP BY p.id, p.name
         ORDER BY total_points DESC, wins DESC, p.name ASC",
    )
    .fetch_all(&mut *conn)
    .await
    .map_err(map_db_error)?;

    rows.iter()
        .map(|row| {
            Ok(LeaderboardEntry {
                player_id: PlayerId(row.try_get("player_id")?),
                name: row.try_get("name")?,
                total_points: row.try_get("total_points")?,
                wins: row.try_get("wins")?,
                games_played: row.try_get("games_played")?,
            })
        })
        .collect::<sqlx::Result<Vec<_>>>()
        .map_err(map_db_error)
}

async fn select_all_scores(conn: &mut SqliteConnection) -> ServiceResult<Vec<ScoreRow>> {
    let rows = sqlx::query(
        "SELECT g.id AS game_id, g.played_at AS played_at, p.name AS player, s.points AS points
         FROM scores s
         JOIN games g ON g.id = s.game_id
         JOIN players p ON p.id = s.player_id
         ORDER BY g.played_at ASC, g.id ASC, s.points DESC, p.name ASC",
    )
    .fetch_all(&mut *conn)
    .await
    .map_err(map_db_error)?;

    rows.iter()
        .map(|row| {
            let points: i64 = row.try_get("points").map_err(map_db_error)?;
            Ok(ScoreRow {
                game_id: GameId(row.try_get("game_id").map_err(map_db_error)?),
                played_at: row.try_get("played_at").map_err(map_db_error)?,
                player: row.try_get("player").map_err(map_db_error)?,
                points: points_from_db(points)?,
            })
        })
        .collect()
}
