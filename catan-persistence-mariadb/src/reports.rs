use catan_domain::{
    GameId, PlayerId, ServiceResult,
    game::{GameSummary, ScoreRow},
    leaderboard::LeaderboardEntry,
};
use sqlx::{MySqlConnection, Row, mysql::MySqlRow};

use crate::{map_db_error, points_from_db};

fn game_summary_from_row(row: &MySqlRow) -> sqlx::Result<GameSummary> {
    Ok(GameSummary {
        id: GameId(row.try_get("id")?),
        played_at: row.try_get("played_at")?,
        winner: row.try_get("winner")?,
    })
}

pub(crate) async fn select_games(
    conn: &mut MySqlConnection,
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

pub(crate) async fn select_leaderboard(
    conn: &mut MySqlConnection,
) -> ServiceResult<Vec<LeaderboardEntry>> {
    // SUM over INT yields DECIMAL in MariaDB
    let rows = sqlx::query(
        "SELECT
            p.id AS player_id,
            p.name AS name,
            CAST(COALESCE(SUM(s.points), 0) AS SIGNED) AS total_points,
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

pub(crate) async fn select_all_scores(conn: &mut MySqlConnection) -> ServiceResult<Vec<ScoreRow>> {
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
            Ok(ScoreRow {
                game_id: GameId(row.try_get("game_id").map_err(map_db_error)?),
                played_at: row.try_get("played_at").map_err(map_db_error)?,
                player: row.try_get("player").map_err(map_db_error)?,
                points: points_from_db(row.try_get("points").map_err(map_db_error)?)?,
            })
        })
        .collect()
}
