use catan_domain::{DEFAULT_PLAYERS, ServiceResult};
use log::info;

use crate::{SqliteScoreRepository, map_db_error};

const CREATE_TABLES: [&str; 3] = [
    "CREATE TABLE IF NOT EXISTS players (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE
    )",
    "CREATE TABLE IF NOT EXISTS games (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        played_at TEXT NOT NULL,
        winner_id INTEGER REFERENCES players(id)
    )",
    "CREATE TABLE IF NOT EXISTS scores (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        game_id INTEGER NOT NULL REFERENCES games(id) ON DELETE CASCADE,
        player_id INTEGER NOT NULL REFERENCES players(id),
        points INTEGER NOT NULL CHECK (points >= 0)
    )",
];

impl SqliteScoreRepository {
    pub(crate) async fn create_schema_and_seed(&self) -> ServiceResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        for statement in CREATE_TABLES {
            sqlx::query(statement)
                .execute(&mut *tx)
                .await
                .map_err(map_db_error)?;
        }

        let player_count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM players")
            .fetch_one(&mut *tx)
            .await
            .map_err(map_db_error)?;

        if player_count == 0 {
            for name in DEFAULT_PLAYERS {
                sqlx::query("INSERT OR IGNORE INTO players (name) VALUES (?)")
                    .bind(name)
                    .execute(&mut *tx)
                    .await
                    .map_err(map_db_error)?;
            }
            info!("Seeded default players {:?}", DEFAULT_PLAYERS);
        }

        tx.commit().await.map_err(map_db_error)?;
        info!("SQLite schema ready");
        Ok(())
    }
}
