use catan_domain::{DEFAULT_PLAYERS, ServiceResult};
use log::info;

use crate::{MariaDbScoreRepository, map_db_error};

const CREATE_TABLES: [&str; 3] = [
    "CREATE TABLE IF NOT EXISTS players (
        id BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY,
        name VARCHAR(255) CHARACTER SET utf8mb4 COLLATE utf8mb4_bin NOT NULL UNIQUE
    )",
    "CREATE TABLE IF NOT EXISTS games (
        id BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY,
        played_at DATETIME NOT NULL,
        winner_id BIGINT NULL,
        FOREIGN KEY (winner_id) REFERENCES players(id)
    )",
    "CREATE TABLE IF NOT EXISTS scores (
        id BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY,
        game_id BIGINT NOT NULL,
        player_id BIGINT NOT NULL,
        points INT NOT NULL CHECK (points >= 0),
        FOREIGN KEY (game_id) REFERENCES games(id) ON DELETE CASCADE,
        FOREIGN KEY (player_id) REFERENCES players(id)
    )",
];

impl MariaDbScoreRepository {
    pub(crate) async fn create_schema_and_seed(&self) -> ServiceResult<()> {
        // DDL commits implicitly in MariaDB, so only the seeding runs in a transaction
        for statement in CREATE_TABLES {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(map_db_error)?;
        }

        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let player_count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM players")
            .fetch_one(&mut *tx)
            .await
            .map_err(map_db_error)?;

        if player_count == 0 {
            for name in DEFAULT_PLAYERS {
                sqlx::query("INSERT IGNORE INTO players (name) VALUES (?)")
                    .bind(name)
                    .execute(&mut *tx)
                    .await
                    .map_err(map_db_error)?;
            }
            info!("Seeded default players {:?}", DEFAULT_PLAYERS);
        }

        tx.commit().await.map_err(map_db_error)?;
        info!("MariaDB schema ready");
        Ok(())
    }
}
