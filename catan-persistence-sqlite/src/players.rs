use catan_domain::{PlayerId, ServiceResult, player::Player};
use sqlx::Row;

use crate::{SqliteScoreRepository, map_db_error};

impl SqliteScoreRepository {
    pub(crate) async fn insert_player(&self, name: &str) -> ServiceResult<()> {
        sqlx::query("INSERT OR IGNORE INTO players (name) VALUES (?)")
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(())
    }

    pub(crate) async fn fetch_players(&self) -> ServiceResult<Vec<Player>> {
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
}
