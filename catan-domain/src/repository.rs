use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::{
    GameId, PlayerId, ServiceResult,
    game::{GameScore, GameSummary, PlayerPoints, ScoreRow},
    leaderboard::LeaderboardEntry,
    player::Player,
};

/// Rows read together in one transaction, so the reports derived from them
/// agree with each other.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReportSnapshot {
    pub leaderboard: Vec<LeaderboardEntry>,
    /// Oldest game first.
    pub games: Vec<GameSummary>,
    /// Oldest game first.
    pub scores: Vec<ScoreRow>,
}

pub type ArcScoreRepository = Arc<Box<dyn ScoreRepository + Send + Sync + 'static>>;

/// Storage port shared by the SQLite and MariaDB backends.
///
/// Implementations report a missing schema as
/// [`ServiceError::Uninitialized`](crate::ServiceError::Uninitialized).
#[async_trait::async_trait]
pub trait ScoreRepository {
    /// Creates the tables if needed and seeds the default players into an
    /// empty `players` table.
    async fn initialize(&self) -> ServiceResult<()>;
    /// Inserts a player; an existing name is left untouched.
    async fn add_player(&self, name: &str) -> ServiceResult<()>;
    /// All players ordered by name.
    async fn list_players(&self) -> ServiceResult<Vec<Player>>;
    /// Inserts the game row and one score row per entry in one transaction.
    async fn create_game(
        &self,
        played_at: DateTime<Utc>,
        winner: PlayerId,
        points: &[PlayerPoints],
    ) -> ServiceResult<GameId>;
    /// All games with their winner name, most recent first.
    async fn list_games(&self) -> ServiceResult<Vec<GameSummary>>;
    async fn leaderboard(&self) -> ServiceResult<Vec<LeaderboardEntry>>;
    /// Scores of one game, highest first.
    async fn game_scores(&self, game_id: GameId) -> ServiceResult<Vec<GameScore>>;
    /// Every score joined with its game and player, oldest game first.
    async fn all_scores(&self) -> ServiceResult<Vec<ScoreRow>>;
    /// All games with their winner name, oldest first.
    async fn games_with_winners(&self) -> ServiceResult<Vec<GameSummary>>;
    /// Leaderboard, `games_with_winners` and `all_scores` from one transaction.
    async fn report_snapshot(&self) -> ServiceResult<ReportSnapshot>;
}
