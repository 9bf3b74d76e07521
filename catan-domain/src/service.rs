use std::sync::Arc;

use log::{info, warn};

use crate::{
    GameId, ServiceError, ServiceResult,
    export::{ExportRow, export_rows},
    game::{GameScore, GameSummary, NewGame, RecordedGame, ScoreRow},
    leaderboard::{LeaderboardEntry, is_ranked},
    player::{Player, normalize_player_name},
    repository::{ArcScoreRepository, ReportSnapshot},
    stats::Statistics,
};

pub type ArcScoreboardService = Arc<Box<dyn ScoreboardService + Send + Sync + 'static>>;

/// The query surface offered to the presentation layer.
///
/// Writes surface every failure. Reads only fail with
/// [`ServiceError::Uninitialized`]; any other storage failure yields an empty
/// result so reporting views can show "no data yet".
#[async_trait::async_trait]
pub trait ScoreboardService {
    async fn initialize(&self) -> ServiceResult<()>;
    async fn add_player(&self, name: &str) -> ServiceResult<()>;
    async fn list_players(&self) -> ServiceResult<Vec<Player>>;
    async fn add_game(&self, game: NewGame) -> ServiceResult<RecordedGame>;
    async fn list_games(&self) -> ServiceResult<Vec<GameSummary>>;
    async fn leaderboard(&self) -> ServiceResult<Vec<LeaderboardEntry>>;
    async fn game_scores(&self, game_id: GameId) -> ServiceResult<Vec<GameScore>>;
    async fn all_scores(&self) -> ServiceResult<Vec<ScoreRow>>;
    async fn games_with_winners(&self) -> ServiceResult<Vec<GameSummary>>;
    async fn export(&self) -> ServiceResult<Vec<ExportRow>>;
    async fn statistics(&self) -> ServiceResult<Statistics>;
}

pub struct ScoreboardServiceImpl {
    repository: ArcScoreRepository,
}

impl ScoreboardServiceImpl {
    pub fn new(repository: ArcScoreRepository) -> Self {
        Self { repository }
    }

    async fn report_snapshot(&self, query: &str) -> ServiceResult<ReportSnapshot> {
        let snapshot = or_empty(query, self.repository.report_snapshot().await)?;
        debug_assert!(
            is_ranked(&snapshot.leaderboard),
            "store returned an unranked leaderboard"
        );
        Ok(snapshot)
    }
}

fn or_empty<T: Default>(query: &str, result: ServiceResult<T>) -> ServiceResult<T> {
    match result {
        Ok(value) => Ok(value),
        Err(e @ ServiceError::Uninitialized(_)) => Err(e),
        Err(e) => {
            warn!("Query {} failed, reporting no data: {}", query, e);
            Ok(T::default())
        }
    }
}

#[async_trait::async_trait]
impl ScoreboardService for ScoreboardServiceImpl {
    async fn initialize(&self) -> ServiceResult<()> {
        self.repository.initialize().await
    }

    async fn add_player(&self, name: &str) -> ServiceResult<()> {
        let name = normalize_player_name(name)?;
        self.repository.add_player(&name).await?;
        info!("Added player {}", name);
        Ok(())
    }

    async fn list_players(&self) -> ServiceResult<Vec<Player>> {
        or_empty("list_players", self.repository.list_players().await)
    }

    async fn add_game(&self, game: NewGame) -> ServiceResult<RecordedGame> {
        let winner_id = game.validate()?;
        let game_id = self
            .repository
            .create_game(game.stored_played_at(), winner_id, &game.points)
            .await?;
        info!(
            "Recorded game {} with {} players, winner {}",
            game_id,
            game.points.len(),
            winner_id
        );
        Ok(RecordedGame { game_id, winner_id })
    }

    async fn list_games(&self) -> ServiceResult<Vec<GameSummary>> {
        or_empty("list_games", self.repository.list_games().await)
    }

    async fn leaderboard(&self) -> ServiceResult<Vec<LeaderboardEntry>> {
        let leaderboard = or_empty("leaderboard", self.repository.leaderboard().await)?;
        debug_assert!(is_ranked(&leaderboard), "store returned an unranked leaderboard");
        Ok(leaderboard)
    }

    async fn game_scores(&self, game_id: GameId) -> ServiceResult<Vec<GameScore>> {
        or_empty("game_scores", self.repository.game_scores(game_id).await)
    }

    async fn all_scores(&self) -> ServiceResult<Vec<ScoreRow>> {
        or_empty("all_scores", self.repository.all_scores().await)
    }

    async fn games_with_winners(&self) -> ServiceResult<Vec<GameSummary>> {
        or_empty(
            "games_with_winners",
            self.repository.games_with_winners().await,
        )
    }

    async fn export(&self) -> ServiceResult<Vec<ExportRow>> {
        let ReportSnapshot {
            mut games, scores, ..
        } = self.report_snapshot("export").await?;
        // the listing is newest first
        games.reverse();
        Ok(export_rows(&games, &scores))
    }

    async fn statistics(&self) -> ServiceResult<Statistics> {
        let snapshot = self.report_snapshot("statistics").await?;
        Ok(Statistics::compute(&snapshot.leaderboard, &snapshot.games))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::{DateTime, TimeZone, Utc};

    use crate::{
        PlayerId,
        game::PlayerPoints,
        repository::ScoreRepository,
    };

    use super::*;

    #[derive(Clone, Copy, PartialEq)]
    enum StoreState {
        Ready,
        Broken,
        Uninitialized,
    }

    struct MockScoreRepository {
        state: StoreState,
        created: Arc<Mutex<Vec<(DateTime<Utc>, PlayerId, Vec<PlayerPoints>)>>>,
    }

    impl MockScoreRepository {
        fn new(state: StoreState) -> Self {
            Self {
                state,
                created: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn check(&self) -> ServiceResult<()> {
            match self.state {
                StoreState::Ready => Ok(()),
                StoreState::Broken => ServiceError::internal("connection reset"),
                StoreState::Uninitialized => {
                    Err(ServiceError::Uninitialized("no such table: players".into()))
                }
            }
        }

        fn games(&self) -> Vec<GameSummary> {
            vec![
                GameSummary {
                    id: GameId(2),
                    played_at: Utc.with_ymd_and_hms(2025, 1, 2, 20, 0, 0).unwrap(),
                    winner: Some("Johan".into()),
                },
                GameSummary {
                    id: GameId(1),
                    played_at: Utc.with_ymd_and_hms(2025, 1, 1, 20, 0, 0).unwrap(),
                    winner: Some("Kristian".into()),
                },
            ]
        }
    }

    #[async_trait::async_trait]
    impl ScoreRepository for MockScoreRepository {
        async fn initialize(&self) -> ServiceResult<()> {
            self.check()
        }

        async fn add_player(&self, _name: &str) -> ServiceResult<()> {
            self.check()
        }

        async fn list_players(&self) -> ServiceResult<Vec<Player>> {
            self.check()?;
            Ok(vec![
                Player {
                    id: PlayerId(2),
                    name: "Johan".into(),
                },
                Player {
                    id: PlayerId(1),
                    name: "Kristian".into(),
                },
            ])
        }

        async fn create_game(
            &self,
            played_at: DateTime<Utc>,
            winner: PlayerId,
            points: &[PlayerPoints],
        ) -> ServiceResult<GameId> {
            self.check()?;
            let mut created = self.created.lock().unwrap();
            created.push((played_at, winner, points.to_vec()));
            Ok(GameId(created.len() as i64))
        }

        async fn list_games(&self) -> ServiceResult<Vec<GameSummary>> {
            self.check()?;
            Ok(self.games())
        }

        async fn leaderboard(&self) -> ServiceResult<Vec<LeaderboardEntry>> {
            self.check()?;
            Ok(vec![
                LeaderboardEntry {
                    player_id: PlayerId(1),
                    name: "Kristian".into(),
                    total_points: 18,
                    wins: 1,
                    games_played: 2,
                },
                LeaderboardEntry {
                    player_id: PlayerId(2),
                    name: "Johan".into(),
                    total_points: 17,
                    wins: 1,
                    games_played: 2,
                },
            ])
        }

        async fn game_scores(&self, _game_id: GameId) -> ServiceResult<Vec<GameScore>> {
            self.check()?;
            Ok(Vec::new())
        }

        async fn all_scores(&self) -> ServiceResult<Vec<ScoreRow>> {
            self.check()?;
            let games = self.games();
            Ok(vec![
                ScoreRow {
                    game_id: games[1].id,
                    played_at: games[1].played_at,
                    player: "Kristian".into(),
                    points: 10,
                },
                ScoreRow {
                    game_id: games[1].id,
                    played_at: games[1].played_at,
                    player: "Johan".into(),
                    points: 7,
                },
                ScoreRow {
                    game_id: games[0].id,
                    played_at: games[0].played_at,
                    player: "Johan".into(),
                    points: 10,
                },
                ScoreRow {
                    game_id: games[0].id,
                    played_at: games[0].played_at,
                    player: "Kristian".into(),
                    points: 8,
                },
            ])
        }

        async fn games_with_winners(&self) -> ServiceResult<Vec<GameSummary>> {
            self.check()?;
            let mut games = self.games();
            games.reverse();
            Ok(games)
        }

        async fn report_snapshot(&self) -> ServiceResult<ReportSnapshot> {
            Ok(ReportSnapshot {
                leaderboard: self.leaderboard().await?,
                games: self.games_with_winners().await?,
                scores: self.all_scores().await?,
            })
        }
    }

    fn service(repository: MockScoreRepository) -> ScoreboardServiceImpl {
        ScoreboardServiceImpl::new(Arc::new(Box::new(repository)))
    }

    #[tokio::test]
    async fn test_add_game_resolves_first_maximum() {
        let repository = MockScoreRepository::new(StoreState::Ready);
        let created = repository.created.clone();
        let service = service(repository);

        let played_at = Utc.with_ymd_and_hms(2025, 4, 12, 21, 5, 9).unwrap()
            + chrono::Duration::milliseconds(250);
        let points = vec![
            PlayerPoints::new(PlayerId(3), 7),
            PlayerPoints::new(PlayerId(1), 7),
            PlayerPoints::new(PlayerId(2), 3),
        ];
        let recorded = service
            .add_game(NewGame::new(played_at, points.clone()))
            .await
            .unwrap();
        assert_eq!(recorded.winner_id, PlayerId(3));
        assert_eq!(recorded.game_id, GameId(1));

        let created = created.lock().unwrap();
        assert_eq!(created.len(), 1);
        assert_eq!(
            created[0].0,
            Utc.with_ymd_and_hms(2025, 4, 12, 21, 5, 9).unwrap()
        );
        assert_eq!(created[0].1, PlayerId(3));
        assert_eq!(created[0].2, points);
    }

    #[tokio::test]
    async fn test_add_game_rejects_empty_points_before_writing() {
        let repository = MockScoreRepository::new(StoreState::Ready);
        let created = repository.created.clone();
        let service = service(repository);

        let res = service.add_game(NewGame::new(Utc::now(), vec![])).await;
        assert!(matches!(res, Err(ServiceError::BadRequest(_))));
        assert!(created.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_writes_surface_errors() {
        let service = service(MockScoreRepository::new(StoreState::Broken));
        let res = service
            .add_game(NewGame::new(
                Utc::now(),
                vec![PlayerPoints::new(PlayerId(1), 4)],
            ))
            .await;
        assert!(matches!(res, Err(ServiceError::Internal(_))));
        assert!(matches!(
            service.add_player("Mette").await,
            Err(ServiceError::Internal(_))
        ));
        assert!(matches!(
            service.add_player("  ").await,
            Err(ServiceError::BadRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_reads_degrade_to_empty() {
        let service = service(MockScoreRepository::new(StoreState::Broken));
        assert_eq!(service.leaderboard().await, Ok(vec![]));
        assert_eq!(service.list_players().await, Ok(vec![]));
        assert_eq!(service.list_games().await, Ok(vec![]));
        assert_eq!(service.game_scores(GameId(1)).await, Ok(vec![]));
        assert_eq!(service.export().await, Ok(vec![]));
        assert_eq!(service.statistics().await, Ok(Statistics::default()));
    }

    #[tokio::test]
    async fn test_uninitialized_store_is_reported() {
        let service = service(MockScoreRepository::new(StoreState::Uninitialized));
        assert!(matches!(
            service.leaderboard().await,
            Err(ServiceError::Uninitialized(_))
        ));
        assert!(matches!(
            service.statistics().await,
            Err(ServiceError::Uninitialized(_))
        ));
        assert!(matches!(
            service.add_player("Mette").await,
            Err(ServiceError::Uninitialized(_))
        ));
    }

    #[tokio::test]
    async fn test_export_and_statistics() {
        let service = service(MockScoreRepository::new(StoreState::Ready));

        let rows = service.export().await.unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].game_id, GameId(2));
        assert_eq!(rows[0].winner.as_deref(), Some("Johan"));
        assert_eq!(rows[3].game_id, GameId(1));

        let stats = service.statistics().await.unwrap();
        assert_eq!(stats.average_points[0].player, "Kristian");
        assert_eq!(stats.average_points[0].average, 9.0);
        assert_eq!(stats.cumulative_wins.len(), 2);
        assert_eq!(stats.win_share.len(), 2);
        assert_eq!(stats.games_per_day.days.len(), 2);
        assert_eq!(
            stats.games_per_day.busiest.map(|d| d.date.to_string()),
            Some("2025-01-01".to_string())
        );
    }
}
