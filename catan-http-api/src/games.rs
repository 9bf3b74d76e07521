use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use catan_domain::{
    GameId, PlayerId, ServiceError,
    game::{GameScore, GameSummary, NewGame, PlayerPoints},
    service::{ArcScoreboardService, ScoreboardService},
};
use chrono::{DateTime, SecondsFormat, Utc};

use crate::ApiError;

pub(crate) fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonGame {
    id: i64,
    played_at: String,
    winner: Option<String>,
}

impl From<GameSummary> for JsonGame {
    fn from(game: GameSummary) -> Self {
        Self {
            id: game.id.0,
            played_at: format_timestamp(&game.played_at),
            winner: game.winner,
        }
    }
}

#[derive(serde::Serialize)]
pub struct JsonGameScore {
    player: String,
    points: u32,
}

impl From<GameScore> for JsonGameScore {
    fn from(score: GameScore) -> Self {
        Self {
            player: score.player,
            points: score.points,
        }
    }
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonPlayerPoints {
    player_id: i64,
    points: u32,
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonNewGameRequest {
    played_at: Option<String>,
    points: Vec<JsonPlayerPoints>,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonRecordedGame {
    game_id: i64,
    winner_id: i64,
}

fn parse_played_at(played_at: Option<&str>) -> Result<DateTime<Utc>, ApiError> {
    match played_at {
        None => Ok(Utc::now()),
        Some(value) => DateTime::parse_from_rfc3339(value)
            .map(|timestamp| timestamp.with_timezone(&Utc))
            .map_err(|e| {
                ApiError(ServiceError::BadRequest(format!(
                    "Invalid playedAt [{}]: {}",
                    value, e
                )))
            }),
    }
}

pub async fn get_all(
    State(service): State<ArcScoreboardService>,
) -> Result<Json<Vec<JsonGame>>, ApiError> {
    let games = service.list_games().await?;
    Ok(Json(games.into_iter().map(JsonGame::from).collect()))
}

pub async fn get_with_winners(
    State(service): State<ArcScoreboardService>,
) -> Result<Json<Vec<JsonGame>>, ApiError> {
    let games = service.games_with_winners().await?;
    Ok(Json(games.into_iter().map(JsonGame::from).collect()))
}

pub async fn get_scores(
    Path(id): Path<i64>,
    State(service): State<ArcScoreboardService>,
) -> Result<Json<Vec<JsonGameScore>>, ApiError> {
    let scores = service.game_scores(GameId(id)).await?;
    Ok(Json(scores.into_iter().map(JsonGameScore::from).collect()))
}

pub async fn create(
    State(service): State<ArcScoreboardService>,
    payload: Result<Json<JsonNewGameRequest>, JsonRejection>,
) -> Result<Json<JsonRecordedGame>, ApiError> {
    let Json(request) = payload?;
    let played_at = parse_played_at(request.played_at.as_deref())?;
    let points = request
        .points
        .into_iter()
        .map(|entry| PlayerPoints::new(PlayerId(entry.player_id), entry.points))
        .collect();

    let recorded = service.add_game(NewGame::new(played_at, points)).await?;
    Ok(Json(JsonRecordedGame {
        game_id: recorded.game_id.0,
        winner_id: recorded.winner_id.0,
    }))
}
