use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use catan_domain::{
    player::Player,
    service::{ArcScoreboardService, ScoreboardService},
};

use crate::ApiError;

#[derive(serde::Serialize)]
pub struct JsonPlayer {
    id: i64,
    name: String,
}

impl From<Player> for JsonPlayer {
    fn from(player: Player) -> Self {
        Self {
            id: player.id.0,
            name: player.name,
        }
    }
}

#[derive(serde::Deserialize)]
pub struct JsonAddPlayerRequest {
    name: String,
}

pub async fn get_all(
    State(service): State<ArcScoreboardService>,
) -> Result<Json<Vec<JsonPlayer>>, ApiError> {
    let players = service.list_players().await?;
    Ok(Json(players.into_iter().map(JsonPlayer::from).collect()))
}

pub async fn add(
    State(service): State<ArcScoreboardService>,
    payload: Result<Json<JsonAddPlayerRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(request) = payload?;
    service.add_player(&request.name).await?;
    Ok(StatusCode::NO_CONTENT)
}
