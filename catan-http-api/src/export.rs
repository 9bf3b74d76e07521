use axum::{
    Json,
    extract::State,
    http::header,
    response::IntoResponse,
};
use catan_domain::{
    export::{ExportRow, to_csv},
    service::{ArcScoreboardService, ScoreboardService},
};

use crate::{ApiError, games::format_timestamp};

const EXPORT_FILE_NAME: &str = "game_results_export.csv";

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonExportRow {
    game_id: i64,
    played_at: String,
    winner: Option<String>,
    player: String,
    points: u32,
}

impl From<ExportRow> for JsonExportRow {
    fn from(row: ExportRow) -> Self {
        Self {
            game_id: row.game_id.0,
            played_at: format_timestamp(&row.played_at),
            winner: row.winner,
            player: row.player,
            points: row.points,
        }
    }
}

pub async fn get_rows(
    State(service): State<ArcScoreboardService>,
) -> Result<Json<Vec<JsonExportRow>>, ApiError> {
    let rows = service.export().await?;
    Ok(Json(rows.into_iter().map(JsonExportRow::from).collect()))
}

pub async fn get_csv(
    State(service): State<ArcScoreboardService>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = service.export().await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", EXPORT_FILE_NAME),
            ),
        ],
        to_csv(&rows),
    ))
}
