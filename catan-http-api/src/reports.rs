use axum::{Json, extract::State};
use catan_domain::{
    game::ScoreRow,
    leaderboard::LeaderboardEntry,
    service::{ArcScoreboardService, ScoreboardService},
    stats::{AveragePoints, DayCount, Statistics, WinSeries, WinShare},
};

use crate::{ApiError, games::format_timestamp};

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonLeaderboardEntry {
    player_id: i64,
    name: String,
    total_points: i64,
    wins: i64,
    games_played: i64,
}

impl From<LeaderboardEntry> for JsonLeaderboardEntry {
    fn from(entry: LeaderboardEntry) -> Self {
        Self {
            player_id: entry.player_id.0,
            name: entry.name,
            total_points: entry.total_points,
            wins: entry.wins,
            games_played: entry.games_played,
        }
    }
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonScoreRow {
    game_id: i64,
    played_at: String,
    player: String,
    points: u32,
}

impl From<ScoreRow> for JsonScoreRow {
    fn from(row: ScoreRow) -> Self {
        Self {
            game_id: row.game_id.0,
            played_at: format_timestamp(&row.played_at),
            player: row.player,
            points: row.points,
        }
    }
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonAveragePoints {
    player: String,
    games_played: i64,
    total_points: i64,
    average: f64,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonCumulativeWin {
    game_id: i64,
    played_at: String,
    wins: u32,
}

#[derive(serde::Serialize)]
pub struct JsonWinSeries {
    player: String,
    points: Vec<JsonCumulativeWin>,
}

#[derive(serde::Serialize)]
pub struct JsonWinShare {
    player: String,
    wins: u32,
    share: f64,
}

#[derive(serde::Serialize)]
pub struct JsonDayCount {
    date: String,
    games: u32,
}

#[derive(serde::Serialize)]
pub struct JsonGamesPerDay {
    days: Vec<JsonDayCount>,
    busiest: Option<JsonDayCount>,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonStatistics {
    average_points: Vec<JsonAveragePoints>,
    cumulative_wins: Vec<JsonWinSeries>,
    win_share: Vec<JsonWinShare>,
    games_per_day: JsonGamesPerDay,
}

fn day_count(day: DayCount) -> JsonDayCount {
    JsonDayCount {
        date: day.date.format("%Y-%m-%d").to_string(),
        games: day.games,
    }
}

impl From<Statistics> for JsonStatistics {
    fn from(stats: Statistics) -> Self {
        Self {
            average_points: stats
                .average_points
                .into_iter()
                .map(|a: AveragePoints| JsonAveragePoints {
                    player: a.player,
                    games_played: a.games_played,
                    total_points: a.total_points,
                    average: a.average,
                })
                .collect(),
            cumulative_wins: stats
                .cumulative_wins
                .into_iter()
                .map(|series: WinSeries| JsonWinSeries {
                    player: series.player,
                    points: series
                        .points
                        .into_iter()
                        .map(|p| JsonCumulativeWin {
                            game_id: p.game_id.0,
                            played_at: format_timestamp(&p.played_at),
                            wins: p.wins,
                        })
                        .collect(),
                })
                .collect(),
            win_share: stats
                .win_share
                .into_iter()
                .map(|s: WinShare| JsonWinShare {
                    player: s.player,
                    wins: s.wins,
                    share: s.share,
                })
                .collect(),
            games_per_day: JsonGamesPerDay {
                days: stats.games_per_day.days.into_iter().map(day_count).collect(),
                busiest: stats.games_per_day.busiest.map(day_count),
            },
        }
    }
}

pub async fn get_leaderboard(
    State(service): State<ArcScoreboardService>,
) -> Result<Json<Vec<JsonLeaderboardEntry>>, ApiError> {
    let leaderboard = service.leaderboard().await?;
    Ok(Json(
        leaderboard
            .into_iter()
            .map(JsonLeaderboardEntry::from)
            .collect(),
    ))
}

pub async fn get_all_scores(
    State(service): State<ArcScoreboardService>,
) -> Result<Json<Vec<JsonScoreRow>>, ApiError> {
    let scores = service.all_scores().await?;
    Ok(Json(scores.into_iter().map(JsonScoreRow::from).collect()))
}

pub async fn get_statistics(
    State(service): State<ArcScoreboardService>,
) -> Result<Json<JsonStatistics>, ApiError> {
    let stats = service.statistics().await?;
    Ok(Json(JsonStatistics::from(stats)))
}
