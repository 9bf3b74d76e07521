use std::collections::HashMap;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::{
    GameId,
    game::{GameSummary, ScoreRow},
};

pub const CSV_HEADER: [&str; 5] = ["game_id", "played_at", "winner", "player", "points"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportRow {
    pub game_id: GameId,
    pub played_at: DateTime<Utc>,
    pub winner: Option<String>,
    pub player: String,
    pub points: u32,
}

/// Flattens the game listing into one row per (game, player).
///
/// Games keep the order of `games`; the scores of a game keep the order in
/// which they appear in `scores`.
pub fn export_rows(games: &[GameSummary], scores: &[ScoreRow]) -> Vec<ExportRow> {
    let mut scores_by_game: HashMap<GameId, Vec<&ScoreRow>> = HashMap::new();
    for score in scores {
        scores_by_game.entry(score.game_id).or_default().push(score);
    }

    games
        .iter()
        .flat_map(|game| {
            scores_by_game
                .remove(&game.id)
                .unwrap_or_default()
                .into_iter()
                .map(move |score| ExportRow {
                    game_id: game.id,
                    played_at: game.played_at,
                    winner: game.winner.clone(),
                    player: score.player.clone(),
                    points: score.points,
                })
        })
        .collect()
}

pub fn to_csv(rows: &[ExportRow]) -> String {
    let mut out = String::new();
    push_record(&mut out, CSV_HEADER.iter().map(|h| h.to_string()));
    for row in rows {
        push_record(
            &mut out,
            [
                row.game_id.to_string(),
                row.played_at.to_rfc3339_opts(SecondsFormat::Secs, true),
                row.winner.clone().unwrap_or_default(),
                row.player.clone(),
                row.points.to_string(),
            ]
            .into_iter(),
        );
    }
    out
}

fn push_record(out: &mut String, fields: impl Iterator<Item = String>) {
    for (i, field) in fields.enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&escape_field(&field));
    }
    out.push('\n');
}

fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn summary(id: i64, day: u32, winner: &str) -> GameSummary {
        GameSummary {
            id: GameId(id),
            played_at: Utc.with_ymd_and_hms(2025, 2, day, 19, 30, 0).unwrap(),
            winner: Some(winner.to_string()),
        }
    }

    fn score(game: &GameSummary, player: &str, points: u32) -> ScoreRow {
        ScoreRow {
            game_id: game.id,
            played_at: game.played_at,
            player: player.to_string(),
            points,
        }
    }

    #[test]
    fn test_export_rows_follow_game_order() {
        let first = summary(1, 1, "Kristian");
        let second = summary(2, 3, "Johan");
        let scores = vec![
            score(&first, "Kristian", 10),
            score(&first, "Johan", 8),
            score(&second, "Johan", 11),
            score(&second, "Kristian", 9),
        ];
        let games = vec![second.clone(), first.clone()];

        let rows = export_rows(&games, &scores);
        assert_eq!(rows.len(), scores.len());
        let flat: Vec<_> = rows
            .iter()
            .map(|r| (r.game_id.0, r.player.as_str(), r.points))
            .collect();
        assert_eq!(
            flat,
            vec![(2, "Johan", 11), (2, "Kristian", 9), (1, "Kristian", 10), (1, "Johan", 8)]
        );
        assert!(rows.iter().filter(|r| r.game_id == GameId(2)).all(|r| r.winner.as_deref() == Some("Johan")));
    }

    #[test]
    fn test_export_rows_skip_games_without_scores() {
        let game = summary(7, 1, "Kristian");
        assert!(export_rows(&[game], &[]).is_empty());
        assert!(export_rows(&[], &[]).is_empty());
    }

    #[test]
    fn test_to_csv() {
        let game = summary(3, 4, "Kristian");
        let rows = export_rows(
            &[game.clone()],
            &[score(&game, "Kristian", 10), score(&game, "Smith, \"J\"", 4)],
        );
        assert_eq!(
            to_csv(&rows),
            "game_id,played_at,winner,player,points\n\
             3,2025-02-04T19:30:00Z,Kristian,Kristian,10\n\
             3,2025-02-04T19:30:00Z,Kristian,\"Smith, \"\"J\"\"\",4\n"
        );
        assert_eq!(to_csv(&[]), "game_id,played_at,winner,player,points\n");
    }
}
