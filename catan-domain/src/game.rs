use std::collections::HashSet;

use chrono::{DateTime, SubsecRound, Utc};

use crate::{GameId, PlayerId, ServiceError, ServiceResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerPoints {
    pub player_id: PlayerId,
    pub points: u32,
}

impl PlayerPoints {
    pub fn new(player_id: PlayerId, points: u32) -> Self {
        Self { player_id, points }
    }
}

/// A game as submitted for recording. The order of `points` is significant:
/// it decides the winner when several players share the top score.
#[derive(Clone, Debug)]
pub struct NewGame {
    pub played_at: DateTime<Utc>,
    pub points: Vec<PlayerPoints>,
}

impl NewGame {
    pub fn new(played_at: DateTime<Utc>, points: Vec<PlayerPoints>) -> Self {
        Self { played_at, points }
    }

    /// Checks the submission and returns the resolved winner.
    pub fn validate(&self) -> ServiceResult<PlayerId> {
        let mut seen = HashSet::new();
        for entry in &self.points {
            if !seen.insert(entry.player_id) {
                return ServiceError::bad_request(format!(
                    "Player {} is listed more than once",
                    entry.player_id
                ));
            }
        }
        match resolve_winner(&self.points) {
            Some(winner) => Ok(winner),
            None => ServiceError::bad_request("A game needs points for at least one player"),
        }
    }

    /// Stored timestamps carry whole seconds only.
    pub fn stored_played_at(&self) -> DateTime<Utc> {
        self.played_at.trunc_subsecs(0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecordedGame {
    pub game_id: GameId,
    pub winner_id: PlayerId,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameSummary {
    pub id: GameId,
    pub played_at: DateTime<Utc>,
    pub winner: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameScore {
    pub player: String,
    pub points: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoreRow {
    pub game_id: GameId,
    pub played_at: DateTime<Utc>,
    pub player: String,
    pub points: u32,
}

/// The player with the highest points; the earliest entry wins a tie.
pub fn resolve_winner(points: &[PlayerPoints]) -> Option<PlayerId> {
    let mut best: Option<&PlayerPoints> = None;
    for entry in points {
        match best {
            Some(current) if current.points >= entry.points => {}
            _ => best = Some(entry),
        }
    }
    best.map(|entry| entry.player_id)
}
