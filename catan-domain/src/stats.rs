//! Read-only projections over the leaderboard and the game listing.
//!
//! Every function accepts empty input and answers with an empty result.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};

use crate::{GameId, game::GameSummary, leaderboard::LeaderboardEntry};

#[derive(Clone, Debug, PartialEq)]
pub struct AveragePoints {
    pub player: String,
    pub games_played: i64,
    pub total_points: i64,
    pub average: f64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CumulativeWin {
    pub game_id: GameId,
    pub played_at: DateTime<Utc>,
    pub wins: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WinSeries {
    pub player: String,
    pub points: Vec<CumulativeWin>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WinShare {
    pub player: String,
    pub wins: u32,
    pub share: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DayCount {
    pub date: NaiveDate,
    pub games: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GamesPerDay {
    pub days: Vec<DayCount>,
    pub busiest: Option<DayCount>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Statistics {
    pub average_points: Vec<AveragePoints>,
    pub cumulative_wins: Vec<WinSeries>,
    pub win_share: Vec<WinShare>,
    pub games_per_day: GamesPerDay,
}

impl Statistics {
    pub fn compute(leaderboard: &[LeaderboardEntry], games: &[GameSummary]) -> Self {
        Self {
            average_points: average_points(leaderboard),
            cumulative_wins: cumulative_wins(games),
            win_share: win_share(games),
            games_per_day: games_per_day(games),
        }
    }
}

pub fn average_points(leaderboard: &[LeaderboardEntry]) -> Vec<AveragePoints> {
    let mut averages: Vec<AveragePoints> = leaderboard
        .iter()
        .map(|entry| AveragePoints {
            player: entry.name.clone(),
            games_played: entry.games_played,
            total_points: entry.total_points,
            average: if entry.games_played > 0 {
                entry.total_points as f64 / entry.games_played as f64
            } else {
                0.0
            },
        })
        .collect();
    averages.sort_by(|a, b| {
        b.average
            .total_cmp(&a.average)
            .then_with(|| a.player.cmp(&b.player))
    });
    averages
}

/// Running win totals per winner, ordered by game time then game id.
pub fn cumulative_wins(games: &[GameSummary]) -> Vec<WinSeries> {
    let mut by_player: BTreeMap<&str, Vec<&GameSummary>> = BTreeMap::new();
    for game in games {
        if let Some(winner) = &game.winner {
            by_player.entry(winner.as_str()).or_default().push(game);
        }
    }

    by_player
        .into_iter()
        .map(|(player, mut won)| {
            won.sort_by_key(|game| (game.played_at, game.id));
            let points = won
                .into_iter()
                .zip(1..)
                .map(|(game, wins)| CumulativeWin {
                    game_id: game.id,
                    played_at: game.played_at,
                    wins,
                })
                .collect();
            WinSeries {
                player: player.to_string(),
                points,
            }
        })
        .collect()
}

pub fn win_share(games: &[GameSummary]) -> Vec<WinShare> {
    let mut wins: BTreeMap<&str, u32> = BTreeMap::new();
    for winner in games.iter().filter_map(|game| game.winner.as_deref()) {
        *wins.entry(winner).or_default() += 1;
    }

    let total: u32 = wins.values().sum();
    if total == 0 {
        return Vec::new();
    }

    let mut shares: Vec<WinShare> = wins
        .into_iter()
        .map(|(player, wins)| WinShare {
            player: player.to_string(),
            wins,
            share: wins as f64 / total as f64,
        })
        .collect();
    shares.sort_by(|a, b| b.wins.cmp(&a.wins).then_with(|| a.player.cmp(&b.player)));
    shares
}

/// Games bucketed by UTC calendar date. The busiest day is the earliest of
/// the days with the highest count.
pub fn games_per_day(games: &[GameSummary]) -> GamesPerDay {
    let mut counts: BTreeMap<NaiveDate, u32> = BTreeMap::new();
    for game in games {
        *counts.entry(game.played_at.date_naive()).or_default() += 1;
    }

    let days: Vec<DayCount> = counts
        .into_iter()
        .map(|(date, games)| DayCount { date, games })
        .collect();

    let mut busiest: Option<DayCount> = None;
    for day in &days {
        match busiest {
            Some(current) if current.games >= day.games => {}
            _ => busiest = Some(*day),
        }
    }

    GamesPerDay { days, busiest }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use crate::PlayerId;

    use super::*;

    fn game(id: i64, day: u32, hour: u32, winner: Option<&str>) -> GameSummary {
        GameSummary {
            id: GameId(id),
            played_at: Utc.with_ymd_and_hms(2025, 1, day, hour, 0, 0).unwrap(),
            winner: winner.map(str::to_string),
        }
    }

    fn entry(id: i64, name: &str, total_points: i64, wins: i64, games_played: i64) -> LeaderboardEntry {
        LeaderboardEntry {
            player_id: PlayerId(id),
            name: name.to_string(),
            total_points,
            wins,
            games_played,
        }
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(Statistics::compute(&[], &[]), Statistics::default());
        assert!(win_share(&[game(1, 1, 10, None)]).is_empty());
    }

    #[test]
    fn test_average_points() {
        let averages = average_points(&[
            entry(1, "Kristian", 30, 2, 3),
            entry(2, "Johan", 0, 0, 0),
            entry(3, "Mette", 24, 1, 2),
            entry(4, "Anders", 36, 1, 3),
        ]);
        let rows: Vec<_> = averages
            .iter()
            .map(|a| (a.player.as_str(), a.average))
            .collect();
        assert_eq!(
            rows,
            vec![("Anders", 12.0), ("Mette", 12.0), ("Kristian", 10.0), ("Johan", 0.0)]
        );
    }

    #[test]
    fn test_cumulative_wins() {
        let games = vec![
            game(4, 3, 18, Some("Johan")),
            game(1, 1, 18, Some("Kristian")),
            game(3, 2, 18, Some("Kristian")),
            game(2, 2, 18, Some("Johan")),
            game(5, 3, 20, None),
            game(6, 2, 18, Some("Kristian")),
        ];
        let series = cumulative_wins(&games);
        assert_eq!(series.len(), 2);

        assert_eq!(series[0].player, "Johan");
        let johan: Vec<_> = series[0].points.iter().map(|p| (p.game_id.0, p.wins)).collect();
        assert_eq!(johan, vec![(2, 1), (4, 2)]);

        assert_eq!(series[1].player, "Kristian");
        let kristian: Vec<_> = series[1]
            .points
            .iter()
            .map(|p| (p.game_id.0, p.wins))
            .collect();
        assert_eq!(kristian, vec![(1, 1), (3, 2), (6, 3)]);

        for s in &series {
            assert!(s.points.windows(2).all(|w| w[0].wins <= w[1].wins));
            assert!(s.points.windows(2).all(|w| w[0].played_at <= w[1].played_at));
        }
    }

    #[test]
    fn test_win_share() {
        let games = vec![
            game(1, 1, 18, Some("Kristian")),
            game(2, 1, 19, Some("Johan")),
            game(3, 1, 20, Some("Kristian")),
            game(4, 1, 21, Some("Kristian")),
        ];
        let shares = win_share(&games);
        assert_eq!(shares.len(), 2);
        assert_eq!(shares[0].player, "Kristian");
        assert_eq!(shares[0].wins, 3);
        assert_eq!(shares[0].share, 0.75);
        assert_eq!(shares[1].player, "Johan");
        assert_eq!(shares[1].share, 0.25);
    }

    #[test]
    fn test_games_per_day() {
        let games = vec![
            game(1, 5, 18, Some("Kristian")),
            game(2, 5, 21, Some("Johan")),
            game(3, 2, 18, Some("Kristian")),
            game(4, 2, 19, Some("Kristian")),
            game(5, 9, 19, Some("Johan")),
        ];
        let per_day = games_per_day(&games);
        let days: Vec<_> = per_day.days.iter().map(|d| (d.date.to_string(), d.games)).collect();
        assert_eq!(
            days,
            vec![
                ("2025-01-02".to_string(), 2),
                ("2025-01-05".to_string(), 2),
                ("2025-01-09".to_string(), 1),
            ]
        );
        let busiest = per_day.busiest.unwrap();
        assert_eq!(busiest.date, NaiveDate::from_ymd_opt(2025, 1, 2).unwrap());
        assert_eq!(busiest.games, 2);

        assert_eq!(games_per_day(&[]).busiest, None);
    }

    #[test]
    fn test_day_bucketing_uses_utc_date() {
        let late = GameSummary {
            id: GameId(1),
            played_at: Utc.with_ymd_and_hms(2025, 6, 1, 23, 59, 59).unwrap(),
            winner: None,
        };
        let early = GameSummary {
            id: GameId(2),
            played_at: Utc.with_ymd_and_hms(2025, 6, 2, 0, 0, 0).unwrap(),
            winner: None,
        };
        assert_eq!(games_per_day(&[late, early]).days.len(), 2);
    }
}
