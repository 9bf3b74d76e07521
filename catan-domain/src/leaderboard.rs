use std::cmp::Ordering;

use crate::PlayerId;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub player_id: PlayerId,
    pub name: String,
    pub total_points: i64,
    pub wins: i64,
    pub games_played: i64,
}

impl LeaderboardEntry {
    /// Leaderboard order: most points first, then most wins, then name.
    pub fn ranking_cmp(&self, other: &Self) -> Ordering {
        other
            .total_points
            .cmp(&self.total_points)
            .then_with(|| other.wins.cmp(&self.wins))
            .then_with(|| self.name.cmp(&other.name))
    }
}

pub fn is_ranked(entries: &[LeaderboardEntry]) -> bool {
    entries
        .windows(2)
        .all(|pair| pair[0].ranking_cmp(&pair[1]) != Ordering::Greater)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, total_points: i64, wins: i64) -> LeaderboardEntry {
        LeaderboardEntry {
            player_id: PlayerId(0),
            name: name.to_string(),
            total_points,
            wins,
            games_played: 0,
        }
    }

    #[test]
    fn test_ranking_order() {
        let mut entries = vec![
            entry("Carl", 10, 1),
            entry("Anna", 10, 2),
            entry("Bo", 12, 0),
            entry("Dan", 10, 1),
        ];
        entries.sort_by(LeaderboardEntry::ranking_cmp);
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Bo", "Anna", "Carl", "Dan"]);
        assert!(is_ranked(&entries));
        entries.swap(0, 3);
        assert!(!is_ranked(&entries));
    }
}
