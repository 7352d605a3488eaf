//! Leaderboard ranking.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// A player's best score, out of ten as shown on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub username: String,
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Icon shown next to a rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RankBadge {
    Trophy,
    Medal,
    Award,
    Star,
}

impl RankBadge {
    pub fn for_rank(rank: u32) -> Self {
        match rank {
            1 => RankBadge::Trophy,
            2 => RankBadge::Medal,
            3 => RankBadge::Award,
            _ => RankBadge::Star,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedEntry {
    pub rank: u32,
    pub badge: RankBadge,
    #[serde(flatten)]
    pub entry: LeaderboardEntry,
}

/// Rank entries by score, highest first. Ties are broken by username and
/// entries without a valid score go last.
pub fn rank(mut entries: Vec<LeaderboardEntry>) -> Vec<RankedEntry> {
    entries.sort_by(|a, b| {
        compare_scores(a.score, b.score).then_with(|| a.username.cmp(&b.username))
    });
    entries
        .into_iter()
        .zip(1u32..)
        .map(|(entry, rank)| RankedEntry {
            rank,
            badge: RankBadge::for_rank(rank),
            entry,
        })
        .collect()
}

fn compare_scores(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.total_cmp(&a),
    }
}
