//! Score Leaderboard
//!
//! An independent keyspace mapping a user id to an integer score. Scores are
//! saturated into `[MIN_SCORE, MAX_SCORE]` on every write and never expire.
//!
//! Ranking order is score descending, ties broken by user id ascending
//! (bytewise), so a ranking is fully deterministic.

use crate::storage::shard::ShardedMap;
use bytes::Bytes;
use std::cmp::Ordering;

/// Lowest score a user can hold.
pub const MIN_SCORE: i64 = 0;

/// Highest score a user can hold.
pub const MAX_SCORE: i64 = 10_000;

/// One user's position in a ranking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedEntry {
    pub user: Bytes,
    pub score: i64,
}

impl RankedEntry {
    /// Higher scores first, then user id ascending.
    fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .cmp(&self.score)
            .then_with(|| self.user.cmp(&other.user))
    }
}

/// Concurrent user → score map.
///
/// # Example
///
/// ```
/// use scorekv::storage::Leaderboard;
/// use bytes::Bytes;
///
/// let board = Leaderboard::new();
/// board.add(Bytes::from("alice"), 50);
/// board.add(Bytes::from("bob"), 70);
///
/// let top = board.top(1);
/// assert_eq!(top[0].user, Bytes::from("bob"));
/// assert_eq!(top[0].score, 70);
/// ```
#[derive(Debug, Default)]
pub struct Leaderboard {
    scores: ShardedMap<i64>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self {
            scores: ShardedMap::new(),
        }
    }

    /// Stores `score` for `user`, overwriting any previous score.
    ///
    /// # Returns
    /// The score actually stored after clamping.
    pub fn add(&self, user: Bytes, score: i64) -> i64 {
        let score = clamp_score(score);
        self.scores.write(&user).insert(user, score);
        score
    }

    /// Current score of a user.
    pub fn get(&self, user: &[u8]) -> Option<i64> {
        self.scores.read(user).get(user).copied()
    }

    /// The best `n` entries in ranking order. Returns fewer when the board
    /// holds fewer than `n` users.
    pub fn top(&self, n: usize) -> Vec<RankedEntry> {
        let mut entries = self.collect();
        if n == 0 {
            return Vec::new();
        }
        if n < entries.len() {
            entries.select_nth_unstable_by(n - 1, RankedEntry::rank_cmp);
            entries.truncate(n);
        }
        entries.sort_unstable_by(RankedEntry::rank_cmp);
        entries
    }

    /// Every entry in ranking order.
    ///
    /// This is the read-only snapshot consumed by out-of-band viewers; it
    /// takes shard read locks one at a time and never mutates.
    pub fn ranked(&self) -> Vec<RankedEntry> {
        let mut entries = self.collect();
        entries.sort_unstable_by(RankedEntry::rank_cmp);
        entries
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn collect(&self) -> Vec<RankedEntry> {
        let mut entries = Vec::new();
        self.scores.for_each_shard(|shard| {
            entries.extend(shard.iter().map(|(user, &score)| RankedEntry {
                user: user.clone(),
                score,
            }));
        });
        entries
    }
}

/// Saturates a score into `[MIN_SCORE, MAX_SCORE]`.
#[inline]
pub fn clamp_score(score: i64) -> i64 {
    score.clamp(MIN_SCORE, MAX_SCORE)
}
