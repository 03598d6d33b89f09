//! Standings, tier progression and achievements
//!
//! Everything here is a pure function over rows already loaded from the
//! database. Nothing is stored: standings are recomputed on every request.

use std::cmp::Ordering;

use serde::Serialize;
use uuid::Uuid;

use crate::{
    constants::{CROWD_FAVORITE_VOTES, FINALE_PODIUM_SIZE},
    models::{ArenaTier, ContestantEntry},
};

/// A contestant with its position in its arena
#[derive(Debug, Clone, Serialize)]
pub struct RankedEntry {
    /// 1-based position
    pub rank: usize,
    pub finale_eligible: bool,
    #[serde(flatten)]
    pub entry: ContestantEntry,
}

/// Order used for standings: most votes first, newer entries win ties
fn standing_order(a: &ContestantEntry, b: &ContestantEntry) -> Ordering {
    b.votes
        .cmp(&a.votes)
        .then_with(|| b.created_at.cmp(&a.created_at))
        .then_with(|| a.id.cmp(&b.id))
}

/// Rank the entries of a single arena
pub fn rank(mut entries: Vec<ContestantEntry>) -> Vec<RankedEntry> {
    entries.sort_by(standing_order);
    entries
        .into_iter()
        .enumerate()
        .map(|(i, entry)| RankedEntry {
            rank: i + 1,
            finale_eligible: i < FINALE_PODIUM_SIZE,
            entry,
        })
        .collect()
}

/// Rank entries spanning several arenas, keeping arenas grouped in tier order
pub fn rank_by_arena(entries: Vec<ContestantEntry>) -> Vec<Vec<RankedEntry>> {
    let mut groups: Vec<(ArenaTier, String, Uuid, Vec<ContestantEntry>)> = Vec::new();
    for entry in entries {
        match groups.iter_mut().find(|g| g.2 == entry.arena_id) {
            Some(group) => group.3.push(entry),
            None => groups.push((
                entry.tier,
                entry.arena_name.clone(),
                entry.arena_id,
                vec![entry],
            )),
        }
    }
    groups.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
    groups.into_iter().map(|g| rank(g.3)).collect()
}

/// Podium of every arena, in tier order
pub fn finale(ranked_arenas: &[Vec<RankedEntry>]) -> Vec<RankedEntry> {
    ranked_arenas
        .iter()
        .flat_map(|arena| arena.iter().filter(|e| e.finale_eligible).cloned())
        .collect()
}

/// The highest tier among a user's active entries
pub fn displayed_tier<'a, I>(entries: I) -> Option<ArenaTier>
where
    I: IntoIterator<Item = &'a ContestantEntry>,
{
    entries.into_iter().map(|e| e.tier).max()
}

/// Votes an entry still needs to move onto its arena's podium (0 if already there)
pub fn votes_to_podium(standings: &[RankedEntry], own: &RankedEntry) -> i64 {
    if own.finale_eligible {
        return 0;
    }
    match standings.get(FINALE_PODIUM_SIZE - 1) {
        Some(third) => (third.entry.votes - own.entry.votes + 1).max(0),
        None => 0,
    }
}

/// Badges derived from a user's standings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Achievement {
    FirstEntry,
    FirstVote,
    CrowdFavorite,
    Finalist,
    EliteContender,
}

/// One of the user's entries in context
#[derive(Debug, Clone, Serialize)]
pub struct EntryStanding {
    pub contestant_id: Uuid,
    pub arena_id: Uuid,
    pub arena_name: String,
    pub tier: ArenaTier,
    pub rank: usize,
    pub participants: usize,
    pub votes: i64,
    pub finale_eligible: bool,
    pub votes_to_podium: i64,
}

/// Where a user stands across all the arenas they compete in
#[derive(Debug, Clone, Serialize)]
pub struct ProgressionSummary {
    pub user_id: Uuid,
    pub displayed_tier: Option<ArenaTier>,
    pub next_tier: Option<ArenaTier>,
    pub total_votes: i64,
    pub entries: Vec<EntryStanding>,
    pub achievements: Vec<Achievement>,
}

/// Build a user's progression from the full standings of the arenas they are in
pub fn progression(user_id: Uuid, arena_standings: &[Vec<RankedEntry>]) -> ProgressionSummary {
    let mut entries = Vec::new();
    for standings in arena_standings {
        for own in standings.iter().filter(|e| e.entry.user_id == user_id) {
            entries.push(EntryStanding {
                contestant_id: own.entry.id,
                arena_id: own.entry.arena_id,
                arena_name: own.entry.arena_name.clone(),
                tier: own.entry.tier,
                rank: own.rank,
                participants: standings.len(),
                votes: own.entry.votes,
                finale_eligible: own.finale_eligible,
                votes_to_podium: votes_to_podium(standings, own),
            });
        }
    }
    entries.sort_by(|a, b| a.tier.cmp(&b.tier).then_with(|| a.arena_name.cmp(&b.arena_name)));

    let displayed_tier = entries.iter().map(|e| e.tier).max();
    let next_tier = match displayed_tier {
        Some(tier) => tier.next(),
        None => Some(ArenaTier::Recruit),
    };
    let total_votes = entries.iter().map(|e| e.votes).sum();

    let mut achievements = Vec::new();
    if !entries.is_empty() {
        achievements.push(Achievement::FirstEntry);
    }
    if entries.iter().any(|e| e.votes > 0) {
        achievements.push(Achievement::FirstVote);
    }
    if total_votes >= CROWD_FAVORITE_VOTES {
        achievements.push(Achievement::CrowdFavorite);
    }
    if entries.iter().any(|e| e.finale_eligible) {
        achievements.push(Achievement::Finalist);
    }
    if entries.iter().any(|e| e.tier == ArenaTier::Elite) {
        achievements.push(Achievement::EliteContender);
    }

    ProgressionSummary {
        user_id,
        displayed_tier,
        next_tier,
        total_votes,
        entries,
        achievements,
    }
}
