//! Rank positions and the intermediate types produced by the ranking source.

use serde::{Deserialize, Serialize};

/// Rank position within a division.
///
/// The champion maps to 0 and an interim champion to 1, so champions
/// always sort first; numbered contenders keep the number parsed from
/// the ranking table. A numbered 1 therefore ties with an interim
/// champion, and the stable result sort keeps completion order between
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rank(pub u32);

impl Rank {
    pub const CHAMPION: Rank = Rank(0);
    pub const INTERIM_CHAMPION: Rank = Rank(1);
}

/// One ranked fighter as discovered on the ranking page: the rank and
/// an opaque hint (the encyclopedia article path) the resolver turns
/// into a profile key. Consumed within a single pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankEntry {
    pub rank: Rank,
    pub hint: String,
}

/// A division as discovered by the ranking source, entries in table order.
#[derive(Debug, Clone)]
pub struct RankedDivision {
    pub name: String,
    pub entries: Vec<RankEntry>,
}

/// Selects which enrichment credential a division's lookups use.
///
/// The video search API enforces a per-credential request quota, so two
/// credentials are rotated: the first half of the divisions (rounded up)
/// uses the primary one, the rest the secondary. The rule assumes
/// exactly two credentials; it must be revisited if more are added.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaPartition {
    Primary,
    Secondary,
}

impl QuotaPartition {
    pub fn for_division(index: usize, total: usize) -> Self {
        if index * 2 < total {
            QuotaPartition::Primary
        } else {
            QuotaPartition::Secondary
        }
    }
}
