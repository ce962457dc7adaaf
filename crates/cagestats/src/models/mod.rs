//! Data model for ranked fighter statistics.

mod division;
mod fighter;
mod rank;

pub use division::Division;
pub use fighter::{Fight, Fighter};
pub use rank::{QuotaPartition, Rank, RankEntry, RankedDivision};
