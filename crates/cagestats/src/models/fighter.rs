//! Fighter profile records as extracted from a profile page.

use serde::{Deserialize, Serialize};

/// A ranked fighter's structured profile.
///
/// Created empty by the profile fetcher, populated section by section as
/// the page is parsed, video links attached last. The source pages are
/// incomplete for plenty of fighters, so every field is optional or
/// defaults to zero; no cross-field consistency (e.g. per-method wins
/// summing to the total) is enforced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fighter {
    pub ranking: u32,
    pub name: Option<String>,
    pub nickname: Option<String>,
    pub country: Option<String>,
    pub region: Option<String>,
    pub association: Option<String>,
    pub birthdate: Option<String>,
    pub age: Option<u32>,
    /// Height in centimeters.
    pub height: Option<u32>,
    /// Weight in kilograms.
    pub weight: Option<u32>,
    pub wins: u32,
    pub win_ko: u32,
    pub win_sub: u32,
    pub win_dec: u32,
    pub win_oth: u32,
    pub losses: u32,
    pub losses_ko: u32,
    pub losses_sub: u32,
    pub losses_dec: u32,
    pub losses_oth: u32,
    pub no_contest: u32,
    pub fight_history: Vec<Fight>,
    pub youtube_videos: Vec<String>,
}

/// One bout row from a fighter's fight history table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fight {
    pub result: String,
    pub opponent: String,
    pub event_name: String,
    /// Normalized to `dd-MM-yyyy`.
    pub date: String,
    pub method: String,
    pub round: Option<u32>,
    pub time: String,
}
