//! Profile key resolution: article infobox first, name search second.
//!
//! A ranking-table hint is an encyclopedia article path. The primary
//! path fetches that article and reads the fighter's canonical Sherdog
//! identifier out of the infobox; it only counts as a success when both
//! the name token and the identifier are present. Any primary failure
//! (network, missing infobox, missing token) falls through to the
//! search path, when one is configured.

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use tracing::{debug, warn};

use crate::http::HttpClient;
use crate::sources::{ProfilePath, ProfileResolver, SearchPath};

static INFOBOX: Lazy<Selector> = Lazy::new(|| Selector::parse("table.infobox.vcard").unwrap());

static FULL_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<span class="fn">([^<]+)</span>"#).unwrap());
static SHERDOG_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"fightfinder\.asp\?fighterID=(\d+)").unwrap());

/// Two-path resolver: a primary profile-page lookup with an optional
/// search fallback. With no fallback configured, a primary miss is final.
pub struct FallbackResolver {
    primary: Arc<dyn ProfilePath>,
    fallback: Option<Arc<dyn SearchPath>>,
}

impl FallbackResolver {
    pub fn new(primary: Arc<dyn ProfilePath>, fallback: Option<Arc<dyn SearchPath>>) -> Self {
        Self { primary, fallback }
    }
}

#[async_trait]
impl ProfileResolver for FallbackResolver {
    async fn resolve(&self, hint: &str) -> Option<String> {
        match self.primary.profile_key(hint).await {
            Ok(key) => return Some(key),
            Err(err) => debug!(hint, error = %format!("{err:#}"), "primary resolution failed"),
        }

        let Some(fallback) = &self.fallback else {
            warn!(hint, "primary resolution failed and no search fallback configured");
            return None;
        };

        let name = display_name_from_hint(hint);
        match fallback.search_key(&name).await {
            Ok(key) => Some(key),
            Err(err) => {
                warn!(hint, name, error = %format!("{err:#}"), "search fallback failed");
                None
            }
        }
    }
}

/// Primary path: the fighter's encyclopedia article.
pub struct WikipediaProfilePath {
    http: HttpClient,
    base_url: String,
}

impl WikipediaProfilePath {
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
impl ProfilePath for WikipediaProfilePath {
    async fn profile_key(&self, hint: &str) -> anyhow::Result<String> {
        let url = format!("{}{}", self.base_url, hint);
        let page = self.http.get_text(&url).await?;
        extract_profile_key(&page)
    }
}

/// Read the canonical profile key out of an article's infobox. Both the
/// name token and the numeric identifier must be present; a page with
/// only one of them is a failed lookup, not an empty success.
pub(crate) fn extract_profile_key(page: &str) -> anyhow::Result<String> {
    let infobox = infobox_html(page).context("article has no infobox")?;

    let name = FULL_NAME
        .captures(&infobox)
        .map(|caps| caps[1].to_string())
        .context("no name token in infobox")?;
    let id = SHERDOG_ID
        .captures(&infobox)
        .map(|caps| caps[1].to_string())
        .context("no fightfinder identifier in infobox")?;

    Ok(profile_key(&name, &id))
}

fn infobox_html(page: &str) -> Option<String> {
    let document = Html::parse_document(page);
    document.select(&INFOBOX).next().map(|el| el.html())
}

/// Canonical key: `First Last` + `12345` becomes `First-Last-12345`.
/// Apostrophes (raw or as the `&#39;` entity) are stripped; Sherdog's
/// URL routing rejects them.
pub(crate) fn profile_key(name: &str, id: &str) -> String {
    let key = format!("{}-{}", name.trim().replace(' ', "-"), id);
    key.replace("&#39;", "").replace('\'', "")
}

/// Derive a searchable display name from an article path:
/// `/wiki/Jon_Jones_(fighter)` becomes `Jon Jones`.
pub(crate) fn display_name_from_hint(hint: &str) -> String {
    let path = hint.strip_prefix("/wiki/").unwrap_or(hint);
    let decoded = urlencoding::decode(path).map(|s| s.into_owned()).unwrap_or_else(|_| path.to_string());
    let mut name = decoded.replace('_', " ");
    if let Some(pos) = name.find(" (") {
        name.truncate(pos);
    }
    name.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};

    const INFOBOX_PAGE: &str = r#"<html><body>
<table class="infobox vcard">
<tbody>
<tr><th><span class="fn">Jon Jones</span></th></tr>
<tr><td><a href="http://www.sherdog.com/fightfinder/fightfinder.asp?fighterID=27944">Sherdog profile</a></td></tr>
</tbody>
</table>
</body></html>"#;

    struct FailingPrimary;

    #[async_trait]
    impl ProfilePath for FailingPrimary {
        async fn profile_key(&self, _hint: &str) -> anyhow::Result<String> {
            anyhow::bail!("no fightfinder identifier in infobox")
        }
    }

    struct SucceedingPrimary;

    #[async_trait]
    impl ProfilePath for SucceedingPrimary {
        async fn profile_key(&self, _hint: &str) -> anyhow::Result<String> {
            Ok("Jon-Jones-27944".into())
        }
    }

    struct CountingSearch {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl SearchPath for CountingSearch {
        async fn search_key(&self, _name: &str) -> anyhow::Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok("From-Search-1".into())
        }
    }

    #[test]
    fn infobox_with_both_tokens_yields_key() {
        assert_eq!(extract_profile_key(INFOBOX_PAGE).unwrap(), "Jon-Jones-27944");
    }

    #[test]
    fn infobox_missing_identifier_is_a_failure() {
        let page = r#"<html><body>
<table class="infobox vcard">
<tbody>
<tr><th><span class="fn">Jon Jones</span></th></tr>
</tbody>
</table>
</body></html>"#;
        assert!(extract_profile_key(page).is_err());
    }

    #[test]
    fn infobox_missing_name_is_a_failure() {
        let page = r#"<html><body>
<table class="infobox vcard">
<tbody>
<tr><td><a href="http://www.sherdog.com/fightfinder/fightfinder.asp?fighterID=27944">x</a></td></tr>
</tbody>
</table>
</body></html>"#;
        assert!(extract_profile_key(page).is_err());
    }

    #[test]
    fn page_without_infobox_is_a_failure() {
        assert!(extract_profile_key("<html><body><p>stub article</p></body></html>").is_err());
    }

    #[test]
    fn profile_key_replaces_spaces_and_strips_apostrophes() {
        assert_eq!(profile_key("Jon Jones", "27944"), "Jon-Jones-27944");
        assert_eq!(profile_key("Kevin O&#39;Neill", "101"), "Kevin-ONeill-101");
        assert_eq!(profile_key("Kevin O'Neill", "101"), "Kevin-ONeill-101");
    }

    #[test]
    fn display_name_strips_path_underscores_and_parenthetical() {
        assert_eq!(display_name_from_hint("/wiki/Jon_Jones"), "Jon Jones");
        assert_eq!(display_name_from_hint("/wiki/Jan_B%C5%82achowicz"), "Jan Błachowicz");
        assert_eq!(display_name_from_hint("/wiki/Tony_Ferguson_(fighter)"), "Tony Ferguson");
    }

    #[tokio::test]
    async fn fallback_runs_exactly_once_when_primary_fails() {
        let search = Arc::new(CountingSearch {
            calls: AtomicUsize::new(0),
        });
        let resolver = FallbackResolver::new(Arc::new(FailingPrimary), Some(search.clone()));

        let key = resolver.resolve("/wiki/Somebody").await;
        assert_eq!(key.as_deref(), Some("From-Search-1"));
        assert_eq!(search.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn fallback_is_not_consulted_when_primary_succeeds() {
        let search = Arc::new(CountingSearch {
            calls: AtomicUsize::new(0),
        });
        let resolver = FallbackResolver::new(Arc::new(SucceedingPrimary), Some(search.clone()));

        let key = resolver.resolve("/wiki/Jon_Jones").await;
        assert_eq!(key.as_deref(), Some("Jon-Jones-27944"));
        assert_eq!(search.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn both_paths_failing_resolves_to_none() {
        let resolver = FallbackResolver::new(Arc::new(FailingPrimary), None);
        assert_eq!(resolver.resolve("/wiki/Somebody").await, None);
    }
}
