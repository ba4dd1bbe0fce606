//! Web search through DuckDuckGo's HTML endpoint.
//!
//! The results page is fetched with the same raw-socket [`Client`] as any
//! other URL (so it is cached too) and the result anchors are pulled out with
//! `scraper`.

use std::sync::LazyLock;

use log::debug;
use scraper::{Html, Selector};
use url::Url;

use crate::config::{SEARCH_ENDPOINT, SEARCH_RESULT_LIMIT};
use crate::error_handling::FetchError;
use crate::fetch::{Client, Exchange, FetchResult};

const RESULT_LINK_SELECTOR_STR: &str = "a.result__a";

static RESULT_LINK_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(RESULT_LINK_SELECTOR_STR)
        .expect("Failed to parse result link selector - this is a bug")
});

/// One search hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
}

/// The DuckDuckGo results URL for `query`.
pub fn search_url(query: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(query.as_bytes()).collect();
    format!("{SEARCH_ENDPOINT}?q={encoded}")
}

/// Searches for `query` and returns up to [`SEARCH_RESULT_LIMIT`] results,
/// along with the underlying fetch (for its status and cache source).
///
/// # Errors
///
/// Whatever the fetch of the results page fails with.
pub fn search<E: Exchange>(
    client: &Client<E>,
    query: &str,
) -> Result<(Vec<SearchResult>, FetchResult), FetchError> {
    let fetch = client.fetch(&search_url(query), Some("text/html"))?;
    let results = parse_results(&fetch.envelope.body, SEARCH_RESULT_LIMIT);
    debug!("Search for '{query}' produced {} result(s)", results.len());
    Ok((results, fetch))
}

/// Extracts result links from a DuckDuckGo HTML results page.
pub fn parse_results(html: &str, limit: usize) -> Vec<SearchResult> {
    let document = Html::parse_document(html);
    document
        .select(&RESULT_LINK_SELECTOR)
        .filter_map(|anchor| {
            let href = anchor.value().attr("href")?;
            let title = anchor
                .text()
                .collect::<String>()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ");
            if title.is_empty() {
                return None;
            }
            Some(SearchResult {
                title,
                url: unwrap_redirect_link(href),
            })
        })
        .take(limit)
        .collect()
}

/// DuckDuckGo wraps result links as `//duckduckgo.com/l/?uddg=<target>`;
/// returns the target, or `href` unchanged when it is not such a link.
fn unwrap_redirect_link(href: &str) -> String {
    let absolute = if href.starts_with("//") {
        format!("https:{href}")
    } else {
        href.to_string()
    };
    Url::parse(&absolute)
        .ok()
        .filter(|url| url.path().starts_with("/l/"))
        .and_then(|url| {
            url.query_pairs()
                .find(|(key, _)| key == "uddg")
                .map(|(_, value)| value.into_owned())
        })
        .unwrap_or(absolute)
}
