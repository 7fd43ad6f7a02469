//! Raw provider records to display records.
//!
//! Mapping never fails: every missing field has a default, and domain and
//! timestamp parsing fall back quietly on malformed input.

use jiff::Timestamp;

use super::models::{DisplayArticle, RawArticle};
use super::thread::Thread;
use crate::utils::datetime::{format_age, parse_published};
use crate::utils::url::{extract_domain, favicon_url};

/// Number of articles requested per page.
pub const PAGE_SIZE: usize = 10;

pub const PLACEHOLDER_TITLE: &str = "Untitled";
pub const PLACEHOLDER_URL: &str = "#";

/// Map one raw record at a zero-based position within the feed session.
pub fn map_article(raw: &RawArticle, index: usize, thread: Thread, now: Timestamp) -> DisplayArticle {
    let title = non_empty(raw.title.as_deref())
        .unwrap_or(PLACEHOLDER_TITLE)
        .to_string();
    let url = non_empty(raw.url.as_deref())
        .unwrap_or(PLACEHOLDER_URL)
        .to_string();

    let domain = resolve_domain(raw, &url);
    let published = raw.published_at.as_deref().and_then(parse_published);

    DisplayArticle {
        id: format!("{}-{}", thread.key(), index),
        title,
        url,
        source_name: non_empty(raw.source.as_ref().and_then(|s| s.name.as_deref()))
            .map(str::to_string),
        favicon_url: favicon_url(&domain),
        thumbnail_url: non_empty(raw.image.as_deref()).map(str::to_string),
        comment_count: 0,
        vote_count: 0,
        age_label: format_age(published, now),
        thread_tag: thread.key().to_string(),
    }
}

/// Map a full page, numbering articles sequentially across pages so that
/// identifiers stay unique within one feed session.
pub fn map_page(raws: &[RawArticle], page: u32, thread: Thread, now: Timestamp) -> Vec<DisplayArticle> {
    let offset = (page.max(1) as usize - 1) * PAGE_SIZE;
    raws.iter()
        .take(PAGE_SIZE)
        .enumerate()
        .map(|(i, raw)| map_article(raw, offset + i, thread, now))
        .collect()
}

/// Source domain first, then the article's own host, else empty.
fn resolve_domain(raw: &RawArticle, url: &str) -> String {
    if let Some(source_url) = non_empty(raw.source.as_ref().and_then(|s| s.url.as_deref())) {
        return extract_domain(source_url).unwrap_or_else(|| source_url.trim().to_string());
    }

    match url {
        PLACEHOLDER_URL => String::new(),
        u => extract_domain(u).unwrap_or_default(),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
