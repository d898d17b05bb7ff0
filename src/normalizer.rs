use crate::types::{Article, Result, SummarizerError};
use feed_rs::model::Entry;
use feed_rs::parser;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

static RE_MARKUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());
static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Parse feed text and normalize at most `max_entries` leading entries,
/// in the feed's native order. A document feed-rs rejects is reported as
/// a parse error value; nothing in here panics on malformed input.
pub fn parse_articles(content: &str, max_entries: usize) -> Result<Vec<Article>> {
    debug!("Parsing feed content ({} bytes)", content.len());

    let feed = parser::parse(content.as_bytes())
        .map_err(|e| SummarizerError::Parse(format!("{}", e)))?;

    let articles: Vec<Article> = feed
        .entries
        .into_iter()
        .take(max_entries)
        .map(normalize_entry)
        .collect();

    info!("Normalized {} entries from feed", articles.len());
    Ok(articles)
}

/// Strip SGML-style tags and collapse whitespace runs to single spaces.
/// This is a lexical pass, not a structural HTML parse: only the tags are
/// removed, so the inner text of script/style blocks survives. Applying
/// it to already-clean text is a no-op.
pub fn clean_text(text: &str) -> String {
    let stripped = RE_MARKUP.replace_all(text, "");
    let collapsed = RE_WHITESPACE.replace_all(&stripped, " ");
    collapsed.trim().to_string()
}

fn normalize_entry(entry: Entry) -> Article {
    let title = entry.title.map(|t| t.content).unwrap_or_default();
    let link = entry
        .links
        .first()
        .map(|l| l.href.clone())
        .unwrap_or_default();
    let published = entry
        .published
        .map(|dt| dt.to_rfc2822())
        .unwrap_or_default();
    let updated = entry.updated.map(|dt| dt.to_rfc2822()).unwrap_or_default();
    let author = entry
        .authors
        .first()
        .map(|a| a.name.clone())
        .unwrap_or_default();

    let raw_summary = entry.summary.map(|s| s.content).unwrap_or_default();

    // Assemble every text block the entry carries: the raw summary first,
    // then content bodies whose media type is plain text or HTML. feed-rs
    // folds the RSS <description> element into the summary field, so there
    // is no separate description leg to append.
    let mut content_parts = Vec::new();
    if !raw_summary.is_empty() {
        content_parts.push(raw_summary.clone());
    }
    if let Some(content) = entry.content {
        let media_type = content.content_type.essence_str().to_string();
        if media_type == "text/html" || media_type == "text/plain" {
            if let Some(body) = content.body {
                content_parts.push(body);
            }
        }
    }
    let content = clean_text(&content_parts.join(" "));

    let summary = clean_text(&raw_summary);
    let description = summary.clone();

    let tags = entry.categories.into_iter().map(|c| c.term).collect();

    Article {
        title,
        link,
        published,
        updated,
        author,
        summary,
        content,
        description,
        tags,
    }
}
