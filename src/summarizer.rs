use crate::backend::TextGenerator;
use crate::prompts;
use crate::types::{Article, ArticleSummary, SummaryRecord, SummaryStyle, SummarizerError};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Placeholder title used when a failed article never had one.
pub const UNKNOWN_TITLE: &str = "Unknown title";

/// Fixed digest output when no error-free summaries exist.
pub const EMPTY_DIGEST: &str = "No articles available to summarize.";

/// Number of summaries folded into a digest.
const DIGEST_ARTICLE_LIMIT: usize = 3;

/// Stateless summarization client: holds a live backend handle and turns
/// articles into summary records one blocking call at a time. Backend
/// failures become data; nothing here propagates an error to the caller.
pub struct Summarizer {
    backend: Arc<dyn TextGenerator>,
}

impl Summarizer {
    pub fn new(backend: Arc<dyn TextGenerator>) -> Self {
        Self { backend }
    }

    pub fn backend_name(&self) -> String {
        self.backend.backend_name()
    }

    /// Summarize one article in the given style. An `Err` input (a feed
    /// that failed upstream) short-circuits to a failed record carrying
    /// the message unchanged; the backend is never invoked for it.
    pub async fn summarize_one(
        &self,
        article: std::result::Result<&Article, &SummarizerError>,
        style: SummaryStyle,
    ) -> SummaryRecord {
        let article = match article {
            Ok(article) => article,
            Err(e) => {
                return SummaryRecord::Failed {
                    title: UNKNOWN_TITLE.to_string(),
                    error: e.to_string(),
                }
            }
        };

        let body = if article.content.is_empty() {
            article.summary.as_str()
        } else {
            article.content.as_str()
        };
        let body = match self.backend.max_content_chars() {
            Some(budget) => truncate_chars(body, budget),
            None => body.to_string(),
        };

        let published = if !article.published.is_empty() {
            article.published.clone()
        } else {
            article.updated.clone()
        };

        let prompt = prompts::article_prompt(
            style,
            &article.title,
            &article.author,
            &published,
            &body,
        );

        let start = Instant::now();
        match self.backend.generate(&prompt).await {
            Ok(text) => {
                let elapsed = start.elapsed().as_secs_f64();
                info!("Summarized '{}' in {:.1}s", article.title, elapsed);

                SummaryRecord::Done(ArticleSummary {
                    title: article.title.clone(),
                    link: article.link.clone(),
                    author: article.author.clone(),
                    published,
                    summary: text,
                    summary_style: style,
                    processing_time: Some(format!("{:.1}s", elapsed)),
                })
            }
            Err(e) => {
                warn!("Failed to summarize '{}': {}", article.title, e);

                let title = if article.title.is_empty() {
                    UNKNOWN_TITLE.to_string()
                } else {
                    article.title.clone()
                };
                SummaryRecord::Failed {
                    title,
                    error: format!("Summarization failed: {}", e),
                }
            }
        }
    }

    /// Summarize a batch strictly sequentially, in input order. Each
    /// item's outcome is independent: a failure is collected and the batch
    /// moves on. Backends that declare a pause get it between items.
    pub async fn summarize_many(
        &self,
        articles: &[Article],
        style: SummaryStyle,
    ) -> Vec<SummaryRecord> {
        let mut records = Vec::with_capacity(articles.len());

        for (i, article) in articles.iter().enumerate() {
            info!("Summarizing article {}/{}", i + 1, articles.len());
            records.push(self.summarize_one(Ok(article), style).await);

            if i + 1 < articles.len() {
                if let Some(pause) = self.backend.pause_between_items() {
                    tokio::time::sleep(pause).await;
                }
            }
        }

        records
    }

    /// Fold the first error-free summaries (at most three) into a single
    /// digest for `blog_name`. Returns a fixed sentinel without touching
    /// the backend when nothing is summarizable, and a fixed failure
    /// string when the backend errors.
    pub async fn digest(&self, records: &[SummaryRecord], blog_name: &str) -> String {
        let valid: Vec<&ArticleSummary> = records.iter().filter_map(|r| r.summary()).collect();

        if valid.is_empty() {
            return EMPTY_DIGEST.to_string();
        }

        let selected = &valid[..valid.len().min(DIGEST_ARTICLE_LIMIT)];
        let prompt = prompts::digest_prompt(blog_name, selected);

        info!("Generating digest for {} from {} summaries", blog_name, selected.len());

        match self.backend.generate(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Digest generation failed: {}", e);
                format!("Failed to generate digest: {}", e)
            }
        }
    }
}

/// Truncate to at most `budget` characters, appending an ellipsis when
/// anything was cut. The budget counts characters, not bytes, so
/// multi-byte text keeps its intended length.
fn truncate_chars(text: &str, budget: usize) -> String {
    match text.char_indices().nth(budget) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
