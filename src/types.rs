use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// A normalized feed entry. Derived from the raw feed on every fetch,
/// never persisted. Missing source fields become empty strings so that
/// downstream prompt rendering never has to deal with absent keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub link: String,
    pub published: String,
    pub updated: String,
    pub author: String,
    /// Cleaned plain text of the entry summary.
    pub summary: String,
    /// Cleaned concatenation of every text block the entry carries.
    pub content: String,
    /// Cleaned entry description. feed-rs folds the RSS `<description>`
    /// element into its summary field, so this mirrors `summary`.
    pub description: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SummaryStyle {
    Technical,
    Business,
    Brief,
}

impl std::fmt::Display for SummaryStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SummaryStyle::Technical => write!(f, "technical"),
            SummaryStyle::Business => write!(f, "business"),
            SummaryStyle::Brief => write!(f, "brief"),
        }
    }
}

/// A generated summary for a single article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleSummary {
    pub title: String,
    pub link: String,
    pub author: String,
    /// Published date, falling back to the updated date when absent.
    pub published: String,
    pub summary: String,
    pub summary_style: SummaryStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_time: Option<String>,
}

/// Per-article outcome of a summarization batch. A failed item carries its
/// error as data so a batch never aborts and callers never need to catch
/// anything to walk a result set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SummaryRecord {
    Done(ArticleSummary),
    Failed { title: String, error: String },
}

impl SummaryRecord {
    pub fn summary(&self) -> Option<&ArticleSummary> {
        match self {
            SummaryRecord::Done(summary) => Some(summary),
            SummaryRecord::Failed { .. } => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, SummaryRecord::Failed { .. })
    }
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub max_retries: u32,
    pub retry_delay_seconds: u64,
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "blogdigest/0.1".to_string(),
            timeout_seconds: 30,
            max_retries: 2,
            retry_delay_seconds: 2,
            max_redirects: 5,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SummarizerError {
    #[error("Failed to fetch RSS feed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to parse RSS feed: {0}")]
    Parse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("{0}")]
    General(String),
}

pub type Result<T> = std::result::Result<T, SummarizerError>;
