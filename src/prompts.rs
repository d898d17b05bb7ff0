use crate::types::{ArticleSummary, SummaryStyle};

/// Fixed per-style instruction blocks prepended to every article prompt.
pub fn style_instruction(style: SummaryStyle) -> &'static str {
    match style {
        SummaryStyle::Technical => {
            "Summarize the following tech blog post from a technical perspective:\n\
             - Technologies and tools used\n\
             - Problems solved\n\
             - Key solutions\n\
             - Important insights"
        }
        SummaryStyle::Business => {
            "Summarize the following tech blog post from a business perspective:\n\
             - Business impact\n\
             - Performance improvements\n\
             - Cost savings\n\
             - User experience improvements"
        }
        SummaryStyle::Brief => {
            "Summarize the following tech blog post in 3-4 lines:\n\
             - Extract only the key points\n\
             - Briefly explain technical terms"
        }
    }
}

/// Render the full prompt for one article. `published` is the caller's
/// published-or-updated fallback and `body` the (possibly truncated)
/// cleaned content.
pub fn article_prompt(
    style: SummaryStyle,
    title: &str,
    author: &str,
    published: &str,
    body: &str,
) -> String {
    format!(
        "{}\n\nTitle: {}\nAuthor: {}\nPublished: {}\n\nBody:\n{}",
        style_instruction(style),
        title,
        author,
        published,
        body
    )
}

/// Render the digest prompt over at most the summaries the caller passes
/// in (the summarizer caps these at three).
pub fn digest_prompt(blog_name: &str, summaries: &[&ArticleSummary]) -> String {
    let mut articles_text = String::new();
    for (i, summary) in summaries.iter().enumerate() {
        articles_text.push_str(&format!(
            "\n{}. {}\nSummary: {}\n",
            i + 1,
            summary.title,
            summary.summary
        ));
    }

    format!(
        "Below are summaries of the latest posts from {}.\n\
         Combine them into a digest covering:\n\
         1. The overall technology trend (2-3 sentences)\n\
         2. The key innovations (2-3 sentences)\n\
         3. What developers should pay attention to (2-3 sentences)\n\n\
         Keep it concise and practical.\n\n\
         Article summaries:\n{}",
        blog_name, articles_text
    )
}
