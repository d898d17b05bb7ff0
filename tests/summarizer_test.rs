use blogdigest::backend::MockBackend;
use blogdigest::summarizer::{EMPTY_DIGEST, UNKNOWN_TITLE};
use blogdigest::types::{Article, ArticleSummary, SummaryRecord, SummaryStyle, SummarizerError};
use blogdigest::Summarizer;
use std::sync::Arc;

fn article(title: &str) -> Article {
    Article {
        title: title.to_string(),
        link: format!("https://example.com/{}", title.to_lowercase()),
        published: "Mon, 01 Jan 2024 00:00:00 +0000".to_string(),
        author: "Jane Doe".to_string(),
        content: "Cleaned article body.".to_string(),
        ..Default::default()
    }
}

fn done_record(title: &str) -> SummaryRecord {
    SummaryRecord::Done(ArticleSummary {
        title: title.to_string(),
        link: String::new(),
        author: String::new(),
        published: String::new(),
        summary: format!("summary of {}", title),
        summary_style: SummaryStyle::Brief,
        processing_time: None,
    })
}

#[tokio::test]
async fn summarize_one_returns_done_record_with_timing() {
    let mock = Arc::new(MockBackend::new("generated summary"));
    let summarizer = Summarizer::new(mock.clone());

    let article = article("A");
    let record = summarizer
        .summarize_one(Ok(&article), SummaryStyle::Technical)
        .await;

    let summary = record.summary().expect("should be a Done record");
    assert_eq!(summary.title, "A");
    assert_eq!(summary.link, "https://example.com/a");
    assert_eq!(summary.author, "Jane Doe");
    assert_eq!(summary.summary, "generated summary");
    assert_eq!(summary.summary_style, SummaryStyle::Technical);
    assert!(summary.processing_time.is_some());
    assert_eq!(mock.call_count(), 1);
}

#[tokio::test]
async fn summarize_one_passes_upstream_error_through_without_backend_call() {
    let mock = Arc::new(MockBackend::new("unused"));
    let summarizer = Summarizer::new(mock.clone());

    let err = SummarizerError::Parse("boom".to_string());
    let record = summarizer
        .summarize_one(Err(&err), SummaryStyle::Technical)
        .await;

    match record {
        SummaryRecord::Failed { title, error } => {
            assert_eq!(title, UNKNOWN_TITLE);
            assert!(error.contains("boom"));
        }
        SummaryRecord::Done(_) => panic!("error input must not produce a summary"),
    }
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn published_falls_back_to_updated_when_absent() {
    let mock = Arc::new(MockBackend::new("s"));
    let summarizer = Summarizer::new(mock);

    let mut article = article("A");
    article.published = String::new();
    article.updated = "Tue, 02 Jan 2024 00:00:00 +0000".to_string();

    let record = summarizer
        .summarize_one(Ok(&article), SummaryStyle::Brief)
        .await;

    let summary = record.summary().unwrap();
    assert_eq!(summary.published, "Tue, 02 Jan 2024 00:00:00 +0000");
}

#[tokio::test]
async fn failed_item_does_not_abort_the_batch() {
    let mock = Arc::new(MockBackend::new("ok").failing_on(vec![2]));
    let summarizer = Summarizer::new(mock.clone());

    let articles = vec![article("A"), article("B"), article("C")];
    let records = summarizer
        .summarize_many(&articles, SummaryStyle::Business)
        .await;

    assert_eq!(records.len(), 3);
    assert!(!records[0].is_failed());
    assert!(records[1].is_failed());
    assert!(!records[2].is_failed());
    // Every article was attempted despite the mid-batch failure.
    assert_eq!(mock.call_count(), 3);

    match &records[1] {
        SummaryRecord::Failed { title, error } => {
            assert_eq!(title, "B");
            assert!(error.starts_with("Summarization failed:"));
        }
        SummaryRecord::Done(_) => unreachable!(),
    }
}

#[tokio::test]
async fn failure_on_untitled_article_uses_placeholder_title() {
    let mock = Arc::new(MockBackend::new("unused").failing_on(vec![1]));
    let summarizer = Summarizer::new(mock);

    let mut untitled = article("A");
    untitled.title = String::new();

    let record = summarizer
        .summarize_one(Ok(&untitled), SummaryStyle::Technical)
        .await;

    match record {
        SummaryRecord::Failed { title, .. } => assert_eq!(title, UNKNOWN_TITLE),
        SummaryRecord::Done(_) => panic!("scripted failure expected"),
    }
}

#[tokio::test]
async fn content_is_truncated_to_the_backend_budget() {
    let mock = Arc::new(MockBackend::new("s").with_content_budget(10));
    let summarizer = Summarizer::new(mock.clone());

    let mut long = article("A");
    long.content = "abcdefghijklmnopqrstuvwxyz".to_string();

    summarizer
        .summarize_one(Ok(&long), SummaryStyle::Brief)
        .await;

    let prompts = mock.recorded_prompts();
    assert!(prompts[0].contains("abcdefghij..."));
    assert!(!prompts[0].contains("abcdefghijk"));
}

#[tokio::test]
async fn content_budget_counts_characters_not_bytes() {
    let mock = Arc::new(MockBackend::new("s").with_content_budget(10));
    let summarizer = Summarizer::new(mock.clone());

    // Ten Hangul characters occupy thirty bytes; all of them fit the
    // ten-character budget and must reach the prompt uncut.
    let mut multibyte = article("A");
    multibyte.content = "안녕하세요반갑습니다".to_string();

    summarizer
        .summarize_one(Ok(&multibyte), SummaryStyle::Brief)
        .await;

    let prompts = mock.recorded_prompts();
    assert!(prompts[0].contains("안녕하세요반갑습니다"));
    assert!(!prompts[0].contains("안녕하세요반갑습니다..."));

    // One character over the budget is cut after ten characters.
    let mock = Arc::new(MockBackend::new("s").with_content_budget(10));
    let summarizer = Summarizer::new(mock.clone());

    let mut over = article("B");
    over.content = "안녕하세요반갑습니다만".to_string();

    summarizer
        .summarize_one(Ok(&over), SummaryStyle::Brief)
        .await;

    let prompts = mock.recorded_prompts();
    assert!(prompts[0].contains("안녕하세요반갑습니다..."));
    assert!(!prompts[0].contains("안녕하세요반갑습니다만"));
}

#[tokio::test]
async fn empty_content_falls_back_to_the_cleaned_summary() {
    let mock = Arc::new(MockBackend::new("s"));
    let summarizer = Summarizer::new(mock.clone());

    let mut bare = article("A");
    bare.content = String::new();
    bare.summary = "fallback text".to_string();

    summarizer
        .summarize_one(Ok(&bare), SummaryStyle::Brief)
        .await;

    assert!(mock.recorded_prompts()[0].contains("fallback text"));
}

#[tokio::test]
async fn digest_of_all_failed_records_is_the_sentinel() {
    let mock = Arc::new(MockBackend::new("unused"));
    let summarizer = Summarizer::new(mock.clone());

    let records = vec![
        SummaryRecord::Failed {
            title: "A".to_string(),
            error: "x".to_string(),
        },
        SummaryRecord::Failed {
            title: "B".to_string(),
            error: "y".to_string(),
        },
    ];

    let digest = summarizer.digest(&records, "Example Blog").await;
    assert_eq!(digest, EMPTY_DIGEST);
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn digest_uses_at_most_the_first_three_valid_summaries() {
    let mock = Arc::new(MockBackend::new("the digest"));
    let summarizer = Summarizer::new(mock.clone());

    let records = vec![
        done_record("T1"),
        SummaryRecord::Failed {
            title: "skipped".to_string(),
            error: "x".to_string(),
        },
        done_record("T2"),
        done_record("T3"),
        done_record("T4"),
    ];

    let digest = summarizer.digest(&records, "Example Blog").await;
    assert_eq!(digest, "the digest");
    assert_eq!(mock.call_count(), 1);

    let prompt = &mock.recorded_prompts()[0];
    assert!(prompt.contains("Example Blog"));
    assert!(prompt.contains("T1"));
    assert!(prompt.contains("T2"));
    assert!(prompt.contains("T3"));
    assert!(!prompt.contains("T4"));
    assert!(!prompt.contains("skipped"));
}

#[tokio::test]
async fn digest_backend_failure_becomes_a_fixed_string() {
    let mock = Arc::new(MockBackend::new("unused").failing_on(vec![1]));
    let summarizer = Summarizer::new(mock);

    let digest = summarizer.digest(&[done_record("T1")], "Example Blog").await;
    assert!(digest.starts_with("Failed to generate digest:"));
}
