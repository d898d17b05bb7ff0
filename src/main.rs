use anyhow::{bail, Context};
use blogdigest::backend::{AnthropicBackend, OllamaBackend, TextGenerator, DEFAULT_OLLAMA_HOST};
use blogdigest::types::{FetchConfig, SummaryRecord, SummaryStyle};
use blogdigest::{BlogRegistry, Fetcher, Summarizer};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "blogdigest", about = "Fetch tech blog feeds and summarize them with an LLM")]
struct Cli {
    /// Path of the JSON file holding the blog registry
    #[arg(long, default_value = "blogs.json", global = true)]
    registry: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the registered blogs
    List,
    /// Add a blog feed (overwrites an existing entry with the same name)
    Add { name: String, url: String },
    /// Remove a blog feed (no-op when the name is unknown)
    Remove { name: String },
    /// Fetch and print normalized articles from an ad-hoc feed URL
    Test {
        url: String,
        #[arg(long, default_value_t = 3)]
        max_entries: usize,
    },
    /// Summarize the latest articles of a registered blog
    Summarize {
        /// Registered blog name
        blog: String,
        /// Number of articles to summarize (1-10 hosted, 1-5 local)
        #[arg(long, default_value_t = 5)]
        count: usize,
        #[arg(long, value_enum, default_value_t = SummaryStyle::Technical)]
        style: SummaryStyle,
        /// Also synthesize a combined digest of the summaries
        #[arg(long)]
        digest: bool,
        #[arg(long, value_enum, default_value_t = BackendKind::Anthropic)]
        backend: BackendKind,
        /// Model name override for the chosen backend
        #[arg(long)]
        model: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum BackendKind {
    Anthropic,
    Ollama,
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendKind::Anthropic => write!(f, "anthropic"),
            BackendKind::Ollama => write!(f, "ollama"),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Command::List => {
            let registry = BlogRegistry::load(&cli.registry);
            if registry.is_empty() {
                println!("No blogs registered.");
            } else {
                for (name, url) in registry.list() {
                    println!("{}  {}", name, url);
                }
            }
        }
        Command::Add { name, url } => {
            let mut registry = BlogRegistry::load(&cli.registry);
            registry.add(&name, &url)?;
            println!("Added '{}'.", name);
        }
        Command::Remove { name } => {
            let mut registry = BlogRegistry::load(&cli.registry);
            if registry.remove(&name)? {
                println!("Removed '{}'.", name);
            } else {
                println!("'{}' was not registered.", name);
            }
        }
        Command::Test { url, max_entries } => {
            let fetcher = Fetcher::new(FetchConfig::default());
            match fetcher.fetch_articles(&url, max_entries).await {
                Ok(articles) => {
                    println!("Fetched {} articles:", articles.len());
                    for article in articles {
                        println!("{:#?}", article);
                    }
                }
                Err(e) => println!("Feed test failed: {}", e),
            }
        }
        Command::Summarize {
            blog,
            count,
            style,
            digest,
            backend,
            model,
        } => {
            run_summarize(&cli.registry, &blog, count, style, digest, backend, model).await?;
        }
    }

    Ok(())
}

async fn run_summarize(
    registry_path: &PathBuf,
    blog: &str,
    count: usize,
    style: SummaryStyle,
    with_digest: bool,
    backend_kind: BackendKind,
    model: Option<String>,
) -> anyhow::Result<()> {
    let registry = BlogRegistry::load(registry_path);
    let url = match registry.get(blog) {
        Some(url) => url.to_string(),
        None => {
            let known: Vec<&String> = registry.list().keys().collect();
            bail!("Unknown blog '{}'. Registered blogs: {:?}", blog, known);
        }
    };

    let backend = build_backend(backend_kind, model).await?;
    let max_count = match backend_kind {
        BackendKind::Anthropic => 10,
        BackendKind::Ollama => 5,
    };
    let count = count.clamp(1, max_count);

    info!("Summarizing up to {} articles from {} via {}", count, blog, backend.backend_name());

    let fetcher = Fetcher::new(FetchConfig::default());
    let articles = match fetcher.fetch_articles(&url, count).await {
        Ok(articles) => articles,
        Err(e) => {
            println!("Feed processing failed: {}", e);
            return Ok(());
        }
    };

    if articles.is_empty() {
        println!("The feed at {} has no entries.", url);
        return Ok(());
    }

    let summarizer = Summarizer::new(backend);
    let records = summarizer.summarize_many(&articles, style).await;

    if with_digest {
        let digest_text = summarizer.digest(&records, blog).await;
        println!("=== Digest: {} ===\n{}\n", blog, digest_text);
    }

    for (i, record) in records.iter().enumerate() {
        match record {
            SummaryRecord::Done(summary) => {
                println!("--- [{}] {} ---", i + 1, summary.title);
                if !summary.author.is_empty() {
                    println!("Author:    {}", summary.author);
                }
                if !summary.published.is_empty() {
                    println!("Published: {}", summary.published);
                }
                println!("Link:      {}", summary.link);
                if let Some(elapsed) = &summary.processing_time {
                    println!("Took:      {}", elapsed);
                }
                println!("\n{}\n", summary.summary);
            }
            SummaryRecord::Failed { title, error } => {
                println!("--- [{}] {} ---", i + 1, title);
                println!("Summary failed: {}\n", error);
            }
        }
    }

    Ok(())
}

async fn build_backend(
    kind: BackendKind,
    model: Option<String>,
) -> anyhow::Result<Arc<dyn TextGenerator>> {
    match kind {
        BackendKind::Anthropic => {
            let api_key = std::env::var("ANTHROPIC_API_KEY")
                .context("ANTHROPIC_API_KEY must be set for the anthropic backend")?;
            Ok(Arc::new(AnthropicBackend::new(api_key, model)))
        }
        BackendKind::Ollama => {
            let host = std::env::var("OLLAMA_HOST")
                .unwrap_or_else(|_| DEFAULT_OLLAMA_HOST.to_string());
            let backend = OllamaBackend::new(&host, model)?;

            // Preflight: a missing server or model would otherwise only
            // surface after the first long generation call.
            match backend.list_models().await {
                Ok(models) => {
                    let wanted = backend.model();
                    if !models.iter().any(|m| m == wanted || m.starts_with(&format!("{}:", wanted))) {
                        warn!(
                            "Model '{}' not found on the Ollama server (installed: {:?}). \
                             Run: ollama pull {}",
                            wanted, models, wanted
                        );
                    }
                }
                Err(e) => {
                    bail!(
                        "{}. Is the server running? Start it with: ollama serve",
                        e
                    );
                }
            }

            Ok(Arc::new(backend))
        }
    }
}
