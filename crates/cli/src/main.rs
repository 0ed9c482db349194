use anyhow::Result;
use clap::{Parser, Subcommand};
use cli::render;
use cli::uploads::read_uploads;
use docqa_core::config::{self, AppConfig};
use docqa_core::{extractor, pipeline, Session};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Extract { files, json } => run_extract(&files, json),
        Commands::Ask { files, query, json } => run_ask(cfg, &files, &query, json).await,
        Commands::Chat { files } => run_chat(cfg, &files).await,
    }
}

#[derive(Parser)]
#[command(name = "docqa")]
#[command(about = "Ask questions about text, PDF and image files", long_about = None)]
struct Cli {
    /// Path to config TOML
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the fragments extracted from each file
    Extract {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// Build a context from the files and answer one question
    Ask {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Question to answer
        #[arg(short, long)]
        query: String,
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// Build a context once, then answer questions read from stdin
    Chat {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

fn run_extract(files: &[PathBuf], json: bool) -> Result<()> {
    let mut rows = Vec::new();
    for path in files {
        let fragments = extractor::extract(path);
        let summaries: Vec<_> = fragments.iter().map(render::summarize).collect();
        if json {
            rows.push(serde_json::json!({
                "path": path.display().to_string(),
                "fragments": summaries,
            }));
        } else {
            println!("{}", path.display());
            for s in &summaries {
                println!("  {}", render::line(s));
            }
        }
    }
    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    }
    Ok(())
}

fn load_session(files: &[PathBuf]) -> Result<Session> {
    let (uploads, skipped) = read_uploads(files);
    for (path, reason) in &skipped {
        eprintln!("skipped {}: {}", path.display(), reason);
    }
    let mut session = Session::new();
    let summary = session.process_batch(&uploads)?;
    eprintln!(
        "Successfully processed {} files! Context is ready. Total parts generated: {}",
        summary.files_processed, summary.total_fragments
    );
    Ok(session)
}

async fn run_ask(cfg: AppConfig, files: &[PathBuf], query: &str, json: bool) -> Result<()> {
    let session = load_session(files)?;
    let provider = pipeline::resolve_provider(&cfg);
    let answer = session.ask(provider.as_ref(), &cfg.model.name, query).await?;
    if json {
        let out = serde_json::json!({
            "query": query,
            "model": cfg.model.name,
            "files_processed": session.files_processed(),
            "answer": answer,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{}", answer);
    }
    Ok(())
}

async fn run_chat(cfg: AppConfig, files: &[PathBuf]) -> Result<()> {
    let session = load_session(files)?;
    let provider = pipeline::resolve_provider(&cfg);
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    print!("> ");
    stdout.flush()?;
    for line in stdin.lock().lines() {
        let line = line?;
        let query = line.trim();
        if query == "exit" || query == "quit" {
            break;
        }
        if !query.is_empty() {
            match session.ask(provider.as_ref(), &cfg.model.name, query).await {
                Ok(answer) => println!("{}\n", answer),
                Err(e) => eprintln!("{}", e),
            }
        }
        print!("> ");
        stdout.flush()?;
    }
    Ok(())
}
