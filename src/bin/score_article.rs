//! Score one article from the command line.
//!
//! Usage: `score_article [path/to/article.json]` (reads stdin when no path is given).
//! Prints the analysis result as pretty JSON.

use std::io::Read;

use anyhow::Context;
use news_credibility_analyzer::{Article, Runtime};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let raw = match std::env::args().nth(1) {
        Some(path) => {
            std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?
        }
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading article JSON from stdin")?;
            buf
        }
    };

    let article: Article = serde_json::from_str(&raw).context("parsing article JSON")?;
    if article.is_blank() {
        anyhow::bail!("article title and content are empty");
    }

    let runtime = Runtime::from_env()?;
    let result = runtime.engine.score(&article).await;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
