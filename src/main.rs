use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tracing::{debug, info, Level};

use sentsplit::config::load_rules_async;
use sentsplit::sentence_detector::{format_sentence_output, normalize_sentence_into, CharIndex};
use sentsplit::{SentenceBoundaryRules, SentenceDetector, SplitterService, Tokenizer};

#[derive(Parser, Debug)]
#[command(name = "sentsplit")]
#[command(about = "Abbreviation-aware sentence splitter for tokenized text")]
#[command(version)]
struct Args {
    /// TOML rule file merged over the built-in abbreviation and punctuation tables
    #[arg(long, global = true)]
    rules: Option<PathBuf>,

    /// Log at debug level
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Read a LIF envelope (or plain text) and print the annotated envelope
    Split {
        /// Input file; stdin when omitted
        input: Option<PathBuf>,
    },
    /// Tokenize plain text and print one sentence per line
    Text {
        /// Input file; stdin when omitted
        input: Option<PathBuf>,

        /// Print sentences exactly as they appear, without collapsing whitespace
        #[arg(long)]
        raw: bool,
    },
    /// Print the service metadata envelope
    Metadata,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // WHY: structured JSON logging on stderr keeps stdout a clean JSON/TSV stream
    tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .json()
        .init();

    info!(?args, "Parsed CLI arguments");

    let rules = match &args.rules {
        Some(path) => load_rules_async(path)
            .await
            .with_context(|| format!("Failed to load rule file {}", path.display()))?,
        None => SentenceBoundaryRules::default(),
    };
    let detector = Arc::new(SentenceDetector::new(rules).context("Invalid sentence boundary rules")?);

    match args.command {
        Command::Split { input } => {
            let content = read_input(input.as_deref()).await?;
            let service = SplitterService::new(detector)?;
            println!("{}", service.execute(&content));
        }
        Command::Text { input, raw } => {
            let content = read_input(input.as_deref()).await?;
            print_sentences(&detector, &content, raw)?;
        }
        Command::Metadata => {
            let service = SplitterService::new(detector)?;
            println!("{}", service.metadata());
        }
    }

    Ok(())
}

async fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read input {}", path.display())),
        None => {
            let mut content = String::new();
            tokio::io::stdin()
                .read_to_string(&mut content)
                .await
                .context("Failed to read stdin")?;
            Ok(content)
        }
    }
}

fn print_sentences(detector: &SentenceDetector, text: &str, raw: bool) -> Result<()> {
    let tokens = Tokenizer::new()?.tokenize(text);
    let sentences = detector.split(text, &tokens)?;
    let index = CharIndex::new(text);
    let mut buffer = String::new();

    for (i, sentence) in sentences.iter().enumerate() {
        let content = sentence.slice(&index).unwrap_or_default();
        let line = if raw {
            format_sentence_output(i, content, sentence)
        } else {
            normalize_sentence_into(content, &mut buffer);
            format_sentence_output(i, &buffer, sentence)
        };
        println!("{line}");
    }

    debug!(sentences = sentences.len(), "Printed sentences");
    Ok(())
}
