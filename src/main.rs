use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use callsense::{
    AnalysisConfig, AppState, ClassifierConfig, HumanReport, InferenceClient, ServerConfig,
    Speaker, analyze_transcript, read_transcript_file, segment,
};

#[derive(Parser)]
#[command(name = "callsense")]
#[command(author, version, long_about = None)]
#[command(about = "Sentiment analysis for sales call transcripts")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify every statement in a transcript and report overall sentiment
    Analyze {
        /// Input transcript file ([Sales Agent] / [Customer] tagged text)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for the JSON report (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output file for a human-readable report (text)
        #[arg(long)]
        human_readable: Option<PathBuf>,

        /// Maximum concurrent classifier requests
        #[arg(long, default_value = "4")]
        concurrency: usize,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show how a transcript is split into utterances without classifying it
    Segment {
        /// Input transcript file
        #[arg(short, long)]
        input: PathBuf,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Serve the /analyze upload endpoint over HTTP
    Serve {
        /// Interface to bind
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on
        #[arg(short, long, env = "PORT", default_value = "5000")]
        port: u16,

        /// Maximum upload size in bytes
        #[arg(long, default_value = "5242880")]
        max_upload_bytes: usize,

        /// Maximum concurrent classifier requests per transcript
        #[arg(long, default_value = "4")]
        concurrency: usize,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            input,
            output,
            human_readable,
            concurrency,
            verbose,
        } => {
            setup_logging(verbose);
            analyze_file(input, output, human_readable, concurrency).await
        }
        Commands::Segment { input, verbose } => {
            setup_logging(verbose);
            segment_file(input)
        }
        Commands::Serve {
            host,
            port,
            max_upload_bytes,
            concurrency,
            verbose,
        } => {
            setup_logging(verbose);
            let config = ServerConfig {
                host,
                port,
                max_upload_bytes,
            };
            run_server(config, concurrency).await
        }
    }
}

fn setup_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn build_classifier() -> Result<InferenceClient> {
    let config = ClassifierConfig::from_env()?;
    info!("Using sentiment model {} at {}", config.model, config.api_url);
    InferenceClient::new(config)
}

async fn analyze_file(
    input: PathBuf,
    output: Option<PathBuf>,
    human_readable: Option<PathBuf>,
    concurrency: usize,
) -> Result<()> {
    info!("Loading transcript from {:?}", input);
    let transcript = read_transcript_file(&input)?;

    let classifier = build_classifier()?;
    let config = AnalysisConfig { concurrency };

    let report = analyze_transcript(&classifier, &transcript, &config)
        .await
        .context("Failed to analyze transcript")?;

    match output {
        Some(path) => {
            report.write_json(&path)?;
            info!("Report written to {:?}", path);
        }
        None => println!("{}", report.to_json_pretty()?),
    }

    if let Some(path) = human_readable {
        HumanReport::new(&report).write_file(&path)?;
        info!("Human-readable report written to {:?}", path);
    }

    info!(
        "Complete: {} ({} of {} statements classified)",
        report.overall_sentiment.overall_sentiment,
        report.metadata.classified_utterances,
        report.metadata.total_utterances
    );

    Ok(())
}

fn segment_file(input: PathBuf) -> Result<()> {
    info!("Segmenting transcript from {:?}", input);
    let transcript = read_transcript_file(&input)?;
    let conversation = segment(&transcript);

    if conversation.is_empty() {
        anyhow::bail!("No [Sales Agent] or [Customer] tags found in {:?}", input);
    }

    println!("Transcript Segments");
    println!("===================");
    println!("Utterances: {}", conversation.len());
    println!(
        "Sales Agent: {}, Customer: {}",
        conversation.count_for(Speaker::Agent),
        conversation.count_for(Speaker::Customer)
    );
    println!();

    for (index, utterance) in conversation.iter().enumerate() {
        println!("{:>3}. [{}] {}", index + 1, utterance.speaker, utterance.text);
    }

    Ok(())
}

async fn run_server(config: ServerConfig, concurrency: usize) -> Result<()> {
    let classifier = build_classifier()?;
    let state = AppState::new(Arc::new(classifier), AnalysisConfig { concurrency });
    callsense::server::serve(state, &config).await
}
