use std::path::PathBuf;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use sentiscope::config::Config;

/// Sentiscope: sentiment and bot-likelihood enrichment for scraped Instagram data.
///
/// Reads scraper JSON, labels text with a pretrained sentiment model, scores
/// the profile with a pretrained bot classifier and writes an enriched report.
#[derive(Parser)]
#[command(name = "sentiscope", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a profile and its posts into an account report
    Account {
        /// Scraped profile JSON (one object)
        profile: PathBuf,
        /// Scraped posts JSON (array)
        posts: PathBuf,
        /// Where to write the account report
        output: PathBuf,
    },

    /// Classify the sentiment of a scraped comment list
    Comments {
        /// Scraped comments JSON (array)
        input: PathBuf,
        /// Where to write the classified comments
        output: PathBuf,
    },

    /// Tally a previously written comment sentiment file
    Summarize {
        /// Output of the `comments` command
        input: PathBuf,

        /// How many of the most negative comments to show
        #[arg(long, default_value = "5")]
        show_negative: usize,
    },

    /// Download the pretrained sentiment model
    DownloadModel,

    /// Show where models are expected and whether they are present
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("sentiscope=info")),
        )
        .init();

    let cli = parse_cli();

    match cli.command {
        Commands::Account {
            profile,
            posts,
            output,
        } => {
            let config = Config::load()?;
            config.require_sentiment_model()?;
            config.require_bot_model()?;

            println!("Reading profile from: {}", profile.display());

            let classifier = create_classifier(&config)?;
            let detector = create_detector(&config)?;

            let report = sentiscope::pipeline::account::run(
                &profile,
                &posts,
                &output,
                classifier.as_ref(),
                detector.as_ref(),
            )
            .await?;

            sentiscope::output::terminal::display_account_report(&report);
            println!(
                "\n{}",
                format!("Processed file created: {}", output.display()).bold()
            );
        }

        Commands::Comments { input, output } => {
            let config = Config::load()?;
            config.require_sentiment_model()?;

            println!("Reading comments from: {}", input.display());

            let classifier = create_classifier(&config)?;
            let results =
                sentiscope::pipeline::comments::run(&input, &output, classifier.as_ref()).await?;

            let summary = sentiscope::report::summary::SentimentSummary::from_comments(&results);
            println!("\n{}", "=== Comment sentiment ===".bold());
            sentiscope::output::terminal::display_summary(&summary);
            println!(
                "\n{}",
                format!("Sentiment file created: {}", output.display()).bold()
            );
        }

        Commands::Summarize {
            input,
            show_negative,
        } => {
            let (comments, summary) = sentiscope::pipeline::summarize_file(&input)?;

            println!(
                "\n{}",
                format!("=== {} comments in {} ===", summary.total(), input.display()).bold()
            );
            sentiscope::output::terminal::display_summary(&summary);
            sentiscope::output::terminal::display_negative_comments(&comments, show_negative);
        }

        Commands::DownloadModel => {
            let config = Config::load()?;

            println!("Downloading sentiment model...");
            println!("  Source: {}", config.sentiment_url);
            println!("  Destination: {}", config.sentiment_dir.display());

            sentiscope::sentiment::download::download_model(
                &config.sentiment_url,
                &config.sentiment_dir,
            )
            .await?;

            println!("\n{}", "Model downloaded successfully.".bold());
            println!("You can now run `sentiscope comments` or `sentiscope account`.");
        }

        Commands::Status => {
            let config = Config::load()?;
            sentiscope::status::show(&config);
        }
    }

    Ok(())
}

/// Parse arguments. Usage errors exit with status 1; help and version
/// output exit normally.
fn parse_cli() -> Cli {
    match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
            _ => {
                let _ = e.print();
                std::process::exit(1);
            }
        },
    }
}

/// Load the local ONNX sentiment classifier.
fn create_classifier(
    config: &Config,
) -> Result<Box<dyn sentiscope::sentiment::traits::SentimentClassifier>> {
    info!("Using local ONNX sentiment classifier");
    let classifier = sentiscope::sentiment::onnx::OnnxSentimentClassifier::load(
        &config.sentiment_dir,
        config.max_tokens,
        config.batch_size,
    )?;
    Ok(Box::new(classifier))
}

/// Load the bot detection scaler and classifier.
fn create_detector(config: &Config) -> Result<Box<dyn sentiscope::bot::traits::BotDetector>> {
    info!("Using local ONNX bot detector");
    let detector = sentiscope::bot::onnx::OnnxBotDetector::load(
        &config.bot_model_path,
        &config.bot_scaler_path,
    )?;
    Ok(Box::new(detector))
}
