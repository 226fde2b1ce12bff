use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use safecomms::output::terminal;
use safecomms::{ClientConfig, ImageModerationRequest, SafeCommsClient, TextModerationRequest};

/// SafeComms: content moderation from the command line.
///
/// Reads SAFECOMMS_API_KEY (and optionally SAFECOMMS_BASE_URL) from the
/// environment or a .env file.
#[derive(Parser)]
#[command(name = "safecomms", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Moderate a piece of text
    Text {
        /// The text to moderate
        content: String,

        /// Language of the content (default: en)
        #[arg(long)]
        language: Option<String>,

        /// Return the content with flagged words replaced
        #[arg(long)]
        replace: bool,

        /// Detect personally identifiable information
        #[arg(long)]
        pii: bool,

        /// Minimum severity that gets replaced (with --replace)
        #[arg(long)]
        replace_severity: Option<String>,

        /// Moderation profile to apply
        #[arg(long)]
        profile: Option<String>,

        /// Print the raw JSON response
        #[arg(long)]
        json: bool,
    },

    /// Moderate an image by URL, data URI or local file path
    Image {
        /// http(s) URL, data: URI, or path to a local image file
        image: String,

        /// Language for any text in the image (default: en)
        #[arg(long)]
        language: Option<String>,

        /// Moderation profile to apply
        #[arg(long)]
        profile: Option<String>,

        /// Print the raw JSON response
        #[arg(long)]
        json: bool,
    },

    /// Show your tier, rate limit and token usage
    Usage {
        /// Print the raw JSON response
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("safecomms=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = ClientConfig::from_env();
    config.require_api_key()?;
    let client = SafeCommsClient::new(config).context("Failed to build SafeComms client")?;
    info!(base_url = client.base_url(), "Using SafeComms endpoint");

    match cli.command {
        Commands::Text {
            content,
            language,
            replace,
            pii,
            replace_severity,
            profile,
            json,
        } => {
            // Flags left off stay unset so the client's defaults apply
            let request = TextModerationRequest {
                content,
                language,
                replace: replace.then_some(true),
                pii: pii.then_some(true),
                replace_severity,
                moderation_profile_id: profile,
            };
            let result = report(client.moderate_text(request).await);
            print_result(&result, json, terminal::display_moderation)?;
        }

        Commands::Image {
            image,
            language,
            profile,
            json,
        } => {
            let outcome = if is_remote_image(&image) {
                let request = ImageModerationRequest {
                    image,
                    language,
                    moderation_profile_id: profile,
                };
                client.moderate_image(request).await
            } else {
                client
                    .moderate_image_file(&image, language.as_deref(), profile.as_deref())
                    .await
            };
            let result = report(outcome);
            print_result(&result, json, terminal::display_moderation)?;
        }

        Commands::Usage { json } => {
            let usage = report(client.get_usage().await);
            print_result(&usage, json, terminal::display_usage)?;
        }
    }

    Ok(())
}

/// URLs and data URIs go to the API as-is; anything else is a local path.
fn is_remote_image(image: &str) -> bool {
    ["http://", "https://", "data:"]
        .iter()
        .any(|prefix| image.starts_with(prefix))
}

/// Print a failed call's details and exit non-zero.
fn report<T>(outcome: safecomms::Result<T>) -> T {
    match outcome {
        Ok(value) => value,
        Err(e) => {
            terminal::display_error(&e);
            std::process::exit(1);
        }
    }
}

fn print_result<T: serde::Serialize>(value: &T, json: bool, display: fn(&T)) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        display(value);
    }
    Ok(())
}
