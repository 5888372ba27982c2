use std::io::Read;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;

use cleanmod::config::PolicyConfig;
use cleanmod::filter::{self, ApprovalState, Submission, SubmissionContext, TracingSink};
use cleanmod::moderation::{CleanModClient, Decision, Moderator};

/// CleanMod: remote moderation for user-submitted text.
///
/// Sends text to the CleanMod API and maps the decision (allow / flag /
/// block) to a publication state according to your configured policy.
#[derive(Parser)]
#[command(name = "cleanmod", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Moderate a piece of text and print the raw API decision
    Check {
        /// Text to moderate (reads stdin when omitted)
        text: Option<String>,
    },

    /// Run the full approval filter against the configured policy
    Evaluate {
        /// Submission text (reads stdin when omitted)
        text: Option<String>,

        /// Tentative approval state going in (approved, pending, spam, trash)
        #[arg(long, default_value = "pending")]
        state: String,

        /// Treat the call as an admin bulk action (passes through)
        #[arg(long)]
        admin_bulk: bool,
    },

    /// Show the loaded policy without calling the API
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
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("cleanmod=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check { text } => {
            let policy = PolicyConfig::load();
            policy.require_api_key()?;

            let text = read_text(text)?;
            let client = CleanModClient::with_base_url(&policy.api_key, &policy.base_url)?
                .with_model(&policy.model);

            let result = client.moderate(&text).await?;
            match result.decision {
                Decision::Allow => println!("{}", "allow".green()),
                Decision::Flag => println!("{}", "flag".yellow()),
                Decision::Block => println!("{}", "block".red()),
                Decision::Unknown(raw) => {
                    println!("{} {}", raw, "(unrecognized decision)".dimmed())
                }
            }
        }

        Commands::Evaluate {
            text,
            state,
            admin_bulk,
        } => {
            let policy = PolicyConfig::load();
            let current = parse_state(&state)?;
            let submission = Submission::new(read_text(text)?);
            let context = if admin_bulk {
                SubmissionContext::AdminBulk
            } else {
                SubmissionContext::PublicSubmission
            };

            let client = CleanModClient::with_base_url(&policy.api_key, &policy.base_url)?
                .with_model(&policy.model);

            let outcome =
                filter::evaluate(&submission, current, &policy, context, &client, &TracingSink)
                    .await;

            if outcome == current {
                println!("{} (unchanged)", outcome.as_str());
            } else {
                println!(
                    "{} {} {}",
                    current.as_str().dimmed(),
                    "→".dimmed(),
                    outcome.as_str().bold()
                );
            }
        }

        Commands::Status => {
            let policy = PolicyConfig::load();
            println!(
                "Moderation: {}",
                if policy.enabled {
                    "enabled".green()
                } else {
                    "disabled".red()
                }
            );
            println!(
                "API key: {}",
                if policy.api_key.is_empty() {
                    "not set".red()
                } else {
                    "configured".green()
                }
            );
            println!("Endpoint: {}", policy.base_url);
            println!("Model: {}", policy.model);
            println!("On flag: {}", policy.on_flag.as_str());
            println!("On block: {}", policy.on_block.as_str());

            if policy.api_key.is_empty() {
                println!(
                    "\n{}",
                    "Set CLEANMOD_API_KEY in your .env file to start moderating.".dimmed()
                );
            }
        }
    }

    Ok(())
}

/// Take text from the argument or, when absent, from stdin.
fn read_text(arg: Option<String>) -> Result<String> {
    match arg {
        Some(text) => Ok(text),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn parse_state(raw: &str) -> Result<ApprovalState> {
    match raw {
        "approved" => Ok(ApprovalState::Approved),
        "pending" | "hold" => Ok(ApprovalState::Hold),
        "spam" => Ok(ApprovalState::Spam),
        "trash" => Ok(ApprovalState::Trash),
        other => anyhow::bail!(
            "unknown approval state '{other}' (expected approved, pending, spam, or trash)"
        ),
    }
}
