use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use projects_star_pins::config::{Config, ConfigError, ConfigInput};
use projects_star_pins::pipeline::{run, RunError};
use projects_star_pins::stages::write_bookmarks::index::WriteSummary;
use thiserror::Error;
use tracing::debug;

#[derive(Parser)]
#[command(
    name = "star_pins",
    version,
    about = "Bookmark your GitHub stars on Pinboard",
    long_about = "Adds starred GitHub repositories as Pinboard bookmarks tagged 'github-star'\n\
        and the repository's language. Only stars newer than the most recent\n\
        'github-star' bookmark are added, so re-running is safe.\n\n\
        Tokens may be stored in ~/.github_oauth_token and ~/.pinboard_api_token\n\
        instead of being passed on the command line."
)]
struct Cli {
    /// GitHub username whose stars are listed
    #[arg(short = 'u', long)]
    github_user: String,

    /// GitHub API token (default: ~/.github_oauth_token, else unauthenticated)
    #[arg(short = 'g', long, env = "GITHUB_TOKEN", hide_env_values = true)]
    github_token: Option<String>,

    /// Pinboard API token, `user:TOKEN` (default: ~/.pinboard_api_token)
    #[arg(short = 'p', long, env = "PINBOARD_TOKEN", hide_env_values = true)]
    pinboard_token: Option<String>,

    /// Seconds to wait between Pinboard writes
    #[arg(long, default_value_t = 3)]
    write_interval_secs: u64,

    #[arg(long, env = "GITHUB_API_URL", hide = true)]
    github_api_url: Option<String>,

    #[arg(long, env = "PINBOARD_API_URL", hide = true)]
    pinboard_api_url: Option<String>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl From<Cli> for ConfigInput {
    fn from(cli: Cli) -> Self {
        Self {
            github_user: cli.github_user,
            github_token: cli.github_token,
            pinboard_token: cli.pinboard_token,
            github_api_url: cli.github_api_url,
            pinboard_api_url: cli.pinboard_api_url,
            write_interval: Some(Duration::from_secs(cli.write_interval_secs)),
        }
    }
}

#[derive(Debug, Error)]
pub enum MainError {
    #[error("LoadDotenv: {source}")]
    LoadDotenv {
        source: dotenvy::Error,
    },

    #[error("TracingInit: {source}")]
    TracingInit {
        #[source]
        source: utils_trace::TracingInitError,
    },

    #[error(transparent)]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error(transparent)]
    Run {
        #[from]
        source: RunError,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Lets GITHUB_TOKEN / PINBOARD_TOKEN come from a .env file.
    if let Err(err) = allow_missing(dotenvy::dotenv()) {
        eprintln!("[ERROR] {err}");
        return ExitCode::FAILURE;
    }
    let cli = Cli::parse();

    match start(cli).await {
        Ok(summary) => {
            println!(
                "{} bookmark(s) added, {} failed",
                summary.created, summary.failed
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("[ERROR] {err}");
            ExitCode::FAILURE
        }
    }
}

/// A missing `.env` is fine; an unreadable or malformed one is not.
fn allow_missing<T>(loaded: dotenvy::Result<T>) -> Result<(), MainError> {
    match loaded {
        Ok(_) => Ok(()),
        Err(err) if err.not_found() => Ok(()),
        Err(source) => Err(MainError::LoadDotenv { source }),
    }
}

async fn start(cli: Cli) -> Result<WriteSummary, MainError> {
    utils_trace::init(&cli.log_level).map_err(|source| MainError::TracingInit { source })?;

    let home = dirs::home_dir();
    let config = Config::resolve(cli.into(), home.as_deref())?;
    debug!(?config, "configuration resolved");

    Ok(run(&config).await?)
}
