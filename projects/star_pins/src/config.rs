use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
pub const DEFAULT_PINBOARD_API_URL: &str = "https://api.pinboard.in/v1";
pub const GITHUB_TOKEN_FILE: &str = ".github_oauth_token";
pub const PINBOARD_TOKEN_FILE: &str = ".pinboard_api_token";
/// Pinboard asks clients to wait this long between API calls.
pub const DEFAULT_WRITE_INTERVAL: Duration = Duration::from_secs(3);

#[derive(Clone)]
pub struct GitHubConfig {
    pub api_url: String,
    pub user: String,
    /// `None` means unauthenticated, with a much lower rate limit.
    pub token: Option<String>,
}

#[derive(Clone)]
pub struct PinboardConfig {
    pub api_url: String,
    pub token: String,
}

/// Everything a run needs, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub github: GitHubConfig,
    pub pinboard: PinboardConfig,
    pub write_interval: Duration,
}

/// Raw values from the command line or environment.
#[derive(Default)]
pub struct ConfigInput {
    pub github_user: String,
    pub github_token: Option<String>,
    pub pinboard_token: Option<String>,
    pub github_api_url: Option<String>,
    pub pinboard_api_url: Option<String>,
    pub write_interval: Option<Duration>,
}

impl Config {
    /// Explicit tokens win; otherwise the dotfiles in `token_dir` (usually
    /// the home directory) are read.
    pub fn resolve(input: ConfigInput, token_dir: Option<&Path>) -> Result<Self, ConfigError> {
        let user = input.github_user.trim().to_string();
        if user.is_empty() {
            return Err(ConfigError::EmptyGitHubUser);
        }

        let github_token = resolve_token(input.github_token, token_dir, GITHUB_TOKEN_FILE)?;

        let pinboard_token = resolve_token(input.pinboard_token, token_dir, PINBOARD_TOKEN_FILE)?
            .ok_or_else(|| ConfigError::MissingPinboardToken {
                path: token_dir.map(|dir| dir.join(PINBOARD_TOKEN_FILE)),
            })?;

        Ok(Self {
            github: GitHubConfig {
                api_url: input
                    .github_api_url
                    .unwrap_or_else(|| DEFAULT_GITHUB_API_URL.to_string()),
                user,
                token: github_token,
            },
            pinboard: PinboardConfig {
                api_url: input
                    .pinboard_api_url
                    .unwrap_or_else(|| DEFAULT_PINBOARD_API_URL.to_string()),
                token: pinboard_token,
            },
            write_interval: input.write_interval.unwrap_or(DEFAULT_WRITE_INTERVAL),
        })
    }
}

pub fn resolve_token(
    explicit: Option<String>,
    token_dir: Option<&Path>,
    file_name: &str,
) -> Result<Option<String>, ConfigError> {
    if let Some(token) = explicit.map(|t| t.trim().to_string()) {
        if !token.is_empty() {
            return Ok(Some(token));
        }
    }

    match token_dir {
        Some(dir) => load_token(&dir.join(file_name)),
        None => Ok(None),
    }
}

/// First line of `path`, trimmed. A missing or blank file yields `None`.
pub fn load_token(path: &Path) -> Result<Option<String>, ConfigError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::ReadTokenFile {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    Ok(contents
        .lines()
        .next()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string))
}

impl fmt::Debug for GitHubConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubConfig")
            .field("api_url", &self.api_url)
            .field("user", &self.user)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl fmt::Debug for PinboardConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PinboardConfig")
            .field("api_url", &self.api_url)
            .field("token", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("GitHub username must not be empty")]
    EmptyGitHubUser,

    #[error("No Pinboard API token: pass --pinboard-token, set PINBOARD_TOKEN{}", token_file_hint(.path))]
    MissingPinboardToken {
        path: Option<PathBuf>,
    },

    #[error("ReadTokenFile {}: {source}", .path.display())]
    ReadTokenFile {
        path: PathBuf,
        source: io::Error,
    },
}

fn token_file_hint(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" or write it to {}", p.display()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn input(user: &str) -> ConfigInput {
        ConfigInput {
            github_user: user.to_string(),
            ..ConfigInput::default()
        }
    }

    #[test]
    fn explicit_tokens_win_over_files() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(GITHUB_TOKEN_FILE), "from-file\n").unwrap();
        fs::write(dir.path().join(PINBOARD_TOKEN_FILE), "user:FILE\n").unwrap();

        let config = Config::resolve(
            ConfigInput {
                github_token: Some("gh-flag".into()),
                pinboard_token: Some("user:FLAG".into()),
                ..input("octocat")
            },
            Some(dir.path()),
        )
        .unwrap();

        assert_eq!(config.github.token.as_deref(), Some("gh-flag"));
        assert_eq!(config.pinboard.token, "user:FLAG");
    }

    #[test]
    fn tokens_fall_back_to_first_line_of_files() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(GITHUB_TOKEN_FILE), "  ghp_abc  \nignored\n").unwrap();
        fs::write(dir.path().join(PINBOARD_TOKEN_FILE), "user:123\n").unwrap();

        let config = Config::resolve(input("octocat"), Some(dir.path())).unwrap();

        assert_eq!(config.github.token.as_deref(), Some("ghp_abc"));
        assert_eq!(config.pinboard.token, "user:123");
        assert_eq!(config.github.api_url, DEFAULT_GITHUB_API_URL);
        assert_eq!(config.pinboard.api_url, DEFAULT_PINBOARD_API_URL);
        assert_eq!(config.write_interval, DEFAULT_WRITE_INTERVAL);
    }

    #[test]
    fn github_token_is_optional() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(PINBOARD_TOKEN_FILE), "user:123").unwrap();

        let config = Config::resolve(input("octocat"), Some(dir.path())).unwrap();
        assert!(config.github.token.is_none());
    }

    #[test]
    fn blank_flag_falls_back_to_file() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(PINBOARD_TOKEN_FILE), "user:123").unwrap();

        let token = resolve_token(Some("   ".into()), Some(dir.path()), PINBOARD_TOKEN_FILE).unwrap();
        assert_eq!(token.as_deref(), Some("user:123"));
    }

    #[test]
    fn missing_pinboard_token_names_the_file() {
        let dir = tempdir().unwrap();
        let err = Config::resolve(input("octocat"), Some(dir.path())).unwrap_err();

        assert!(matches!(err, ConfigError::MissingPinboardToken { .. }));
        assert!(err.to_string().contains(PINBOARD_TOKEN_FILE));
    }

    #[test]
    fn blank_token_file_counts_as_missing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(PINBOARD_TOKEN_FILE);
        fs::write(&path, "\n\n").unwrap();

        assert_eq!(load_token(&path).unwrap(), None);
    }

    #[test]
    fn unreadable_token_path_is_an_error() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(PINBOARD_TOKEN_FILE)).unwrap();

        let err = load_token(&dir.path().join(PINBOARD_TOKEN_FILE)).unwrap_err();
        assert!(matches!(err, ConfigError::ReadTokenFile { .. }));
    }

    #[test]
    fn empty_user_rejected() {
        let err = Config::resolve(
            ConfigInput {
                pinboard_token: Some("user:1".into()),
                ..input("  ")
            },
            None,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::EmptyGitHubUser));
    }

    #[test]
    fn debug_output_hides_tokens() {
        let config = Config::resolve(
            ConfigInput {
                github_token: Some("ghp_secret".into()),
                pinboard_token: Some("user:secret".into()),
                ..input("octocat")
            },
            None,
        )
        .unwrap();

        let debug = format!("{config:?}");
        assert!(!debug.contains("secret"));
        assert!(debug.contains("octocat"));
    }
}
