//! CLI argument parsing and remote repository configuration.
use std::{env, path::PathBuf};

use clap::Parser;
use git_url_parse::{GitUrl, Scheme};
use secrecy::SecretString;

use crate::{
    config::Config,
    error::{ReleaseNotesError, Result},
    forge::config::{DEFAULT_BRANCH, DEFAULT_REPO_URL, RemoteConfig},
};

/// Environment variable consulted when `--github-token` is not given.
pub const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Drafts a changelog snippet from the pull requests merged since the last
/// release.
#[derive(Parser, Debug, Clone, Default)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(long, default_value = "")]
    /// Last release (tag, branch or sha) to collect commits from.
    pub last: String,

    #[arg(long, default_value = "")]
    /// New release version used in the rendered heading.
    pub new: String,

    #[arg(long, default_value = "")]
    /// Existing changelog file. Pull requests already listed there are
    /// skipped.
    pub changelog: String,

    #[arg(long, default_value = "")]
    /// GitHub personal access token. Falls back to GITHUB_TOKEN env var.
    pub github_token: String,

    #[arg(long)]
    /// Repository URL (https://github.com/owner/repo). Defaults to the config
    /// file value, then https://github.com/osquery/osquery.
    pub repo: Option<String>,

    #[arg(long)]
    /// Branch whose history is walked. Defaults to the repository default
    /// branch.
    pub branch: Option<String>,

    #[arg(long)]
    /// Configuration file. Defaults to release-notes.toml when present.
    pub config: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    /// Enable debug logging.
    pub debug: bool,
}

impl Args {
    /// Token from the cli, falling back to the GITHUB_TOKEN env var.
    pub fn token(&self) -> String {
        if !self.github_token.is_empty() {
            return self.github_token.clone();
        }

        env::var(GITHUB_TOKEN_ENV).unwrap_or_default()
    }

    /// Checks that every required value is non-empty, reporting all missing
    /// flags at once.
    pub fn validate(&self) -> Result<()> {
        let token = self.token();

        let missing = [
            ("last", self.last.as_str()),
            ("new", self.new.as_str()),
            ("changelog", self.changelog.as_str()),
            ("github-token", token.as_str()),
        ]
        .iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(flag, _)| format!("--{flag}"))
        .collect::<Vec<String>>();

        if !missing.is_empty() {
            return Err(ReleaseNotesError::InvalidArgs(format!(
                "missing required flag: {}",
                missing.join(", ")
            )));
        }

        Ok(())
    }

    /// Configure the remote repository connection from cli arguments, the
    /// config file and defaults, in that order of precedence.
    pub fn get_remote(&self, config: &Config) -> Result<RemoteConfig> {
        let repo_url = self
            .repo
            .as_deref()
            .or(config.repo.as_deref())
            .unwrap_or(DEFAULT_REPO_URL);

        let branch = self
            .branch
            .as_deref()
            .or(config.branch.as_deref())
            .unwrap_or(DEFAULT_BRANCH);

        let parsed = GitUrl::parse(repo_url)?;

        validate_scheme(&parsed.scheme)?;

        let host = parsed.host.clone().ok_or_else(|| {
            ReleaseNotesError::invalid_config(format!(
                "unable to parse host from repo: {repo_url}"
            ))
        })?;

        let owner = parsed.owner.clone().ok_or_else(|| {
            ReleaseNotesError::invalid_config(format!(
                "unable to parse owner from repo: {repo_url}"
            ))
        })?;

        Ok(RemoteConfig {
            host,
            port: parsed.port,
            scheme: parsed.scheme.to_string(),
            owner,
            repo: parsed.name,
            token: SecretString::from(self.token()),
            branch: branch.to_string(),
            page_size: config.page_size,
        })
    }
}

/// Validate repository URL uses HTTP or HTTPS scheme.
fn validate_scheme(scheme: &Scheme) -> Result<()> {
    match scheme {
        Scheme::Http | Scheme::Https => Ok(()),
        _ => Err(ReleaseNotesError::invalid_config(
            "only http and https schemes are supported for repo urls",
        )),
    }
}
