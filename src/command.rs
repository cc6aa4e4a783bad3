//! The release-notes pipeline: fetch, normalize, deduplicate, render.
use std::{io::Write, path::Path};

use log::*;

use crate::{
    changelog::{
        commit::{Commit, normalize},
        renderer::{ReleaseVersions, RenderConfig, Renderer},
        section::Classifier,
        seen::SeenPrs,
    },
    cli::Args,
    config::Config,
    error::Result,
    forge::github::Github,
};

/// Everything a single run needs besides the query client.
#[derive(Debug, Clone)]
pub struct NotesRequest<'a> {
    pub versions: ReleaseVersions,
    pub changelog_path: &'a Path,
    pub config: &'a Config,
}

/// Parses configuration, queries GitHub and writes the snippet to stdout.
pub async fn execute(args: &Args) -> Result<()> {
    args.validate()?;

    let config = Config::load(args.config.as_deref())?;
    let remote = args.get_remote(&config)?;

    info!(
        "drafting release notes for {} ({} -> {})",
        remote.full_name(),
        args.last,
        args.new
    );

    let github = Github::new(remote)?;

    let request = NotesRequest {
        versions: ReleaseVersions {
            last: args.last.clone(),
            new: args.new.clone(),
        },
        changelog_path: Path::new(&args.changelog),
        config: &config,
    };

    let mut stdout = std::io::stdout().lock();
    generate(&github, &request, &mut stdout).await
}

/// Runs the pipeline against `github` and writes the rendered snippet to
/// `out`. Nothing is written unless every step succeeds.
pub async fn generate<W: Write>(
    github: &Github,
    request: &NotesRequest<'_>,
    out: &mut W,
) -> Result<()> {
    let remote = github.remote_config();

    let since = github
        .resolve_baseline_timestamp(&request.versions.last)
        .await?;

    let pages = github.fetch_history(&since).await?;
    let commits: Vec<Commit> = normalize(&pages);

    let missing = commits.iter().filter(|c| !c.has_pr()).count();
    if missing > 0 {
        warn!("{missing} commits have no associated pull request");
    }

    let seen =
        SeenPrs::from_path(request.changelog_path, &remote.pull_url_base())?;

    let renderer = Renderer::new(
        RenderConfig {
            template: request.config.template.clone(),
            repo_url: remote.repo_url(),
            pull_url_base: remote.pull_url_base(),
            show_contributors: request.config.show_contributors,
            skip_empty_sections: request.config.skip_empty_sections,
        },
        Classifier::new(request.config.rules.clone()),
    );

    renderer.write_to(out, &commits, &seen, &request.versions)
}
