//! Markdown rendering of the grouped changelog snippet.
use std::{
    collections::{BTreeMap, BTreeSet},
    io::Write,
};

use log::*;
use serde::Serialize;

use crate::{
    changelog::{
        commit::Commit,
        section::{Classifier, Section},
        seen::SeenPrs,
    },
    error::Result,
};

/// Default changelog snippet template.
pub const DEFAULT_TEMPLATE: &str = r#"
<a name="{{ new_version }}"></a>
## [{{ new_version }}]({{ release_link }})

[Git Commits]({{ compare_link }})
{% if show_contributors %}
Representing commits from {{ author_count }} contributors! Thank you all.
{% endif %}
{%- for section in sections %}
### {{ section.name }}
{% for line in section.lines %}
- {{ line }}
{%- endfor %}
{% endfor %}
"#;

/// Settings controlling how the snippet is rendered.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Tera template for the snippet.
    pub template: String,
    /// Web URL of the repository, used for release and compare links.
    pub repo_url: String,
    /// Prefix of pull request links.
    pub pull_url_base: String,
    /// Renders the contributor count sentence.
    pub show_contributors: bool,
    /// Omits sections without lines instead of rendering a bare header.
    pub skip_empty_sections: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            template: DEFAULT_TEMPLATE.into(),
            repo_url: "".into(),
            pull_url_base: "".into(),
            show_contributors: true,
            skip_empty_sections: false,
        }
    }
}

/// Previous and upcoming release names.
#[derive(Debug, Clone)]
pub struct ReleaseVersions {
    pub last: String,
    pub new: String,
}

#[derive(Debug, Serialize)]
struct SectionContext {
    name: String,
    lines: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ChangelogContext {
    new_version: String,
    last_version: String,
    release_link: String,
    compare_link: String,
    author_count: String,
    show_contributors: bool,
    sections: Vec<SectionContext>,
}

/// Deduplicates, classifies and renders commits into a markdown snippet.
pub struct Renderer {
    config: RenderConfig,
    classifier: Classifier,
}

impl Renderer {
    pub fn new(config: RenderConfig, classifier: Classifier) -> Self {
        Self { config, classifier }
    }

    /// Buckets changelog lines by section, skipping pull requests found in
    /// `seen` as well as repeats within `commits`. Commits without a pull
    /// request are never deduplicated.
    pub fn group(
        &self,
        commits: &[Commit],
        seen: &SeenPrs,
    ) -> BTreeMap<Section, Vec<String>> {
        let mut seen = seen.clone();
        let mut grouped: BTreeMap<Section, Vec<String>> = BTreeMap::new();

        for commit in commits.iter() {
            if commit.has_pr() && !seen.insert(commit.pr_number) {
                debug!(
                    "skipping already published pull request #{}",
                    commit.pr_number
                );
                continue;
            }

            let section = self.classifier.classify(commit);

            grouped
                .entry(section)
                .or_default()
                .push(commit.change_line(&self.config.pull_url_base));
        }

        grouped
    }

    /// Renders the snippet for `versions`. Identical inputs always produce
    /// identical output.
    pub fn render(
        &self,
        commits: &[Commit],
        seen: &SeenPrs,
        versions: &ReleaseVersions,
    ) -> Result<String> {
        let mut grouped = self.group(commits, seen);

        let sections = Section::ordered()
            .map(|section| SectionContext {
                name: section.to_string(),
                lines: grouped.remove(&section).unwrap_or_default(),
            })
            .filter(|s| {
                !(self.config.skip_empty_sections && s.lines.is_empty())
            })
            .collect::<Vec<SectionContext>>();

        let context = ChangelogContext {
            new_version: versions.new.clone(),
            last_version: versions.last.clone(),
            release_link: format!(
                "{}/releases/tag/{}",
                self.config.repo_url, versions.new
            ),
            compare_link: format!(
                "{}/compare/{}...{}",
                self.config.repo_url, versions.last, versions.new
            ),
            author_count: format_count(count_authors(commits)),
            show_contributors: self.config.show_contributors,
            sections,
        };

        let context = tera::Context::from_serialize(&context)?;
        let rendered =
            tera::Tera::one_off(&self.config.template, &context, false)?;

        Ok(rendered)
    }

    /// Renders into `out`. Nothing is written when rendering fails.
    pub fn write_to<W: Write>(
        &self,
        out: &mut W,
        commits: &[Commit],
        seen: &SeenPrs,
        versions: &ReleaseVersions,
    ) -> Result<()> {
        let rendered = self.render(commits, seen, versions)?;
        out.write_all(rendered.as_bytes())?;
        out.flush()?;
        Ok(())
    }
}

/// Number of distinct authors across all commits, published or not.
pub fn count_authors(commits: &[Commit]) -> usize {
    commits
        .iter()
        .flat_map(|c| c.authors.iter())
        .collect::<BTreeSet<&String>>()
        .len()
}

/// Formats `n` with comma thousands separators, e.g. 1234 -> "1,234".
pub fn format_count(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out
}

#[cfg(test)]
#[path = "./renderer_tests.rs"]
mod tests;
