//! Normalized commit records built from raw history pages.
use std::collections::BTreeSet;

use log::*;

use crate::forge::github::{AuthorNode, CommitNode, HistoryPage};

/// A single changelog entry candidate: one commit of the branch history and
/// the pull request it was merged through, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub sha: String,
    pub message_headline: String,
    pub timestamp: String,
    /// `0` when no pull request is linked.
    pub pr_number: u64,
    pub pr_title: String,
    pub pr_labels: BTreeSet<String>,
    /// Login when the author maps to a platform user, email otherwise.
    pub authors: BTreeSet<String>,
}

impl Commit {
    /// Builds a commit from a raw history node. The first associated pull
    /// request is treated as canonical.
    pub fn from_node(node: &CommitNode) -> Self {
        let authors = node
            .authors
            .nodes
            .iter()
            .filter_map(author_id)
            .collect::<BTreeSet<String>>();

        if authors.is_empty() {
            warn!("commit {} is missing authors", node.oid);
        }

        let (pr_number, pr_title, pr_labels) =
            match node.associated_pull_requests.nodes.first() {
                Some(pr) => (
                    pr.number,
                    pr.title.clone(),
                    pr.labels.nodes.iter().map(|l| l.name.clone()).collect(),
                ),
                None => {
                    warn!(
                        "commit {} has no associated pull request: {}",
                        node.oid, node.message_headline
                    );
                    (0, missing_pr_title(node), BTreeSet::new())
                }
            };

        Self {
            sha: node.oid.clone(),
            message_headline: node.message_headline.clone(),
            timestamp: node.committed_date.clone(),
            pr_number,
            pr_title,
            pr_labels,
            authors,
        }
    }

    pub fn has_pr(&self) -> bool {
        self.pr_number != 0
    }

    /// Checks whether every one of `labels` is applied to the pull request.
    pub fn has_labels<S: AsRef<str>>(&self, labels: &[S]) -> bool {
        labels.iter().all(|l| self.pr_labels.contains(l.as_ref()))
    }

    /// Renders the markdown changelog line for this commit.
    pub fn change_line(&self, pull_url_base: &str) -> String {
        format!(
            "{} ([#{}]({}/{}))",
            self.pr_title, self.pr_number, pull_url_base, self.pr_number
        )
    }
}

fn author_id(author: &AuthorNode) -> Option<String> {
    let login = author
        .user
        .as_ref()
        .and_then(|u| u.login.as_deref())
        .filter(|l| !l.is_empty());

    let email = author.email.as_deref().filter(|e| !e.is_empty());

    login.or(email).map(str::to_string)
}

fn missing_pr_title(node: &CommitNode) -> String {
    format!(
        "{} (MISSING PR for commit {})",
        node.message_headline, node.oid
    )
}

/// Flattens history pages into commits, preserving traversal order.
pub fn normalize(pages: &[HistoryPage]) -> Vec<Commit> {
    pages
        .iter()
        .flat_map(|page| page.nodes.iter())
        .map(Commit::from_node)
        .collect()
}
