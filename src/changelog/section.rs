//! Changelog sections and the label rules that route commits into them.
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

use crate::changelog::commit::Commit;

/// Changelog buckets. Declaration order is the display order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    #[strum(to_string = "FIXME: Please Categorize")]
    ToFix,
    #[strum(to_string = "New Features")]
    NewFeatures,
    #[strum(to_string = "Table Changes")]
    Table,
    #[strum(to_string = "Under the Hood improvements")]
    UnderTheHood,
    #[strum(to_string = "Bug Fixes")]
    BugFixes,
    #[strum(to_string = "Documentation")]
    Documentation,
    #[strum(to_string = "Build")]
    Build,
    #[strum(to_string = "Security Issues")]
    Security,
    #[strum(to_string = "Hardening")]
    Hardening,
}

impl Section {
    /// All sections in display order.
    pub fn ordered() -> impl Iterator<Item = Section> {
        Section::iter()
    }
}

/// Routes commits carrying all of `labels` into `section`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionRule {
    pub labels: Vec<String>,
    pub section: Section,
}

impl SectionRule {
    pub fn new(labels: &[&str], section: Section) -> Self {
        Self {
            labels: labels.iter().map(|l| l.to_string()).collect(),
            section,
        }
    }

    pub fn matches(&self, commit: &Commit) -> bool {
        commit.has_labels(self.labels.as_slice())
    }
}

/// Default routing: only documentation is classified automatically,
/// everything else waits for manual curation.
pub fn default_rules() -> Vec<SectionRule> {
    vec![SectionRule::new(&["documentation"], Section::Documentation)]
}

/// Ordered rule list. The first matching rule wins; commits matching no rule
/// land in [`Section::ToFix`].
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Vec<SectionRule>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(default_rules())
    }
}

impl Classifier {
    pub fn new(rules: Vec<SectionRule>) -> Self {
        Self { rules }
    }

    pub fn classify(&self, commit: &Commit) -> Section {
        self.rules
            .iter()
            .find(|r| r.matches(commit))
            .map(|r| r.section)
            .unwrap_or(Section::ToFix)
    }
}
