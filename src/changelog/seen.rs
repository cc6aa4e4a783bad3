//! Extraction of pull request numbers already published in a changelog.
use std::{
    collections::HashSet,
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use log::*;
use regex::Regex;

use crate::error::{ReleaseNotesError, Result};

/// Pull request numbers that must not be emitted again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeenPrs {
    numbers: HashSet<u64>,
}

impl SeenPrs {
    /// Reads `path` and collects every pull request referenced through
    /// `<pull_url_base>/<number>` links.
    pub fn from_path(path: &Path, pull_url_base: &str) -> Result<Self> {
        let file = File::open(path).map_err(|err| {
            ReleaseNotesError::Io(io::Error::new(
                err.kind(),
                format!("failed to open {}: {err}", path.display()),
            ))
        })?;

        let seen = Self::from_reader(BufReader::new(file), pull_url_base)?;

        info!(
            "found {} previously published pull requests in {}",
            seen.len(),
            path.display()
        );

        Ok(seen)
    }

    /// Scans `reader` line by line. Only links under `pull_url_base` count;
    /// other numbers in the text are ignored.
    pub fn from_reader<R: BufRead>(
        reader: R,
        pull_url_base: &str,
    ) -> Result<Self> {
        let pattern = format!(r"{}/(\d+)", regex::escape(pull_url_base));
        let pr_regex = Regex::new(&pattern)?;

        let mut numbers = HashSet::new();

        for line in reader.lines() {
            let line = line?;
            for captures in pr_regex.captures_iter(&line) {
                let number = captures[1].parse::<u64>()?;
                numbers.insert(number);
            }
        }

        Ok(Self { numbers })
    }

    pub fn contains(&self, number: u64) -> bool {
        self.numbers.contains(&number)
    }

    /// Returns `true` when `number` was not seen before.
    pub fn insert(&mut self, number: u64) -> bool {
        self.numbers.insert(number)
    }

    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }
}

impl FromIterator<u64> for SeenPrs {
    fn from_iter<I: IntoIterator<Item = u64>>(iter: I) -> Self {
        Self {
            numbers: iter.into_iter().collect(),
        }
    }
}
