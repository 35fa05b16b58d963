use crate::api::Commit;
use std::collections::hash_map;
use std::collections::HashMap;
use std::ops::{Add, AddAssign};

/// Commits with this text anywhere in their message are merges and are not counted.
pub const MERGE_MARKER: &str = "Merge pull request";

/// Number of non-merge commits per author email.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct AuthorCounter {
    counts: HashMap<String, u64>,
}

impl AuthorCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_commits<'a>(commits: impl IntoIterator<Item = &'a Commit>) -> Self {
        let mut counter = Self::new();
        commits.into_iter().for_each(|commit| counter.record(commit));
        counter
    }

    /// Increments commit's author count, unless it is a merge commit.
    pub fn record(&mut self, commit: &Commit) {
        if is_merge(commit) {
            return;
        }
        *self.counts.entry(commit.author.email.clone()).or_insert(0) += 1;
    }

    pub fn get(&self, email: &str) -> u64 {
        self.counts.get(email).copied().unwrap_or(0)
    }

    /// Total of counted commits over all authors.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, String, u64> {
        self.counts.iter()
    }
}

fn is_merge(commit: &Commit) -> bool {
    commit.message.contains(MERGE_MARKER)
}

impl AddAssign for AuthorCounter {
    fn add_assign(&mut self, other: Self) {
        for (email, count) in other.counts {
            *self.counts.entry(email).or_insert(0) += count;
        }
    }
}

impl Add for AuthorCounter {
    type Output = AuthorCounter;

    fn add(mut self, other: Self) -> Self::Output {
        self += other;
        self
    }
}

impl<'a> IntoIterator for &'a AuthorCounter {
    type Item = (&'a String, &'a u64);
    type IntoIter = hash_map::Iter<'a, String, u64>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
