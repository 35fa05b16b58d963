use crate::counter::AuthorCounter;
use derive_more::Constructor;
use std::fmt::Display;

pub const DEFAULT_TOP: usize = 100;

#[derive(Debug, PartialEq, Eq, Constructor)]
pub struct RankedAuthor {
    pub rank: usize,
    pub email: String,
    pub count: u64,
}

impl Display for RankedAuthor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}) {} - {}", self.rank, self.email, self.count)
    }
}

/// Returns at most `top` authors ordered by commit count descending, ties by email ascending.
/// Ranks start from 1.
pub fn report(counter: &AuthorCounter, top: usize) -> Vec<RankedAuthor> {
    let mut authors: Vec<(&String, &u64)> = counter.iter().collect();
    authors.sort_by(|(email_a, count_a), (email_b, count_b)| {
        count_b.cmp(count_a).then_with(|| email_a.cmp(email_b))
    });
    authors
        .into_iter()
        .take(top)
        .enumerate()
        .map(|(i, (email, count))| RankedAuthor::new(i + 1, email.to_string(), *count))
        .collect()
}

/// Tests

#[cfg(test)]
fn counter_of(authors: &[(&str, u64)]) -> AuthorCounter {
    use crate::api::{Commit, CommitAuthor};
    use chrono::Utc;

    let commits: Vec<Commit> = authors
        .iter()
        .flat_map(|(email, count)| {
            (0..*count).map(move |i| {
                let author = CommitAuthor::new(email.to_string(), email.to_string(), Utc::now());
                Commit::new(format!("commit {}", i), author)
            })
        })
        .collect();
    AuthorCounter::from_commits(&commits)
}

#[test]
fn report_sorted_desc_test() {
    let counter = counter_of(&[("b@x", 2), ("a@x", 5), ("c@x", 3)]);
    let report = report(&counter, DEFAULT_TOP);
    assert_eq!(
        report,
        vec![
            RankedAuthor::new(1, "a@x".to_string(), 5),
            RankedAuthor::new(2, "c@x".to_string(), 3),
            RankedAuthor::new(3, "b@x".to_string(), 2),
        ]
    );
}

#[test]
fn report_ties_by_email_test() {
    let counter = counter_of(&[("zed@x", 1), ("amy@x", 1), ("max@x", 4)]);
    let emails: Vec<String> = report(&counter, DEFAULT_TOP).into_iter().map(|r| r.email).collect();
    assert_eq!(emails, vec!["max@x", "amy@x", "zed@x"]);
}

#[test]
fn report_top_test() {
    let counter = counter_of(&[("a@x", 4), ("b@x", 3), ("c@x", 2), ("d@x", 1)]);
    let report = report(&counter, 2);
    assert_eq!(report.len(), 2);
    assert_eq!(report.iter().map(|r| r.rank).collect::<Vec<_>>(), vec![1, 2]);
    assert_eq!(report[1].email, "b@x");
}

#[test]
fn report_fewer_authors_than_top_test() {
    let counter = counter_of(&[("a@x", 1)]);
    assert_eq!(report(&counter, DEFAULT_TOP).len(), 1);
    assert!(report(&AuthorCounter::new(), DEFAULT_TOP).is_empty());
}

#[test]
fn ranked_author_display_test() {
    let ranked = RankedAuthor::new(1, "alice@example.com".to_string(), 2);
    assert_eq!(ranked.to_string(), "1) alice@example.com - 2");
}
