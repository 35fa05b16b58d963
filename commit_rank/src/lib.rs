//! Commit ranking
//!
//! # Overview
//!
//! Ranks the authors of an organization's repositories by the number of commits they made.
//!
//! Library lists every repository of the organization (`GET /orgs/{org}/repos`), then fetches all commits of each
//! repository (`GET /repos/{org}/{repo}/commits`) and counts them per author email.
//! Merge commits, i.e. commits with "Merge pull request" anywhere in their message, are not counted.
//! Authors are reported ordered by their commit count, the most active first.
//!
//! Both collections are paginated. Repositories pages are known upfront from the organization's repository count,
//! commit pages are known from the link header of the first page. Remaining pages are requested all at once.

pub mod api;
#[cfg(feature = "collector")]
pub mod collector;
pub mod counter;
pub mod report;

#[cfg(feature = "collector")]
pub use collector::CommitCollector;
pub use counter::AuthorCounter;
pub use report::{report, RankedAuthor};
