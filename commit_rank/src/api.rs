use async_trait::async_trait;
use chrono::{DateTime, Utc};
use derive_more::Constructor;
use thiserror::Error;

/// Maximal page size accepted by the API.
pub const MAX_PAGE_SIZE: u32 = 100;

pub const FIRST_PAGE: u32 = 1;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Error: {0}")]
    Error(&'static str),
    #[error("Request error: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("Malformed pagination header: {0}")]
    MalformedLinkHeader(String),
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Constructor)]
pub struct CommitAuthor {
    pub name: String,
    pub email: String,
    pub date: DateTime<Utc>,
}

/// Commit as recorded by git. Repository level data (sha, parents) is not kept.
#[derive(Debug, Clone, PartialEq, Constructor)]
pub struct Commit {
    pub message: String,
    pub author: CommitAuthor,
}

/// Single page of a paginated collection.
#[derive(Debug, PartialEq, Constructor)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Number of the last page, if the response advertised one.
    pub last_page: Option<u32>,
}

impl<T> Page<T> {
    /// Page returned in place of an error object body.
    pub fn empty() -> Self {
        Page::new(Vec::new(), None)
    }
}

#[async_trait]
pub trait Client<const MAX_PAGE: u32, const FIRST_PAGE_NUMBER: u32>: Send + Sync {
    async fn public_repos_count(&self, org: &str) -> Result<u32>;

    async fn repos(&self, org: &str, page: u32, per_page: u32) -> Result<Page<String>>;

    async fn commits(&self, org: &str, repo: &str, page: u32, per_page: u32) -> Result<Page<Commit>>;
}
