use crate::api::{Client, Commit, Error, Page, Result};
use crate::counter::AuthorCounter;
use crate::report::{report, RankedAuthor};
use futures::future::try_join_all;
use futures::stream::FuturesUnordered;
use futures::TryStreamExt;
use log::{debug, error, info};

/// Collects commits of every repository of an organization and counts them per author.
///
/// All page requests of a stage are in flight at once and are driven from the calling task,
/// there is no spawning and no limit on outstanding requests.
pub struct CommitCollector<const MAX_PAGE: u32, const FIRST_PAGE_NUMBER: u32, CLIENT>
where
    CLIENT: Client<MAX_PAGE, FIRST_PAGE_NUMBER>,
{
    client: CLIENT,
}

impl<const MAX_PAGE: u32, const FIRST_PAGE_NUMBER: u32, CLIENT> CommitCollector<MAX_PAGE, FIRST_PAGE_NUMBER, CLIENT>
where
    CLIENT: Client<MAX_PAGE, FIRST_PAGE_NUMBER>,
{
    pub fn new(client: CLIENT) -> Self {
        CommitCollector { client }
    }

    /// Ranks `org` authors by their non-merge commits, returning the first `top` of them.
    pub async fn rank(&self, org: &str, top: usize) -> Result<Vec<RankedAuthor>> {
        let counter = self.count_authors(org).await?;
        Ok(report(&counter, top))
    }

    pub async fn count_authors(&self, org: &str) -> Result<AuthorCounter> {
        let repos = self.list_repositories(org).await?;
        info!("Counting commits of {} repositories of {}", repos.len(), org);
        let counter = repos
            .iter()
            .map(|repo| self.repo_counter(org, repo))
            .collect::<FuturesUnordered<_>>()
            .try_fold(AuthorCounter::new(), |mut total, counter| async move {
                total += counter;
                Ok(total)
            })
            .await?;
        info!("Counted {} commits of {} authors", counter.total(), counter.len());
        Ok(counter)
    }

    async fn repo_counter(&self, org: &str, repo: &str) -> Result<AuthorCounter> {
        let commits = self.list_commits(org, repo).await?;
        Ok(AuthorCounter::from_commits(&commits))
    }

    /// Names of all `org` repositories, in no particular order.
    pub async fn list_repositories(&self, org: &str) -> Result<Vec<String>> {
        let repos_count = self.client.public_repos_count(org).await?;
        let pages = page_count(repos_count, MAX_PAGE);
        debug!("Organization {} has {} repositories on {} pages", org, repos_count, pages);
        let pages = (FIRST_PAGE_NUMBER..FIRST_PAGE_NUMBER + pages)
            .map(|page| self.client.repos(org, page, MAX_PAGE))
            .collect::<FuturesUnordered<_>>();
        pages
            .try_fold(Vec::new(), |mut repos, page| async move {
                repos.extend(page.items);
                Ok(repos)
            })
            .await
    }

    /// All commits of `repo`, ordered by page.
    ///
    /// The first page tells how many pages there are, the remaining ones are requested together.
    pub async fn list_commits(&self, org: &str, repo: &str) -> Result<Vec<Commit>> {
        let first_page = self
            .client
            .commits(org, repo, FIRST_PAGE_NUMBER, MAX_PAGE)
            .await
            .map_err(|err| log_fatal(org, repo, err))?;
        let Page { items: mut commits, last_page } = first_page;
        let last_page = last_page.unwrap_or(FIRST_PAGE_NUMBER);
        debug!("Repository {}/{} has {} commit pages", org, repo, last_page);

        let next_pages = try_join_all(
            (FIRST_PAGE_NUMBER + 1..=last_page).map(|page| self.client.commits(org, repo, page, MAX_PAGE)),
        )
        .await?;
        commits.extend(next_pages.into_iter().flat_map(|page| page.items));
        Ok(commits)
    }
}

fn log_fatal(org: &str, repo: &str, err: Error) -> Error {
    if let Error::MalformedLinkHeader(header) = &err {
        error!("Unexpected link header for {}/{}: {}", org, repo, header);
    }
    err
}

/// Number of pages needed to list `count` items.
fn page_count(count: u32, max_page_size: u32) -> u32 {
    count.div_ceil(max_page_size)
}

/// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{CommitAuthor, FIRST_PAGE, MAX_PAGE_SIZE};
    use async_trait::async_trait;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::Mutex;

    type Collector = CommitCollector<MAX_PAGE_SIZE, FIRST_PAGE, MemoryClient>;

    /// Serves pages from memory and records every requested page.
    #[derive(Default)]
    struct MemoryClient {
        repos_count: u32,
        repo_pages: HashMap<u32, Vec<String>>,
        commit_pages: HashMap<(String, u32), Page<Commit>>,
        malformed_header: Option<String>,
        requests: Mutex<Vec<String>>,
    }

    impl MemoryClient {
        fn with_commit_page(mut self, repo: &str, page: u32, commits: Vec<Commit>, last_page: Option<u32>) -> Self {
            self.commit_pages
                .insert((repo.to_string(), page), Page::new(commits, last_page));
            self
        }

        fn requests(&self) -> Vec<String> {
            let mut requests = self.requests.lock().unwrap().clone();
            requests.sort();
            requests
        }
    }

    #[async_trait]
    impl Client<MAX_PAGE_SIZE, FIRST_PAGE> for MemoryClient {
        async fn public_repos_count(&self, org: &str) -> Result<u32> {
            self.requests.lock().unwrap().push(format!("/orgs/{}", org));
            Ok(self.repos_count)
        }

        async fn repos(&self, org: &str, page: u32, per_page: u32) -> Result<Page<String>> {
            assert_eq!(per_page, MAX_PAGE_SIZE);
            self.requests
                .lock()
                .unwrap()
                .push(format!("/orgs/{}/repos?page={}", org, page));
            Ok(self
                .repo_pages
                .get(&page)
                .map(|repos| Page::new(repos.clone(), None))
                .unwrap_or_else(Page::empty))
        }

        async fn commits(&self, org: &str, repo: &str, page: u32, per_page: u32) -> Result<Page<Commit>> {
            assert_eq!(per_page, MAX_PAGE_SIZE);
            self.requests
                .lock()
                .unwrap()
                .push(format!("/repos/{}/{}/commits?page={}", org, repo, page));
            if let Some(header) = &self.malformed_header {
                return Err(Error::MalformedLinkHeader(header.clone()));
            }
            Ok(self
                .commit_pages
                .get(&(repo.to_string(), page))
                .map(|page| Page::new(page.items.clone(), page.last_page))
                .unwrap_or_else(Page::empty))
        }
    }

    fn commits(email: &str, messages: &[&str]) -> Vec<Commit> {
        messages
            .iter()
            .map(|message| {
                let author = CommitAuthor::new("name".to_string(), email.to_string(), Utc::now());
                Commit::new(message.to_string(), author)
            })
            .collect()
    }

    fn repo_names(from: u32, to: u32) -> Vec<String> {
        (from..to).map(|i| format!("repo_{}", i)).collect()
    }

    #[test]
    fn page_count_test() {
        assert_eq!(page_count(0, 100), 0);
        assert_eq!(page_count(1, 100), 1);
        assert_eq!(page_count(100, 100), 1);
        assert_eq!(page_count(101, 100), 2);
        assert_eq!(page_count(250, 100), 3);
        assert_eq!(page_count(u32::MAX, 100), 42_949_673);
    }

    #[tokio::test]
    async fn lists_repositories_from_all_pages() {
        let client = MemoryClient {
            repos_count: 250,
            repo_pages: HashMap::from([
                (1, repo_names(0, 100)),
                (2, repo_names(100, 200)),
                (3, repo_names(200, 250)),
            ]),
            ..Default::default()
        };
        let collector = Collector::new(client);

        let mut repos = collector.list_repositories("acme").await.unwrap();
        repos.sort();
        let mut expected = repo_names(0, 250);
        expected.sort();
        assert_eq!(repos, expected);
        assert_eq!(
            collector.client.requests(),
            vec![
                "/orgs/acme",
                "/orgs/acme/repos?page=1",
                "/orgs/acme/repos?page=2",
                "/orgs/acme/repos?page=3",
            ]
        );
    }

    #[tokio::test]
    async fn no_repositories_requests_only_metadata() {
        let collector = Collector::new(MemoryClient::default());
        let repos = collector.list_repositories("acme").await.unwrap();
        assert!(repos.is_empty());
        assert_eq!(collector.client.requests(), vec!["/orgs/acme"]);
    }

    #[tokio::test]
    async fn lists_commits_up_to_last_page_in_page_order() {
        let client = MemoryClient::default()
            .with_commit_page("repo", 1, commits("a@x", &["1a", "1b"]), Some(5))
            .with_commit_page("repo", 2, commits("a@x", &["2a"]), None)
            .with_commit_page("repo", 3, commits("a@x", &["3a", "3b", "3c"]), None)
            .with_commit_page("repo", 4, commits("a@x", &["4a"]), None)
            .with_commit_page("repo", 5, commits("a@x", &["5a"]), None);
        let collector = Collector::new(client);

        let commits = collector.list_commits("acme", "repo").await.unwrap();
        let messages: Vec<&str> = commits.iter().map(|c| c.message.as_str()).collect();
        assert_eq!(messages, vec!["1a", "1b", "2a", "3a", "3b", "3c", "4a", "5a"]);
        assert_eq!(collector.client.requests().len(), 5);
    }

    #[tokio::test]
    async fn last_page_of_later_pages_is_ignored() {
        let client = MemoryClient::default()
            .with_commit_page("repo", 1, commits("a@x", &["1a"]), Some(3))
            .with_commit_page("repo", 2, commits("a@x", &["2a"]), Some(9))
            .with_commit_page("repo", 3, commits("a@x", &["3a"]), Some(1));
        let collector = Collector::new(client);

        let commits = collector.list_commits("acme", "repo").await.unwrap();
        assert_eq!(commits.len(), 3);
        assert_eq!(
            collector.client.requests(),
            vec![
                "/repos/acme/repo/commits?page=1",
                "/repos/acme/repo/commits?page=2",
                "/repos/acme/repo/commits?page=3",
            ]
        );
    }

    #[tokio::test]
    async fn single_page_without_last_page() {
        let client = MemoryClient::default().with_commit_page("repo", 1, commits("a@x", &["1a"]), None);
        let collector = Collector::new(client);

        let commits = collector.list_commits("acme", "repo").await.unwrap();
        assert_eq!(commits.len(), 1);
        assert_eq!(collector.client.requests(), vec!["/repos/acme/repo/commits?page=1"]);
    }

    #[tokio::test]
    async fn unavailable_first_page_yields_no_commits() {
        let collector = Collector::new(MemoryClient::default());
        let commits = collector.list_commits("acme", "missing").await.unwrap();
        assert!(commits.is_empty());
        assert_eq!(collector.client.requests(), vec!["/repos/acme/missing/commits?page=1"]);
    }

    #[tokio::test]
    async fn malformed_header_is_fatal() {
        let client = MemoryClient {
            malformed_header: Some("garbage".to_string()),
            ..Default::default()
        };
        let collector = Collector::new(client);
        let result = collector.list_commits("acme", "repo").await;
        assert!(matches!(result, Err(Error::MalformedLinkHeader(header)) if header == "garbage"));
    }

    #[tokio::test]
    async fn ranks_authors_over_all_repositories() {
        let client = MemoryClient {
            repos_count: 2,
            repo_pages: HashMap::from([(1, vec!["a".to_string(), "b".to_string()])]),
            ..Default::default()
        }
        .with_commit_page("a", 1, commits("alice@example.com", &["a1", "a2"]), Some(2))
        .with_commit_page("a", 2, commits("bob@example.com", &["Merge pull request #1 from x"]), None)
        .with_commit_page("b", 1, commits("bob@example.com", &["b1"]), None);
        let collector = Collector::new(client);

        let ranked = collector.rank("acme", 100).await.unwrap();
        let lines: Vec<String> = ranked.iter().map(ToString::to_string).collect();
        assert_eq!(lines, vec!["1) alice@example.com - 2", "2) bob@example.com - 1"]);
    }
}
