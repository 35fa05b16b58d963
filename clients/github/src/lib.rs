use async_trait::async_trait;
use commit_rank::api::{Commit, Error, Page, Result, FIRST_PAGE, MAX_PAGE_SIZE};
use log::{debug, warn};
use payload::{CommitEntry, ListBody, OrganizationBody, Repo};
use reqwest::header::HeaderMap;
use reqwest::Client;
use serde::de::DeserializeOwned;

mod builder;
mod link;
mod payload;

pub use builder::GithubClientBuilder;
pub use builder::GITHUB_URL;

pub struct GithubClient {
    client: Client,
    github_url: String,
}

impl GithubClient {
    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, u32)]) -> Result<(T, HeaderMap)> {
        let request_url = format!("{}{}", self.github_url, path);
        debug!("GET {} {:?}", request_url, query);
        let response = self.client.get(request_url).query(query).send().await?;
        read_response(response).await
    }

    async fn get_page<T: DeserializeOwned>(&self, path: &str, page: u32, per_page: u32) -> Result<(ListBody<T>, HeaderMap)> {
        self.get(path, &[("per_page", per_page), ("page", page)]).await
    }
}

pub(crate) async fn read_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<(T, HeaderMap)> {
    let headers = response.headers().clone();
    let body = response.json::<T>().await?;
    Ok((body, headers))
}

#[async_trait]
impl commit_rank::api::Client<MAX_PAGE_SIZE, FIRST_PAGE> for GithubClient {
    async fn public_repos_count(&self, org: &str) -> Result<u32> {
        let (body, _) = self.get::<OrganizationBody>(&format!("/orgs/{}", org), &[]).await?;
        match body {
            OrganizationBody::Organization(organization) => Ok(organization.public_repos),
            OrganizationBody::Error(err) => Err(Error::UnexpectedResponse(format!(
                "organization {}: {}",
                org, err.message
            ))),
        }
    }

    async fn repos(&self, org: &str, page: u32, per_page: u32) -> Result<Page<String>> {
        let path = format!("/orgs/{}/repos", org);
        let (body, _) = self.get_page::<Repo>(&path, page, per_page).await?;
        match body {
            ListBody::Items(repos) => Ok(Page::new(repos.into_iter().map(|repo| repo.name).collect(), None)),
            ListBody::Error(err) => {
                warn!("No repositories on page {} of {}: {}", page, org, err.message);
                Ok(Page::empty())
            }
        }
    }

    async fn commits(&self, org: &str, repo: &str, page: u32, per_page: u32) -> Result<Page<Commit>> {
        let path = format!("/repos/{}/{}/commits", org, repo);
        let (body, headers) = self.get_page::<CommitEntry>(&path, page, per_page).await?;
        match body {
            ListBody::Items(entries) => {
                // Only the first page tells the page count, later ones may link just to prev/first.
                let last_page = if page == FIRST_PAGE { link::last_page(&headers)? } else { None };
                Ok(Page::new(entries.into_iter().map(Commit::from).collect(), last_page))
            }
            ListBody::Error(err) => {
                warn!("No commits on page {} of {}/{}: {}", page, org, repo, err.message);
                Ok(Page::empty())
            }
        }
    }
}
