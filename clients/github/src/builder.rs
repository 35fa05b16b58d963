use crate::GithubClient;
use commit_rank::api::Result;
use reqwest::header;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderName;
use reqwest::header::HeaderValue;
use reqwest::ClientBuilder;
use secrecy::ExposeSecret;
use url::Url;

pub const GITHUB_URL: &str = "https://api.github.com";

pub struct GithubClientBuilder {
    client_builder: ClientBuilder,
    github_url: String,
    headers: HeaderMap,
}

impl Default for GithubClientBuilder {
    fn default() -> Self {
        let mut headers = HeaderMap::default();
        headers.insert(header::USER_AGENT, HeaderValue::from_static("commit_rank"));
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/vnd.github.v3+json"));
        Self {
            client_builder: ClientBuilder::default(),
            github_url: GITHUB_URL.to_string(),
            headers,
        }
    }
}

impl GithubClientBuilder {
    /// Sends `token` as a bearer token with every request.
    pub fn try_with_token(self, token: secrecy::SecretString) -> Result<GithubClientBuilder> {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
            .map_err(|_| commit_rank::api::Error::Error("API token is not a valid header value."))?;
        value.set_sensitive(true);
        Ok(self.with_header_value(header::AUTHORIZATION, value))
    }

    pub fn try_with_user_agent<STR: AsRef<str>>(self, user_agent: STR) -> Result<GithubClientBuilder> {
        Ok(self.try_with_header(header::USER_AGENT, user_agent)?)
    }

    pub fn with_github_url<STR: AsRef<str>>(mut self, url: STR) -> GithubClientBuilder {
        self.github_url = url.as_ref().trim_end_matches('/').to_string();
        self
    }

    fn try_with_header(self, key: HeaderName, val: impl AsRef<str>) -> anyhow::Result<GithubClientBuilder> {
        let val = HeaderValue::from_str(val.as_ref())?;
        Ok(self.with_header_value(key, val))
    }

    fn with_header_value(mut self, key: HeaderName, val: HeaderValue) -> GithubClientBuilder {
        self.headers.insert(key, val);
        self
    }

    pub fn build(self) -> Result<GithubClient> {
        Url::parse(&self.github_url).map_err(anyhow::Error::from)?;
        let client = self.client_builder.default_headers(self.headers).build()?;
        Ok(GithubClient {
            client,
            github_url: self.github_url,
        })
    }
}

#[test]
fn build_rejects_invalid_url_test() {
    let client = GithubClientBuilder::default().with_github_url("not a url").build();
    assert!(client.is_err());
}

#[test]
fn user_agent_test() -> anyhow::Result<()> {
    let builder = GithubClientBuilder::default();
    assert_eq!(builder.headers.get(header::USER_AGENT).expect("default user agent").to_str()?, "commit_rank");

    let builder = builder.try_with_user_agent("commit_rank/0.0.1")?;
    assert_eq!(builder.headers.get(header::USER_AGENT).expect("user agent").to_str()?, "commit_rank/0.0.1");
    assert!(GithubClientBuilder::default().try_with_user_agent("bad\nagent").is_err());
    Ok(())
}

#[test]
fn token_sent_as_bearer_test() -> anyhow::Result<()> {
    let builder = GithubClientBuilder::default().try_with_token(secrecy::SecretString::new("s3cr3t".to_string()))?;
    let authorization = builder.headers.get(header::AUTHORIZATION).expect("authorization header");
    assert_eq!(authorization.to_str()?, "Bearer s3cr3t");
    assert!(authorization.is_sensitive());
    Ok(())
}
