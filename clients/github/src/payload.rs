use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Listing response: either the requested entries or an error object such as `{"message": "Not Found"}`.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub enum ListBody<T> {
    Items(Vec<T>),
    Error(ErrorBody),
}

#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub enum OrganizationBody {
    Organization(Organization),
    Error(ErrorBody),
}

#[derive(Deserialize, Debug)]
pub struct ErrorBody {
    pub message: String,
}

#[derive(Deserialize, Debug)]
pub struct Organization {
    pub public_repos: u32,
}

#[derive(Deserialize, Debug)]
pub struct Repo {
    pub name: String,
}

#[derive(Deserialize, Debug)]
pub struct CommitEntry {
    pub commit: Commit,
}

#[derive(Deserialize, Debug)]
pub struct Commit {
    pub message: String,
    pub author: CommitAuthor,
}

#[derive(Deserialize, Debug)]
pub struct CommitAuthor {
    pub name: String,
    pub email: String,
    pub date: DateTime<Utc>,
}

impl From<CommitEntry> for commit_rank::api::Commit {
    fn from(entry: CommitEntry) -> Self {
        let author = entry.commit.author;
        commit_rank::api::Commit::new(
            entry.commit.message,
            commit_rank::api::CommitAuthor::new(author.name, author.email, author.date),
        )
    }
}

#[test]
fn commit_entry_test() -> anyhow::Result<()> {
    let body = r#"[{
        "sha": "6dcb09b5b57875f334f61aebed695e2e4193db5e",
        "commit": {
            "author": { "name": "Alice", "email": "alice@example.com", "date": "2011-04-14T16:00:49Z" },
            "message": "Fix all the bugs"
        },
        "parents": []
    }]"#;
    let body: ListBody<CommitEntry> = serde_json::from_str(body)?;
    let commits = match body {
        ListBody::Items(entries) => entries.into_iter().map(commit_rank::api::Commit::from).collect::<Vec<_>>(),
        ListBody::Error(err) => panic!("Unexpected error body: {}", err.message),
    };
    assert_eq!(commits.len(), 1);
    assert_eq!(commits[0].message, "Fix all the bugs");
    assert_eq!(commits[0].author.email, "alice@example.com");
    assert_eq!(commits[0].author.date.to_rfc3339(), "2011-04-14T16:00:49+00:00");
    Ok(())
}

#[test]
fn error_body_test() -> anyhow::Result<()> {
    let body: ListBody<Repo> = serde_json::from_str(r#"{"message": "Not Found", "documentation_url": "x"}"#)?;
    assert!(matches!(body, ListBody::Error(ErrorBody { message }) if message == "Not Found"));

    let body: OrganizationBody = serde_json::from_str(r#"{"login": "acme", "public_repos": 250}"#)?;
    assert!(matches!(body, OrganizationBody::Organization(Organization { public_repos: 250 })));
    Ok(())
}
