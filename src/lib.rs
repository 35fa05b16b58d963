use commit_rank::api::{Result, FIRST_PAGE, MAX_PAGE_SIZE};
use commit_rank::{CommitCollector, RankedAuthor};
use github_client::GithubClientBuilder;
use log::info;

pub use args::Args;

mod args;

/// Ranks authors of `args.organization` by their commits, up to `args.top` of them.
pub async fn rank_authors(args: Args) -> Result<Vec<RankedAuthor>> {
    let client = GithubClientBuilder::default()
        .with_github_url(args.api_url)
        .try_with_user_agent(concat!("commit_rank/", env!("CARGO_PKG_VERSION")))?
        .try_with_token(args.api_token)?
        .build()?;

    info!("Ranking commit authors of {}", args.organization);
    let collector = CommitCollector::<MAX_PAGE_SIZE, FIRST_PAGE, _>::new(client);
    collector.rank(&args.organization, args.top).await
}
