use clap::Parser;
use commit_rank::api::Error;
use commit_rank_app::Args;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Error> {
    dotenv::dotenv().ok();
    env_logger::init();

    let args = Args::parse();
    for author in commit_rank_app::rank_authors(args).await? {
        println!("{}", author);
    }

    Ok(())
}
