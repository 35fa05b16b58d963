use clap::Parser;
use commit_rank::report::DEFAULT_TOP;
use secrecy::SecretString;
use std::{
    fmt::{Debug, Display},
    str::FromStr,
};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// Organization which repositories are inspected
    #[clap(short, long, env)]
    pub organization: String,

    /// API OAuth access token
    #[clap(short = 't', long, env = "GITHUB_ACCESS_TOKEN")]
    pub api_token: SecretString,

    /// Repository API URL
    #[clap(long, env, default_value = "https://api.github.com")]
    pub api_url: String,

    /// Number of reported authors
    #[clap(short = 'n', long, env, default_value_t = DEFAULT_TOP, parse(try_from_str=top_in_range))]
    pub top: usize,
}

fn top_in_range(value: &str) -> clap::Result<usize, String> {
    number_in_range(value, 1, usize::MAX, "top".to_string())
}

fn number_in_range<T>(value: &str, min: T, max: T, name: String) -> clap::Result<T, String>
where
    T: FromStr + PartialOrd + Display,
    <T as FromStr>::Err: Display,
{
    value.parse::<T>().map_err(|err| format!("{}", err)).and_then(|value| {
        if value < min || value > max {
            return Err(format!("{} is not in range {} .. {}.", name, min, max));
        }
        Ok(value)
    })
}

#[test]
fn top_in_range_test() {
    assert_eq!(top_in_range("10"), Ok(10));
    assert!(top_in_range("0").is_err());
    assert!(top_in_range("-1").is_err());
    assert!(top_in_range("ten").is_err());
}

#[test]
fn args_test() {
    use secrecy::ExposeSecret;

    let args = Args::try_parse_from(["commit_rank", "--organization", "acme", "--api-token", "s3cr3t", "--top", "5"])
        .expect("valid arguments");
    assert_eq!(args.organization, "acme");
    assert_eq!(args.api_token.expose_secret(), "s3cr3t");
    assert_eq!(args.top, 5);
}
