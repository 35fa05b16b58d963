use commit_rank::api::{Error, Result};
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderValue, LINK};
use url::Url;

lazy_static! {
    static ref LAST_LINK: Regex = Regex::new(r#"<([^>]*)>;\s*rel="last""#).expect("valid regex");
}

/// Reads the last page number from the `link` header.
///
/// Missing header means there is a single page. A header without a `rel="last"` link carrying
/// a numeric `page` parameter is an error.
pub fn last_page(headers: &HeaderMap<HeaderValue>) -> Result<Option<u32>> {
    match headers.get(LINK) {
        None => Ok(None),
        Some(link) => {
            let malformed = || Error::MalformedLinkHeader(String::from_utf8_lossy(link.as_bytes()).into_owned());
            let link = link.to_str().map_err(|_| malformed())?;
            parse_last_page(link).map(Some).ok_or_else(malformed)
        }
    }
}

fn parse_last_page(link: &str) -> Option<u32> {
    let url = LAST_LINK.captures(link)?.get(1)?.as_str();
    let url = Url::parse(url).ok()?;
    let page = url
        .query_pairs()
        .find_map(|(key, value)| (key == "page").then(|| value.into_owned()))?;
    page.parse().ok()
}

#[test]
fn last_page_test() {
    let link = r#"<https://api.github.com/repositories/1/commits?per_page=100&page=2>; rel="next", <https://api.github.com/repositories/1/commits?per_page=100&page=5>; rel="last""#;
    assert_eq!(parse_last_page(link), Some(5));

    let link = r#"<https://api.example/repos/acme/a/commits?page=12&per_page=100>; rel="last""#;
    assert_eq!(parse_last_page(link), Some(12));
}

#[test]
fn malformed_link_test() {
    let no_last = r#"<https://api.github.com/repositories/1/commits?page=1>; rel="prev""#;
    assert_eq!(parse_last_page(no_last), None);
    assert_eq!(parse_last_page("garbage"), None);
    assert_eq!(parse_last_page(r#"<https://api.example/commits?page=x>; rel="last""#), None);
    assert_eq!(parse_last_page(r#"<https://api.example/commits>; rel="last""#), None);
}

#[test]
fn header_test() -> anyhow::Result<()> {
    let mut headers = HeaderMap::new();
    assert_eq!(last_page(&headers)?, None);

    headers.insert(
        LINK,
        HeaderValue::from_static(r#"<https://api.example/commits?page=3>; rel="last""#),
    );
    assert_eq!(last_page(&headers)?, Some(3));

    headers.insert(LINK, HeaderValue::from_static("garbage"));
    assert!(matches!(last_page(&headers), Err(Error::MalformedLinkHeader(link)) if link == "garbage"));
    Ok(())
}
