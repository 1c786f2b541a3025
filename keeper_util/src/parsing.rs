use thiserror::Error;

use url::Url;

#[derive(Debug, Clone, Error)]
pub enum ParsingError {
    #[error("URL parse error: {0}")]
    UrlError(#[from] url::ParseError),
    #[error("Not a web URL: {0}")]
    NotWebUrl(String),
}

type Result<T> = std::result::Result<T, ParsingError>;

/// Parse an absolute `http` or `https` URL.
/// Forum listings put placeholders like `self` or `default` where a URL is expected, these are rejected.
pub fn parse_web_url(s: &str) -> Result<Url> {
    let url = Url::parse(s.trim())?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(ParsingError::NotWebUrl(s.to_string())),
    }
}

/// Keep the value only if it is a web URL. The value is kept as given, not normalized.
pub fn web_url_or_none(s: Option<&str>) -> Option<String> {
    s.filter(|s| parse_web_url(s).is_ok()).map(str::to_string)
}
