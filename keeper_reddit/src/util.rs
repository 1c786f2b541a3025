use keeper_core::{Error, Post};
use reddit_client::{self as client};

pub(crate) fn post(post: &client::PostResult) -> Post {
    Post {
        id: post.id.clone(),
        title: post.title.clone(),
        author: post.author.clone(),
        url: post.url.clone().filter(|url| !url.is_empty()),
        thumbnail: keeper_util::web_url_or_none(post.thumbnail.as_deref()),
    }
}

/// Translate a client failure, `context` names what was being fetched.
pub(crate) fn fetch_error(context: impl Into<String>, err: client::Error) -> Error {
    match err {
        client::Error::StatusError { status, reason } => Error::RequestError {
            context: context.into(),
            status,
            reason,
        },
        client::Error::JSONError(e) => Error::ParseError(e.to_string()),
        client::Error::NetworkError(e) => Error::NetworkError(e.to_string()),
        other => Error::Other(anyhow::Error::from(other)),
    }
}
