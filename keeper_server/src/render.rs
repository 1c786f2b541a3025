//! HTML rendering of the view snapshot.
//!
//! The page is rebuilt from a snapshot on every request. Actions are plain form posts,
//! so the page works without any script.

use maud::{html, Markup, PreEscaped, DOCTYPE};

use keeper_core::Post;
use keeper_view::ViewSnapshot;

pub const PAGE_TITLE: &str = "Reddit Post Viewer";

/// Seconds between reloads while something is still loading.
const REFRESH_SECONDS: u32 = 1;

const STYLE: &str = r#"
body { font-family: sans-serif; max-width: 48rem; margin: 0 auto; padding: 1rem; }
ul { list-style: none; padding: 0; }
li { border-bottom: 1px solid #ddd; padding: 0.5rem 0; }
.error { color: #b00020; }
.favourite-button[disabled] { opacity: 0.6; }
"#;

/// Hides a thumbnail that fails to load.
const HIDE_ON_ERROR: &str = "this.onerror=null;this.style.display='none';";

pub fn page(snapshot: &ViewSnapshot) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                @if snapshot.is_loading() {
                    meta http-equiv="refresh" content=(REFRESH_SECONDS);
                }
                title { (PAGE_TITLE) }
                style { (PreEscaped(STYLE)) }
            }
            body {
                h1 { (PAGE_TITLE) }
                (search_form(&snapshot.search_term))

                @if snapshot.loading {
                    p.loading { "Loading posts..." }
                }
                @if let Some(error) = &snapshot.error {
                    p.error { "Error: " (error) }
                }
                ul.posts {
                    @for post in &snapshot.posts {
                        (result_item(post, snapshot.is_bookmarked(&post.id)))
                    }
                }

                h1 { "Your Favourited Posts" }
                @if snapshot.loading_bookmarks {
                    p.loading { "Loading Favourites..." }
                }
                @if snapshot.bookmarks.is_empty() && !snapshot.loading_bookmarks {
                    h2 { "Favourite a post to start saving!" }
                }
                ul.bookmarks {
                    @for post in &snapshot.bookmarks {
                        (bookmark_item(post))
                    }
                }
            }
        }
    }
}

fn search_form(term: &str) -> Markup {
    html! {
        form method="post" action="/search" {
            input type="text" name="subreddit" placeholder="Enter subreddit" value=(term);
            button type="submit" { "Search" }
        }
    }
}

fn result_item(post: &Post, bookmarked: bool) -> Markup {
    html! {
        li.post id={ "post-" (post.id) } {
            h2 { (post.title) }
            p { "By: " (post.author) }
            (post_link(post))
            @if let Some(thumbnail) = &post.thumbnail {
                img src=(thumbnail) alt="" style="max-width: 200px" onerror=(HIDE_ON_ERROR);
            }
            form method="post" action={ "/bookmarks/" (post.id) "/add" } {
                @if bookmarked {
                    button type="submit" class="favourite-button" disabled { "Favourited" }
                } @else {
                    button type="submit" class="favourite-button" { "Save To Favourites" }
                }
            }
        }
    }
}

fn bookmark_item(post: &Post) -> Markup {
    html! {
        li.bookmark id={ "bookmark-" (post.id) } {
            form method="post" action={ "/bookmarks/" (post.id) "/remove" } {
                button type="submit" class="favourite-button" { "Remove" }
            }
            h2 { (post.title) }
            p { "By: " (post.author) }
            (post_link(post))
            @if let Some(thumbnail) = &post.thumbnail {
                img src=(thumbnail) alt=(post.title) style="max-width: 200px" onerror=(HIDE_ON_ERROR);
            }
        }
    }
}

fn post_link(post: &Post) -> Markup {
    html! {
        @if let Some(url) = &post.url {
            a href=(url) target="_blank" rel="noopener noreferrer" { p { "Link" } }
        }
    }
}
