mod source;
mod util;


pub use source::RedditSource;
