mod controller;
mod persist;
mod state;

#[cfg(test)]
mod test;

pub use controller::{ViewController, DEFAULT_PAGE_SIZE};
pub use state::ViewSnapshot;
