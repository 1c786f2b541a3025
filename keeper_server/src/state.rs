use std::sync::Arc;

use keeper_core::PostSource;
use keeper_view::ViewController;

/// The controller behind every route. Any post source works, Reddit in production.
pub type Controller = ViewController<Arc<dyn PostSource>>;

#[derive(Clone)]
pub struct AppState {
    pub controller: Controller,
}
