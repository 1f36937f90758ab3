use std::sync::Arc;

use crate::auth::TokenKeys;
use crate::store::Store;

/// Shared per-request context handed to every handler through axum `State`
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub tokens: TokenKeys,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, tokens: TokenKeys) -> Self {
        Self { store, tokens }
    }
}
