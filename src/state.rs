use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::SqlitePool;

use crate::{cache::FragmentCache, config::Config};

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Config,
    /// Rendered post list fragments of the index page.
    pub index_cache: Arc<FragmentCache>,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: Config) -> Self {
        let index_cache = Arc::new(FragmentCache::new(std::time::Duration::from_secs(
            config.index_cache_seconds,
        )));
        Self {
            pool,
            config,
            index_cache,
        }
    }
}

impl FromRef<AppState> for SqlitePool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for Arc<FragmentCache> {
    fn from_ref(state: &AppState) -> Self {
        state.index_cache.clone()
    }
}
