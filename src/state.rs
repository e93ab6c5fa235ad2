use crate::config::SiteConfig;
use crate::errors::StoreError;
use crate::github::GitHubContents;
use crate::storage::ContentStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    /// `None` when the server was started without repository settings.
    pub store: Option<Arc<dyn ContentStore>>,
    pub conflict_retries: u32,
}

impl AppState {
    pub fn new(store: Option<Arc<dyn ContentStore>>, conflict_retries: u32) -> Self {
        Self {
            store,
            conflict_retries,
        }
    }

    pub fn from_config(config: &SiteConfig) -> Result<Self, StoreError> {
        let store = match config.github.clone() {
            Some(github) => Some(Arc::new(GitHubContents::new(github)?) as Arc<dyn ContentStore>),
            None => None,
        };
        Ok(Self::new(store, config.conflict_retries))
    }
}
