use crate::domain::config::SiteConfig;
use crate::domain::ports::ConfigSource;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory holder for the page configuration.
///
/// Uses `Arc<RwLock<Option<SiteConfig>>>`; clones share the same document.
/// Ideal for testing or for serving a configuration baked into the binary.
#[derive(Default, Clone)]
pub struct InMemoryConfigSource {
    config: Arc<RwLock<Option<SiteConfig>>>,
}

impl InMemoryConfigSource {
    /// Creates an empty source; `load` returns `None` until something is saved.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SiteConfig) -> Self {
        Self {
            config: Arc::new(RwLock::new(Some(config))),
        }
    }
}

#[async_trait]
impl ConfigSource for InMemoryConfigSource {
    async fn load(&self) -> Result<Option<SiteConfig>> {
        let config = self.config.read().await;
        Ok(config.clone())
    }

    async fn save(&self, config: SiteConfig) -> Result<()> {
        let mut current = self.config.write().await;
        *current = Some(config);
        Ok(())
    }
}
