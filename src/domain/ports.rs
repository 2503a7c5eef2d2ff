use super::config::SiteConfig;
use crate::error::Result;
use async_trait::async_trait;

/// Where the page configuration document lives.
///
/// The page reads it once per load; the admin dashboard writes it back whole.
#[async_trait]
pub trait ConfigSource: Send + Sync {
    async fn load(&self) -> Result<Option<SiteConfig>>;
    async fn save(&self, config: SiteConfig) -> Result<()>;
}

pub type ConfigSourceBox = Box<dyn ConfigSource>;
