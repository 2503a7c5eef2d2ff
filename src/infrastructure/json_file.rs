use crate::domain::config::SiteConfig;
use crate::domain::ports::ConfigSource;
use crate::error::Result;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::debug;

/// The page configuration kept as a JSON document on disk.
///
/// A missing file reads as "no configuration yet".
#[derive(Debug, Clone)]
pub struct JsonFileConfigSource {
    path: PathBuf,
}

impl JsonFileConfigSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ConfigSource for JsonFileConfigSource {
    async fn load(&self) -> Result<Option<SiteConfig>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        debug!(path = %self.path.display(), "read configuration file");
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    async fn save(&self, config: SiteConfig) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(&config)?;
        tokio::fs::write(&self.path, bytes).await?;
        Ok(())
    }
}
