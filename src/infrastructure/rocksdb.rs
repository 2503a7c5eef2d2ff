use crate::domain::config::SiteConfig;
use crate::domain::ports::ConfigSource;
use crate::error::{PixError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, Options};
use std::path::Path;
use std::sync::Arc;

/// Column Family for the page configuration document.
pub const CF_SITE: &str = "site";
/// Key of the single configuration document.
const CONFIG_KEY: &[u8] = b"config";

/// A persistent configuration source backed by RocksDB.
///
/// The document is stored as JSON under one key of the `site` column family.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDbConfigSource {
    db: Arc<DB>,
}

impl RocksDbConfigSource {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the `site` column family exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_site = ColumnFamilyDescriptor::new(CF_SITE, Options::default());
        let db = DB::open_cf_descriptors(&opts, path, vec![cf_site])?;

        Ok(Self { db: Arc::new(db) })
    }

    fn cf(&self) -> Result<&rocksdb::ColumnFamily> {
        self.db.cf_handle(CF_SITE).ok_or_else(|| {
            PixError::InternalError(Box::new(std::io::Error::other(
                "Site column family not found",
            )))
        })
    }
}

#[async_trait]
impl ConfigSource for RocksDbConfigSource {
    async fn load(&self) -> Result<Option<SiteConfig>> {
        let bytes = self.db.get_cf(self.cf()?, CONFIG_KEY)?;
        match bytes {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, config: SiteConfig) -> Result<()> {
        let value = serde_json::to_vec(&config)?;
        self.db.put_cf(self.cf()?, CONFIG_KEY, value)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_rocksdb_open_cf() {
        let dir = tempdir().unwrap();
        let source = RocksDbConfigSource::open(dir.path()).expect("Failed to open RocksDB");

        assert!(source.db.cf_handle(CF_SITE).is_some());
    }

    #[tokio::test]
    async fn test_rocksdb_config_source() {
        let dir = tempdir().unwrap();
        let source = RocksDbConfigSource::open(dir.path()).unwrap();
        assert!(source.load().await.unwrap().is_none());

        let mut config = SiteConfig::default();
        config.pix.key = "71288441479".to_string();
        config.design.font = "Outfit".to_string();
        source.save(config.clone()).await.unwrap();

        assert_eq!(source.load().await.unwrap(), Some(config));
    }

    #[tokio::test]
    async fn test_rocksdb_persists_across_reopen() {
        let dir = tempdir().unwrap();
        {
            let source = RocksDbConfigSource::open(dir.path()).unwrap();
            source.save(SiteConfig::default()).await.unwrap();
        }
        let source = RocksDbConfigSource::open(dir.path()).unwrap();
        assert!(source.load().await.unwrap().is_some());
    }
}
