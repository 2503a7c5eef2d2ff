use crate::application::encoder::PixPayloadEncoder;
use crate::domain::config::SiteConfig;
use crate::domain::identity::{PaymentIdentity, PaymentRequest};
use crate::domain::ports::ConfigSourceBox;
use crate::error::{PixError, Result};
use tracing::{debug, info};

/// Serves the Pix payload of the landing page.
///
/// `PixService` owns the configuration backend and an encoder. The page
/// configuration is read once per call to [`PixService::load`]; the payload is
/// derived from its `pix` group.
pub struct PixService {
    source: ConfigSourceBox,
    encoder: PixPayloadEncoder,
}

impl PixService {
    /// Creates a new `PixService`.
    ///
    /// # Arguments
    ///
    /// * `source` - The backend holding the page configuration document.
    /// * `encoder` - The encoder used for the page's payload.
    pub fn new(source: ConfigSourceBox, encoder: PixPayloadEncoder) -> Self {
        Self { source, encoder }
    }

    /// Reads the page configuration, failing if none was ever saved.
    pub async fn load(&self) -> Result<SiteConfig> {
        let config = self
            .source
            .load()
            .await?
            .ok_or(PixError::MissingRequiredField("site configuration"))?;
        debug!(links = config.content.links.len(), "loaded site configuration");
        Ok(config)
    }

    /// Loads the configuration and encodes the payload behind its Pix button.
    pub async fn payload(&self) -> Result<String> {
        let config = self.load().await?;
        self.payload_for(&config)
    }

    /// Encodes the payload for an already loaded configuration.
    pub fn payload_for(&self, config: &SiteConfig) -> Result<String> {
        let identity = PaymentIdentity::try_from(PaymentRequest::from(&config.pix))?;
        self.encoder.encode(&identity)
    }

    /// Replaces the stored configuration, as the admin dashboard's save does.
    ///
    /// The Pix group is checked by encoding it first, so a configuration the
    /// page could not render is never stored.
    pub async fn save(&self, config: SiteConfig) -> Result<()> {
        self.payload_for(&config)?;
        self.source.save(config).await?;
        info!("site configuration saved");
        Ok(())
    }
}
