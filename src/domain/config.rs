use crate::domain::identity::PaymentRequest;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The page configuration edited from the admin dashboard.
///
/// Stored as one document with three groups. Images are URLs handed out by
/// the image host; nothing here ever holds file bytes.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct SiteConfig {
    #[serde(default)]
    pub content: Content,
    #[serde(default)]
    pub design: Design,
    #[serde(default)]
    pub pix: PixConfig,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Content {
    pub name: String,
    pub bio: String,
    pub location: String,
    pub phone: String,
    pub profile_img: String,
    pub links: Vec<Link>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
#[serde(default)]
pub struct Link {
    pub title: String,
    pub url: String,
    pub img: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Design {
    pub font: String,
    pub fav_light: String,
    pub fav_dark: String,
    pub bg_mobile: String,
    pub bg_desktop: String,
}

/// Payee details shown behind the page's Pix button.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
#[serde(default)]
pub struct PixConfig {
    pub key: String,
    pub name: String,
    pub city: String,
    /// Zero means the payer types the amount.
    pub value: Decimal,
}

impl From<&PixConfig> for PaymentRequest {
    fn from(pix: &PixConfig) -> Self {
        Self {
            key: pix.key.clone(),
            name: pix.name.clone(),
            city: pix.city.clone(),
            amount: Some(pix.value),
            transaction_id: None,
        }
    }
}
