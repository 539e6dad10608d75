use std::time::Duration;

use config::{Config, Environment, File, FileFormat};
use error_stack::{Report, ResultExt};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AdDispatchError;

/// Prefix for environment overrides, e.g. `AD_DISPATCH__DISPATCH__CUSTOM_AD_INTERVAL`.
pub const ENVIRONMENT_VARIABLE_PREFIX: &str = "AD_DISPATCH";
pub const ENVIRONMENT_VARIABLE_SEPARATOR: &str = "__";

const DEFAULT_SETTINGS_TOML: &str = include_str!("../../../ad-dispatch.toml");

/// Interstitial rotation settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct DispatchConfig {
    /// Every Nth interstitial slot is eligible for a custom ad.
    #[serde(default)]
    pub custom_ad_interval: u32,

    /// Ceiling on custom ads shown per session.
    #[serde(default)]
    pub max_custom_ads_per_session: u32,
}

/// Which network SDK adapter to build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Banner, interstitial and rewarded video.
    #[default]
    Primary,
    /// Interstitial and rewarded video only.
    Secondary,
}

impl ProviderKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ProviderKind::Primary => "primary",
            ProviderKind::Secondary => "secondary",
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct NetworkConfig {
    #[serde(default)]
    pub provider: ProviderKind,

    /// Delay before a banner appears, in milliseconds.
    #[serde(default)]
    #[validate(range(max = 60000))]
    pub banner_delay_ms: u64,

    #[serde(default = "default_rewarded_video_preloaded")]
    pub rewarded_video_preloaded: bool,

    /// Reward granted when a rewarded video completes.
    #[serde(default = "default_reward_amount")]
    #[validate(range(min = 1))]
    pub reward_amount: u32,
}

impl NetworkConfig {
    #[must_use]
    pub fn banner_delay(&self) -> Duration {
        Duration::from_millis(self.banner_delay_ms)
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            banner_delay_ms: 0,
            rewarded_video_preloaded: default_rewarded_video_preloaded(),
            reward_amount: default_reward_amount(),
        }
    }
}

fn default_rewarded_video_preloaded() -> bool {
    true
}

fn default_reward_amount() -> u32 {
    1
}

/// One in-house ad in the custom rotation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Validate)]
pub struct CustomAd {
    #[validate(length(min = 1))]
    pub id: String,

    /// Image asset name shown by the renderer.
    #[validate(length(min = 1))]
    pub image: String,

    /// Where a tap on the ad leads (usually a store page).
    #[validate(url)]
    pub target_url: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct Settings {
    #[serde(default)]
    #[validate(nested)]
    pub dispatch: DispatchConfig,

    #[serde(default)]
    #[validate(nested)]
    pub network: NetworkConfig,

    #[serde(default)]
    #[validate(nested)]
    pub custom_ads: Vec<CustomAd>,
}

impl Settings {
    /// Load the embedded default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded TOML fails to parse or validate.
    pub fn new() -> Result<Self, Report<AdDispatchError>> {
        Self::load(DEFAULT_SETTINGS_TOML)
    }

    /// Parse settings from TOML, applying environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`AdDispatchError::Configuration`] if the TOML is malformed or a
    /// value has the wrong type (including negative counters).
    pub fn from_toml(toml_str: &str) -> Result<Self, Report<AdDispatchError>> {
        let environment = Environment::default()
            .prefix(ENVIRONMENT_VARIABLE_PREFIX)
            .separator(ENVIRONMENT_VARIABLE_SEPARATOR);

        let toml = File::from_str(toml_str, FileFormat::Toml);
        let config = Config::builder()
            .add_source(toml)
            .add_source(environment)
            .build()
            .change_context(AdDispatchError::Configuration {
                message: "Failed to build configuration".to_string(),
            })?;

        config
            .try_deserialize()
            .change_context(AdDispatchError::Configuration {
                message: "Failed to deserialize configuration".to_string(),
            })
    }

    /// Parse and validate settings.
    ///
    /// # Errors
    ///
    /// Returns [`AdDispatchError::Configuration`] on parse or validation
    /// failure and [`AdDispatchError::InvalidCustomAd`] on duplicate ids.
    pub fn load(toml_str: &str) -> Result<Self, Report<AdDispatchError>> {
        let settings = Self::from_toml(toml_str)?;
        settings
            .validate()
            .change_context(AdDispatchError::Configuration {
                message: "Settings validation failed".to_string(),
            })?;
        settings.check_custom_ad_ids()?;
        Ok(settings)
    }

    /// Render the effective settings back to TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml_string(&self) -> Result<String, Report<AdDispatchError>> {
        toml::to_string_pretty(self).change_context(AdDispatchError::Configuration {
            message: "Failed to serialize settings".to_string(),
        })
    }

    fn check_custom_ad_ids(&self) -> Result<(), Report<AdDispatchError>> {
        for (i, ad) in self.custom_ads.iter().enumerate() {
            if self.custom_ads[..i].iter().any(|other| other.id == ad.id) {
                return Err(Report::new(AdDispatchError::InvalidCustomAd {
                    id: ad.id.clone(),
                    message: "duplicate id".to_string(),
                }));
            }
        }
        if self.dispatch.max_custom_ads_per_session > 0 && self.custom_ads.is_empty() {
            log::warn!("Custom ads are enabled but the inventory is empty");
        }
        Ok(())
    }
}
