//! Simulated ad network providers.
//!
//! Stands in for the per-platform network SDKs. The primary provider covers
//! banners, interstitials and rewarded video; the secondary provider targets
//! a platform without banner support, so banner and orientation calls are
//! ignored there. Every forwarded call is recorded as a [`NetworkEvent`].

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use serde::Serialize;

use crate::provider::{AdNetworkProvider, DelegateHandle};
use crate::settings::{NetworkConfig, ProviderKind};

/// A call that reached the simulated SDK.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum NetworkEvent {
    BannerScheduled { delay_ms: u64 },
    Interstitial,
    RewardedVideo { rewarded: bool },
    BannerRemoved,
    RemovedAll,
    OrientationAdjusted,
}

/// Network provider that records calls instead of talking to an SDK.
pub struct SimulatedNetwork {
    kind: ProviderKind,
    rewarded_video_ready: bool,
    reward_amount: u32,
    events: Mutex<Vec<NetworkEvent>>,
    delegate: Mutex<DelegateHandle>,
}

impl SimulatedNetwork {
    #[must_use]
    pub fn new(config: &NetworkConfig) -> Self {
        Self {
            kind: config.provider,
            rewarded_video_ready: config.rewarded_video_preloaded,
            reward_amount: config.reward_amount,
            events: Mutex::new(Vec::new()),
            delegate: Mutex::new(None),
        }
    }

    /// Snapshot of everything forwarded so far.
    #[must_use]
    pub fn events(&self) -> Vec<NetworkEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, event: NetworkEvent) {
        log::debug!("{}: {:?}", self.provider_name(), event);
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }

    fn delegate(&self) -> DelegateHandle {
        self.delegate
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn supports_banner(&self) -> bool {
        matches!(self.kind, ProviderKind::Primary)
    }
}

impl AdNetworkProvider for SimulatedNetwork {
    fn provider_name(&self) -> &'static str {
        self.kind.as_str()
    }

    fn show_banner(&self, delay: Duration) {
        if !self.supports_banner() {
            log::debug!("{}: banners not supported, ignoring", self.provider_name());
            return;
        }
        self.record(NetworkEvent::BannerScheduled {
            delay_ms: u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
        });
    }

    fn show_interstitial(&self) {
        self.record(NetworkEvent::Interstitial);
        if let Some(delegate) = self.delegate() {
            delegate.ad_did_open();
        }
    }

    fn show_rewarded_video(&self) {
        let rewarded = self.rewarded_video_ready;
        self.record(NetworkEvent::RewardedVideo { rewarded });

        if !rewarded {
            log::warn!("{}: no rewarded video loaded", self.provider_name());
            return;
        }
        if let Some(delegate) = self.delegate() {
            delegate.ad_did_open();
            delegate.ad_did_reward_user(self.reward_amount);
            delegate.ad_did_close();
        }
    }

    fn remove_banner(&self) {
        if self.supports_banner() {
            self.record(NetworkEvent::BannerRemoved);
        }
    }

    fn remove_all(&self) {
        self.record(NetworkEvent::RemovedAll);
    }

    fn adjust_for_orientation(&self) {
        if self.supports_banner() {
            self.record(NetworkEvent::OrientationAdjusted);
        }
    }

    fn is_rewarded_video_ready(&self) -> bool {
        self.rewarded_video_ready
    }

    fn set_delegate(&self, delegate: DelegateHandle) {
        *self.delegate.lock().unwrap_or_else(PoisonError::into_inner) = delegate;
    }
}

/// Build the network provider selected in settings.
#[must_use]
pub fn build_network_provider(config: &NetworkConfig) -> Arc<SimulatedNetwork> {
    log::info!("Building network provider: {}", config.provider.as_str());
    Arc::new(SimulatedNetwork::new(config))
}
