//! Ad manager facade.
//!
//! [`AdManager`] is the only type call sites talk to. It owns the session's
//! [`DispatchState`], routes interstitial slots according to the policy and
//! forwards everything else to the network provider and the custom ad
//! rotation.
//!
//! Every mutating operation takes `&mut self`: the manager has one logical
//! owner. Hosts that call it from several threads wrap it in a `Mutex`.

use std::sync::Arc;
use std::time::Duration;

use crate::custom::RotatingCustomAds;
use crate::delegate::AdDelegate;
use crate::network::{build_network_provider, SimulatedNetwork};
use crate::policy::{DispatchState, InterstitialOutcome};
use crate::provider::{AdNetworkProvider, CustomAdProvider, DelegateHandle};
use crate::settings::{DispatchConfig, Settings};

/// Decides between custom and network ads and forwards lifecycle events.
pub struct AdManager {
    state: DispatchState,
    network: Arc<dyn AdNetworkProvider>,
    custom: Arc<dyn CustomAdProvider>,
    delegate: DelegateHandle,
}

impl AdManager {
    /// Create a manager for a new session.
    #[must_use]
    pub fn new(
        config: &DispatchConfig,
        network: Arc<dyn AdNetworkProvider>,
        custom: Arc<dyn CustomAdProvider>,
    ) -> Self {
        log::info!(
            "Ad manager using '{}' (custom ad interval {}, max {} per session)",
            network.provider_name(),
            config.custom_ad_interval,
            config.max_custom_ads_per_session
        );
        Self {
            state: DispatchState::new(
                config.custom_ad_interval,
                config.max_custom_ads_per_session,
            ),
            network,
            custom,
            delegate: None,
        }
    }

    /// Change the custom ad interval and session cap mid-session.
    pub fn configure(&mut self, custom_ad_interval: u32, max_custom_ads_per_session: u32) {
        log::info!(
            "Reconfiguring custom ads: interval {}, max {} per session",
            custom_ad_interval,
            max_custom_ads_per_session
        );
        self.state
            .configure(custom_ad_interval, max_custom_ads_per_session);
    }

    /// Set or clear the event sink on both providers.
    pub fn set_delegate(&mut self, delegate: Option<Arc<dyn AdDelegate>>) {
        self.custom.set_delegate(delegate.clone());
        self.network.set_delegate(delegate.clone());
        self.delegate = delegate;
    }

    #[must_use]
    pub fn delegate(&self) -> Option<&Arc<dyn AdDelegate>> {
        self.delegate.as_ref()
    }

    /// Show a banner after `delay`, unless ads were removed.
    pub fn show_banner(&mut self, delay: Duration) {
        if self.state.is_removed_ads() {
            return;
        }
        self.network.show_banner(delay);
    }

    /// Fill one interstitial slot.
    ///
    /// `interval` of 0 shows on every call; otherwise only every
    /// `interval`-th call from this call site gets through.
    pub fn request_interstitial(&mut self, interval: u32) -> InterstitialOutcome {
        let outcome = self.state.next_interstitial(interval);
        match outcome {
            InterstitialOutcome::Custom => self.custom.show(),
            InterstitialOutcome::Network => self.network.show_interstitial(),
            InterstitialOutcome::AdsRemoved | InterstitialOutcome::Throttled => {
                log::trace!("Interstitial suppressed: {:?}", outcome);
                return outcome;
            }
        }
        log::debug!(
            "Interstitial -> {:?} (counter {}, custom shown {}/{})",
            outcome,
            self.state.custom_ad_counter(),
            self.state.custom_ad_shown_counter(),
            self.state.custom_ad_max_per_session()
        );
        outcome
    }

    /// Show a rewarded video. Works even after ads were removed.
    pub fn request_rewarded_video(&mut self) {
        self.network.show_rewarded_video();
    }

    pub fn remove_banner(&mut self) {
        self.network.remove_banner();
    }

    /// Remove every ad and stop showing banners and interstitials for the
    /// rest of the session.
    pub fn remove_all(&mut self) {
        if !self.state.is_removed_ads() {
            log::info!("Removing all ads for this session");
        }
        self.state.mark_removed();
        self.custom.remove();
        self.network.remove_all();
    }

    /// Call after the device orientation changed.
    pub fn adjust_for_orientation(&mut self) {
        self.custom.adjust_for_orientation();
        self.network.adjust_for_orientation();
    }

    #[must_use]
    pub fn is_rewarded_video_ready(&self) -> bool {
        self.network.is_rewarded_video_ready()
    }

    #[must_use]
    pub fn is_removed_ads(&self) -> bool {
        self.state.is_removed_ads()
    }

    #[must_use]
    pub fn state(&self) -> &DispatchState {
        &self.state
    }
}

/// A manager wired to the simulated network and the custom rotation, with
/// handles to both providers for inspection.
pub struct SimulatedSession {
    pub manager: AdManager,
    pub network: Arc<SimulatedNetwork>,
    pub custom: Arc<RotatingCustomAds>,
}

/// Build a manager from settings using the bundled providers.
#[must_use]
pub fn build_simulated_session(settings: &Settings) -> SimulatedSession {
    let network = build_network_provider(&settings.network);
    let custom = Arc::new(RotatingCustomAds::new(settings.custom_ads.clone()));
    let manager = AdManager::new(&settings.dispatch, network.clone(), custom.clone());

    SimulatedSession {
        manager,
        network,
        custom,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::PoisonError;

    use super::*;
    use crate::network::NetworkEvent;
    use crate::policy::InterstitialOutcome::{AdsRemoved, Custom, Network, Throttled};
    use crate::test_support::tests::{
        crate_test_settings_str, Call, Harness, RecordingDelegate,
    };

    #[test]
    fn test_interstitials_route_to_providers() {
        let mut h = Harness::new(3, 2);
        let outcomes: Vec<_> = (0..6).map(|_| h.manager.request_interstitial(0)).collect();

        assert_eq!(
            outcomes,
            vec![Custom, Network, Network, Custom, Network, Network]
        );
        assert_eq!(
            h.take_calls(),
            vec![
                Call::ShowCustom,
                Call::ShowInterstitial,
                Call::ShowInterstitial,
                Call::ShowCustom,
                Call::ShowInterstitial,
                Call::ShowInterstitial,
            ]
        );
    }

    #[test]
    fn test_throttled_interstitial_forwards_nothing() {
        let mut h = Harness::new(3, 2);

        assert_eq!(h.manager.request_interstitial(2), Throttled);
        assert!(h.take_calls().is_empty());

        assert_eq!(h.manager.request_interstitial(2), Custom);
        assert_eq!(h.take_calls(), vec![Call::ShowCustom]);
        assert_eq!(h.manager.state().interval_counter(), 0);
    }

    #[test]
    fn test_show_banner_forwards_delay() {
        let mut h = Harness::new(3, 2);
        h.manager.show_banner(Duration::from_secs(2));
        assert_eq!(h.take_calls(), vec![Call::ShowBanner(Duration::from_secs(2))]);
    }

    #[test]
    fn test_remove_all_forwards_to_both_and_sets_flag() {
        let mut h = Harness::new(3, 2);
        assert!(!h.manager.is_removed_ads());

        h.manager.remove_all();

        assert!(h.manager.is_removed_ads());
        assert_eq!(h.take_calls(), vec![Call::RemoveCustom, Call::RemoveAll]);
    }

    #[test]
    fn test_remove_all_is_idempotent_but_always_forwards() {
        let mut h = Harness::new(3, 2);
        h.manager.remove_all();
        let state_after_first = h.manager.state().clone();
        h.take_calls();

        h.manager.remove_all();

        assert_eq!(h.manager.state(), &state_after_first);
        assert_eq!(h.take_calls(), vec![Call::RemoveCustom, Call::RemoveAll]);
    }

    #[test]
    fn test_removed_ads_gates_banner_and_interstitial_only() {
        let mut h = Harness::new(3, 2);
        h.manager.remove_all();
        h.take_calls();

        h.manager.show_banner(Duration::ZERO);
        assert_eq!(h.manager.request_interstitial(0), AdsRemoved);
        assert_eq!(h.manager.request_interstitial(2), AdsRemoved);
        assert!(h.take_calls().is_empty());

        h.manager.request_rewarded_video();
        h.manager.remove_banner();
        h.manager.adjust_for_orientation();
        assert_eq!(
            h.take_calls(),
            vec![
                Call::ShowRewardedVideo,
                Call::RemoveBanner,
                Call::CustomOrientation,
                Call::NetworkOrientation,
            ]
        );
    }

    #[test]
    fn test_remove_banner_not_gated() {
        let mut h = Harness::new(3, 2);
        h.manager.remove_banner();
        h.manager.remove_all();
        h.take_calls();

        h.manager.remove_banner();
        assert_eq!(h.take_calls(), vec![Call::RemoveBanner]);
    }

    #[test]
    fn test_rewarded_video_bypasses_rotation() {
        let mut h = Harness::new(1, 10);
        h.manager.request_rewarded_video();
        h.manager.request_rewarded_video();

        assert_eq!(
            h.take_calls(),
            vec![Call::ShowRewardedVideo, Call::ShowRewardedVideo]
        );
        assert_eq!(h.manager.state().custom_ad_counter(), 0);
        assert_eq!(h.manager.state().custom_ad_shown_counter(), 0);
    }

    #[test]
    fn test_is_rewarded_video_ready_reads_network() {
        let h = Harness::new(3, 2);
        assert!(h.manager.is_rewarded_video_ready());
    }

    #[test]
    fn test_set_delegate_fans_out() {
        let mut h = Harness::new(3, 2);
        let delegate: Arc<dyn AdDelegate> = Arc::new(RecordingDelegate::default());

        h.manager.set_delegate(Some(delegate.clone()));

        let network_delegate = h
            .network
            .delegate
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        let custom_delegate = h
            .custom
            .delegate
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        assert!(network_delegate.is_some_and(|d| Arc::ptr_eq(&d, &delegate)));
        assert!(custom_delegate.is_some_and(|d| Arc::ptr_eq(&d, &delegate)));
        assert!(h.manager.delegate().is_some());

        h.manager.set_delegate(None);
        assert!(h
            .network
            .delegate
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none());
        assert!(h.manager.delegate().is_none());
    }

    #[test]
    fn test_configure_changes_rotation_mid_session() {
        let mut h = Harness::new(3, 1);
        assert_eq!(h.manager.request_interstitial(0), Custom);
        assert_eq!(h.manager.request_interstitial(0), Network);

        h.manager.configure(3, 2);
        // Counter is at 2; the next slot finishes the cycle on the network.
        assert_eq!(h.manager.request_interstitial(0), Network);
        assert_eq!(h.manager.request_interstitial(0), Custom);
    }

    #[test]
    fn test_simulated_session_from_settings() {
        let settings = Settings::from_toml(&crate_test_settings_str()).expect("should parse");
        let mut session = build_simulated_session(&settings);
        let delegate = Arc::new(RecordingDelegate::default());
        session.manager.set_delegate(Some(delegate.clone()));

        for _ in 0..4 {
            session.manager.request_interstitial(0);
        }

        assert_eq!(session.custom.history(), vec!["puzzle-pack", "space-race"]);
        assert_eq!(
            session.network.events(),
            vec![NetworkEvent::Interstitial, NetworkEvent::Interstitial]
        );
        assert_eq!(delegate.opened(), 4);
    }
}
