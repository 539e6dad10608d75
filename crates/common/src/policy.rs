//! Interstitial dispatch policy.
//!
//! Decides, for every interstitial request, whether the slot goes to an
//! in-house custom ad, to the ad network, or to nothing at all. The policy is
//! pure state: no providers, no IO, no clocks. [`crate::manager::AdManager`]
//! acts on the returned [`InterstitialOutcome`].
//!
//! # Counters
//!
//! - `custom_ad_counter` cycles through `[0, custom_ad_interval]`. A slot is a
//!   custom slot when the counter sits at either end of that range.
//! - `custom_ad_shown_counter` only grows and caps custom ads per session.
//! - `interval_counter` implements the per-call-site throttle.
//!
//! Because the counter wraps to 0 as soon as it reaches the interval, the
//! `== custom_ad_interval` end of the window is only observable after
//! [`DispatchState::configure`] lowers the interval onto the current counter.

use serde::Serialize;

/// What happened to a single interstitial request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InterstitialOutcome {
    /// Ads were removed for this session; nothing was shown.
    AdsRemoved,
    /// The call-site interval swallowed this request.
    Throttled,
    /// An in-house custom ad took the slot.
    Custom,
    /// The slot was forwarded to the ad network.
    Network,
}

impl InterstitialOutcome {
    /// Whether an ad of any kind was shown.
    #[must_use]
    pub fn is_shown(self) -> bool {
        matches!(self, Self::Custom | Self::Network)
    }
}

/// Per-session dispatch counters and configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DispatchState {
    custom_ad_interval: u32,
    custom_ad_max_per_session: u32,
    custom_ad_counter: u32,
    custom_ad_shown_counter: u32,
    interval_counter: u32,
    is_removed_ads: bool,
}

impl DispatchState {
    /// Create a fresh session state with zeroed counters.
    #[must_use]
    pub fn new(custom_ad_interval: u32, custom_ad_max_per_session: u32) -> Self {
        Self {
            custom_ad_interval,
            custom_ad_max_per_session,
            ..Self::default()
        }
    }

    /// Replace the interval and session cap. Counters are left untouched.
    pub fn configure(&mut self, custom_ad_interval: u32, custom_ad_max_per_session: u32) {
        self.custom_ad_interval = custom_ad_interval;
        self.custom_ad_max_per_session = custom_ad_max_per_session;
    }

    /// Decide the fate of one interstitial request and advance the counters.
    ///
    /// `call_site_interval` of 0 disables the throttle. Otherwise only every
    /// `call_site_interval`-th call gets past it.
    pub fn next_interstitial(&mut self, call_site_interval: u32) -> InterstitialOutcome {
        if self.is_removed_ads {
            return InterstitialOutcome::AdsRemoved;
        }

        if call_site_interval != 0 {
            self.interval_counter += 1;
            if self.interval_counter < call_site_interval {
                return InterstitialOutcome::Throttled;
            }
            self.interval_counter = 0;
        }

        let outcome = if self.is_custom_slot() && self.has_custom_budget() {
            self.custom_ad_shown_counter += 1;
            InterstitialOutcome::Custom
        } else {
            InterstitialOutcome::Network
        };

        self.advance_custom_counter();
        outcome
    }

    /// Flip the session into the ads-removed state. There is no way back.
    pub fn mark_removed(&mut self) {
        self.is_removed_ads = true;
    }

    fn is_custom_slot(&self) -> bool {
        self.custom_ad_counter == 0 || self.custom_ad_counter == self.custom_ad_interval
    }

    fn has_custom_budget(&self) -> bool {
        self.custom_ad_shown_counter < self.custom_ad_max_per_session
    }

    fn advance_custom_counter(&mut self) {
        self.custom_ad_counter += 1;
        if self.custom_ad_counter >= self.custom_ad_interval {
            self.custom_ad_counter = 0;
        }
    }

    #[must_use]
    pub fn custom_ad_interval(&self) -> u32 {
        self.custom_ad_interval
    }

    #[must_use]
    pub fn custom_ad_max_per_session(&self) -> u32 {
        self.custom_ad_max_per_session
    }

    #[must_use]
    pub fn custom_ad_counter(&self) -> u32 {
        self.custom_ad_counter
    }

    #[must_use]
    pub fn custom_ad_shown_counter(&self) -> u32 {
        self.custom_ad_shown_counter
    }

    #[must_use]
    pub fn interval_counter(&self) -> u32 {
        self.interval_counter
    }

    #[must_use]
    pub fn is_removed_ads(&self) -> bool {
        self.is_removed_ads
    }

    /// Custom ads still allowed this session.
    #[must_use]
    pub fn remaining_custom_ads(&self) -> u32 {
        self.custom_ad_max_per_session
            .saturating_sub(self.custom_ad_shown_counter)
    }
}
