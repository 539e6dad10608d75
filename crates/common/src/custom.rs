//! In-house custom ad rotation.
//!
//! Holds the inventory of custom ads from settings and rotates through it
//! round-robin, one ad per [`CustomAdProvider::show`]. Rendering is left to
//! the host app; this type only tracks which ad is on screen and reports
//! open/close events to the delegate.

use std::sync::{Mutex, PoisonError};

use crate::provider::{CustomAdProvider, DelegateHandle};
use crate::settings::CustomAd;

#[derive(Debug, Default)]
struct Rotation {
    next: usize,
    visible: Option<usize>,
    history: Vec<String>,
    relayouts: u32,
}

/// Round-robin custom ad provider.
pub struct RotatingCustomAds {
    inventory: Vec<CustomAd>,
    rotation: Mutex<Rotation>,
    delegate: Mutex<DelegateHandle>,
}

impl RotatingCustomAds {
    #[must_use]
    pub fn new(inventory: Vec<CustomAd>) -> Self {
        log::info!("Custom ad rotation with {} ads", inventory.len());
        Self {
            inventory,
            rotation: Mutex::new(Rotation::default()),
            delegate: Mutex::new(None),
        }
    }

    /// The ad currently on screen, if any.
    #[must_use]
    pub fn visible_ad(&self) -> Option<&CustomAd> {
        let visible = self.rotation().visible;
        visible.and_then(|idx| self.inventory.get(idx))
    }

    /// Ids of every ad shown so far, in order.
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.rotation().history.clone()
    }

    /// How many times the visible ad was laid out again.
    #[must_use]
    pub fn relayouts(&self) -> u32 {
        self.rotation().relayouts
    }

    fn rotation(&self) -> std::sync::MutexGuard<'_, Rotation> {
        self.rotation.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn delegate(&self) -> DelegateHandle {
        self.delegate
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl CustomAdProvider for RotatingCustomAds {
    fn show(&self) {
        if self.inventory.is_empty() {
            log::warn!("Custom ad slot reached with an empty inventory");
            return;
        }

        let replaced = {
            let mut rotation = self.rotation();
            let idx = rotation.next % self.inventory.len();
            rotation.next = (idx + 1) % self.inventory.len();
            rotation.history.push(self.inventory[idx].id.clone());
            log::debug!("Showing custom ad '{}'", self.inventory[idx].id);
            rotation.visible.replace(idx).is_some()
        };

        if let Some(delegate) = self.delegate() {
            if replaced {
                delegate.ad_did_close();
            }
            delegate.ad_did_open();
        }
    }

    fn remove(&self) {
        let removed = self.rotation().visible.take();
        if let Some(idx) = removed {
            log::debug!("Removing custom ad '{}'", self.inventory[idx].id);
            if let Some(delegate) = self.delegate() {
                delegate.ad_did_close();
            }
        }
    }

    fn adjust_for_orientation(&self) {
        let mut rotation = self.rotation();
        if rotation.visible.is_some() {
            rotation.relayouts += 1;
        }
    }

    fn set_delegate(&self, delegate: DelegateHandle) {
        *self.delegate.lock().unwrap_or_else(PoisonError::into_inner) = delegate;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::test_support::tests::{custom_ad, RecordingDelegate};

    fn rotation() -> RotatingCustomAds {
        RotatingCustomAds::new(vec![custom_ad("alpha"), custom_ad("beta"), custom_ad("gamma")])
    }

    #[test]
    fn test_show_rotates_round_robin() {
        let ads = rotation();
        for _ in 0..4 {
            ads.show();
            ads.remove();
        }
        assert_eq!(ads.history(), vec!["alpha", "beta", "gamma", "alpha"]);
    }

    #[test]
    fn test_visible_ad_tracks_show_and_remove() {
        let ads = rotation();
        assert!(ads.visible_ad().is_none());

        ads.show();
        assert_eq!(ads.visible_ad().map(|ad| ad.id.as_str()), Some("alpha"));

        ads.remove();
        assert!(ads.visible_ad().is_none());
    }

    #[test]
    fn test_empty_inventory_is_noop() {
        let ads = RotatingCustomAds::new(Vec::new());
        let delegate = Arc::new(RecordingDelegate::default());
        ads.set_delegate(Some(delegate.clone()));

        ads.show();

        assert!(ads.history().is_empty());
        assert_eq!(delegate.opened(), 0);
    }

    #[test]
    fn test_delegate_sees_open_and_close() {
        let ads = rotation();
        let delegate = Arc::new(RecordingDelegate::default());
        ads.set_delegate(Some(delegate.clone()));

        ads.show();
        ads.show();
        ads.remove();
        ads.remove();

        assert_eq!(delegate.opened(), 2);
        assert_eq!(delegate.closed(), 2, "replacing and removing both close");
    }

    #[test]
    fn test_orientation_only_relayouts_visible_ad() {
        let ads = rotation();
        ads.adjust_for_orientation();
        assert_eq!(ads.relayouts(), 0);

        ads.show();
        ads.adjust_for_orientation();
        assert_eq!(ads.relayouts(), 1);
    }
}
