//! Trait definitions for the collaborators the dispatcher forwards to.

use std::sync::Arc;
use std::time::Duration;

use crate::delegate::AdDelegate;

/// Shared handle to a delegate, as handed to every provider.
pub type DelegateHandle = Option<Arc<dyn AdDelegate>>;

/// Trait implemented by ad network SDK adapters (one per platform).
///
/// Every method is fire-and-forget. Failures inside the SDK are reported
/// through the delegate or the SDK's own channels, never back to the
/// dispatcher.
pub trait AdNetworkProvider: Send + Sync {
    /// Unique identifier for this provider (e.g., "primary", "secondary").
    fn provider_name(&self) -> &'static str;

    /// Schedule a banner to appear after `delay`.
    fn show_banner(&self, delay: Duration);

    /// Present a full-screen interstitial.
    fn show_interstitial(&self);

    /// Present a rewarded video.
    fn show_rewarded_video(&self);

    /// Hide the banner if one is showing.
    fn remove_banner(&self);

    /// Tear down every ad this provider owns.
    fn remove_all(&self);

    /// Relayout after the device orientation changed.
    fn adjust_for_orientation(&self);

    /// Whether a rewarded video is loaded and can be shown right now.
    fn is_rewarded_video_ready(&self) -> bool;

    /// Replace the event sink.
    fn set_delegate(&self, delegate: DelegateHandle);
}

/// Trait implemented by the in-house ad renderer.
pub trait CustomAdProvider: Send + Sync {
    /// Present the next custom ad.
    fn show(&self);

    /// Remove the custom ad if one is showing.
    fn remove(&self);

    /// Relayout after the device orientation changed.
    fn adjust_for_orientation(&self);

    /// Replace the event sink.
    fn set_delegate(&self, delegate: DelegateHandle);
}
