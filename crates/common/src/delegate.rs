//! Event sink notified by ad providers.

/// Receives ad lifecycle events from both the network provider and the
/// custom ad rotation.
///
/// The manager hands the same delegate to every provider, so a host app
/// sees a single stream of events regardless of where an ad came from.
pub trait AdDelegate: Send + Sync {
    /// An ad was presented and now covers the app.
    fn ad_did_open(&self) {}

    /// The presented ad was dismissed.
    fn ad_did_close(&self) {}

    /// A rewarded video finished and the user earned `reward_amount`.
    fn ad_did_reward_user(&self, reward_amount: u32) {
        let _ = reward_amount;
    }
}
