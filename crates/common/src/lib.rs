//! Common functionality for ad dispatch.
//!
//! This crate decides, at each interstitial call site, whether to show an
//! in-house custom ad or forward to an ad network, and forwards the rest of
//! the ad lifecycle to the providers.
//!
//! # Modules
//!
//! - [`custom`]: Round-robin rotation of in-house custom ads
//! - [`delegate`]: Event sink shared by all providers
//! - [`error`]: Error types and error handling utilities
//! - [`logging`]: Logger setup for binaries
//! - [`manager`]: The [`manager::AdManager`] facade call sites talk to
//! - [`network`]: Simulated network providers
//! - [`policy`]: Interstitial dispatch counters and decisions
//! - [`provider`]: Collaborator traits for network and custom ad providers
//! - [`settings`]: Configuration management and validation
//! - [`test_support`]: Testing utilities and mocks

pub mod custom;
pub mod delegate;
pub mod error;
pub mod logging;
pub mod manager;
pub mod network;
pub mod policy;
pub mod provider;
pub mod settings;

pub use manager::{build_simulated_session, AdManager, SimulatedSession};
pub use policy::{DispatchState, InterstitialOutcome};
