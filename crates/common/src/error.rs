//! Error types for the ad dispatch library.
//!
//! The dispatch operations themselves are total and never fail. Errors only
//! come out of the configuration layer: loading, parsing and validating
//! [`crate::settings::Settings`].

use derive_more::{Display, Error};

/// Errors produced while building or validating dispatch configuration.
#[derive(Debug, Display, Error)]
pub enum AdDispatchError {
    /// Settings could not be loaded or parsed.
    #[display("Configuration error: {message}")]
    Configuration { message: String },

    /// A custom ad entry in the inventory is unusable.
    #[display("Invalid custom ad '{id}': {message}")]
    InvalidCustomAd { id: String, message: String },
}
