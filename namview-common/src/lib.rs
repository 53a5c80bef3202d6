//! Common types and configurations shared across Namview crates.
//!
//! This crate provides the network selection and the configuration types used by the
//! decoder, the display engine and the reviewer binary.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;

// Re-export commonly used config types at crate root.
pub use config::buffer::BufferConfig;
pub use config::display::{DisplayConfig, DisplayMode};
pub use config::network::Network;
pub use config::tokens::{
    default_tokens, TokenConfig, NATIVE_TOKEN_ADDRESS_HEX, NATIVE_TOKEN_SYMBOL,
};
