//! Namview reviewer.
//!
//! Loads the configuration, streams a transaction through a sign session and prints
//! every display item.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod review;
